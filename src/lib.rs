//! Collision Playground - a ball bouncing through a grid of blocks
//!
//! Core modules:
//! - `sim`: Deterministic host physics world (bodies, masks, contacts)
//! - `scene`: Arena setup and the contact delegate driving block lifecycles
//! - `renderer`: Viewport scaling and vertex batches for sprites
//! - `config`: Data-driven scene configuration
//! - `error`: Crate error type

pub mod config;
pub mod error;
pub mod renderer;
pub mod scene;
pub mod sim;

pub use config::SceneConfig;
pub use error::{SceneError, SceneResult};
pub use scene::{Scene, SceneEvent};

/// Scene configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest frame delta fed to the accumulator (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 1920.0;
    pub const ARENA_HEIGHT: f32 = 1080.0;

    /// Ball defaults
    pub const BALL_SIZE: f32 = 50.0;
    pub const BALL_VELOCITY: (f32, f32) = (1000.0, 1000.0);

    /// Block defaults
    pub const BLOCK_WIDTH: f32 = 150.0;
    pub const BLOCK_HEIGHT: f32 = 50.0;
    pub const BLOCK_SPACING: f32 = 10.0;
    pub const GRID_COLUMNS: u32 = 11;
    pub const GRID_ROWS: u32 = 3;

    /// Live view dimensions
    pub const VIEWPORT_WIDTH: f32 = 640.0;
    pub const VIEWPORT_HEIGHT: f32 = 360.0;
}
