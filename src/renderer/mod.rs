//! Rendering module
//!
//! Builds clip-space vertex batches for the scene's sprites. No GPU surface
//! lives here; the batch is `Pod` and can be uploaded as-is.

pub mod shapes;
pub mod vertex;
pub mod viewport;

pub use shapes::frame_vertices;
pub use vertex::Vertex;
pub use viewport::{ScaleMode, ViewTransform, Viewport};

use crate::config::ViewConfig;

impl From<&ViewConfig> for Viewport {
    fn from(view: &ViewConfig) -> Self {
        Viewport::new(view.width, view.height, view.scale_mode)
    }
}
