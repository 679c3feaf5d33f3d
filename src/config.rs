//! Scene configuration
//!
//! Every value the scene hands to the physics world lives here. Defaults
//! reproduce the classic layout; a JSON file can override any subset.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{SceneError, SceneResult};
use crate::renderer::ScaleMode;

/// Ball body settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BallConfig {
    pub size: Vec2,
    pub velocity: Vec2,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
}

impl Default for BallConfig {
    fn default() -> Self {
        Self {
            size: Vec2::splat(BALL_SIZE),
            velocity: Vec2::new(BALL_VELOCITY.0, BALL_VELOCITY.1),
            friction: 0.0,
            restitution: 1.0,
            linear_damping: 0.0,
        }
    }
}

/// Block template and grid layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlockGridConfig {
    pub block_size: Vec2,
    pub spacing: f32,
    pub columns: u32,
    pub rows: u32,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for BlockGridConfig {
    fn default() -> Self {
        Self {
            block_size: Vec2::new(BLOCK_WIDTH, BLOCK_HEIGHT),
            spacing: BLOCK_SPACING,
            columns: GRID_COLUMNS,
            rows: GRID_ROWS,
            friction: 0.0,
            restitution: 1.0,
        }
    }
}

impl BlockGridConfig {
    /// Center of the block in 1-based cell (column, row)
    pub fn cell_center(&self, column: u32, row: u32) -> Vec2 {
        (self.block_size + Vec2::splat(self.spacing)) * Vec2::new(column as f32, row as f32)
    }

    /// Total number of blocks in the grid
    pub fn block_count(&self) -> usize {
        self.columns as usize * self.rows as usize
    }
}

/// Live view settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    pub width: f32,
    pub height: f32,
    pub scale_mode: ScaleMode,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
            scale_mode: ScaleMode::AspectFit,
        }
    }
}

/// Complete scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    /// Arena size; the edge loop covers (0, 0) to this corner
    pub arena_size: Vec2,
    pub gravity: Vec2,
    pub boundary_friction: f32,
    pub boundary_restitution: f32,
    pub ball: BallConfig,
    pub blocks: BlockGridConfig,
    pub view: ViewConfig,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            arena_size: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            gravity: Vec2::ZERO,
            boundary_friction: 0.0,
            boundary_restitution: 1.0,
            ball: BallConfig::default(),
            blocks: BlockGridConfig::default(),
            view: ViewConfig::default(),
        }
    }
}

fn check_positive(name: &str, v: Vec2) -> SceneResult<()> {
    if v.x > 0.0 && v.y > 0.0 && v.is_finite() {
        Ok(())
    } else {
        Err(SceneError::InvalidConfig(format!(
            "{name} must be positive, got ({}, {})",
            v.x, v.y
        )))
    }
}

fn check_unit(name: &str, v: f32) -> SceneResult<()> {
    if (0.0..=1.0).contains(&v) {
        Ok(())
    } else {
        Err(SceneError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {v}"
        )))
    }
}

fn check_non_negative(name: &str, v: f32) -> SceneResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(SceneError::InvalidConfig(format!(
            "{name} must be finite and not negative, got {v}"
        )))
    }
}

impl SceneConfig {
    /// Parse a config from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> SceneResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded scene config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> SceneResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value the physics world relies on
    pub fn validate(&self) -> SceneResult<()> {
        check_positive("arena_size", self.arena_size)?;
        check_positive("ball.size", self.ball.size)?;
        check_positive("blocks.block_size", self.blocks.block_size)?;
        check_positive("view size", Vec2::new(self.view.width, self.view.height))?;

        if !self.gravity.is_finite() || !self.ball.velocity.is_finite() {
            return Err(SceneError::InvalidConfig(
                "gravity and ball.velocity must be finite".into(),
            ));
        }
        check_non_negative("blocks.spacing", self.blocks.spacing)?;
        check_non_negative("ball.linear_damping", self.ball.linear_damping)?;

        check_unit("ball.friction", self.ball.friction)?;
        check_unit("ball.restitution", self.ball.restitution)?;
        check_unit("blocks.friction", self.blocks.friction)?;
        check_unit("blocks.restitution", self.blocks.restitution)?;
        check_unit("boundary_friction", self.boundary_friction)?;
        check_unit("boundary_restitution", self.boundary_restitution)?;

        // Ball starts at the arena center and must fit inside
        if self.ball.size.cmpgt(self.arena_size).any() {
            return Err(SceneError::InvalidConfig(
                "ball does not fit inside the arena".into(),
            ));
        }

        // Farthest block (top-right cell) must stay inside the arena
        if self.blocks.columns > 0 && self.blocks.rows > 0 {
            let far = self.blocks.cell_center(self.blocks.columns, self.blocks.rows)
                + self.blocks.block_size * 0.5;
            if far.cmpgt(self.arena_size).any() {
                return Err(SceneError::InvalidConfig(format!(
                    "{}x{} block grid extends to ({}, {}), outside the {}x{} arena",
                    self.blocks.columns,
                    self.blocks.rows,
                    far.x,
                    far.y,
                    self.arena_size.x,
                    self.arena_size.y
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.blocks.block_count(), 33);
        assert_eq!(config.arena_size, Vec2::new(1920.0, 1080.0));
        assert_eq!(config.ball.velocity, Vec2::new(1000.0, 1000.0));
    }

    #[test]
    fn test_cell_center() {
        let grid = BlockGridConfig::default();
        assert_eq!(grid.cell_center(1, 1), Vec2::new(160.0, 60.0));
        assert_eq!(grid.cell_center(11, 3), Vec2::new(1760.0, 180.0));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SceneConfig::from_json(r#"{ "blocks": { "columns": 4 } }"#)
            .unwrap_or_else(|e| panic!("config should parse: {e}"));
        assert_eq!(config.blocks.columns, 4);
        assert_eq!(config.blocks.rows, 3);
        assert_eq!(config.ball.size, Vec2::splat(50.0));
    }

    #[test]
    fn test_rejects_bad_restitution() {
        let mut config = SceneConfig::default();
        config.ball.restitution = 1.5;
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_grid_outside_arena() {
        let mut config = SceneConfig::default();
        config.blocks.columns = 12; // 12 * 160 + 75 > 1920
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_non_finite_spacing_and_damping() {
        let mut config = SceneConfig::default();
        config.blocks.spacing = f32::NAN;
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));

        let mut config = SceneConfig::default();
        config.ball.linear_damping = f32::INFINITY;
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));

        let mut config = SceneConfig::default();
        config.ball.linear_damping = -0.5;
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "ball": { "allows_rotation": true } }"#),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_json_round_trip_preserves_scale_mode() {
        let mut config = SceneConfig::default();
        config.view.scale_mode = ScaleMode::Fill;
        let json = config.to_json().unwrap_or_default();
        let parsed = SceneConfig::from_json(&json).unwrap_or_default();
        assert_eq!(parsed.view.scale_mode, ScaleMode::Fill);
    }
}
