//! Mapping scene coordinates into a fixed-size view

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How the scene is scaled to fit the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScaleMode {
    /// Uniform scale, whole scene visible, letterboxed
    #[default]
    AspectFit,
    /// Uniform scale, view fully covered, scene cropped
    AspectFill,
    /// Stretch each axis independently
    Fill,
}

/// Scene-to-view transform: `view = scene * scale + offset`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub scale: Vec2,
    pub offset: Vec2,
}

impl ViewTransform {
    #[inline]
    pub fn apply(&self, p: Vec2) -> Vec2 {
        p * self.scale + self.offset
    }
}

/// A view of a given pixel size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub size: Vec2,
    pub scale_mode: ScaleMode,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale_mode: ScaleMode) -> Self {
        Self {
            size: Vec2::new(width, height),
            scale_mode,
        }
    }

    /// Transform placing a scene of `scene_size` in this view (scene y-up,
    /// view y-up, origin bottom-left)
    pub fn transform(&self, scene_size: Vec2) -> ViewTransform {
        let ratio = self.size / scene_size;
        let scale = match self.scale_mode {
            ScaleMode::AspectFit => Vec2::splat(ratio.min_element()),
            ScaleMode::AspectFill => Vec2::splat(ratio.max_element()),
            ScaleMode::Fill => ratio,
        };
        // Center the scaled scene
        let offset = (self.size - scene_size * scale) * 0.5;
        ViewTransform { scale, offset }
    }

    /// View pixels to clip space ([-1, 1] on both axes)
    #[inline]
    pub fn to_clip(&self, p: Vec2) -> Vec2 {
        p / self.size * 2.0 - Vec2::ONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aspect_fit_exact_ratio() {
        let vp = Viewport::new(640.0, 360.0, ScaleMode::AspectFit);
        let t = vp.transform(Vec2::new(1920.0, 1080.0));
        assert!((t.scale.x - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(t.scale.x, t.scale.y);
        assert!(t.offset.length() < 1e-4);
        let corner = t.apply(Vec2::new(1920.0, 1080.0));
        assert!((corner - Vec2::new(640.0, 360.0)).length() < 1e-3);
    }

    #[test]
    fn test_aspect_fit_letterboxes() {
        // Square view: scene is width-limited and centered vertically
        let vp = Viewport::new(400.0, 400.0, ScaleMode::AspectFit);
        let t = vp.transform(Vec2::new(1920.0, 1080.0));
        assert!((t.scale.x - 400.0 / 1920.0).abs() < 1e-6);
        assert!(t.offset.x.abs() < 1e-4);
        assert!((t.offset.y - (400.0 - 1080.0 * t.scale.y) * 0.5).abs() < 1e-4);
        assert!(t.offset.y > 0.0);
    }

    #[test]
    fn test_aspect_fill_crops() {
        let vp = Viewport::new(400.0, 400.0, ScaleMode::AspectFill);
        let t = vp.transform(Vec2::new(1920.0, 1080.0));
        assert!((t.scale.y - 400.0 / 1080.0).abs() < 1e-6);
        assert!(t.offset.x < 0.0);
    }

    #[test]
    fn test_fill_stretches() {
        let vp = Viewport::new(400.0, 400.0, ScaleMode::Fill);
        let t = vp.transform(Vec2::new(800.0, 200.0));
        assert_eq!(t.scale, Vec2::new(0.5, 2.0));
    }

    #[test]
    fn test_to_clip() {
        let vp = Viewport::new(640.0, 360.0, ScaleMode::AspectFit);
        assert_eq!(vp.to_clip(Vec2::ZERO), Vec2::new(-1.0, -1.0));
        assert_eq!(vp.to_clip(Vec2::new(320.0, 180.0)), Vec2::ZERO);
    }
}
