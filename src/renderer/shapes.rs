//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::{Vertex, colors};
use super::viewport::{ViewTransform, Viewport};
use crate::scene::Scene;

/// Two triangles covering an axis-aligned rectangle, in clip space
pub fn rect(
    center: Vec2,
    size: Vec2,
    color: [f32; 4],
    transform: &ViewTransform,
    viewport: &Viewport,
) -> [Vertex; 6] {
    let half = size * 0.5;
    let corner = |dx: f32, dy: f32| {
        let p = viewport.to_clip(transform.apply(center + Vec2::new(dx, dy)));
        Vertex::new(p.x, p.y, color)
    };

    let bl = corner(-half.x, -half.y);
    let br = corner(half.x, -half.y);
    let tl = corner(-half.x, half.y);
    let tr = corner(half.x, half.y);

    [bl, br, tl, tl, br, tr]
}

/// Vertices for a whole frame: scene background, then every node in id order
pub fn frame_vertices(scene: &Scene, viewport: &Viewport) -> Vec<Vertex> {
    let scene_size = scene.config().arena_size;
    let transform = viewport.transform(scene_size);

    let mut vertices = Vec::with_capacity((scene.nodes().count() + 1) * 6);
    vertices.extend(rect(
        scene_size * 0.5,
        scene_size,
        colors::BACKGROUND,
        &transform,
        viewport,
    ));

    for node in scene.nodes() {
        vertices.extend(rect(
            node.position,
            node.size,
            node.color.rgba(),
            &transform,
            viewport,
        ));
    }

    vertices
}
