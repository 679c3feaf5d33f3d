//! Collision detection and response for axis-aligned rectangles
//!
//! Rectangles are separated along the axis of least penetration. Edge loops
//! are handled per axis so a corner hit reflects both components.

use glam::Vec2;

use super::body::Aabb;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Collision point (if hit)
    pub point: Vec2,
    /// Surface normal at collision (pointing toward the moving body, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between two rectangles.
///
/// The normal points from `b` toward `a`, so pushing `a` along it separates
/// the pair. Touching edges (zero overlap) don't count.
pub fn rect_rect_collision(a: &Aabb, b: &Aabb) -> CollisionResult {
    let overlap = a.overlap(b);
    if overlap.x <= 0.0 || overlap.y <= 0.0 {
        return CollisionResult::miss();
    }

    let delta = a.center() - b.center();
    let (normal, penetration) = if overlap.x < overlap.y {
        (Vec2::new(if delta.x < 0.0 { -1.0 } else { 1.0 }, 0.0), overlap.x)
    } else {
        (Vec2::new(0.0, if delta.y < 0.0 { -1.0 } else { 1.0 }), overlap.y)
    };

    // Midpoint of the overlap region
    let point = (a.min.max(b.min) + a.max.min(b.max)) * 0.5;

    CollisionResult {
        hit: true,
        point,
        normal,
        penetration,
    }
}

/// Check a rectangle against the inside of an edge loop.
///
/// Returns one result per violated axis (at most two).
pub fn rect_edge_loop_collision(body: &Aabb, frame: &Aabb) -> Vec<CollisionResult> {
    let mut hits = Vec::with_capacity(2);
    let center = body.center();

    if body.min.x < frame.min.x {
        hits.push(CollisionResult {
            hit: true,
            point: Vec2::new(frame.min.x, center.y),
            normal: Vec2::X,
            penetration: frame.min.x - body.min.x,
        });
    } else if body.max.x > frame.max.x {
        hits.push(CollisionResult {
            hit: true,
            point: Vec2::new(frame.max.x, center.y),
            normal: Vec2::NEG_X,
            penetration: body.max.x - frame.max.x,
        });
    }

    if body.min.y < frame.min.y {
        hits.push(CollisionResult {
            hit: true,
            point: Vec2::new(center.x, frame.min.y),
            normal: Vec2::Y,
            penetration: frame.min.y - body.min.y,
        });
    } else if body.max.y > frame.max.y {
        hits.push(CollisionResult {
            hit: true,
            point: Vec2::new(center.x, frame.max.y),
            normal: Vec2::NEG_Y,
            penetration: body.max.y - frame.max.y,
        });
    }

    hits
}

/// Combined restitution for a pair (the bouncier surface wins)
#[inline]
pub fn mix_restitution(a: f32, b: f32) -> f32 {
    a.max(b)
}

/// Combined friction for a pair
#[inline]
pub fn mix_friction(a: f32, b: f32) -> f32 {
    (a * b).sqrt()
}

/// Velocity changes produced by a contact impulse
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseResponse {
    pub delta_a: Vec2,
    pub delta_b: Vec2,
}

impl ImpulseResponse {
    pub const NONE: Self = Self {
        delta_a: Vec2::ZERO,
        delta_b: Vec2::ZERO,
    };
}

/// Normal + friction impulse between two bodies.
///
/// `normal` points from B toward A. Nothing happens if the bodies are
/// already separating. With restitution 1 and no friction against a static
/// body this is the mirror reflection v' = v - 2(v·n)n.
pub fn contact_impulse(
    vel_a: Vec2,
    inv_mass_a: f32,
    vel_b: Vec2,
    inv_mass_b: f32,
    normal: Vec2,
    restitution: f32,
    friction: f32,
) -> ImpulseResponse {
    let inv_sum = inv_mass_a + inv_mass_b;
    if inv_sum <= 0.0 {
        return ImpulseResponse::NONE;
    }

    let rel = vel_a - vel_b;
    let vn = rel.dot(normal);
    if vn >= 0.0 {
        return ImpulseResponse::NONE;
    }

    let jn = -(1.0 + restitution) * vn / inv_sum;
    let mut impulse = normal * jn;

    if friction > 0.0 {
        let tangent = rel - normal * vn;
        let vt = tangent.length();
        if vt > 1e-6 {
            let dir = tangent / vt;
            // Coulomb cone: can't exceed mu * jn, can't reverse sliding
            let jt = (vt / inv_sum).min(friction * jn);
            impulse -= dir * jt;
        }
    }

    ImpulseResponse {
        delta_a: impulse * inv_mass_a,
        delta_b: -impulse * inv_mass_b,
    }
}
