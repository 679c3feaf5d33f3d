//! Physics bodies
//!
//! A body is either an axis-aligned rectangle (dynamic or static) or a hollow
//! edge loop that keeps other bodies inside its frame.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::category::CategoryMask;
use crate::scene::NodeId;

/// Stable body identifier (allocation order)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BodyId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn from_frame(origin: Vec2, size: Vec2) -> Self {
        Self {
            min: origin,
            max: origin + size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Overlap extent on each axis (positive on both = intersecting)
    #[inline]
    pub fn overlap(&self, other: &Aabb) -> Vec2 {
        self.max.min(other.max) - self.min.max(other.min)
    }
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    /// Solid rectangle of the given size, centered on the body position
    Rect { size: Vec2 },
    /// Hollow rectangular boundary; bodies collide with its inside edges
    EdgeLoop { frame: Aabb },
}

/// A rigid body in the physics world
#[derive(Debug, Clone)]
pub struct PhysicsBody {
    pub id: BodyId,
    pub shape: BodyShape,
    /// Center position (ignored for edge loops)
    pub position: Vec2,
    pub velocity: Vec2,
    pub category: CategoryMask,
    pub contact_test: CategoryMask,
    pub collision: CategoryMask,
    pub friction: f32,
    pub restitution: f32,
    pub linear_damping: f32,
    /// Mass per unit area
    pub density: f32,
    /// Static bodies are never moved by the world
    pub dynamic: bool,
    pub affected_by_gravity: bool,
    /// Sprite node this body is attached to
    pub node: Option<NodeId>,
}

impl PhysicsBody {
    /// Rectangle body with engine defaults (dynamic, category `ALL`, no contact tests)
    pub fn rect(size: Vec2) -> Self {
        Self {
            id: BodyId(0),
            shape: BodyShape::Rect { size },
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            category: CategoryMask::ALL,
            contact_test: CategoryMask::empty(),
            collision: CategoryMask::ALL,
            friction: 0.2,
            restitution: 0.2,
            linear_damping: 0.1,
            density: 1.0,
            dynamic: true,
            affected_by_gravity: true,
            node: None,
        }
    }

    /// Edge loop around a frame. Always static.
    pub fn edge_loop(frame: Aabb) -> Self {
        Self {
            shape: BodyShape::EdgeLoop { frame },
            position: frame.center(),
            dynamic: false,
            ..Self::rect(Vec2::ZERO)
        }
    }

    /// Bounding box of a rectangle body (the full frame for edge loops)
    pub fn aabb(&self) -> Aabb {
        match self.shape {
            BodyShape::Rect { size } => Aabb::from_center(self.position, size),
            BodyShape::EdgeLoop { frame } => frame,
        }
    }

    /// Mass; static bodies and edge loops are infinitely heavy
    pub fn mass(&self) -> f32 {
        match self.shape {
            BodyShape::Rect { size } if self.dynamic => self.density * size.x * size.y,
            _ => f32::INFINITY,
        }
    }

    /// Inverse mass (0 for static)
    #[inline]
    pub fn inv_mass(&self) -> f32 {
        let mass = self.mass();
        if mass.is_finite() && mass > 0.0 {
            1.0 / mass
        } else {
            0.0
        }
    }

    /// Smallest half-extent, used to size substeps
    pub fn min_half_extent(&self) -> f32 {
        match self.shape {
            BodyShape::Rect { size } => size.min_element() * 0.5,
            BodyShape::EdgeLoop { .. } => f32::INFINITY,
        }
    }

    /// Whether a contact event is reported between these two bodies
    pub fn tests_contact_with(&self, other: &PhysicsBody) -> bool {
        self.contact_test.intersects(other.category)
    }

    /// Whether this body bounces off `other`
    pub fn collides_with(&self, other: &PhysicsBody) -> bool {
        self.collision.intersects(other.category)
    }
}
