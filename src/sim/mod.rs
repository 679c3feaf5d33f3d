//! Host physics world
//!
//! Stand-in for a game engine's physics layer. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - Stable iteration order (by body ID)
//! - No rendering or platform dependencies

pub mod body;
pub mod category;
pub mod collision;
pub mod contact;
pub mod world;

pub use body::{Aabb, BodyId, BodyShape, PhysicsBody};
pub use category::{CategoryMask, ContactKind, classify_contact};
pub use collision::{CollisionResult, contact_impulse};
pub use contact::{Contact, ContactDelegate, ContactPhase};
pub use world::PhysicsWorld;
