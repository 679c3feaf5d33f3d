//! Contact events and the delegate that receives them

use glam::Vec2;

use super::body::BodyId;
use super::category::CategoryMask;
use crate::error::SceneResult;

/// Whether a pair started or stopped touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactPhase {
    Begin,
    End,
}

/// A contact between two bodies, in canonical order.
///
/// `body_a` is the body whose contact-test mask selected the other; when both
/// or neither did, the lower body id comes first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub phase: ContactPhase,
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub category_a: CategoryMask,
    pub category_b: CategoryMask,
    /// Approximate contact point (world space)
    pub point: Vec2,
    /// Normal pointing from B toward A (zero for End events)
    pub normal: Vec2,
}

impl Contact {
    /// Same contact with A and B swapped
    pub fn reversed(&self) -> Self {
        Self {
            phase: self.phase,
            body_a: self.body_b,
            body_b: self.body_a,
            category_a: self.category_b,
            category_b: self.category_a,
            point: self.point,
            normal: -self.normal,
        }
    }
}

/// Receives contact notifications from the world
pub trait ContactDelegate {
    /// Two bodies started touching
    fn did_begin(&mut self, contact: &Contact) -> SceneResult<()>;

    /// Two bodies stopped touching
    fn did_end(&mut self, _contact: &Contact) -> SceneResult<()> {
        Ok(())
    }

    /// Route a contact to `did_begin` or `did_end`
    fn dispatch(&mut self, contact: &Contact) -> SceneResult<()> {
        match contact.phase {
            ContactPhase::Begin => self.did_begin(contact),
            ContactPhase::End => self.did_end(contact),
        }
    }
}
