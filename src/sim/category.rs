//! Category, contact-test and collision bitmasks
//!
//! Every body carries a category (what it is), a contact-test mask (which
//! categories raise contact events against it) and a collision mask (which
//! categories it physically bounces off).

use bitflags::bitflags;

bitflags! {
    /// Body category tags. Each named category is a single distinct bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
    pub struct CategoryMask: u32 {
        const BALL = 0b1 << 0;
        const BLOCK = 0b1 << 1;
        // The next would be `0b1 << 2` and so on.

        /// Engine default for category and collision masks
        const ALL = !0;
    }
}

impl CategoryMask {
    /// Named single-bit categories (excludes `ALL`)
    pub const CATEGORIES: [CategoryMask; 2] = [CategoryMask::BALL, CategoryMask::BLOCK];

    /// True when exactly one bit is set
    #[inline]
    pub fn is_single_category(self) -> bool {
        self.bits().count_ones() == 1
    }
}

/// Outcome of classifying an ordered contact pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// body A is the ball, body B is a block
    BallBlock,
    /// Anything else, including (Block, Ball)
    Ignored,
}

/// Classify an ordered pair of category tags.
///
/// Matches on exact equality per side, so a body with the default `ALL`
/// category never counts as a block. Only `(BALL, BLOCK)` in that order
/// drives game logic.
pub fn classify_contact(category_a: CategoryMask, category_b: CategoryMask) -> ContactKind {
    if category_a == CategoryMask::BALL && category_b == CategoryMask::BLOCK {
        ContactKind::BallBlock
    } else {
        ContactKind::Ignored
    }
}
