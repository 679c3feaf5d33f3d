//! Block lifecycle
//!
//! `Intact --(hit)--> Damaged --(hit)--> Removed`. Removed is terminal.

use serde::{Deserialize, Serialize};

use super::node::Color;

/// Lifecycle state of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BlockState {
    Intact,
    Damaged,
    Removed,
}

impl BlockState {
    /// State after one more ball hit; `None` once removed
    pub fn hit(self) -> Option<BlockState> {
        match self {
            BlockState::Intact => Some(BlockState::Damaged),
            BlockState::Damaged => Some(BlockState::Removed),
            BlockState::Removed => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BlockState::Intact => "Block",
            BlockState::Damaged => "HalfBlock",
            BlockState::Removed => "RemovedBlock",
        }
    }

    pub fn color(self) -> Color {
        match self {
            BlockState::Intact => Color::WHITE,
            BlockState::Damaged | BlockState::Removed => Color::DARK_GRAY,
        }
    }

    pub fn is_removed(self) -> bool {
        self == BlockState::Removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_hits_remove() {
        let damaged = BlockState::Intact.hit();
        assert_eq!(damaged, Some(BlockState::Damaged));
        assert_eq!(damaged.and_then(BlockState::hit), Some(BlockState::Removed));
        assert_eq!(BlockState::Removed.hit(), None);
    }

    #[test]
    fn test_damaged_recolors() {
        assert_eq!(BlockState::Intact.color(), Color::WHITE);
        assert_eq!(BlockState::Damaged.color(), Color::DARK_GRAY);
        assert_eq!(BlockState::Damaged.name(), "HalfBlock");
    }

    proptest! {
        #[test]
        fn prop_lifecycle_is_monotonic(hits in 0usize..10) {
            let mut state = BlockState::Intact;
            let mut seen = vec![state];
            for _ in 0..hits {
                match state.hit() {
                    Some(next) => {
                        // Exactly one step forward each hit
                        prop_assert_eq!(next as u8, state as u8 + 1);
                        state = next;
                        seen.push(state);
                    }
                    None => prop_assert!(state.is_removed()),
                }
            }
            prop_assert!(seen.windows(2).all(|w| w[0] < w[1]));
            prop_assert_eq!(seen.len(), hits.min(2) + 1);
        }
    }
}
