//! The dream-state vocabulary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A player's dream state during a match.
///
/// Each state modifies the passive per-round sanity delta and, for
/// `Paralyzed`, turn availability. Every state other than `Sleepy` is
/// timed and eventually decays back to `Sleepy`; the timing lives in the
/// battle engine — this enum is only the tag that travels on the wire.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum DreamState {
    /// The default state. Passive sanity drain every round.
    Sleepy,
    /// Brief lucidity: regenerates sanity. Lasts one round.
    Conscious,
    /// The player cannot act; their turn is skipped. Lasts one round.
    Paralyzed,
    /// Heavier sanity drain. Lasts two rounds.
    Scared,
}

impl DreamState {
    /// Passive sanity change applied by one status tick of this state.
    pub fn sanity_delta(self) -> i32 {
        match self {
            Self::Sleepy => -3,
            Self::Conscious => 1,
            // Turn loss is the whole penalty; handled at turn resolution.
            Self::Paralyzed => 0,
            Self::Scared => -4,
        }
    }

    /// How many rounds the state lasts before decaying to `Sleepy`.
    /// `None` for `Sleepy`, which never expires.
    pub fn duration(self) -> Option<u8> {
        match self {
            Self::Sleepy => None,
            Self::Conscious | Self::Paralyzed => Some(1),
            Self::Scared => Some(2),
        }
    }
}

impl Default for DreamState {
    fn default() -> Self {
        Self::Sleepy
    }
}

impl fmt::Display for DreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sleepy => write!(f, "sleepy"),
            Self::Conscious => write!(f, "conscious"),
            Self::Paralyzed => write!(f, "paralyzed"),
            Self::Scared => write!(f, "scared"),
        }
    }
}
