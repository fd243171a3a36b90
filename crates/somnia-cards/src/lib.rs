//! The card and status-effect model for Somnia.
//!
//! Everything here is an immutable value: the battle engine copies cards
//! into hands and never mutates them. The authoritative catalog (which
//! cards exist, booster distribution) is owned by an external collaborator;
//! this crate only defines the shape of a card and the status vocabulary
//! it can apply.

mod card;
mod dream;

pub use card::{Card, CardEffect, CardType, Rarity};
pub use dream::DreamState;
