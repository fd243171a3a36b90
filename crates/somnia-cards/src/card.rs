//! Card definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::DreamState;

/// The three card families.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum CardType {
    /// A REM-sleep card.
    Dream,
    /// A non-REM nightmare card.
    Nightmare,
    /// A medication card; the only family that restores sanity.
    Pill,
}

/// Booster rarity tier. Drop rates are the card vault's business; the
/// engine only carries the tag through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
}

/// The status effect a card can apply when it resolves.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum CardEffect {
    Sleepy,
    Conscious,
    Paralyzed,
    Scared,
    /// No status effect; the card only moves sanity.
    None,
}

impl CardEffect {
    /// The dream state this effect applies, if any.
    pub fn dream_state(self) -> Option<DreamState> {
        match self {
            Self::Sleepy => Some(DreamState::Sleepy),
            Self::Conscious => Some(DreamState::Conscious),
            Self::Paralyzed => Some(DreamState::Paralyzed),
            Self::Scared => Some(DreamState::Scared),
            Self::None => None,
        }
    }
}

/// An immutable card.
///
/// Cards are cloned by value when dealt into a hand, so two copies of the
/// same catalog entry are distinct objects with equal identity. Hand
/// membership therefore uses [`Card::same_identity`] (id + type + points),
/// never pointer or full-value equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Catalog identifier, unique per card definition.
    pub id: String,
    pub name: String,
    pub description: String,
    pub card_type: CardType,
    pub rarity: Rarity,
    pub effect: CardEffect,
    /// Sanity magnitude of the card. Always ≥ 0; the sign is decided by
    /// the card type when the effect is applied.
    pub points: u32,
}

impl Card {
    /// Identity match used by "remove matching card from hand".
    ///
    /// A client echoes back the card it wants to play; the copy it holds
    /// was serialized and deserialized on the way, so we compare the
    /// fields that pin down which catalog card it is rather than the
    /// whole value.
    pub fn same_identity(&self, other: &Card) -> bool {
        self.id == other.id
            && self.card_type == other.card_type
            && self.points == other.points
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?}, {} pts)", self.name, self.card_type, self.points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(id: &str, card_type: CardType, points: u32) -> Card {
        Card {
            id: id.into(),
            name: format!("card {id}"),
            description: String::new(),
            card_type,
            rarity: Rarity::Common,
            effect: CardEffect::None,
            points,
        }
    }

    #[test]
    fn test_same_identity_matches_on_id_type_points() {
        let a = card("c1", CardType::Dream, 4);
        let mut b = a.clone();
        b.name = "renamed on the client".into();
        b.description = "tampered".into();
        assert!(a.same_identity(&b));
    }

    #[test]
    fn test_same_identity_rejects_differing_points() {
        let a = card("c1", CardType::Dream, 4);
        let b = card("c1", CardType::Dream, 9);
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn test_same_identity_rejects_differing_type() {
        let a = card("c1", CardType::Dream, 4);
        let b = card("c1", CardType::Pill, 4);
        assert!(!a.same_identity(&b));
    }

    #[test]
    fn test_effect_maps_to_dream_state() {
        assert_eq!(
            CardEffect::Scared.dream_state(),
            Some(DreamState::Scared)
        );
        assert_eq!(CardEffect::None.dream_state(), None);
    }

    #[test]
    fn test_card_round_trips_through_json() {
        let c = Card {
            id: "n-07".into(),
            name: "Night Terror".into(),
            description: "It knows your name.".into(),
            card_type: CardType::Nightmare,
            rarity: Rarity::Rare,
            effect: CardEffect::Scared,
            points: 6,
        };
        let bytes = serde_json::to_vec(&c).unwrap();
        let decoded: Card = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(c, decoded);
    }
}
