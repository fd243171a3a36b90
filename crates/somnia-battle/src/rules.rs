//! Pure battle rules: sanity arithmetic, dream-state timers, hand
//! drawing and end-of-match evaluation. Everything here is synchronous
//! and side-effect free so the match task stays easy to test.

use rand::seq::SliceRandom;
use somnia_cards::{Card, CardType, DreamState};

use crate::messages::Outcome;

/// Applies a card's points to the acting player's sanity.
///
/// Pills restore sanity. Dreams and nightmares cost the player who
/// plays them; their payoff is the dream state they leave on the
/// opponent. Sanity never goes below zero.
pub fn apply_card(sanity: u32, card: &Card) -> u32 {
    match card.card_type {
        CardType::Pill => sanity.saturating_add(card.points),
        CardType::Dream | CardType::Nightmare => {
            sanity.saturating_sub(card.points)
        }
    }
}

/// Adds a signed per-round delta to a sanity value, clamping at zero.
pub fn adjust_sanity(sanity: u32, delta: i32) -> u32 {
    if delta >= 0 {
        sanity.saturating_add(delta as u32)
    } else {
        sanity.saturating_sub(delta.unsigned_abs())
    }
}

/// Tracks one player's dream state and how many rounds it has ticked.
///
/// The counter is only meaningful while the state is timed; `set`
/// resets it, so re-applying a state restarts its clock.
#[derive(Debug, Clone, Copy)]
pub struct StatusTimer {
    state: DreamState,
    rounds_in_state: u8,
}

impl StatusTimer {
    pub fn new() -> Self {
        Self {
            state: DreamState::Sleepy,
            rounds_in_state: 0,
        }
    }

    pub fn state(&self) -> DreamState {
        self.state
    }

    /// Puts the player into `state` and restarts its duration clock.
    pub fn set(&mut self, state: DreamState) {
        self.state = state;
        self.rounds_in_state = 0;
    }

    /// Advances the timer by one round and returns the sanity delta the
    /// current state charges. Timed states fall back to `Sleepy` once
    /// they have ticked for their full duration.
    pub fn tick(&mut self) -> i32 {
        let delta = self.state.sanity_delta();
        if let Some(duration) = self.state.duration() {
            self.rounds_in_state += 1;
            if self.rounds_in_state >= duration {
                self.state = DreamState::Sleepy;
                self.rounds_in_state = 0;
            }
        }
        delta
    }
}

impl Default for StatusTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluates the end of a match from one player's side.
pub fn evaluate_outcome(own_sanity: u32, opponent_sanity: u32) -> Outcome {
    if own_sanity == 0 && opponent_sanity == 0 {
        Outcome::Tie
    } else if own_sanity == 0 {
        Outcome::Loss
    } else if opponent_sanity == 0 {
        Outcome::Victory
    } else if own_sanity > opponent_sanity {
        Outcome::Victory
    } else if own_sanity < opponent_sanity {
        Outcome::Loss
    } else {
        Outcome::Tie
    }
}

/// Shuffles the player's inventory and deals the starting hand.
pub fn draw_hand(mut inventory: Vec<Card>, hand_size: usize) -> Vec<Card> {
    inventory.shuffle(&mut rand::rng());
    inventory.truncate(hand_size);
    inventory
}
