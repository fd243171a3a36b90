use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use somnia_cards::{Card, DreamState};
use somnia_protocol::PlayerId;
use tokio::sync::mpsc;

/// Game-channel request sent by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ClientAction {
    /// Join the matchmaking queue.
    Enqueue,
    /// Play a card from the hand.
    PlayCard { card: Card },
    /// Concede the match.
    GiveUp,
}

/// How a match ended for one player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Loss,
    Tie,
}

/// Game-channel event pushed to a client by a match task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MatchEvent {
    /// Sent once per player when the match begins. The hand is private:
    /// each player only ever sees their own.
    MatchStart {
        opponent: String,
        turn: PlayerId,
        hand: Vec<Card>,
        sanity: HashMap<PlayerId, u32>,
        dream_states: HashMap<PlayerId, DreamState>,
    },
    /// The named player's turn has begun.
    TurnNotice { current_player: PlayerId },
    /// Human-readable description of something that just happened.
    ActionNotice { text: String },
    /// Full public state after a round resolves. `turn` is the player
    /// who just acted; the swap to the other player happens after.
    StateUpdate {
        turn: PlayerId,
        sanity: HashMap<PlayerId, u32>,
        dream_states: HashMap<PlayerId, DreamState>,
        round: u32,
    },
    /// The match is over, from this player's point of view.
    MatchEnd { outcome: Outcome },
}

/// Per-player channel a match task pushes events into.
pub type EventSender = mpsc::UnboundedSender<MatchEvent>;
