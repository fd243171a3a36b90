//! Matchmaking queue and battle engine for Somnia.
//!
//! The [`Coordinator`] owns the waiting queue and the registry of running
//! matches. A background pairing loop pops waiting players two at a time
//! and spawns one tokio task per match. That task owns all match state;
//! the rest of the system talks to it through a [`MatchHandle`], which is
//! a thin clone of the match's command channel.
//!
//! Outbound traffic flows the other way: each player hands the coordinator
//! an event channel when enqueueing, and the match task pushes
//! [`MatchEvent`]s into it. Nothing in this crate touches sockets.

mod actor;
mod config;
mod coordinator;
mod error;
mod messages;
pub mod rules;

pub use actor::{MatchHandle, PlayerAction};
pub use config::MatchConfig;
pub use coordinator::{Coordinator, InventoryProvider, Presence, Ticket};
pub use error::{MatchError, QueueError};
pub use messages::{ClientAction, EventSender, MatchEvent, Outcome};
