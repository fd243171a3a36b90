//! The Somnia server: a server-authoritative two-player card battle
//! game over WebSocket.
//!
//! This crate wires the lower layers together: the transport accepts
//! sockets, the session layer authenticates them, the battle layer
//! pairs players and runs matches. One tokio task per connection, one
//! per match, no shared mutable state beyond the session registry and
//! the coordinator.
//!
//! ```text
//! socket → handshake → session → [enqueue] → coordinator → match task
//!                                                    │
//!            socket ← envelope ← event channel ←─────┘
//! ```

mod error;
mod handler;
mod server;

pub use error::SomniaError;
pub use server::{Server, PROTOCOL_VERSION};
