//! Player session tracking for Somnia.
//!
//! This crate handles the lifecycle of player connections:
//!
//! 1. **Authentication** — validating who a player is ([`Authenticator`])
//! 2. **Session tracking** — knowing who's connected ([`SessionManager`])
//! 3. **Presence** — the per-player in-battle flag the matchmaking queue
//!    consults before accepting an enqueue
//!
//! There is deliberately no reconnection support: a dropped connection is
//! a forfeit, so a session lives exactly as long as its socket.
//!
//! # How it fits in the stack
//!
//! ```text
//! Battle layer (above)   ← reads/writes the in-battle flag
//!     ↕
//! Session layer (this crate)  ← player identity and connection state
//!     ↕
//! Protocol layer (below) ← provides PlayerId
//! ```

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::{Authenticator, DevAuthenticator};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Identity, Session};
