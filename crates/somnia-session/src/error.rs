//! Error types for the session layer.

/// Errors that can occur during session management.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Authentication failed — the token was invalid, expired, or
    /// rejected by the [`Authenticator`](crate::Authenticator).
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    /// No session exists for the given player.
    #[error("session not found for player {0}")]
    NotFound(somnia_protocol::PlayerId),

    /// The player already has a live session. One socket per player;
    /// a second login must wait for the first to drop.
    #[error("player {0} already has an active session")]
    AlreadyConnected(somnia_protocol::PlayerId),
}
