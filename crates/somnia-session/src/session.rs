//! Session types.

use somnia_protocol::PlayerId;

/// A player's authenticated identity: the stable id plus the display
/// name shown to opponents. Produced by an [`Authenticator`](crate::Authenticator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub player_id: PlayerId,
    pub username: String,
}

/// The server's record of one connected player.
///
/// Created after a successful handshake, destroyed when the socket
/// closes. The `in_battle` flag is the presence bit the matchmaking
/// queue checks to reject re-enqueueing a player who is mid-match; it is
/// written only by the battle layer (match creation and termination).
#[derive(Debug, Clone)]
pub struct Session {
    pub identity: Identity,
    pub in_battle: bool,
}

impl Session {
    /// A fresh session for a newly authenticated player.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            in_battle: false,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.identity.player_id
    }

    pub fn username(&self) -> &str {
        &self.identity.username
    }
}
