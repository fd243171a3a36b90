//! The session manager: tracks all connected players.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it uses a plain
//! `HashMap`, not a concurrent one. This is intentional: the manager is
//! wrapped in a single mutex at the server level and every operation here
//! is a short, synchronous map access, so the lock is never held across
//! an await point or a network call.

use std::collections::HashMap;

use somnia_protocol::PlayerId;

use crate::{Identity, Session, SessionError};

/// Registry of every player currently connected to the server.
#[derive(Debug, Default)]
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
}

impl SessionManager {
    /// Creates a new, empty session manager.
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Creates a session for a player after successful authentication.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the player already
    /// has a live session — one socket per player, no session stealing.
    pub fn create(
        &mut self,
        identity: Identity,
    ) -> Result<&Session, SessionError> {
        let player_id = identity.player_id;
        if self.sessions.contains_key(&player_id) {
            return Err(SessionError::AlreadyConnected(player_id));
        }

        self.sessions.insert(player_id, Session::new(identity));
        tracing::info!(%player_id, "session created");

        // Safe: inserted on the line above.
        Ok(self.sessions.get(&player_id).expect("just inserted"))
    }

    /// Removes a player's session when their socket closes.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn remove(
        &mut self,
        player_id: PlayerId,
    ) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        tracing::info!(%player_id, "session removed");
        Ok(session)
    }

    /// Sets the in-battle presence flag for a player.
    ///
    /// Missing sessions are tolerated: the battle layer may clear the
    /// flag for a player whose socket already dropped mid-match.
    pub fn set_in_battle(&mut self, player_id: PlayerId, in_battle: bool) {
        match self.sessions.get_mut(&player_id) {
            Some(session) => session.in_battle = in_battle,
            None => tracing::debug!(
                %player_id,
                in_battle,
                "presence update for absent session"
            ),
        }
    }

    /// Returns whether the player is currently flagged as in a battle.
    pub fn is_in_battle(&self, player_id: PlayerId) -> bool {
        self.sessions
            .get(&player_id)
            .is_some_and(|s| s.in_battle)
    }

    /// Looks up a session by player id.
    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    /// The display name for a connected player, if any.
    pub fn username(&self, player_id: PlayerId) -> Option<String> {
        self.sessions
            .get(&player_id)
            .map(|s| s.username().to_string())
    }

    /// Number of connected players.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if nobody is connected.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
