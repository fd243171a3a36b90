//! Authentication hook for validating player identity.
//!
//! Somnia doesn't implement account storage itself — username/password
//! bookkeeping is an external collaborator. The server only needs one
//! question answered during the handshake: "whose credential is this?"
//! That question is the [`Authenticator`] trait, so production can plug
//! in a real account store while tests use a parse-the-token stub.

use somnia_protocol::PlayerId;

use crate::{Identity, SessionError};

/// Validates a client's auth token and returns their identity.
///
/// `Send + Sync + 'static` because the authenticator is shared across
/// connection handler tasks for the lifetime of the server. The method is
/// async so implementations may call out to a database or auth service.
///
/// # Example
///
/// ```rust
/// use somnia_session::{Authenticator, DevAuthenticator};
/// use somnia_protocol::PlayerId;
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let identity = DevAuthenticator.authenticate("7:ana").await.unwrap();
/// assert_eq!(identity.player_id, PlayerId(7));
/// assert_eq!(identity.username, "ana");
/// # });
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the player's identity.
    ///
    /// # Returns
    /// - `Ok(Identity)` — authentication succeeded
    /// - `Err(SessionError::AuthFailed)` — token invalid/expired/rejected
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Identity, SessionError>> + Send;
}

/// Accepts `"<id>:<username>"` tokens verbatim. Development only; there
/// is no credential check of any kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DevAuthenticator;

impl Authenticator for DevAuthenticator {
    async fn authenticate(&self, token: &str) -> Result<Identity, SessionError> {
        let (id, name) = token.split_once(':').ok_or_else(|| {
            SessionError::AuthFailed("expected id:username".into())
        })?;
        let id: u64 = id.parse().map_err(|_| {
            SessionError::AuthFailed("id must be a number".into())
        })?;
        if name.is_empty() {
            return Err(SessionError::AuthFailed("empty username".into()));
        }
        Ok(Identity {
            player_id: PlayerId(id),
            username: name.into(),
        })
    }
}
