use somnia_battle::{MatchError, QueueError};
use somnia_protocol::ProtocolError;
use somnia_session::SessionError;
use somnia_transport::TransportError;

/// Top-level server error.
#[derive(Debug, thiserror::Error)]
pub enum SomniaError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Queue(#[from] QueueError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("handshake failed: {0}")]
    Handshake(String),
}
