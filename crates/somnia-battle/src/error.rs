use somnia_protocol::{MatchId, PlayerId, QueueStatus};

/// Why an enqueue request was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QueueError {
    /// The player is already waiting in the queue.
    #[error("player {0} is already queued")]
    AlreadyQueued(PlayerId),

    /// The player is currently bound to a running match.
    #[error("player {0} is already in a match")]
    AlreadyInMatch(PlayerId),
}

impl QueueError {
    /// The wire status reported back to the client for this rejection.
    pub fn status(self) -> QueueStatus {
        match self {
            QueueError::AlreadyQueued(_) => QueueStatus::AlreadyQueued,
            QueueError::AlreadyInMatch(_) => QueueStatus::AlreadyInMatch,
        }
    }
}

/// Errors when talking to a running match.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The match task is gone or its command channel is full.
    #[error("match {0} is unavailable")]
    Unavailable(MatchId),
}
