use std::time::Duration;

/// Tunables for matchmaking and match execution.
#[derive(Debug, Clone)]
pub struct MatchConfig {
    /// Maximum number of cards dealt into a starting hand.
    pub hand_size: usize,
    /// Sanity both players start the match with.
    pub starting_sanity: u32,
    /// How long the active player gets to act before the turn is forfeited.
    pub turn_timeout: Duration,
    /// How often the pairing loop checks the queue.
    pub pairing_interval: Duration,
    /// Capacity of each match's command channel.
    pub channel_size: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            hand_size: 10,
            starting_sanity: 40,
            turn_timeout: Duration::from_secs(30),
            pairing_interval: Duration::from_millis(50),
            channel_size: 32,
        }
    }
}
