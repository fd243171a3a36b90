//! The coordinator: matchmaking queue plus registry of running matches.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use somnia_cards::Card;
use somnia_protocol::{MatchId, PlayerId};
use tokio::sync::mpsc;

use crate::actor::{self, MatchHandle, Seat};
use crate::config::MatchConfig;
use crate::error::QueueError;
use crate::messages::EventSender;
use crate::rules;

/// Lets the coordinator flag players as in-battle in whatever tracks
/// their session, so the queue can reject re-entry.
pub trait Presence: Send + Sync + 'static {
    fn set_in_battle(&self, player: PlayerId, in_battle: bool);
    fn is_in_battle(&self, player: PlayerId) -> bool;
}

/// Supplies each player's card inventory when a match is created.
pub trait InventoryProvider: Send + Sync + 'static {
    fn inventory(&self, player: PlayerId) -> Vec<Card>;
}

/// A player waiting to be paired.
#[derive(Debug)]
pub struct Ticket {
    pub player_id: PlayerId,
    pub username: String,
    /// Channel the match task will push this player's events into.
    pub events: EventSender,
}

#[derive(Default)]
struct Inner {
    queue: VecDeque<Ticket>,
    matches: HashMap<MatchId, MatchHandle>,
    by_player: HashMap<PlayerId, MatchId>,
}

/// Owns the waiting queue and the registry of running matches.
///
/// All shared state lives behind one short-held mutex; match state
/// itself lives inside the per-match tasks. Lock ordering is
/// coordinator first, then anything the [`Presence`] impl locks.
pub struct Coordinator {
    inner: Mutex<Inner>,
    next_match_id: AtomicU64,
    config: MatchConfig,
    presence: Arc<dyn Presence>,
    inventories: Arc<dyn InventoryProvider>,
}

impl Coordinator {
    pub fn new(
        config: MatchConfig,
        presence: Arc<dyn Presence>,
        inventories: Arc<dyn InventoryProvider>,
    ) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner::default()),
            next_match_id: AtomicU64::new(1),
            config,
            presence,
            inventories,
        })
    }

    fn locked(&self) -> MutexGuard<'_, Inner> {
        // Poisoning only happens if a holder panicked; nothing here can
        // continue meaningfully past that.
        self.inner.lock().expect("coordinator lock poisoned")
    }

    /// Spawns the background pairing loop.
    pub fn start_pairing(self: &Arc<Self>) -> tokio::task::JoinHandle<()> {
        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(coordinator.config.pairing_interval);
            loop {
                interval.tick().await;
                while coordinator.pair_waiting().is_some() {}
            }
        })
    }

    /// Adds a player to the waiting queue.
    pub fn enqueue(&self, ticket: Ticket) -> Result<(), QueueError> {
        let mut inner = self.locked();
        let player_id = ticket.player_id;
        if inner.by_player.contains_key(&player_id)
            || self.presence.is_in_battle(player_id)
        {
            return Err(QueueError::AlreadyInMatch(player_id));
        }
        if inner.queue.iter().any(|t| t.player_id == player_id) {
            return Err(QueueError::AlreadyQueued(player_id));
        }
        inner.queue.push_back(ticket);
        tracing::info!(
            %player_id,
            queue_len = inner.queue.len(),
            "player joined the queue"
        );
        Ok(())
    }

    /// Pairs the two longest-waiting players into a new match, if the
    /// queue holds at least two. Returns the new match's id.
    ///
    /// The pairing loop calls this on a timer; tests call it directly
    /// for deterministic pairing.
    pub fn pair_waiting(self: &Arc<Self>) -> Option<MatchId> {
        let (match_id, seats, inbox) = {
            let mut inner = self.locked();
            if inner.queue.len() < 2 {
                return None;
            }
            let (Some(first), Some(second)) =
                (inner.queue.pop_front(), inner.queue.pop_front())
            else {
                return None;
            };

            let match_id =
                MatchId(self.next_match_id.fetch_add(1, Ordering::Relaxed));
            self.presence.set_in_battle(first.player_id, true);
            self.presence.set_in_battle(second.player_id, true);

            let (tx, rx) = mpsc::channel(self.config.channel_size);
            inner
                .matches
                .insert(match_id, MatchHandle::new(match_id, tx));
            inner.by_player.insert(first.player_id, match_id);
            inner.by_player.insert(second.player_id, match_id);

            (match_id, [first, second], rx)
        };

        tracing::info!(
            %match_id,
            first = %seats[0].player_id,
            second = %seats[1].player_id,
            "paired players into a match"
        );

        // Inventory lookups and the spawn happen outside the lock.
        let seats = seats.map(|ticket| {
            let hand = rules::draw_hand(
                self.inventories.inventory(ticket.player_id),
                self.config.hand_size,
            );
            Seat {
                player_id: ticket.player_id,
                username: ticket.username,
                events: ticket.events,
                hand,
            }
        });
        actor::spawn_match(
            match_id,
            seats,
            inbox,
            self.config.clone(),
            Arc::clone(self),
        );
        Some(match_id)
    }

    /// Looks up the handle of the match a player is currently in.
    pub fn match_for(&self, player: PlayerId) -> Option<MatchHandle> {
        let inner = self.locked();
        inner
            .by_player
            .get(&player)
            .and_then(|id| inner.matches.get(id))
            .cloned()
    }

    /// Handles a player dropping their connection. Removes them from
    /// the queue if they were waiting; returns their match handle if
    /// they were in one, so the caller can forfeit it.
    pub fn disconnect(&self, player: PlayerId) -> Option<MatchHandle> {
        let mut inner = self.locked();
        let before = inner.queue.len();
        inner.queue.retain(|t| t.player_id != player);
        if inner.queue.len() != before {
            tracing::info!(%player, "removed disconnected player from queue");
        }
        inner
            .by_player
            .get(&player)
            .and_then(|id| inner.matches.get(id))
            .cloned()
    }

    /// Called by a match task when it ends. Unregisters the match and
    /// clears both players' in-battle flags.
    pub(crate) fn finish(&self, match_id: MatchId, players: [PlayerId; 2]) {
        {
            let mut inner = self.locked();
            inner.matches.remove(&match_id);
            for player in players {
                if inner.by_player.get(&player) == Some(&match_id) {
                    inner.by_player.remove(&player);
                }
            }
        }
        for player in players {
            self.presence.set_in_battle(player, false);
        }
        tracing::info!(%match_id, "match unregistered");
    }

    /// Number of players currently waiting.
    pub fn queue_len(&self) -> usize {
        self.locked().queue.len()
    }

    /// Number of matches currently running.
    pub fn active_matches(&self) -> usize {
        self.locked().matches.len()
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }
}
