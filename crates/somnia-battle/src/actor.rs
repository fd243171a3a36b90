//! The per-match task. One tokio task owns all state for one match;
//! everything else talks to it through a [`MatchHandle`].

use std::collections::HashMap;
use std::sync::Arc;

use somnia_cards::{Card, CardType, DreamState};
use somnia_protocol::{MatchId, PlayerId};
use tokio::sync::mpsc;

use crate::config::MatchConfig;
use crate::coordinator::Coordinator;
use crate::error::MatchError;
use crate::messages::{EventSender, MatchEvent, Outcome};
use crate::rules::{self, StatusTimer};

/// Something the active player can do on their turn.
#[derive(Debug, Clone)]
pub enum PlayerAction {
    PlayCard(Card),
    GiveUp,
}

#[derive(Debug)]
pub(crate) enum MatchCommand {
    Action {
        player_id: PlayerId,
        action: PlayerAction,
    },
    Disconnected {
        player_id: PlayerId,
    },
}

/// Cheap, cloneable handle to a running match's command channel.
#[derive(Debug, Clone)]
pub struct MatchHandle {
    match_id: MatchId,
    sender: mpsc::Sender<MatchCommand>,
}

impl MatchHandle {
    pub(crate) fn new(
        match_id: MatchId,
        sender: mpsc::Sender<MatchCommand>,
    ) -> Self {
        Self { match_id, sender }
    }

    pub fn match_id(&self) -> MatchId {
        self.match_id
    }

    pub async fn play_card(
        &self,
        player_id: PlayerId,
        card: Card,
    ) -> Result<(), MatchError> {
        self.send(MatchCommand::Action {
            player_id,
            action: PlayerAction::PlayCard(card),
        })
        .await
    }

    pub async fn give_up(&self, player_id: PlayerId) -> Result<(), MatchError> {
        self.send(MatchCommand::Action {
            player_id,
            action: PlayerAction::GiveUp,
        })
        .await
    }

    /// Tells the match a player's connection dropped. The match ends
    /// immediately in the other player's favor.
    pub async fn disconnected(
        &self,
        player_id: PlayerId,
    ) -> Result<(), MatchError> {
        self.send(MatchCommand::Disconnected { player_id }).await
    }

    async fn send(&self, command: MatchCommand) -> Result<(), MatchError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| MatchError::Unavailable(self.match_id))
    }
}

/// One player's side of the match as passed in by the coordinator.
pub(crate) struct Seat {
    pub player_id: PlayerId,
    pub username: String,
    pub events: EventSender,
    pub hand: Vec<Card>,
}

struct PlayerState {
    id: PlayerId,
    username: String,
    events: EventSender,
    hand: Vec<Card>,
    sanity: u32,
    status: StatusTimer,
}

enum TurnFlow {
    /// The round resolves normally; `applied` is a dream state to put
    /// on a player after this round's status tick.
    Continue {
        applied: Option<(usize, DreamState)>,
    },
    /// The indexed player loses immediately (give-up or disconnect).
    Forfeit(usize),
    /// All command senders are gone; nothing more can happen.
    Closed,
}

enum End {
    Natural,
    Forfeit(usize),
    Closed,
}

pub(crate) fn spawn_match(
    match_id: MatchId,
    seats: [Seat; 2],
    inbox: mpsc::Receiver<MatchCommand>,
    config: MatchConfig,
    coordinator: Arc<Coordinator>,
) {
    let starting_sanity = config.starting_sanity;
    let players = seats.map(|seat| PlayerState {
        id: seat.player_id,
        username: seat.username,
        events: seat.events,
        hand: seat.hand,
        sanity: starting_sanity,
        status: StatusTimer::new(),
    });
    let actor = MatchActor {
        match_id,
        players,
        // The longer-waiting player goes first.
        turn: 0,
        round: 1,
        inbox,
        config,
        coordinator,
    };
    tokio::spawn(actor.run());
}

struct MatchActor {
    match_id: MatchId,
    players: [PlayerState; 2],
    turn: usize,
    round: u32,
    inbox: mpsc::Receiver<MatchCommand>,
    config: MatchConfig,
    coordinator: Arc<Coordinator>,
}

impl MatchActor {
    async fn run(mut self) {
        tracing::info!(
            match_id = %self.match_id,
            first = %self.players[0].id,
            second = %self.players[1].id,
            "match started"
        );
        self.send_match_start();

        let end = loop {
            if self.is_over() {
                break End::Natural;
            }
            match self.take_turn().await {
                TurnFlow::Continue { applied } => {
                    self.tick_statuses();
                    if let Some((target, state)) = applied {
                        self.players[target].status.set(state);
                    }
                    self.broadcast(self.snapshot());
                    self.turn = 1 - self.turn;
                    self.round += 1;
                }
                TurnFlow::Forfeit(loser) => break End::Forfeit(loser),
                TurnFlow::Closed => break End::Closed,
            }
        };

        match end {
            End::Natural => {
                for idx in 0..2 {
                    let outcome = rules::evaluate_outcome(
                        self.players[idx].sanity,
                        self.players[1 - idx].sanity,
                    );
                    self.send_to(idx, MatchEvent::MatchEnd { outcome });
                }
            }
            End::Forfeit(loser) => {
                self.send_to(
                    loser,
                    MatchEvent::MatchEnd {
                        outcome: Outcome::Loss,
                    },
                );
                self.send_to(
                    1 - loser,
                    MatchEvent::MatchEnd {
                        outcome: Outcome::Victory,
                    },
                );
            }
            End::Closed => {
                tracing::warn!(
                    match_id = %self.match_id,
                    "command channel closed before the match ended"
                );
            }
        }

        self.coordinator
            .finish(self.match_id, [self.players[0].id, self.players[1].id]);
        tracing::info!(
            match_id = %self.match_id,
            rounds = self.round,
            "match ended"
        );
    }

    /// Runs one turn of the active player and returns how it resolved.
    async fn take_turn(&mut self) -> TurnFlow {
        let active = self.turn;

        if self.players[active].status.state() == DreamState::Paralyzed {
            let text = format!(
                "{} is paralyzed and skips the turn",
                self.players[active].username
            );
            self.broadcast(MatchEvent::ActionNotice { text });
            return TurnFlow::Continue { applied: None };
        }

        // Commands that piled up before this turn opened are stale.
        // A disconnect is the one thing that still matters.
        loop {
            match self.inbox.try_recv() {
                Ok(MatchCommand::Disconnected { player_id }) => {
                    if let Some(idx) = self.index_of(player_id) {
                        return TurnFlow::Forfeit(idx);
                    }
                }
                Ok(command) => {
                    tracing::debug!(
                        match_id = %self.match_id,
                        ?command,
                        "discarding stale command"
                    );
                }
                Err(_) => break,
            }
        }

        self.broadcast(MatchEvent::TurnNotice {
            current_player: self.players[active].id,
        });

        // Fixed deadline: invalid actions do not buy the player time.
        let deadline = tokio::time::Instant::now() + self.config.turn_timeout;
        loop {
            let command =
                match tokio::time::timeout_at(deadline, self.inbox.recv())
                    .await
                {
                    Err(_) => {
                        let text = format!(
                            "{} ran out of time and forfeits the turn",
                            self.players[active].username
                        );
                        self.broadcast(MatchEvent::ActionNotice { text });
                        return TurnFlow::Continue { applied: None };
                    }
                    Ok(None) => return TurnFlow::Closed,
                    Ok(Some(command)) => command,
                };

            match command {
                MatchCommand::Disconnected { player_id } => {
                    if let Some(idx) = self.index_of(player_id) {
                        return TurnFlow::Forfeit(idx);
                    }
                }
                MatchCommand::Action { player_id, action } => {
                    let Some(idx) = self.index_of(player_id) else {
                        continue;
                    };
                    if idx != active {
                        tracing::debug!(
                            match_id = %self.match_id,
                            %player_id,
                            "ignoring action from non-active player"
                        );
                        continue;
                    }
                    match action {
                        PlayerAction::GiveUp => {
                            return TurnFlow::Forfeit(active);
                        }
                        PlayerAction::PlayCard(card) => {
                            if let Some(applied) = self.play_card(active, card)
                            {
                                return TurnFlow::Continue { applied };
                            }
                            // Card not in hand; keep waiting.
                        }
                    }
                }
            }
        }
    }

    /// Removes the card from the active player's hand and applies its
    /// points. Returns `None` if the card is not actually in the hand,
    /// in which case the turn is still open.
    fn play_card(
        &mut self,
        active: usize,
        card: Card,
    ) -> Option<Option<(usize, DreamState)>> {
        let Some(pos) = self.players[active]
            .hand
            .iter()
            .position(|c| c.same_identity(&card))
        else {
            tracing::debug!(
                match_id = %self.match_id,
                card = %card.id,
                "played card is not in hand, ignoring"
            );
            return None;
        };

        // Resolve against the server's copy, not the client's bytes.
        let card = self.players[active].hand.remove(pos);
        let player = &mut self.players[active];
        player.sanity = rules::apply_card(player.sanity, &card);

        let applied = card.effect.dream_state().map(|state| {
            let target = match card.card_type {
                CardType::Pill => active,
                CardType::Dream | CardType::Nightmare => 1 - active,
            };
            (target, state)
        });

        tracing::debug!(
            match_id = %self.match_id,
            player = %self.players[active].id,
            card = %card.id,
            "card played"
        );
        let text = format!(
            "{} played {}",
            self.players[active].username, card.name
        );
        self.broadcast(MatchEvent::ActionNotice { text });
        Some(applied)
    }

    fn tick_statuses(&mut self) {
        for player in &mut self.players {
            let delta = player.status.tick();
            player.sanity = rules::adjust_sanity(player.sanity, delta);
        }
    }

    fn is_over(&self) -> bool {
        self.players.iter().any(|p| p.sanity == 0)
            || self.players.iter().all(|p| p.hand.is_empty())
    }

    fn index_of(&self, player_id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == player_id)
    }

    fn sanity_map(&self) -> HashMap<PlayerId, u32> {
        self.players.iter().map(|p| (p.id, p.sanity)).collect()
    }

    fn state_map(&self) -> HashMap<PlayerId, DreamState> {
        self.players
            .iter()
            .map(|p| (p.id, p.status.state()))
            .collect()
    }

    fn snapshot(&self) -> MatchEvent {
        MatchEvent::StateUpdate {
            turn: self.players[self.turn].id,
            sanity: self.sanity_map(),
            dream_states: self.state_map(),
            round: self.round,
        }
    }

    fn send_match_start(&self) {
        for idx in 0..2 {
            let event = MatchEvent::MatchStart {
                opponent: self.players[1 - idx].username.clone(),
                turn: self.players[self.turn].id,
                hand: self.players[idx].hand.clone(),
                sanity: self.sanity_map(),
                dream_states: self.state_map(),
            };
            self.send_to(idx, event);
        }
    }

    fn broadcast(&self, event: MatchEvent) {
        for idx in 0..2 {
            self.send_to(idx, event.clone());
        }
    }

    fn send_to(&self, idx: usize, event: MatchEvent) {
        // A dropped receiver just means that player is gone; the
        // disconnect path ends the match separately.
        let _ = self.players[idx].events.send(event);
    }
}
