//! Per-connection handler: handshake, session registration, the read
//! loop, and the outbound pump that turns match events into envelopes.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use serde::Serialize;
use somnia_battle::{ClientAction, EventSender, Ticket};
use somnia_protocol::{
    Channel, Codec, Envelope, JsonCodec, Payload, PlayerId, QueueStatus,
    SystemMessage,
};
use somnia_session::{Authenticator, Identity};
use somnia_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::error::SomniaError;
use crate::server::{ServerState, PROTOCOL_VERSION};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);
/// A client that sends nothing (not even heartbeats) for this long is
/// considered gone.
const READ_TIMEOUT: Duration = Duration::from_secs(30);

// HTTP-style codes, per the protocol's Error message convention.
const ERR_UNSUPPORTED_VERSION: u16 = 400;
const ERR_AUTH_FAILED: u16 = 401;
const ERR_ALREADY_CONNECTED: u16 = 409;

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Outbound half of a connection: stamps envelopes with a per-connection
/// sequence number. Cloned into the pump task.
#[derive(Clone)]
struct Outbound {
    connection: WebSocketConnection,
    codec: JsonCodec,
    seq: Arc<AtomicU64>,
}

impl Outbound {
    fn new(connection: WebSocketConnection) -> Self {
        Self {
            connection,
            codec: JsonCodec,
            seq: Arc::new(AtomicU64::new(1)),
        }
    }

    async fn send_payload(&self, payload: Payload) -> Result<(), SomniaError> {
        let envelope = Envelope {
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            timestamp: now_millis(),
            channel: Channel::ReliableOrdered,
            payload,
        };
        let bytes = self.codec.encode(&envelope)?;
        self.connection.send(&bytes).await?;
        Ok(())
    }

    async fn send_system(
        &self,
        message: SystemMessage,
    ) -> Result<(), SomniaError> {
        self.send_payload(Payload::System(message)).await
    }

    async fn send_game<T: Serialize>(
        &self,
        value: &T,
    ) -> Result<(), SomniaError> {
        let data = self.codec.encode(value)?;
        self.send_payload(Payload::Game(data)).await
    }
}

pub(crate) async fn handle_connection<A: Authenticator>(
    state: Arc<ServerState<A>>,
    connection: WebSocketConnection,
) -> Result<(), SomniaError> {
    let outbound = Outbound::new(connection.clone());

    let identity = match handshake(&state, &connection, &outbound).await {
        Ok(identity) => identity,
        Err(error) => {
            let _ = connection.close().await;
            return Err(error);
        }
    };
    let player_id = identity.player_id;
    let username = identity.username.clone();

    // Register before acking so a duplicate connection is refused
    // without ever looking connected.
    let create_result = {
        let mut sessions =
            state.sessions.lock().expect("session lock poisoned");
        sessions.create(identity).map(|_| ())
    };
    if let Err(error) = create_result {
        let _ = outbound
            .send_system(SystemMessage::Error {
                code: ERR_ALREADY_CONNECTED,
                message: error.to_string(),
            })
            .await;
        let _ = connection.close().await;
        return Err(error.into());
    }

    if let Err(error) = outbound
        .send_system(SystemMessage::HandshakeAck {
            player_id,
            username: username.clone(),
            server_time: now_millis(),
        })
        .await
    {
        let mut sessions =
            state.sessions.lock().expect("session lock poisoned");
        let _ = sessions.remove(player_id);
        return Err(error);
    }
    tracing::info!(%player_id, %username, "player connected");

    // All match events for this player funnel through one channel; the
    // pump forwards them to the socket so the read loop never writes
    // game traffic itself.
    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let pump = {
        let outbound = outbound.clone();
        tokio::spawn(async move {
            while let Some(event) = events_rx.recv().await {
                if outbound.send_game(&event).await.is_err() {
                    break;
                }
            }
        })
    };

    let result = read_loop(
        &state,
        &connection,
        &outbound,
        player_id,
        &username,
        &events_tx,
    )
    .await;

    // Teardown order matters: the match hears about the drop before
    // the session goes away, so the opponent's victory resolves while
    // the presence flag still has somewhere to land.
    if let Some(handle) = state.coordinator.disconnect(player_id) {
        let _ = handle.disconnected(player_id).await;
    }
    {
        let mut sessions =
            state.sessions.lock().expect("session lock poisoned");
        let _ = sessions.remove(player_id);
    }
    pump.abort();
    let _ = connection.close().await;
    tracing::info!(%player_id, "player disconnected");
    result
}

async fn handshake<A: Authenticator>(
    state: &ServerState<A>,
    connection: &WebSocketConnection,
    outbound: &Outbound,
) -> Result<Identity, SomniaError> {
    let bytes = tokio::time::timeout(HANDSHAKE_TIMEOUT, connection.recv())
        .await
        .map_err(|_| SomniaError::Handshake("timed out".into()))??
        .ok_or_else(|| {
            SomniaError::Handshake("closed before handshake".into())
        })?;

    let envelope: Envelope = outbound.codec.decode(&bytes)?;
    let Payload::System(SystemMessage::Handshake { version, token }) =
        envelope.payload
    else {
        return Err(SomniaError::Handshake(
            "first message must be a handshake".into(),
        ));
    };

    if version != PROTOCOL_VERSION {
        let _ = outbound
            .send_system(SystemMessage::Error {
                code: ERR_UNSUPPORTED_VERSION,
                message: format!("unsupported protocol version {version}"),
            })
            .await;
        return Err(SomniaError::Handshake(format!(
            "unsupported protocol version {version}"
        )));
    }

    let token = token
        .ok_or_else(|| SomniaError::Handshake("missing auth token".into()))?;
    match state.auth.authenticate(&token).await {
        Ok(identity) => Ok(identity),
        Err(error) => {
            let _ = outbound
                .send_system(SystemMessage::Error {
                    code: ERR_AUTH_FAILED,
                    message: error.to_string(),
                })
                .await;
            Err(error.into())
        }
    }
}

async fn read_loop<A: Authenticator>(
    state: &ServerState<A>,
    connection: &WebSocketConnection,
    outbound: &Outbound,
    player_id: PlayerId,
    username: &str,
    events: &EventSender,
) -> Result<(), SomniaError> {
    loop {
        let bytes =
            match tokio::time::timeout(READ_TIMEOUT, connection.recv()).await
            {
                Err(_) => {
                    tracing::debug!(%player_id, "read timeout, dropping");
                    return Ok(());
                }
                Ok(Ok(Some(bytes))) => bytes,
                Ok(Ok(None)) => return Ok(()),
                Ok(Err(error)) => return Err(error.into()),
            };

        // Malformed traffic never kills the connection; it just gets
        // logged and skipped.
        let envelope: Envelope = match outbound.codec.decode(&bytes) {
            Ok(envelope) => envelope,
            Err(error) => {
                tracing::debug!(%player_id, %error, "malformed envelope");
                continue;
            }
        };

        match envelope.payload {
            Payload::System(message) => match message {
                SystemMessage::Heartbeat { client_time } => {
                    outbound
                        .send_system(SystemMessage::HeartbeatAck {
                            client_time,
                            server_time: now_millis(),
                        })
                        .await?;
                }
                SystemMessage::Disconnect { reason } => {
                    tracing::debug!(%player_id, %reason, "client disconnect");
                    return Ok(());
                }
                other => {
                    tracing::debug!(
                        %player_id,
                        ?other,
                        "unexpected system message"
                    );
                }
            },
            Payload::Game(data) => {
                let action: ClientAction = match outbound.codec.decode(&data)
                {
                    Ok(action) => action,
                    Err(error) => {
                        tracing::debug!(%player_id, %error, "malformed action");
                        continue;
                    }
                };
                dispatch_action(
                    state, outbound, player_id, username, events, action,
                )
                .await?;
            }
        }
    }
}

async fn dispatch_action<A: Authenticator>(
    state: &ServerState<A>,
    outbound: &Outbound,
    player_id: PlayerId,
    username: &str,
    events: &EventSender,
    action: ClientAction,
) -> Result<(), SomniaError> {
    match action {
        ClientAction::Enqueue => {
            let ticket = Ticket {
                player_id,
                username: username.to_string(),
                events: events.clone(),
            };
            let status = match state.coordinator.enqueue(ticket) {
                Ok(()) => QueueStatus::Queued,
                Err(error) => {
                    tracing::debug!(%player_id, %error, "enqueue rejected");
                    error.status()
                }
            };
            outbound
                .send_system(SystemMessage::QueueResult { status })
                .await?;
        }
        ClientAction::PlayCard { card } => {
            match state.coordinator.match_for(player_id) {
                Some(handle) => {
                    let _ = handle.play_card(player_id, card).await;
                }
                None => {
                    tracing::debug!(%player_id, "play outside a match");
                }
            }
        }
        ClientAction::GiveUp => match state.coordinator.match_for(player_id) {
            Some(handle) => {
                let _ = handle.give_up(player_id).await;
            }
            None => {
                tracing::debug!(%player_id, "give up outside a match");
            }
        },
    }
    Ok(())
}
