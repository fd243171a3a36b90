//! Core protocol types for Somnia's wire format.
//!
//! Everything here is a structure that gets serialized to bytes, sent over
//! the network, and deserialized on the other side. The JSON shapes are
//! pinned by the tests at the bottom of this file — the terminal client
//! parses these exact layouts.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over `u64` so a `MatchId` can never be passed where a
/// `PlayerId` is expected. `#[serde(transparent)]` keeps the wire form a
/// plain number: `PlayerId(42)` serializes as `42`, not `{"0":42}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// A unique identifier for a match — one battle between two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Channel — delivery guarantees
// ---------------------------------------------------------------------------

/// The delivery guarantee requested for a message.
///
/// The WebSocket transport only offers reliable-ordered delivery, but the
/// envelope carries the intent so an unreliable transport (WebTransport
/// datagrams) can honor it later without a wire format change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "PascalCase")]
pub enum Channel {
    /// Delivered in order, no loss. The default for everything turn-based.
    #[default]
    ReliableOrdered,

    /// May be lost or reordered. Reserved for high-frequency side data.
    Unreliable,
}

// ---------------------------------------------------------------------------
// QueueStatus — the synchronous reply to an enqueue request
// ---------------------------------------------------------------------------

/// Outcome of an enqueue attempt, reported back to the requesting client.
///
/// The two failure cases are contract violations the client can recover
/// from by retrying later — they never terminate the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStatus {
    /// The player is now waiting for an opponent.
    Queued,
    /// The player was already in the waiting queue.
    AlreadyQueued,
    /// The player is currently bound to a running match.
    AlreadyInMatch,
}

impl fmt::Display for QueueStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::AlreadyQueued => write!(f, "already queued"),
            Self::AlreadyInMatch => write!(f, "already in a match"),
        }
    }
}

// ---------------------------------------------------------------------------
// SystemMessage — framework-level messages
// ---------------------------------------------------------------------------

/// Messages used by the connection plumbing itself (not game content):
/// connecting, authenticating, heartbeats, queue replies, and errors.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON —
/// `{ "type": "Handshake", "version": 1, ... }` — which is what the
/// client parses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SystemMessage {
    // -- Connection lifecycle --
    /// Client → Server: "Hello, I want to connect."
    /// `version` lets the server reject incompatible clients; `token`
    /// is the credential handed to the session layer's authenticator.
    Handshake {
        version: u32,
        token: Option<String>,
    },

    /// Server → Client: "Welcome, you're connected."
    HandshakeAck {
        player_id: PlayerId,
        username: String,
        server_time: u64,
    },

    /// Either direction: "I'm disconnecting." Includes a human-readable
    /// reason for logging. For a player in a match this is a forfeit.
    Disconnect { reason: String },

    // -- Heartbeat (keep-alive) --
    /// Client → Server: "I'm still here." Expected every few seconds;
    /// the server read loop treats prolonged silence as a disconnect.
    Heartbeat { client_time: u64 },

    /// Server → Client: echo with timing info for RTT calculation.
    HeartbeatAck {
        client_time: u64,
        server_time: u64,
    },

    // -- Matchmaking --
    /// Server → Client: the synchronous result of an `Enqueue` action.
    QueueResult { status: QueueStatus },

    // -- Errors --
    /// Server → Client: "Something went wrong." `code` follows
    /// HTTP-style conventions (400 bad request, 401 unauthorized, ...).
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Payload and Envelope — the top-level wire format
// ---------------------------------------------------------------------------

/// The content of a message: either a system message or game data.
///
/// Adjacently tagged (`{"type": "System", "data": {...}}`) so the
/// connection handler can check "plumbing or game?" without decoding the
/// inner bytes. Game bytes are the codec-encoded battle action/event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    /// A framework-level message (handshake, heartbeat, queue, error).
    System(SystemMessage),

    /// Game-specific data, opaque to the envelope layer.
    Game(Vec<u8>),
}

/// The top-level message wrapper. Every message on the wire is an
/// `Envelope`: metadata on the outside, content inside.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Auto-incrementing sequence number; each side keeps its own
    /// counter. Used to spot missing or reordered messages in logs.
    pub seq: u64,

    /// Milliseconds since the sender's connection started.
    pub timestamp: u64,

    /// Delivery guarantee. Defaults to `ReliableOrdered` when absent,
    /// which keeps old clients compatible.
    #[serde(default)]
    pub channel: Channel,

    /// The actual message content.
    pub payload: Payload,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! Wire-shape tests. The client parses these exact JSON layouts, so a
    //! serde attribute change that alters them is a protocol break.

    use super::*;

    #[test]
    fn test_player_id_serializes_as_plain_number() {
        let json = serde_json::to_string(&PlayerId(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn test_player_id_deserializes_from_plain_number() {
        let pid: PlayerId = serde_json::from_str("42").unwrap();
        assert_eq!(pid, PlayerId(42));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(PlayerId(7).to_string(), "P-7");
        assert_eq!(MatchId(3).to_string(), "M-3");
    }

    #[test]
    fn test_channel_default_is_reliable_ordered() {
        assert_eq!(Channel::default(), Channel::ReliableOrdered);
    }

    #[test]
    fn test_handshake_json_format() {
        let msg = SystemMessage::Handshake {
            version: 1,
            token: Some("abc".into()),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "Handshake");
        assert_eq!(json["version"], 1);
        assert_eq!(json["token"], "abc");
    }

    #[test]
    fn test_handshake_ack_json_format() {
        let msg = SystemMessage::HandshakeAck {
            player_id: PlayerId(42),
            username: "moth".into(),
            server_time: 15000,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "HandshakeAck");
        assert_eq!(json["player_id"], 42);
        assert_eq!(json["username"], "moth");
    }

    #[test]
    fn test_queue_result_json_format() {
        let msg = SystemMessage::QueueResult {
            status: QueueStatus::AlreadyInMatch,
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "QueueResult");
        assert_eq!(json["status"], "AlreadyInMatch");
    }

    #[test]
    fn test_queue_status_round_trip() {
        for status in [
            QueueStatus::Queued,
            QueueStatus::AlreadyQueued,
            QueueStatus::AlreadyInMatch,
        ] {
            let bytes = serde_json::to_vec(&status).unwrap();
            let decoded: QueueStatus =
                serde_json::from_slice(&bytes).unwrap();
            assert_eq!(status, decoded);
        }
    }

    #[test]
    fn test_heartbeat_round_trip() {
        let msg = SystemMessage::Heartbeat { client_time: 5000 };
        let bytes = serde_json::to_vec(&msg).unwrap();
        let decoded: SystemMessage = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_error_json_format() {
        let msg = SystemMessage::Error {
            code: 401,
            message: "Unauthorized".into(),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["type"], "Error");
        assert_eq!(json["code"], 401);
    }

    #[test]
    fn test_payload_system_json_format() {
        let payload = Payload::System(SystemMessage::Heartbeat {
            client_time: 1,
        });
        let json: serde_json::Value =
            serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "System");
        assert!(json["data"].is_object());
    }

    #[test]
    fn test_payload_game_json_format() {
        let payload = Payload::Game(vec![1, 2, 3]);
        let json: serde_json::Value =
            serde_json::to_value(&payload).unwrap();

        assert_eq!(json["type"], "Game");
        assert_eq!(json["data"], serde_json::json!([1, 2, 3]));
    }

    #[test]
    fn test_envelope_round_trip() {
        let envelope = Envelope {
            seq: 42,
            timestamp: 15000,
            channel: Channel::ReliableOrdered,
            payload: Payload::Game(vec![1, 2, 3]),
        };
        let bytes = serde_json::to_vec(&envelope).unwrap();
        let decoded: Envelope = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(envelope, decoded);
    }

    #[test]
    fn test_envelope_channel_defaults_when_missing() {
        let json = r#"{
            "seq": 1,
            "timestamp": 100,
            "payload": { "type": "Game", "data": [1] }
        }"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.channel, Channel::ReliableOrdered);
    }

    #[test]
    fn test_decode_garbage_returns_error() {
        let garbage = b"not json at all";
        let result: Result<Envelope, _> = serde_json::from_slice(garbage);
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_unknown_system_message_type_returns_error() {
        let unknown = r#"{"type": "WakeUp", "speed": 9000}"#;
        let result: Result<SystemMessage, _> =
            serde_json::from_str(unknown);
        assert!(result.is_err());
    }
}
