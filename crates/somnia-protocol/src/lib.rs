//! Wire protocol for Somnia.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`Envelope`], [`SystemMessage`], [`QueueStatus`], etc.) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the session
//! and battle layers (player identity, game rules). It doesn't know about
//! connections, queues, or matches — it only knows how to serialize and
//! deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Session / Battle (context)
//! ```
//!
//! Game content (card plays, match events) travels as an opaque
//! [`Payload::Game`] byte blob, encoded by the same codec. The envelope
//! layer never inspects it.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    Channel, Envelope, MatchId, Payload, PlayerId, QueueStatus,
    SystemMessage,
};
