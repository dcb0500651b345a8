//! Framing and wire messages for the ROAST coordinator/participant
//! protocol: a 4-byte little-endian length prefix followed by a
//! `bincode`-encoded, `serde`-derived payload (see `SPEC_FULL.md` §6).

pub mod error;
pub mod framing;
pub mod message;
pub mod wire;

pub use error::TransportError;
pub use framing::{recv_obj, send_obj};
pub use message::{CoordinatorMessage, Envelope, InitMessage, ParticipantReply, SignRequest};
pub use wire::{WirePoint, WireScalar};
