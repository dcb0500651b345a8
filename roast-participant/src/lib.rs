//! The ROAST participant: holds one key share, precomputes nonces, and
//! answers sign requests from a coordinator.

pub mod error;
pub mod nonce_cache;
pub mod participant;

pub use error::ParticipantError;
pub use nonce_cache::NonceCache;
pub use participant::Participant;
