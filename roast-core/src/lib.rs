//! Cryptographic core and pure state machine for ROAST: a robust
//! asynchronous threshold Schnorr signing protocol over secp256k1.
//!
//! This crate has no I/O. [`model::CoordinatorModel`] is a pure function of
//! its current state and one incoming event; the networked runtime that
//! drives it lives in `roast-coordinator`.

pub mod attacker;
pub mod curve;
pub mod error;
pub mod model;
pub mod protocol;
pub mod shamir;

pub use attacker::{AttackerLevel, AttackerStrategy};
pub use curve::{Fq, Point};
pub use error::CoreError;
pub use model::{Action, ActionType, CoordinatorModel};
pub use protocol::{PreNonce, SecretPreNonce, SessionContext, Signature};
