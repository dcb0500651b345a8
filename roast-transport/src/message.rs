//! The four message bodies exchanged between coordinator and participant,
//! each wrapped with a `run_id` so long-lived connections can be reused
//! across benchmark runs (see `SPEC_FULL.md` §9, run isolation).

use serde::{Deserialize, Serialize};

use crate::wire::{WirePoint, WireScalar};

/// Coordinator → participant, sent once at startup.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitMessage {
  pub group_key: WirePoint,
  pub i: u32,
  pub sk_i: WireScalar,
}

/// Coordinator → participant, one per signing session this participant is
/// included in.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignRequest {
  pub msg: Vec<u8>,
  pub t_set: Vec<u32>,
  pub pre_d: WirePoint,
  pub pre_e: WirePoint,
  /// Benchmark-only: whether the attacker strategy picked this participant
  /// to misbehave in this particular session. A production deployment
  /// omits this field entirely.
  pub is_malicious: bool,
}

/// Coordinator → participant, the only message shape sent on the wire; one
/// connection alternates between the two variants for as long as it lives.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CoordinatorMessage {
  /// Sent once at startup, and again at the start of every subsequent
  /// benchmark run on the same connection: (re-)triggers the participant to
  /// push a fresh pre-nonce tagged with the enclosing envelope's `run_id`.
  Init(InitMessage),
  SignReq(SignRequest),
}

/// Participant → coordinator. `s_i` is `None` for the initial pre-nonce push
/// immediately after init, `Some` for every subsequent sign response.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParticipantReply {
  pub i: u32,
  pub s_i: Option<WireScalar>,
  pub pre_d: WirePoint,
  pub pre_e: WirePoint,
}

/// Every frame exchanged after init is tagged with the run it belongs to, so
/// a coordinator can discard frames left over from a previous benchmark run
/// on a connection it kept open.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
  pub run_id: u64,
  pub body: T,
}

impl<T> Envelope<T> {
  pub fn new(run_id: u64, body: T) -> Self {
    Self { run_id, body }
  }
}
