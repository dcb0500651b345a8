use thiserror::Error;

use roast_core::CoreError;
use roast_transport::TransportError;

/// Errors surfaced by the networked coordinator runtime, layered over the
/// pure-model and transport errors of the crates it wraps.
#[derive(Debug, Error)]
pub enum RuntimeError {
  #[error(transparent)]
  Core(#[from] CoreError),

  #[error(transparent)]
  Transport(#[from] TransportError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error("the outgoing writer thread is no longer running")]
  WorkerUnavailable,

  #[error("no key share configured for participant {0}")]
  MissingKeyShare(u32),

  #[error("aggregated signature failed verification at session success")]
  VerificationFailed,
}
