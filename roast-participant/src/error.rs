use thiserror::Error;

use roast_transport::TransportError;

/// Errors raised by the participant process.
#[derive(Debug, Error)]
pub enum ParticipantError {
  #[error(transparent)]
  Transport(#[from] TransportError),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  /// A configuration error, not a protocol one: the cache must be sized for
  /// the number of sessions this participant expects to join.
  #[error("nonce cache exhausted, configure a larger pool")]
  NonceExhausted,
}
