use thiserror::Error;

/// Errors raised by the cryptographic core and the pure coordinator model.
///
/// Share- and behavior-level errors are recovered locally by the model (the
/// offender is marked malicious); only [`CoreError::InvariantBreach`] is
/// fatal and must be propagated to the caller.
#[derive(Clone, Copy, Error, Debug, PartialEq, Eq)]
pub enum CoreError {
  #[error("point does not lie on secp256k1")]
  InvalidPoint,

  #[error("invariant breach: {0} malicious participants exceeds the tolerated n - t")]
  InvariantBreach(usize),

  #[error("zero or invalid threshold parameters (t = {0}, n = {1})")]
  InvalidParameters(u16, u16),

  #[error("signature aggregation requested over {0} shares, expected exactly t = {1}")]
  WrongShareCount(usize, u16),
}
