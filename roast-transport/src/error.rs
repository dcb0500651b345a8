use thiserror::Error;

#[derive(Error, Debug)]
pub enum TransportError {
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to (de)serialize frame payload: {0}")]
  Codec(#[from] Box<bincode::ErrorKind>),

  #[error("wire point does not lie on secp256k1")]
  InvalidPoint,

  #[error("wire scalar is not a valid field element")]
  InvalidScalar,

  #[error("frame exceeds the maximum accepted payload size ({0} bytes)")]
  FrameTooLarge(u32),
}
