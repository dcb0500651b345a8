//! 4-byte little-endian length-prefixed framing over any reliable ordered
//! byte stream, with the payload itself `bincode`-encoded.

use std::io::{Read, Write};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::TransportError;

/// Frames above this size are rejected outright rather than causing an
/// unbounded allocation; no real ROAST message approaches this.
const MAX_FRAME_LEN: u32 = 16 * 1024 * 1024;

/// Serializes `payload` and writes it as one length-prefixed frame.
pub fn send_obj<W: Write, T: Serialize>(writer: &mut W, payload: &T) -> Result<(), TransportError> {
  let data = bincode::serialize(payload)?;
  let len = u32::try_from(data.len()).map_err(|_| TransportError::FrameTooLarge(u32::MAX))?;
  writer.write_all(&len.to_le_bytes())?;
  writer.write_all(&data)?;
  Ok(())
}

/// Reads one length-prefixed frame and deserializes it. Returns
/// `Ok(None)` on a clean EOF (zero-length prefix or closed stream) to let
/// callers distinguish a closed connection from a malformed one.
pub fn recv_obj<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<Option<T>, TransportError> {
  let mut len_bytes = [0u8; 4];
  if let Err(e) = reader.read_exact(&mut len_bytes) {
    if e.kind() == std::io::ErrorKind::UnexpectedEof {
      return Ok(None);
    }
    return Err(e.into());
  }
  let len = u32::from_le_bytes(len_bytes);
  if len == 0 {
    return Ok(None);
  }
  if len > MAX_FRAME_LEN {
    return Err(TransportError::FrameTooLarge(len));
  }

  let mut data = vec![0u8; len as usize];
  reader.read_exact(&mut data)?;
  Ok(Some(bincode::deserialize(&data)?))
}
