//! Wire encodings for curve points and scalars, kept deliberately explicit
//! (full affine `(x, y)` rather than a compressed point format) per the
//! resolved open question in `SPEC_FULL.md` §9.

use roast_core::{curve, CoreError, Fq, Point};
use serde::{Deserialize, Serialize};

use crate::error::TransportError;

/// Full affine `(x, y)` point encoding, with an explicit identity variant
/// since the identity element has no affine representative.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WirePoint {
  Identity,
  Affine { x: [u8; 32], y: [u8; 32] },
}

impl From<&Point> for WirePoint {
  fn from(p: &Point) -> Self {
    match curve::affine_bytes_from_point(p) {
      Some((x, y)) => WirePoint::Affine { x, y },
      None => WirePoint::Identity,
    }
  }
}

impl TryFrom<&WirePoint> for Point {
  type Error = TransportError;

  fn try_from(w: &WirePoint) -> Result<Self, Self::Error> {
    match w {
      WirePoint::Identity => Ok(curve::identity()),
      WirePoint::Affine { x, y } => {
        curve::point_from_affine_bytes(x, y).map_err(|_: CoreError| TransportError::InvalidPoint)
      }
    }
  }
}

/// Big-endian 32-byte scalar encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireScalar(pub [u8; 32]);

impl From<&Fq> for WireScalar {
  fn from(f: &Fq) -> Self {
    use group::ff::PrimeField;
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&f.to_repr());
    WireScalar(bytes)
  }
}

impl TryFrom<&WireScalar> for Fq {
  type Error = TransportError;

  fn try_from(w: &WireScalar) -> Result<Self, Self::Error> {
    use group::ff::PrimeField;
    let repr = Fq::from_repr(w.0.into());
    if bool::from(repr.is_none()) {
      return Err(TransportError::InvalidScalar);
    }
    Ok(repr.unwrap())
  }
}
