//! secp256k1 point/scalar primitives and the tagged-hash construction ROAST's
//! session binding and challenge hashes are built from.

use elliptic_curve::{
  bigint::U256,
  ops::Reduce,
  sec1::{FromEncodedPoint, ToEncodedPoint},
};
use group::{ff::Field, Group, GroupEncoding};
use k256::{AffinePoint, ProjectivePoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};

use crate::error::CoreError;

/// A secp256k1 scalar, reduced mod the group order q.
pub type Fq = Scalar;
/// A secp256k1 point, including the identity.
pub type Point = ProjectivePoint;

pub const GENERATOR: Point = ProjectivePoint::GENERATOR;

pub fn point_add(a: Point, b: Point) -> Point {
  a + b
}

pub fn point_mul(p: Point, k: Fq) -> Point {
  p * k
}

/// x-only big-endian encoding of a point, for use inside tagged hashes.
/// The identity element has no affine x-coordinate; it is encoded as 32 zero
/// bytes, a sentinel that never collides with a real x-coordinate (x is
/// always reduced mod the field prime, which is far from all-zero).
pub fn bytes_from_point(p: &Point) -> [u8; 32] {
  let affine: AffinePoint = p.to_affine();
  let encoded = affine.to_encoded_point(false);
  match encoded.x() {
    Some(x) => {
      let mut out = [0u8; 32];
      out.copy_from_slice(x.as_slice());
      out
    }
    None => [0u8; 32],
  }
}

pub fn int_from_bytes(bytes: &[u8]) -> U256 {
  U256::from_be_slice(bytes)
}

/// `SHA256(SHA256(tag) || SHA256(tag) || msg)`, the BIP-340 tagged hash.
pub fn tagged_hash(tag: &[u8], msg: &[u8]) -> [u8; 32] {
  let tag_hash = Sha256::digest(tag);
  let mut hasher = Sha256::new();
  hasher.update(tag_hash);
  hasher.update(tag_hash);
  hasher.update(msg);
  hasher.finalize().into()
}

/// One item fed to [`H`]: either a point (serialized x-only) or raw bytes.
pub enum HashItem<'a> {
  Point(&'a Point),
  Bytes(&'a [u8]),
}

impl<'a> From<&'a Point> for HashItem<'a> {
  fn from(p: &'a Point) -> Self {
    HashItem::Point(p)
  }
}

impl<'a> From<&'a [u8]> for HashItem<'a> {
  fn from(b: &'a [u8]) -> Self {
    HashItem::Bytes(b)
  }
}

/// `H(tag, items..)`: concatenate the serialized items, tagged-hash them, and
/// reduce the digest mod q. Matches the binding-factor and challenge hashes
/// of the data model exactly.
pub fn hash_to_scalar<'a>(tag: &str, items: &[HashItem<'a>]) -> Fq {
  let mut buf = Vec::new();
  for item in items {
    match item {
      HashItem::Point(p) => buf.extend_from_slice(&bytes_from_point(p)),
      HashItem::Bytes(b) => buf.extend_from_slice(b),
    }
  }
  let digest = tagged_hash(tag.as_bytes(), &buf);
  Scalar::from_uint_reduced(int_from_bytes(&digest))
}

/// Draws a uniformly random scalar in `[1, q-1]`, suitable as a signing nonce
/// or Shamir polynomial coefficient. Never returns zero.
pub fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Fq {
  loop {
    let candidate = Scalar::random(&mut *rng);
    if bool::from(!candidate.is_zero()) {
      return candidate;
    }
  }
}

/// Deserializes a secp256k1 point from its full uncompressed `(x, y)`
/// encoding. Fails if the coordinates don't lie on the curve.
pub fn point_from_affine_bytes(x: &[u8; 32], y: &[u8; 32]) -> Result<Point, CoreError> {
  let mut sec1 = [0u8; 65];
  sec1[0] = 0x04;
  sec1[1 .. 33].copy_from_slice(x);
  sec1[33 ..].copy_from_slice(y);
  let encoded = k256::EncodedPoint::from_bytes(sec1).map_err(|_| CoreError::InvalidPoint)?;
  let affine = AffinePoint::from_encoded_point(&encoded);
  if bool::from(affine.is_none()) {
    return Err(CoreError::InvalidPoint);
  }
  Ok(Point::from(affine.unwrap()))
}

/// Full uncompressed `(x, y)` encoding of a point, or `None` for the
/// identity, which has no affine representative.
pub fn affine_bytes_from_point(p: &Point) -> Option<([u8; 32], [u8; 32])> {
  let affine = p.to_affine();
  let encoded = affine.to_encoded_point(false);
  let x = encoded.x()?;
  let y = encoded.y()?;
  let mut xb = [0u8; 32];
  let mut yb = [0u8; 32];
  xb.copy_from_slice(x.as_slice());
  yb.copy_from_slice(y.as_slice());
  Some((xb, yb))
}

pub fn identity() -> Point {
  Point::identity()
}
