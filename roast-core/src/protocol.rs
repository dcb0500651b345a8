//! The two-round Schnorr threshold signing protocol ROAST orchestrates:
//! nonce generation and aggregation, per-share validation, share
//! aggregation, and verification.

use std::collections::HashMap;

use group::ff::Field;
use rand_core::{CryptoRng, RngCore};

use crate::{
  curve::{self, hash_to_scalar, point_add, point_mul, random_nonzero_scalar, Fq, HashItem, Point, GENERATOR},
  error::CoreError,
  shamir::lagrange,
};

/// A participant's secret nonce pair for one signing round. Must never be
/// reused across sessions.
#[derive(Clone, Copy, Debug)]
pub struct SecretPreNonce {
  pub d_i: Fq,
  pub e_i: Fq,
}

/// The public commitment to a [`SecretPreNonce`], shared with the
/// coordinator and copied into every session that consumes it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PreNonce {
  pub d_i: Point,
  pub e_i: Point,
}

/// Draws a fresh, uniformly random nonce pair. Must use a cryptographically
/// secure RNG; the caller is responsible for never reusing the output.
pub fn pre_round<R: RngCore + CryptoRng>(rng: &mut R) -> (SecretPreNonce, PreNonce) {
  let d_i = random_nonzero_scalar(rng);
  let e_i = random_nonzero_scalar(rng);
  let secret = SecretPreNonce { d_i, e_i };
  let public = PreNonce { d_i: point_mul(GENERATOR, d_i), e_i: point_mul(GENERATOR, e_i) };
  (secret, public)
}

/// Coordinate-wise sum of the pre-nonces of every participant in `t_set`.
pub fn pre_agg(i_to_pre: &HashMap<u32, PreNonce>, t_set: &[u32]) -> (Point, Point) {
  let mut d = curve::identity();
  let mut e = curve::identity();
  for &i in t_set {
    let pre = &i_to_pre[&i];
    d = point_add(d, pre.d_i);
    e = point_add(e, pre.e_i);
  }
  (d, e)
}

/// All public data a participant needs to compute or validate one signing
/// round, bound to a single session.
#[derive(Clone, Debug)]
pub struct SessionContext {
  pub group_key: Point,
  pub i_to_x: HashMap<u32, Point>,
  pub msg: Vec<u8>,
  pub t_set: Vec<u32>,
  pub pre: (Point, Point),
  pub pre_i: PreNonce,
}

fn binding_factor(ctx: &SessionContext) -> Fq {
  let (d, e) = ctx.pre;
  hash_to_scalar(
    "non",
    &[HashItem::from(&ctx.group_key), HashItem::from(ctx.msg.as_slice()), HashItem::from(&d), HashItem::from(&e)],
  )
}

fn session_nonce(ctx: &SessionContext, b: Fq) -> Point {
  let (d, e) = ctx.pre;
  point_add(d, point_mul(e, b))
}

fn challenge(group_key: &Point, msg: &[u8], r: &Point) -> Fq {
  hash_to_scalar("sig", &[HashItem::from(group_key), HashItem::from(msg), HashItem::from(r)])
}

/// Public check: does `s_i` satisfy `s_i * G == D_i + b * E_i + c * λ_i * X_i`?
pub fn share_val(ctx: &SessionContext, i: u32, s_i: Fq) -> bool {
  let b = binding_factor(ctx);
  let r = session_nonce(ctx, b);
  let c = challenge(&ctx.group_key, &ctx.msg, &r);
  let lambda_i = lagrange(&ctx.t_set, i);

  let lhs = point_mul(GENERATOR, s_i);
  let x_i = ctx.i_to_x[&i];
  let rhs = point_add(point_add(ctx.pre_i.d_i, point_mul(ctx.pre_i.e_i, b)), point_mul(x_i, c * lambda_i));
  lhs == rhs
}

/// Computes participant `i`'s partial signature: `s_i = d_i + b*e_i + c*λ_i*sk_i`.
pub fn sign_round(ctx: &SessionContext, i: u32, sk_i: Fq, spre_i: SecretPreNonce) -> Fq {
  let b = binding_factor(ctx);
  let r = session_nonce(ctx, b);
  let c = challenge(&ctx.group_key, &ctx.msg, &r);
  let lambda_i = lagrange(&ctx.t_set, i);

  spre_i.d_i + b * spre_i.e_i + c * lambda_i * sk_i
}

/// An aggregate Schnorr signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature {
  pub r: Point,
  pub s: Fq,
}

/// Aggregates `t` partial signatures into a complete signature. Requires
/// exactly `t` shares, one per member of `ctx.t_set`.
pub fn sign_agg(ctx: &SessionContext, i_to_s: &HashMap<u32, Fq>) -> Result<Signature, CoreError> {
  if i_to_s.len() != ctx.t_set.len() {
    return Err(CoreError::WrongShareCount(i_to_s.len(), ctx.t_set.len() as u16));
  }
  let b = binding_factor(ctx);
  let r = session_nonce(ctx, b);
  let s = ctx.t_set.iter().fold(Fq::zero(), |acc, i| acc + i_to_s[i]);
  Ok(Signature { r, s })
}

/// Verifies `sig` against the group key and message of `ctx`.
pub fn verify(group_key: &Point, msg: &[u8], sig: &Signature) -> bool {
  let c = challenge(group_key, msg, &sig.r);
  point_mul(GENERATOR, sig.s) == point_add(sig.r, point_mul(*group_key, c))
}
