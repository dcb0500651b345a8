//! Shamir secret sharing and Lagrange interpolation mod the secp256k1 group
//! order.

use std::collections::HashMap;

use group::ff::Field;
use rand_core::{CryptoRng, RngCore};

use crate::curve::{random_nonzero_scalar, Fq};

fn poly_eval(coefficients: &[Fq], x: u32) -> Fq {
  let x = Fq::from(u64::from(x));
  let mut y = Fq::zero();
  // Horner's method, highest-degree coefficient first.
  for coefficient in coefficients.iter().rev() {
    y = y * x + coefficient;
  }
  y
}

/// Splits `secret` into `n` shares of a degree-`(t - 1)` polynomial, evaluated
/// at x = 1..=n. Any `t` of the resulting shares recover `secret`.
pub fn split_secret<R: RngCore + CryptoRng>(
  rng: &mut R,
  secret: Fq,
  t: u16,
  n: u16,
) -> HashMap<u32, Fq> {
  let mut coefficients = Vec::with_capacity(usize::from(t));
  coefficients.push(secret);
  for _ in 1 .. t {
    coefficients.push(random_nonzero_scalar(rng));
  }

  (1 ..= u32::from(n)).map(|i| (i, poly_eval(&coefficients, i))).collect()
}

/// The Lagrange coefficient for participant `i` over the signing set `t_set`:
/// `λ_i = Π_{j ∈ t_set, j != i} j * (j - i)^-1`.
pub fn lagrange(t_set: &[u32], i: u32) -> Fq {
  let mut num = Fq::one();
  let mut denom = Fq::one();
  for &j in t_set {
    if j == i {
      continue;
    }
    let j_f = Fq::from(u64::from(j));
    let i_f = Fq::from(u64::from(i));
    num *= j_f;
    denom *= j_f - i_f;
  }
  // denom is never zero: t_set has no duplicate indices, so j - i != 0 for every term.
  num * denom.invert().unwrap()
}

/// Recovers the shared secret from any `t`-subset of shares.
pub fn recover_secret(shares: &HashMap<u32, Fq>) -> Fq {
  let t_set: Vec<u32> = shares.keys().copied().collect();
  shares.iter().fold(Fq::zero(), |acc, (&i, &y)| acc + lagrange(&t_set, i) * y)
}
