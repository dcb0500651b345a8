//! Precomputed pool of fresh nonce pairs a participant draws from. Drawing
//! overlaps the curve multiplications of `pre_round` with network waiting
//! time, but the core contract is only that each output is fresh and never
//! reused (§9).

use std::collections::VecDeque;

use rand_core::{CryptoRng, RngCore};
use roast_core::protocol::{pre_round, PreNonce, SecretPreNonce};

use crate::error::ParticipantError;

pub struct NonceCache {
  pool: VecDeque<(SecretPreNonce, PreNonce)>,
}

impl NonceCache {
  /// Precomputes `k` fresh nonce pairs.
  pub fn new<R: RngCore + CryptoRng>(rng: &mut R, k: usize) -> Self {
    let pool = (0 .. k).map(|_| pre_round(rng)).collect();
    Self { pool }
  }

  pub fn len(&self) -> usize {
    self.pool.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pool.is_empty()
  }

  /// Draws the next fresh nonce pair. Fails rather than reusing one, since
  /// nonce reuse leaks the secret key.
  pub fn draw(&mut self) -> Result<(SecretPreNonce, PreNonce), ParticipantError> {
    self.pool.pop_front().ok_or(ParticipantError::NonceExhausted)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand_chacha::ChaCha20Rng;

  #[test]
  fn draws_until_exhausted_then_errors() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let mut cache = NonceCache::new(&mut rng, 2);
    assert_eq!(cache.len(), 2);
    cache.draw().unwrap();
    cache.draw().unwrap();
    assert!(cache.is_empty());
    assert!(matches!(cache.draw(), Err(ParticipantError::NonceExhausted)));
  }

  #[test]
  fn never_yields_the_same_nonce_twice() {
    let mut rng = ChaCha20Rng::seed_from_u64(2);
    let mut cache = NonceCache::new(&mut rng, 4);
    let mut seen = Vec::new();
    while let Ok((_, public)) = cache.draw() {
      assert!(!seen.contains(&public));
      seen.push(public);
    }
  }
}
