//! The participant side of one signing round: holds a key share and nonce
//! cache, and computes partial signatures against a `SessionContext` handed
//! to it by the coordinator.

use roast_core::protocol::{sign_round, SecretPreNonce, SessionContext};
use roast_core::{Fq, Point};

use crate::nonce_cache::NonceCache;

pub struct Participant {
  pub i: u32,
  pub sk_i: Fq,
  pub group_key: Point,
  pub cache: NonceCache,
}

impl Participant {
  pub fn new(i: u32, sk_i: Fq, group_key: Point, cache: NonceCache) -> Self {
    Self { i, sk_i, group_key, cache }
  }

  /// Computes this participant's partial signature for `ctx`, using `spre`
  /// — the secret half of whichever nonce was last sent for this
  /// participant.
  pub fn sign(&self, ctx: &SessionContext, spre: SecretPreNonce) -> Fq {
    sign_round(ctx, self.i, self.sk_i, spre)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand_chacha::ChaCha20Rng;
  use roast_core::curve::{point_mul, random_nonzero_scalar, GENERATOR};
  use roast_core::protocol::{pre_agg, share_val};
  use std::collections::HashMap;

  #[test]
  fn sign_produces_a_share_that_validates() {
    let mut rng = ChaCha20Rng::seed_from_u64(9);
    let sk_i = random_nonzero_scalar(&mut rng);
    let group_key = point_mul(GENERATOR, sk_i);
    let i_to_x: HashMap<u32, Point> = [(1u32, group_key)].into_iter().collect();

    let mut cache = NonceCache::new(&mut rng, 1);
    let (spre, public) = cache.draw().unwrap();
    let participant = Participant::new(1, sk_i, group_key, cache);

    let mut i_to_pre = HashMap::new();
    i_to_pre.insert(1u32, public);
    let pre = pre_agg(&i_to_pre, &[1]);

    let ctx = SessionContext {
      group_key,
      i_to_x,
      msg: vec![9u8; 32],
      t_set: vec![1],
      pre,
      pre_i: public,
    };

    let s_i = participant.sign(&ctx, spre);
    assert!(share_val(&ctx, 1, s_i));
  }
}
