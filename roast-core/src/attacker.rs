//! Benchmark-only attacker strategies: which participants behave
//! maliciously in a given session. Not part of the protocol's trust model —
//! a production coordinator never consults this module.

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackerLevel {
  /// Always the same fixed set of `f` identities.
  Static,
  /// One participant at a time, sampled from the intersection of the
  /// current session and the fixed malicious set.
  StaticCoordination,
  /// One distinct participant per session, for the first `f` sessions only.
  Adaptive,
}

/// Selects which participants of a session behave maliciously, for
/// benchmark purposes only.
pub struct AttackerStrategy {
  level: AttackerLevel,
  fixed_malicious: HashSet<u32>,
}

impl AttackerStrategy {
  /// Samples `f` identities out of `1..=n` without replacement, once, via a
  /// cryptographic RNG; this is the fixed malicious set every level draws
  /// from.
  pub fn new<R: rand::RngCore + rand::CryptoRng>(rng: &mut R, level: AttackerLevel, n: u16, f: u16) -> Self {
    let population: Vec<u32> = (1 ..= u32::from(n)).collect();
    let fixed_malicious = population.choose_multiple(rng, usize::from(f)).copied().collect();
    Self { level, fixed_malicious }
  }

  pub fn fixed_malicious(&self) -> &HashSet<u32> {
    &self.fixed_malicious
  }

  /// Returns the set of participants in `t_set` that should behave
  /// maliciously in session number `session_index` (1-based).
  pub fn choose<R: Rng>(&self, rng: &mut R, t_set: &[u32], session_index: u64) -> HashSet<u32> {
    match self.level {
      AttackerLevel::Static => self.fixed_malicious.clone(),

      AttackerLevel::StaticCoordination => {
        let candidates: Vec<u32> = t_set.iter().copied().filter(|i| self.fixed_malicious.contains(i)).collect();
        match candidates.choose(rng) {
          Some(&i) => [i].into_iter().collect(),
          None => HashSet::new(),
        }
      }

      AttackerLevel::Adaptive => {
        if session_index <= u64::from(self.fixed_malicious.len() as u32) {
          match t_set.choose(rng) {
            Some(&i) => [i].into_iter().collect(),
            None => HashSet::new(),
          }
        } else {
          HashSet::new()
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rand::SeedableRng;
  use rand_chacha::ChaCha20Rng;

  #[test]
  fn static_level_always_returns_fixed_set() {
    let mut rng = ChaCha20Rng::seed_from_u64(1);
    let strategy = AttackerStrategy::new(&mut rng, AttackerLevel::Static, 5, 2);
    let fixed = strategy.fixed_malicious().clone();
    assert_eq!(fixed.len(), 2);

    let mut rng2 = ChaCha20Rng::seed_from_u64(2);
    assert_eq!(strategy.choose(&mut rng2, &[1, 2, 3], 1), fixed);
    assert_eq!(strategy.choose(&mut rng2, &[1, 2, 3], 7), fixed);
  }

  #[test]
  fn static_coordination_picks_at_most_one() {
    let mut rng = ChaCha20Rng::seed_from_u64(3);
    let strategy = AttackerStrategy::new(&mut rng, AttackerLevel::StaticCoordination, 5, 2);
    let chosen = strategy.choose(&mut rng, &[1, 2, 3, 4, 5], 1);
    assert!(chosen.len() <= 1);
    assert!(chosen.is_subset(strategy.fixed_malicious()));
  }

  #[test]
  fn static_coordination_empty_when_no_overlap() {
    let mut rng = ChaCha20Rng::seed_from_u64(4);
    let strategy = AttackerStrategy::new(&mut rng, AttackerLevel::StaticCoordination, 10, 2);
    let t_set: Vec<u32> =
      (1 ..= 10).filter(|i| !strategy.fixed_malicious().contains(i)).take(3).collect();
    assert!(strategy.choose(&mut rng, &t_set, 1).is_empty());
  }

  #[test]
  fn adaptive_stops_after_f_sessions() {
    let mut rng = ChaCha20Rng::seed_from_u64(5);
    let strategy = AttackerStrategy::new(&mut rng, AttackerLevel::Adaptive, 5, 2);
    assert_eq!(strategy.choose(&mut rng, &[1, 2, 3], 1).len(), 1);
    assert_eq!(strategy.choose(&mut rng, &[1, 2, 3], 2).len(), 1);
    assert!(strategy.choose(&mut rng, &[1, 2, 3], 3).is_empty());
  }
}
