//! Choosing which of the two clouds a land point joins.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Picks a destination cloud (0 or 1) for each land point.
pub trait CloudAssigner {
    fn assign(&mut self) -> usize;
}

/// Uniform, independent 0/1 choice backed by a seedable ChaCha8 stream.
pub struct RandomAssigner {
    rng: ChaCha8Rng,
}

impl RandomAssigner {
    /// Deterministic assigner for the given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Assigner seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self::seeded(rand::random::<u64>())
    }

    /// `seeded` when a seed is given, otherwise `from_entropy`.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => Self::seeded(seed),
            None => Self::from_entropy(),
        }
    }
}

impl CloudAssigner for RandomAssigner {
    fn assign(&mut self) -> usize {
        (2.0 * self.rng.random::<f64>()).floor() as usize
    }
}

/// Always sends points to the same cloud.
#[derive(Clone, Copy, Debug)]
pub struct FixedAssigner(pub usize);

impl CloudAssigner for FixedAssigner {
    fn assign(&mut self) -> usize {
        self.0
    }
}

impl<A: CloudAssigner + ?Sized> CloudAssigner for &mut A {
    fn assign(&mut self) -> usize {
        (**self).assign()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_assigner_yields_both_clouds() {
        let mut assigner = RandomAssigner::seeded(7);
        let picks: Vec<usize> = (0..1000).map(|_| assigner.assign()).collect();
        assert!(picks.iter().all(|&c| c < 2));
        let ones = picks.iter().filter(|&&c| c == 1).count();
        assert!(
            (350..650).contains(&ones),
            "expected a roughly even split, got {ones} of 1000"
        );
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomAssigner::seeded(42);
        let mut b = RandomAssigner::seeded(42);
        for _ in 0..64 {
            assert_eq!(a.assign(), b.assign());
        }
    }

    #[test]
    fn test_fixed_assigner() {
        let mut fixed = FixedAssigner(1);
        assert_eq!(fixed.assign(), 1);
        assert_eq!(fixed.assign(), 1);
    }
}
