//! Uniform random replacement over the occupied frames, driven by an
//! explicitly seeded generator so victim sequences are reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::frame::FrameId;

use super::ReplacementPolicy;

pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(seed: u64) -> Self {
        RandomPolicy {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    fn on_bind(&mut self, _frame: FrameId) {}

    fn select_victim(&mut self, occupied: &[FrameId]) -> FrameId {
        if occupied.is_empty() {
            panic!("victim selection with no occupied frames");
        }
        occupied[self.rng.gen_range(0..occupied.len())]
    }

    fn name(&self) -> &'static str {
        "rand"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_victims() {
        let occupied = [0, 1, 2, 3];
        let mut a = RandomPolicy::new(99);
        let mut b = RandomPolicy::new(99);

        for _ in 0..64 {
            assert_eq!(a.select_victim(&occupied), b.select_victim(&occupied));
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let occupied = [0, 1, 2, 3, 4, 5, 6, 7];
        let mut a = RandomPolicy::new(1);
        let mut b = RandomPolicy::new(2);

        let va: Vec<_> = (0..32).map(|_| a.select_victim(&occupied)).collect();
        let vb: Vec<_> = (0..32).map(|_| b.select_victim(&occupied)).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn test_victims_come_from_occupied_set() {
        let occupied = [3, 5, 9];
        let mut policy = RandomPolicy::new(7);
        for _ in 0..100 {
            assert!(occupied.contains(&policy.select_victim(&occupied)));
        }
    }

    #[test]
    #[should_panic(expected = "no occupied frames")]
    fn test_empty_occupied_set_is_fatal() {
        let mut policy = RandomPolicy::new(0);
        policy.select_victim(&[]);
    }
}
