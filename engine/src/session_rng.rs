use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed-retaining RNG handle. All engine randomness flows through an
/// injected `SessionRng`, so any game can be replayed from its seed.
pub struct SessionRng {
    rng: StdRng,
    seed: u64,
}

impl SessionRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            seed,
        }
    }

    pub fn from_random() -> Self {
        let seed: u64 = rand::rng().random();
        Self::new(seed)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn random_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distr::uniform::SampleUniform,
        R: rand::distr::uniform::SampleRange<T>,
    {
        self.rng.random_range(range)
    }

    /// Fisher–Yates shuffle in place.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.random_range(0..=i);
            items.swap(i, j);
        }
    }

    /// Uniform draw from a slice; `None` only for an empty slice.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let idx = self.random_range(0..items.len());
        Some(&items[idx])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SessionRng::new(7);
        let mut b = SessionRng::new(7);
        for _ in 0..100 {
            let x: u32 = a.random_range(0..1000);
            let y: u32 = b.random_range(0..1000);
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = SessionRng::new(42);
        let mut items: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut items);
        let mut sorted = items.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..20).collect::<Vec<u32>>());
    }

    #[test]
    fn test_pick_empty_slice() {
        let mut rng = SessionRng::new(1);
        let items: [u32; 0] = [];
        assert!(rng.pick(&items).is_none());
    }

    #[test]
    fn test_pick_in_bounds() {
        let mut rng = SessionRng::new(3);
        let items = [10, 20, 30];
        for _ in 0..50 {
            let v = *rng.pick(&items).unwrap();
            assert!(items.contains(&v));
        }
    }
}
