//! Seeded pseudo-random source behind every synthetic dataset.
//!
//! The generator is an explicit object constructed from a seed rather than a
//! process-wide source, so determinism is testable in isolation. The only
//! correctness property that matters: re-seeding with the same value must
//! reproduce an identical draw sequence. Callers therefore must not reorder
//! draws without treating it as a breaking change to the generated fixtures.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub struct Sampler {
    rng: StdRng,
}

impl Sampler {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Uniform draw over the half-open range `[low, high)`
    pub fn uniform(&mut self, low: f64, high: f64) -> f64 {
        self.rng.gen_range(low..high)
    }

    /// Integer draw, inclusive on both ends
    pub fn randint(&mut self, low: i64, high: i64) -> i64 {
        self.rng.gen_range(low..=high)
    }

    /// Weighted categorical draw over a fixed label set.
    ///
    /// Consumes exactly one uniform draw regardless of the number of labels,
    /// so adding a label does not shift the sequence of later draws.
    pub fn choice<'a, T>(&mut self, labels: &'a [T], weights: &[f64]) -> &'a T {
        debug_assert_eq!(labels.len(), weights.len());
        let total: f64 = weights.iter().sum();
        let mut x = self.uniform(0.0, total);
        for (label, weight) in labels.iter().zip(weights) {
            if x < *weight {
                return label;
            }
            x -= weight;
        }
        labels.last().expect("choice over an empty label set")
    }

    /// Unweighted choice, one `randint` draw
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.randint(0, items.len() as i64 - 1) as usize;
        &items[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_reproduces_the_draw_sequence() {
        let mut a = Sampler::new(42);
        let mut b = Sampler::new(42);
        for _ in 0..1000 {
            assert_eq!(a.uniform(0.0, 1.0), b.uniform(0.0, 1.0));
            assert_eq!(a.randint(1, 28), b.randint(1, 28));
        }
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Sampler::new(42);
        let mut b = Sampler::new(43);
        let a_draws: Vec<f64> = (0..10).map(|_| a.uniform(0.0, 1.0)).collect();
        let b_draws: Vec<f64> = (0..10).map(|_| b.uniform(0.0, 1.0)).collect();
        assert_ne!(a_draws, b_draws);
    }

    #[test]
    fn uniform_stays_in_range() {
        let mut sampler = Sampler::new(7);
        for _ in 0..1000 {
            let v = sampler.uniform(0.85, 1.15);
            assert!((0.85..1.15).contains(&v));
        }
    }

    #[test]
    fn randint_is_inclusive_on_both_ends() {
        let mut sampler = Sampler::new(7);
        let mut seen_low = false;
        let mut seen_high = false;
        for _ in 0..1000 {
            let v = sampler.randint(1, 3);
            assert!((1..=3).contains(&v));
            seen_low |= v == 1;
            seen_high |= v == 3;
        }
        assert!(seen_low && seen_high);
    }

    #[test]
    fn weighted_choice_converges_to_the_declared_weights() {
        let labels = ["NEW", "REGULAR", "VIP", "SENSITIVE"];
        let weights = [0.22, 0.38, 0.35, 0.05];
        let mut sampler = Sampler::new(42);

        let mut counts = [0usize; 4];
        let draws = 20_000;
        for _ in 0..draws {
            let label = sampler.choice(&labels, &weights);
            let idx = labels.iter().position(|l| l == label).unwrap();
            counts[idx] += 1;
        }

        for (count, weight) in counts.iter().zip(weights) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - weight).abs() < 0.02,
                "observed {} for weight {}",
                observed,
                weight
            );
        }
    }

    #[test]
    fn pick_covers_all_items() {
        let items = ["a", "b", "c"];
        let mut sampler = Sampler::new(1);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let item = sampler.pick(&items);
            seen[items.iter().position(|i| i == item).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
