//! Point mutation of brain parameters.

use flapgen_engine::Brain;
use rand::Rng;

/// Controls how a child's brain is perturbed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MutationParams {
    /// Probability that a single weight (or the bias) is perturbed.
    pub rate: f64,
    /// Perturbations are drawn uniformly from `[-strength, strength]`.
    pub strength: f64,
    /// Every parameter is clamped to `[-limit, limit]` after mutation.
    pub limit: f64,
}

impl MutationParams {
    pub const DEFAULT: Self = Self {
        rate: 0.15,
        strength: 0.3,
        limit: 3.0,
    };
}

impl Default for MutationParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Returns a mutated copy of `brain`.
///
/// Each of the four weights and the bias is independently offset by
/// `U(-strength, strength)` with probability `rate`. All five parameters are
/// then clamped to `[-limit, limit]`, including the ones left untouched.
///
/// # Example
///
/// ```
/// use flapgen_engine::Brain;
/// use flapgen_training::mutation::{self, MutationParams};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let never = MutationParams { rate: 0.0, ..MutationParams::DEFAULT };
///
/// let parent = Brain::new([1.0, -1.0, 0.5, 2.0], 0.25);
/// assert_eq!(mutation::mutate(&parent, &never, &mut rng), parent);
/// ```
#[must_use]
pub fn mutate<R>(brain: &Brain, params: &MutationParams, rng: &mut R) -> Brain
where
    R: Rng + ?Sized,
{
    let mut child = *brain;
    for gene in child.genes_mut() {
        if rng.random_bool(params.rate) {
            *gene += rng.random_range(-params.strength..=params.strength);
        }
        *gene = gene.clamp(-params.limit, params.limit);
    }
    child
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_parent_is_untouched() {
        let mut rng = Pcg32::seed_from_u64(1);
        let always = MutationParams {
            rate: 1.0,
            ..MutationParams::DEFAULT
        };
        let parent = Brain::new([0.1, 0.2, 0.3, 0.4], 0.5);
        let copy = parent;
        let _child = mutate(&parent, &always, &mut rng);
        assert_eq!(parent, copy);
    }

    #[test]
    fn test_offsets_stay_within_strength() {
        let mut rng = Pcg32::seed_from_u64(2);
        let always = MutationParams {
            rate: 1.0,
            ..MutationParams::DEFAULT
        };
        let parent = Brain::new([0.0, 1.0, -1.0, 2.0], -0.5);
        for _ in 0..500 {
            let child = mutate(&parent, &always, &mut rng);
            for (before, after) in parent.genes().zip(child.genes()) {
                assert!((after - before).abs() <= 0.3 + 1e-12);
            }
        }
    }

    #[test]
    #[expect(clippy::cast_precision_loss)]
    fn test_mutation_rate_is_respected() {
        let mut rng = Pcg32::seed_from_u64(3);
        let parent = Brain::ZERO;
        let mut changed = 0_usize;
        let total = 20_000_usize;
        for _ in 0..total / 5 {
            let child = mutate(&parent, &MutationParams::DEFAULT, &mut rng);
            changed += child.genes().filter(|&gene| gene != 0.0).count();
        }
        let ratio = changed as f64 / total as f64;
        assert!((0.13..0.17).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_genes_are_clamped() {
        let mut rng = Pcg32::seed_from_u64(4);
        let never = MutationParams {
            rate: 0.0,
            ..MutationParams::DEFAULT
        };
        let wild = Brain::new([5.0, -4.0, 2.9, -3.5], 10.0);
        let child = mutate(&wild, &never, &mut rng);
        assert_eq!(child.weights(), &[3.0, -3.0, 2.9, -3.0]);
        assert_eq!(child.bias(), 3.0);

        let always = MutationParams {
            rate: 1.0,
            ..MutationParams::DEFAULT
        };
        let edge = Brain::new([3.0; 4], -3.0);
        for _ in 0..200 {
            let child = mutate(&edge, &always, &mut rng);
            assert!(child.genes().all(|gene| gene.abs() <= 3.0));
        }
    }
}
