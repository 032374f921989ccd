use std::iter;

use rand::Rng;

use crate::core::{Pipe, Position};

/// Number of sensor inputs feeding a [`Brain`].
pub const INPUT_COUNT: usize = 4;

/// Pipes whose left edge is at most this far behind the bird are still targeted.
const LOOKBEHIND: f64 = 50.0;

const HEIGHT_SCALE: f64 = 600.0;
const VELOCITY_SCALE: f64 = 10.0;
const DISTANCE_SCALE: f64 = 400.0;

/// The weighted sum is clamped to this magnitude before the logistic function.
const ACTIVATION_LIMIT: f64 = 500.0;

/// Normalized view of the world from one bird's point of view.
///
/// Order is significant and matches [`Brain::weights`]:
///
/// 1. own height, `y / 600`
/// 2. own velocity, `velocity / 10`
/// 3. horizontal distance to the target pipe, `(pipe.x - x) / 400`
/// 4. centre of the target pipe's gap, `centre / 600`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sensors([f64; INPUT_COUNT]);

impl Sensors {
    /// Reads the sensors for a bird at `position` moving at `velocity`.
    ///
    /// Returns `None` when there is no pipe at all.
    #[must_use]
    pub fn observe(position: Position, velocity: f64, pipes: &[Pipe]) -> Option<Self> {
        let pipe = target_pipe(position.x, pipes)?;
        Some(Self([
            position.y / HEIGHT_SCALE,
            velocity / VELOCITY_SCALE,
            (pipe.x() - position.x) / DISTANCE_SCALE,
            pipe.gap().center() / HEIGHT_SCALE,
        ]))
    }

    #[must_use]
    pub const fn from_array(inputs: [f64; INPUT_COUNT]) -> Self {
        Self(inputs)
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; INPUT_COUNT] {
        &self.0
    }
}

/// Selects the pipe a bird at `bird_x` reacts to.
///
/// Among the pipes whose left edge is less than 50 units behind the bird, the
/// one horizontally closest wins (the earliest in list order on ties). If no
/// pipe qualifies, the first pipe of the list is used whatever its position.
#[must_use]
pub fn target_pipe(bird_x: f64, pipes: &[Pipe]) -> Option<&Pipe> {
    let mut closest: Option<(&Pipe, f64)> = None;
    for pipe in pipes.iter().filter(|pipe| pipe.x() > bird_x - LOOKBEHIND) {
        let distance = (pipe.x() - bird_x).abs();
        if closest.is_none_or(|(_, min)| distance < min) {
            closest = Some((pipe, distance));
        }
    }
    closest.map(|(pipe, _)| pipe).or_else(|| pipes.first())
}

/// Logistic function with the argument clamped to `[-500, 500]`.
#[must_use]
pub fn sigmoid(raw: f64) -> f64 {
    let raw = raw.clamp(-ACTIVATION_LIMIT, ACTIVATION_LIMIT);
    1.0 / (1.0 + (-raw).exp())
}

/// Symmetric ranges for drawing a fresh random brain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrainInit {
    /// Weights are drawn from `[-weight_range, weight_range]`.
    pub weight_range: f64,
    /// The bias is drawn from `[-bias_range, bias_range]`.
    pub bias_range: f64,
}

impl BrainInit {
    /// Initial population of an evolution run.
    pub const EVOLUTION: Self = Self {
        weight_range: 2.0,
        bias_range: 1.0,
    };

    /// AI opponents of a versus match.
    pub const VERSUS: Self = Self {
        weight_range: 1.5,
        bias_range: 0.5,
    };
}

/// Parameters of a bird's decision function: `sigmoid(bias + Σ wᵢ·xᵢ) > 0.5`.
///
/// Brains are plain values; copying a parent's brain into a child never
/// shares state.
///
/// # Example
///
/// ```
/// use flapgen_engine::{Brain, Sensors};
///
/// let sensors = Sensors::from_array([0.5, 0.1, 0.25, 0.5]);
///
/// // sigmoid(0) is exactly 0.5, which is not enough to flap
/// assert!(!Brain::ZERO.decide_from(&sensors));
///
/// let eager = Brain::new([0.0; 4], 1.0);
/// assert!(eager.decide_from(&sensors));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Brain {
    weights: [f64; INPUT_COUNT],
    bias: f64,
}

impl Brain {
    /// A brain that never flaps.
    pub const ZERO: Self = Self::new([0.0; INPUT_COUNT], 0.0);

    #[must_use]
    pub const fn new(weights: [f64; INPUT_COUNT], bias: f64) -> Self {
        Self { weights, bias }
    }

    /// Draws every weight and the bias uniformly from the ranges in `init`.
    pub fn random<R>(rng: &mut R, init: &BrainInit) -> Self
    where
        R: Rng + ?Sized,
    {
        let weights = [(); INPUT_COUNT]
            .map(|()| rng.random_range(-init.weight_range..=init.weight_range));
        let bias = rng.random_range(-init.bias_range..=init.bias_range);
        Self { weights, bias }
    }

    #[must_use]
    pub const fn weights(&self) -> &[f64; INPUT_COUNT] {
        &self.weights
    }

    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    /// Iterates over all parameters: the weights in input order, then the bias.
    pub fn genes(&self) -> impl Iterator<Item = f64> + '_ {
        self.weights.iter().copied().chain(iter::once(self.bias))
    }

    /// Mutable counterpart of [`Brain::genes`].
    pub fn genes_mut(&mut self) -> impl Iterator<Item = &mut f64> + '_ {
        self.weights.iter_mut().chain(iter::once(&mut self.bias))
    }

    /// Output of the logistic unit for the given sensor readings.
    #[must_use]
    pub fn activation(&self, sensors: &Sensors) -> f64 {
        let raw = iter::zip(&self.weights, sensors.as_array())
            .fold(self.bias, |acc, (w, x)| acc + w * x);
        sigmoid(raw)
    }

    /// Flap decision for already computed sensor readings.
    #[must_use]
    pub fn decide_from(&self, sensors: &Sensors) -> bool {
        self.activation(sensors) > 0.5
    }

    /// Flap decision for a bird at `position` moving at `velocity`.
    ///
    /// Without any pipe there is nothing to react to and the answer is no.
    #[must_use]
    pub fn decide(&self, position: Position, velocity: f64, pipes: &[Pipe]) -> bool {
        Sensors::observe(position, velocity, pipes).is_some_and(|sensors| self.decide_from(&sensors))
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::Gap;

    fn pipe(x: f64, center: f64) -> Pipe {
        Pipe::new(x, 80.0, Gap::around(center, 200.0))
    }

    mod targeting {
        use super::*;

        #[test]
        fn test_picks_closest_ahead() {
            let pipes = [pipe(400.0, 200.0), pipe(180.0, 300.0), pipe(600.0, 400.0)];
            let target = target_pipe(100.0, &pipes).unwrap();
            assert_eq!(target.x(), 180.0);
        }

        #[test]
        fn test_keeps_pipe_slightly_behind() {
            // left edge 40 units behind the bird is still the target
            let pipes = [pipe(60.0, 200.0), pipe(260.0, 300.0)];
            let target = target_pipe(100.0, &pipes).unwrap();
            assert_eq!(target.x(), 60.0);
        }

        #[test]
        fn test_ignores_pipe_far_behind() {
            let pipes = [pipe(50.0, 200.0), pipe(250.0, 300.0)];
            let target = target_pipe(100.0, &pipes).unwrap();
            assert_eq!(target.x(), 250.0);
        }

        #[test]
        fn test_tie_prefers_list_order() {
            let pipes = [pipe(150.0, 200.0), pipe(70.0, 300.0)];
            let target = target_pipe(110.0, &pipes).unwrap();
            assert_eq!(target.gap().center(), 200.0);
        }

        #[test]
        fn test_falls_back_to_first_pipe() {
            let pipes = [pipe(-60.0, 200.0), pipe(-20.0, 300.0)];
            let target = target_pipe(100.0, &pipes).unwrap();
            assert_eq!(target.x(), -60.0);
        }

        #[test]
        fn test_no_pipes() {
            assert!(target_pipe(100.0, &[]).is_none());
        }
    }

    #[test]
    fn test_sensor_normalization() {
        let pipes = [pipe(300.0, 360.0)];
        let sensors = Sensors::observe(Position::new(100.0, 300.0), -5.0, &pipes).unwrap();
        assert_eq!(sensors.as_array(), &[0.5, -0.5, 0.5, 0.6]);
    }

    #[test]
    fn test_zero_brain_never_flaps() {
        let mut rng = Pcg32::seed_from_u64(1);
        for _ in 0..200 {
            let inputs = [(); INPUT_COUNT].map(|()| rng.random_range(-10.0..10.0));
            assert!(!Brain::ZERO.decide_from(&Sensors::from_array(inputs)));
        }
    }

    #[test]
    fn test_activation_matches_formula() {
        let brain = Brain::new([1.0, -2.0, 0.5, 3.0], -0.25);
        let sensors = Sensors::from_array([0.5, 0.1, -0.4, 0.2]);
        // -0.25 + 0.5 - 0.2 - 0.2 + 0.6 = 0.45
        let expected = 1.0 / (1.0 + (-0.45_f64).exp());
        assert!((brain.activation(&sensors) - expected).abs() < 1e-12);
        assert!(brain.decide_from(&sensors));
    }

    #[test]
    fn test_extreme_sums_saturate() {
        let huge = Brain::new([1e6; INPUT_COUNT], 0.0);
        let sensors = Sensors::from_array([1.0; INPUT_COUNT]);
        let activation = huge.activation(&sensors);
        assert!(activation.is_finite());
        assert!(huge.decide_from(&sensors));

        let sensors = Sensors::from_array([-1.0; INPUT_COUNT]);
        let activation = huge.activation(&sensors);
        assert!(activation.is_finite());
        assert!(activation >= 0.0);
        assert!(!huge.decide_from(&sensors));
    }

    #[test]
    fn test_decision_is_deterministic() {
        let mut rng = Pcg32::seed_from_u64(99);
        let pipes = [pipe(400.0, 250.0), pipe(600.0, 350.0)];
        for _ in 0..100 {
            let brain = Brain::random(&mut rng, &BrainInit::EVOLUTION);
            let position = Position::new(100.0, rng.random_range(0.0..580.0));
            let velocity = rng.random_range(-7.0..10.0);
            let first = brain.decide(position, velocity, &pipes);
            for _ in 0..5 {
                assert_eq!(brain.decide(position, velocity, &pipes), first);
            }
        }
    }

    #[test]
    fn test_no_pipes_means_no_flap() {
        let eager = Brain::new([0.0; INPUT_COUNT], 3.0);
        assert!(!eager.decide(Position::new(100.0, 300.0), 0.0, &[]));
    }

    #[test]
    fn test_random_respects_init_ranges() {
        let mut rng = Pcg32::seed_from_u64(3);
        for init in [BrainInit::EVOLUTION, BrainInit::VERSUS] {
            for _ in 0..500 {
                let brain = Brain::random(&mut rng, &init);
                assert!(brain.weights().iter().all(|w| w.abs() <= init.weight_range));
                assert!(brain.bias().abs() <= init.bias_range);
            }
        }
    }

    #[test]
    fn test_genes_order() {
        let mut brain = Brain::new([1.0, 2.0, 3.0, 4.0], 5.0);
        assert_eq!(brain.genes().collect::<Vec<_>>(), [1.0, 2.0, 3.0, 4.0, 5.0]);
        for gene in brain.genes_mut() {
            *gene *= -1.0;
        }
        assert_eq!(brain.weights(), &[-1.0, -2.0, -3.0, -4.0]);
        assert_eq!(brain.bias(), -5.0);
    }
}
