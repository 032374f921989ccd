//! Fitness of a bird: points earned plus a small reward per frame survived.
//!
//! The survival term breaks ties between birds with equal scores, so staying
//! alive longer always ranks strictly higher.
//!
//! ```
//! use flapgen_engine::fitness;
//!
//! assert_eq!(fitness::evaluate(0, 0), 0.0);
//! assert_eq!(fitness::evaluate(10, 20), 12.0);
//! ```

/// Fitness awarded per frame survived.
pub const SURVIVAL_WEIGHT: f64 = 0.1;

/// Computes `score + frames_survived * 0.1`.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn evaluate(score: u32, frames_survived: usize) -> f64 {
    f64::from(score) + frames_survived as f64 * SURVIVAL_WEIGHT
}
