use chrono::{DateTime, Utc};
use flapgen_training::trainer::{EvolutionOutcome, GenerationSummary, TrainerConfig};
use serde::{Deserialize, Serialize};

/// Summary of an evolution run, written by `flapgen evolve --output`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvolutionReport {
    pub finished_at: DateTime<Utc>,
    /// `None` when the generator was seeded from the OS.
    pub seed: Option<u64>,
    pub population_size: usize,
    pub generations: usize,
    pub max_frames: usize,
    pub cancelled: bool,
    pub best_fitness: f64,
    pub history: Vec<GenerationRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRecord {
    pub generation: usize,
    pub best: f64,
    pub mean: f64,
    pub median: f64,
    pub worst: f64,
    pub survivors: usize,
    pub frames: usize,
    pub best_ever: f64,
}

impl From<&GenerationSummary> for GenerationRecord {
    fn from(summary: &GenerationSummary) -> Self {
        Self {
            generation: summary.generation,
            best: summary.stats.max,
            mean: summary.stats.mean,
            median: summary.stats.median,
            worst: summary.stats.min,
            survivors: summary.survivors,
            frames: summary.frames,
            best_ever: summary.best_fitness,
        }
    }
}

impl EvolutionReport {
    pub fn new(
        config: &TrainerConfig,
        seed: Option<u64>,
        outcome: &EvolutionOutcome,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            finished_at,
            seed,
            population_size: config.population_size,
            generations: config.generations,
            max_frames: config.flight.max_frames,
            cancelled: outcome.cancelled,
            best_fitness: outcome.best_fitness,
            history: outcome.history.iter().map(GenerationRecord::from).collect(),
        }
    }
}
