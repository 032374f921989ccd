//! Multi-generation evolution controller.

use flapgen_engine::{
    BrainInit, FlightObserver, FlightOutcome, FlightParams, FlightView, FrameControl, Unobserved,
};
use rand::Rng;
use tracing::{debug, info};

use crate::{
    genetic::{Population, PopulationEvolver},
    stats::FitnessStats,
};

/// Everything that shapes an evolution run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainerConfig {
    pub population_size: usize,
    pub generations: usize,
    pub flight: FlightParams,
    pub brain_init: BrainInit,
    pub evolver: PopulationEvolver,
}

impl TrainerConfig {
    pub const DEFAULT: Self = Self {
        population_size: 20,
        generations: 20,
        flight: FlightParams::EVOLUTION,
        brain_init: BrainInit::EVOLUTION,
        evolver: PopulationEvolver::DEFAULT,
    };

    /// Checks the values that would make a run meaningless or panic.
    pub fn validate(&self) -> Result<(), TrainerConfigError> {
        let mutation = &self.evolver.mutation;
        if self.population_size == 0 {
            return Err(TrainerConfigError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(TrainerConfigError::NoGenerations);
        }
        if self.flight.max_frames == 0 {
            return Err(TrainerConfigError::NoFrames);
        }
        if self.evolver.tournament_size == 0 {
            return Err(TrainerConfigError::EmptyTournament);
        }
        if !(0.0..=1.0).contains(&mutation.rate) {
            return Err(TrainerConfigError::MutationRate {
                rate: mutation.rate,
            });
        }
        if mutation.strength.is_nan() || mutation.strength < 0.0 {
            return Err(TrainerConfigError::MutationStrength {
                strength: mutation.strength,
            });
        }
        if mutation.limit.is_nan() || mutation.limit <= 0.0 {
            return Err(TrainerConfigError::WeightLimit {
                limit: mutation.limit,
            });
        }
        Ok(())
    }
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, derive_more::Display, derive_more::Error)]
pub enum TrainerConfigError {
    #[display("population size must be at least 1")]
    EmptyPopulation,
    #[display("generation count must be at least 1")]
    NoGenerations,
    #[display("frame cap must be at least 1")]
    NoFrames,
    #[display("tournament size must be at least 1")]
    EmptyTournament,
    #[display("mutation rate {rate} is outside [0, 1]")]
    MutationRate { rate: f64 },
    #[display("mutation strength {strength} must not be negative")]
    MutationStrength { strength: f64 },
    #[display("weight limit {limit} must be positive")]
    WeightLimit { limit: f64 },
}

/// Where a run currently stands, as shown to observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvolutionStatus {
    /// Zero-based index of the generation being flown.
    pub generation: usize,
    pub generations: usize,
    /// Best fitness of all completed generations, `0.0` before the first.
    pub best_fitness: f64,
}

/// Result of one completed generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationSummary {
    /// Zero-based generation index.
    pub generation: usize,
    pub stats: FitnessStats,
    /// Birds still alive when the frame cap ended the flight.
    pub survivors: usize,
    pub frames: usize,
    /// Running best fitness including this generation.
    pub best_fitness: f64,
}

/// Receives progress from a [`Trainer`].
pub trait EvolutionObserver {
    /// Called at every frame boundary of the generation being flown.
    fn on_frame(&mut self, status: &EvolutionStatus, view: &FlightView<'_>) -> FrameControl;

    /// Called once a generation completed, before the next one is bred.
    fn on_generation(&mut self, summary: &GenerationSummary) {
        let _ = summary;
    }
}

impl EvolutionObserver for Unobserved {
    fn on_frame(&mut self, _status: &EvolutionStatus, _view: &FlightView<'_>) -> FrameControl {
        FrameControl::Continue
    }
}

/// Adapts an [`EvolutionObserver`] to the per-flight observer interface.
struct GenerationObserver<'a, O: ?Sized> {
    status: EvolutionStatus,
    inner: &'a mut O,
}

impl<O> FlightObserver for GenerationObserver<'_, O>
where
    O: EvolutionObserver + ?Sized,
{
    fn on_frame(&mut self, view: &FlightView<'_>) -> FrameControl {
        self.inner.on_frame(&self.status, view)
    }
}

/// Final state of a run.
#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    /// One entry per completed generation.
    pub history: Vec<GenerationSummary>,
    /// Best fitness ever reached, `0.0` if no generation completed.
    pub best_fitness: f64,
    /// Whether an observer stopped the run early.
    pub cancelled: bool,
    /// The last evaluated population, best first; a freshly bred one if the
    /// run was cancelled mid-generation.
    pub population: Population,
}

/// Runs the fixed number of generations of one evolution.
///
/// # Example
///
/// ```
/// use flapgen_engine::Unobserved;
/// use flapgen_training::trainer::{Trainer, TrainerConfig};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(3);
/// let config = TrainerConfig { generations: 3, ..TrainerConfig::DEFAULT };
/// let trainer = Trainer::new(config, &mut rng).unwrap();
///
/// let outcome = trainer.run(&mut rng, &mut Unobserved);
/// assert!(!outcome.cancelled);
/// assert_eq!(outcome.history.len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Trainer {
    config: TrainerConfig,
    population: Population,
    generation: usize,
    best_fitness: f64,
    history: Vec<GenerationSummary>,
}

impl Trainer {
    /// Validates `config` and draws the initial population.
    pub fn new<R>(config: TrainerConfig, rng: &mut R) -> Result<Self, TrainerConfigError>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        let population = Population::random(config.population_size, &config.brain_init, rng);
        Ok(Self {
            config,
            population,
            generation: 0,
            best_fitness: 0.0,
            history: vec![],
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TrainerConfig {
        &self.config
    }

    #[must_use]
    pub const fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub fn history(&self) -> &[GenerationSummary] {
        &self.history
    }

    #[must_use]
    pub const fn best_fitness(&self) -> f64 {
        self.best_fitness
    }

    #[must_use]
    pub const fn status(&self) -> EvolutionStatus {
        EvolutionStatus {
            generation: self.generation,
            generations: self.config.generations,
            best_fitness: self.best_fitness,
        }
    }

    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.generation >= self.config.generations
    }

    /// Flies the current generation and, unless it was the last one, breeds
    /// the next.
    ///
    /// Returns `None` if the observer quit during the flight or the run was
    /// already finished. A quit leaves the generation counter and the running
    /// best untouched.
    pub fn run_generation<R, O>(
        &mut self,
        rng: &mut R,
        observer: &mut O,
    ) -> Option<GenerationSummary>
    where
        R: Rng + ?Sized,
        O: EvolutionObserver + ?Sized,
    {
        if self.is_finished() {
            return None;
        }
        debug!(generation = self.generation, "generation started");

        let mut flight_observer = GenerationObserver {
            status: self.status(),
            inner: &mut *observer,
        };
        let outcome = self
            .population
            .evaluate_fitness(&self.config.flight, rng, &mut flight_observer);
        let report = match outcome {
            FlightOutcome::Completed(report) => report,
            FlightOutcome::Aborted { frame } => {
                debug!(generation = self.generation, frame, "generation cancelled");
                return None;
            }
        };

        let stats = self.population.compute_fitness_stats()?;
        self.best_fitness = self.best_fitness.max(stats.max);
        let summary = GenerationSummary {
            generation: self.generation,
            stats,
            survivors: report.survivors(),
            frames: report.frames(),
            best_fitness: self.best_fitness,
        };
        info!(
            generation = summary.generation,
            best = summary.stats.max,
            mean = summary.stats.mean,
            worst = summary.stats.min,
            survivors = summary.survivors,
            best_ever = summary.best_fitness,
            "generation complete"
        );
        self.history.push(summary);
        observer.on_generation(&summary);

        self.generation += 1;
        if !self.is_finished() {
            self.population = self.config.evolver.evolve(&self.population, rng);
        }
        Some(summary)
    }

    /// Runs every remaining generation, stopping early if the observer quits.
    pub fn run<R, O>(mut self, rng: &mut R, observer: &mut O) -> EvolutionOutcome
    where
        R: Rng + ?Sized,
        O: EvolutionObserver + ?Sized,
    {
        let mut cancelled = false;
        while !self.is_finished() {
            if self.run_generation(rng, observer).is_none() {
                cancelled = true;
                break;
            }
        }
        if cancelled {
            info!(
                completed = self.history.len(),
                best_ever = self.best_fitness,
                "evolution cancelled"
            );
        } else {
            info!(best_ever = self.best_fitness, "evolution finished");
        }
        EvolutionOutcome {
            history: self.history,
            best_fitness: self.best_fitness,
            cancelled,
            population: self.population,
        }
    }
}
