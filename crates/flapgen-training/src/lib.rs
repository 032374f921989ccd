//! Neuro-evolution of flapgen bird brains.
//!
//! # How Training Works
//!
//! 1. **Population** - create individuals, each with a random [`Brain`](flapgen_engine::Brain)
//! 2. **Flight** - every individual flies one bird over a shared course until
//!    all birds are dead or the frame cap is reached
//! 3. **Fitness** - each bird's score plus a bonus per frame survived
//! 4. **Selection** - elites survive unchanged, the rest are tournament winners
//! 5. **Mutation** - winners' brains are copied and perturbed
//! 6. **Repeat** - for a fixed number of generations
//!
//! # Modules
//!
//! - [`genetic`] - [`Population`](genetic::Population),
//!   [`Individual`](genetic::Individual) and
//!   [`PopulationEvolver`](genetic::PopulationEvolver)
//! - [`mutation`] - point mutation with clamping
//! - [`stats`] - fitness statistics per generation
//! - [`trainer`] - the [`Trainer`](trainer::Trainer) running a whole evolution
//!   and reporting to an [`EvolutionObserver`](trainer::EvolutionObserver)
//!
//! Everything is single-threaded and draws randomness from one caller-owned
//! generator, so a seeded run is reproducible.

pub mod genetic;
pub mod mutation;
pub mod stats;
pub mod trainer;
