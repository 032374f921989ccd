//! Genetic algorithm over bird brains.
//!
//! A generation is one [`Flight`]: every individual's brain flies a bird over
//! the same course, and the bird's fitness becomes the individual's fitness.
//! The next generation is then built by [`PopulationEvolver`]:
//!
//! 1. **Ranking** - individuals are sorted by fitness, best first (stable)
//! 2. **Elitism** - the best `elite_count` brains are copied unchanged
//! 3. **Tournament selection** - each remaining slot picks `tournament_size`
//!    distinct individuals at random and takes the fittest one
//! 4. **Mutation** - the winner's brain is copied and mutated
//!    (see [`mutation`](crate::mutation))
//!
//! There is no crossover; every child has exactly one parent.
//!
//! # Example
//!
//! ```
//! use flapgen_engine::{BrainInit, FlightParams, Unobserved};
//! use flapgen_training::genetic::{Population, PopulationEvolver};
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//!
//! let mut rng = Pcg32::seed_from_u64(1);
//! let mut population = Population::random(10, &BrainInit::EVOLUTION, &mut rng);
//!
//! let outcome = population.evaluate_fitness(&FlightParams::EVOLUTION, &mut rng, &mut Unobserved);
//! assert!(outcome.is_completed());
//!
//! let next = PopulationEvolver::DEFAULT.evolve(&population, &mut rng);
//! assert_eq!(next.len(), 10);
//! ```

use flapgen_engine::{Brain, BrainInit, Flight, FlightObserver, FlightOutcome, FlightParams};
use rand::{Rng, seq::IndexedRandom as _};

use crate::{
    mutation::{self, MutationParams},
    stats::FitnessStats,
};

/// A candidate brain and the fitness it earned in its last flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Individual {
    brain: Brain,
    fitness: f64,
}

impl Individual {
    /// Wraps a brain that has not flown yet.
    #[must_use]
    pub const fn new(brain: Brain) -> Self {
        Self {
            brain,
            fitness: 0.0,
        }
    }

    pub fn random<R>(rng: &mut R, init: &BrainInit) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::new(Brain::random(rng, init))
    }

    #[must_use]
    pub const fn brain(&self) -> &Brain {
        &self.brain
    }

    /// Fitness from the last evaluation, `0.0` before the first one.
    #[must_use]
    pub const fn fitness(&self) -> f64 {
        self.fitness
    }
}

/// The individuals of one generation.
#[derive(Debug, Clone, Default)]
pub struct Population {
    individuals: Vec<Individual>,
}

impl Population {
    /// Creates `count` individuals with fresh random brains.
    pub fn random<R>(count: usize, init: &BrainInit, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let individuals = (0..count).map(|_| Individual::random(rng, init)).collect();
        Self { individuals }
    }

    pub fn from_brains<I>(brains: I) -> Self
    where
        I: IntoIterator<Item = Brain>,
    {
        Self {
            individuals: brains.into_iter().map(Individual::new).collect(),
        }
    }

    #[must_use]
    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    /// Flies one bird per individual and records each bird's fitness.
    ///
    /// After a completed flight the individuals are sorted by fitness,
    /// best first. If the observer aborts the flight, fitness values and
    /// order are left as they were.
    pub fn evaluate_fitness<R, O>(
        &mut self,
        params: &FlightParams,
        rng: &mut R,
        observer: &mut O,
    ) -> FlightOutcome
    where
        R: Rng + ?Sized,
        O: FlightObserver + ?Sized,
    {
        let flight = Flight::new(self.individuals.iter().map(|ind| ind.brain), *params, rng);
        let outcome = flight.run(rng, observer);
        if let FlightOutcome::Completed(report) = &outcome {
            for (ind, fitness) in self.individuals.iter_mut().zip(report.fitness()) {
                ind.fitness = fitness;
            }
            rank(&mut self.individuals);
        }
        outcome
    }

    /// Statistics over the individuals' fitness. `None` for an empty population.
    #[must_use]
    pub fn compute_fitness_stats(&self) -> Option<FitnessStats> {
        FitnessStats::new(self.individuals.iter().map(Individual::fitness))
    }
}

/// Parameters that turn one generation into the next.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationEvolver {
    /// Number of top brains copied unchanged. Capped at the population size.
    pub elite_count: usize,
    /// Individuals drawn per tournament. Capped at the population size.
    pub tournament_size: usize,
    pub mutation: MutationParams,
}

impl PopulationEvolver {
    pub const DEFAULT: Self = Self {
        elite_count: 3,
        tournament_size: 3,
        mutation: MutationParams::DEFAULT,
    };

    /// Builds the next generation. It always has the same size as `population`.
    ///
    /// Children start with a fitness of `0.0`, elites included.
    #[must_use]
    pub fn evolve<R>(&self, population: &Population, rng: &mut R) -> Population
    where
        R: Rng + ?Sized,
    {
        let mut ranked = population.individuals.clone();
        rank(&mut ranked);

        let size = ranked.len();
        let elite_count = self.elite_count.min(size);
        let tournament_size = self.tournament_size.min(size);

        let mut next_individuals = Vec::with_capacity(size);
        next_individuals.extend(ranked[..elite_count].iter().map(|ind| Individual::new(ind.brain)));

        while next_individuals.len() < size {
            let Some(parent) = tournament_select(&ranked, tournament_size, rng) else {
                break;
            };
            let child = mutation::mutate(&parent.brain, &self.mutation, rng);
            next_individuals.push(Individual::new(child));
        }

        Population {
            individuals: next_individuals,
        }
    }
}

impl Default for PopulationEvolver {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Stable sort, best fitness first.
fn rank(individuals: &mut [Individual]) {
    individuals.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));
}

/// Draws `tournament_size` distinct individuals and returns the fittest.
///
/// Returns `None` if `population` is empty or `tournament_size` is zero.
fn tournament_select<'a, R>(
    population: &'a [Individual],
    tournament_size: usize,
    rng: &mut R,
) -> Option<&'a Individual>
where
    R: Rng + ?Sized,
{
    population
        .choose_multiple(rng, tournament_size)
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    fn scored(fitness: &[f64]) -> Population {
        #[expect(clippy::cast_precision_loss)]
        let individuals = fitness
            .iter()
            .enumerate()
            .map(|(i, &fitness)| Individual {
                brain: Brain::new([i as f64 / 10.0; 4], 0.0),
                fitness,
            })
            .collect();
        Population { individuals }
    }

    #[test]
    fn test_rank_is_stable_and_descending() {
        let mut individuals = scored(&[1.0, 5.0, 3.0, 5.0]).individuals;
        rank(&mut individuals);
        let order: Vec<_> = individuals.iter().map(|ind| ind.brain.weights()[0]).collect();
        assert_eq!(order, [0.1, 0.3, 0.2, 0.0]);
    }

    #[test]
    fn test_tournament_of_whole_population_picks_best() {
        let mut rng = Pcg32::seed_from_u64(1);
        let population = scored(&[1.0, 9.0, 3.0]);
        for _ in 0..20 {
            let winner = tournament_select(&population.individuals, 3, &mut rng).unwrap();
            assert_eq!(winner.fitness, 9.0);
        }
    }

    #[test]
    fn test_tournament_never_picks_worst_with_two_entrants() {
        let mut rng = Pcg32::seed_from_u64(2);
        let population = scored(&[1.0, 2.0, 3.0, 4.0]);
        for _ in 0..200 {
            let winner = tournament_select(&population.individuals, 2, &mut rng).unwrap();
            assert!(winner.fitness > 1.0);
        }
    }

    #[test]
    fn test_tournament_on_empty_population() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(tournament_select(&[], 3, &mut rng).is_none());
    }

    #[test]
    fn test_evolve_keeps_elites_first() {
        let mut rng = Pcg32::seed_from_u64(4);
        let population = scored(&[2.0, 8.0, 1.0, 9.0, 5.0, 3.0, 7.0]);
        let next = PopulationEvolver::DEFAULT.evolve(&population, &mut rng);

        assert_eq!(next.len(), 7);
        let elites: Vec<_> = next.individuals()[..3]
            .iter()
            .map(|ind| *ind.brain())
            .collect();
        let expected: Vec<_> = [3, 1, 6]
            .iter()
            .map(|&i| population.individuals()[i].brain)
            .collect();
        assert_eq!(elites, expected);
        assert!(next.individuals().iter().all(|ind| ind.fitness() == 0.0));
    }

    #[test]
    fn test_evolve_small_populations() {
        let mut rng = Pcg32::seed_from_u64(5);
        for size in 0..=4_u32 {
            let fitness: Vec<_> = (0..size).map(f64::from).collect();
            let population = scored(&fitness);
            let next = PopulationEvolver::DEFAULT.evolve(&population, &mut rng);
            assert_eq!(next.len(), population.len());
        }
    }

    #[test]
    fn test_children_descend_from_tournament_winners() {
        let mut rng = Pcg32::seed_from_u64(6);
        let evolver = PopulationEvolver {
            elite_count: 0,
            tournament_size: 4,
            mutation: MutationParams {
                rate: 0.0,
                ..MutationParams::DEFAULT
            },
        };
        let population = scored(&[4.0, 1.0, 6.0, 2.0]);
        let next = evolver.evolve(&population, &mut rng);
        let best = population.individuals()[2].brain;
        assert!(next.individuals().iter().all(|ind| ind.brain == best));
    }

    #[test]
    fn test_evaluate_fitness_sorts_population() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut population = Population::random(12, &BrainInit::EVOLUTION, &mut rng);
        let outcome = population.evaluate_fitness(
            &FlightParams::EVOLUTION,
            &mut rng,
            &mut flapgen_engine::Unobserved,
        );
        assert!(outcome.is_completed());
        assert!(
            population
                .individuals()
                .is_sorted_by(|a, b| a.fitness() >= b.fitness())
        );
        assert!(population.individuals().iter().all(|ind| ind.fitness() > 0.0));
        let stats = population.compute_fitness_stats().unwrap();
        assert_eq!(stats.max, population.individuals()[0].fitness());
    }

    #[test]
    fn test_aborted_evaluation_leaves_fitness_alone() {
        let mut rng = Pcg32::seed_from_u64(8);
        let mut population = Population::from_brains([Brain::ZERO; 5]);
        let mut quit = |_: &flapgen_engine::FlightView<'_>| flapgen_engine::FrameControl::Quit;
        let outcome = population.evaluate_fitness(&FlightParams::EVOLUTION, &mut rng, &mut quit);
        assert!(outcome.is_aborted());
        assert!(population.individuals().iter().all(|ind| ind.fitness() == 0.0));
    }
}
