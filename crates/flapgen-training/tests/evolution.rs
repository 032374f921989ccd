use flapgen_engine::{Brain, BrainInit, FlightParams, FlightView, FrameControl, Unobserved};
use flapgen_training::{
    genetic::{Population, PopulationEvolver},
    trainer::{EvolutionObserver, EvolutionStatus, GenerationSummary, Trainer, TrainerConfig},
};
use rand::SeedableRng as _;
use rand_pcg::Pcg32;

fn run(config: TrainerConfig, seed: u64) -> flapgen_training::trainer::EvolutionOutcome {
    let mut rng = Pcg32::seed_from_u64(seed);
    let trainer = Trainer::new(config, &mut rng).unwrap();
    trainer.run(&mut rng, &mut Unobserved)
}

#[test]
fn test_default_run_is_reproducible() {
    let first = run(TrainerConfig::DEFAULT, 2024);
    let second = run(TrainerConfig::DEFAULT, 2024);

    assert!(!first.cancelled);
    assert_eq!(first.history.len(), 20);
    assert_eq!(first.history, second.history);
    assert_eq!(first.best_fitness, second.best_fitness);
    assert!(first.best_fitness > 0.0);
}

#[test]
fn test_population_size_is_preserved() {
    for size in [1, 2, 3, 5, 20] {
        let config = TrainerConfig {
            population_size: size,
            generations: 3,
            ..TrainerConfig::DEFAULT
        };
        let outcome = run(config, 7);
        assert_eq!(outcome.population.len(), size);
    }
}

#[test]
fn test_elites_carry_over() {
    let mut rng = Pcg32::seed_from_u64(31);
    let mut population = Population::random(20, &BrainInit::EVOLUTION, &mut rng);
    population.evaluate_fitness(&FlightParams::EVOLUTION, &mut rng, &mut Unobserved);
    let top: Vec<Brain> = population.individuals()[..3]
        .iter()
        .map(|ind| *ind.brain())
        .collect();

    let next = PopulationEvolver::DEFAULT.evolve(&population, &mut rng);
    let carried: Vec<Brain> = next.individuals()[..3]
        .iter()
        .map(|ind| *ind.brain())
        .collect();
    assert_eq!(top, carried);
}

#[test]
fn test_running_best_is_monotonic() {
    // the course is redrawn every generation, so only the running best is
    // guaranteed to be monotonic
    let outcome = run(
        TrainerConfig {
            generations: 10,
            ..TrainerConfig::DEFAULT
        },
        99,
    );
    let mut best = 0.0;
    for summary in &outcome.history {
        assert!(summary.best_fitness >= best);
        assert!(summary.best_fitness >= summary.stats.max);
        best = summary.best_fitness;
    }
    assert_eq!(outcome.best_fitness, best);
}

#[test]
fn test_cancellation_stops_the_run() {
    struct CancelAfter {
        generations: usize,
        seen: Vec<GenerationSummary>,
    }

    impl EvolutionObserver for CancelAfter {
        fn on_frame(&mut self, status: &EvolutionStatus, _view: &FlightView<'_>) -> FrameControl {
            if status.generation >= self.generations {
                FrameControl::Quit
            } else {
                FrameControl::Continue
            }
        }

        fn on_generation(&mut self, summary: &GenerationSummary) {
            self.seen.push(*summary);
        }
    }

    let mut rng = Pcg32::seed_from_u64(5);
    let trainer = Trainer::new(TrainerConfig::DEFAULT, &mut rng).unwrap();
    let mut observer = CancelAfter {
        generations: 3,
        seen: vec![],
    };
    let outcome = trainer.run(&mut rng, &mut observer);

    assert!(outcome.cancelled);
    assert_eq!(outcome.history.len(), 3);
    assert_eq!(observer.seen, outcome.history);
}
