use std::path::PathBuf;

use anyhow::Context as _;
use chrono::Utc;
use flapgen_engine::{FlightParams, Unobserved};
use flapgen_training::{
    genetic::PopulationEvolver,
    trainer::{EvolutionOutcome, Trainer, TrainerConfig},
};
use tracing::info;

use crate::{schema::report::EvolutionReport, util};

use self::view::TerminalObserver;

mod view;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct EvolveArg {
    /// Seed for a reproducible run (random if omitted)
    #[arg(long)]
    pub(super) seed: Option<u64>,
    /// Number of generations to run
    #[arg(long, default_value_t = TrainerConfig::DEFAULT.generations)]
    pub(super) generations: usize,
    /// Number of birds per generation
    #[arg(long, default_value_t = TrainerConfig::DEFAULT.population_size)]
    pub(super) population: usize,
    /// Frame cap of a single generation
    #[arg(long, default_value_t = FlightParams::EVOLUTION.max_frames)]
    pub(super) max_frames: usize,
    /// Run without the terminal UI and log progress to stderr
    #[arg(long)]
    pub(super) headless: bool,
    /// Do not limit the simulation speed
    #[arg(long)]
    pub(super) turbo: bool,
    /// Write a JSON report of the run to this file ("-" for stdout)
    #[arg(long)]
    pub(super) output: Option<PathBuf>,
    /// Log filter for headless runs, e.g. "debug" (overrides `RUST_LOG`)
    #[arg(long)]
    pub(super) log_level: Option<String>,
}

impl Default for EvolveArg {
    fn default() -> Self {
        Self {
            seed: None,
            generations: TrainerConfig::DEFAULT.generations,
            population: TrainerConfig::DEFAULT.population_size,
            max_frames: FlightParams::EVOLUTION.max_frames,
            headless: false,
            turbo: false,
            output: None,
            log_level: None,
        }
    }
}

impl EvolveArg {
    fn trainer_config(&self) -> TrainerConfig {
        TrainerConfig {
            population_size: self.population,
            generations: self.generations,
            flight: FlightParams {
                max_frames: self.max_frames,
                ..FlightParams::EVOLUTION
            },
            evolver: PopulationEvolver::DEFAULT,
            ..TrainerConfig::DEFAULT
        }
    }
}

pub(crate) fn run(arg: &EvolveArg) -> anyhow::Result<()> {
    let config = arg.trainer_config();
    let mut rng = util::rng_from_seed(arg.seed);
    let trainer = Trainer::new(config, &mut rng).context("Invalid evolution settings")?;

    let outcome = if arg.headless {
        util::init_logging(arg.log_level.as_deref())?;
        info!(
            seed = ?arg.seed,
            population = config.population_size,
            generations = config.generations,
            "evolution started"
        );
        trainer.run(&mut rng, &mut Unobserved)
    } else {
        ratatui::run(|terminal| -> anyhow::Result<EvolutionOutcome> {
            let mut observer = TerminalObserver::new(terminal, config.population_size, arg.turbo);
            let outcome = trainer.run(&mut rng, &mut observer);
            observer.finish()?;
            Ok(outcome)
        })?
    };

    print_summary(&outcome);

    if let Some(path) = &arg.output {
        let report = EvolutionReport::new(&config, arg.seed, &outcome, Utc::now());
        let path = (path.as_os_str() != "-").then_some(path.as_path());
        util::write_json(&report, path)?;
    }
    Ok(())
}

fn print_summary(outcome: &EvolutionOutcome) {
    if outcome.cancelled {
        eprintln!(
            "Evolution cancelled after {} generation(s).",
            outcome.history.len()
        );
    } else {
        eprintln!(
            "Evolution completed: {} generation(s).",
            outcome.history.len()
        );
    }
    eprintln!("  Best fitness: {:.1}", outcome.best_fitness);
    if let Some(best) = outcome.population.individuals().first() {
        eprintln!(
            "  Best brain:   weights {:.3?}, bias {:.3}",
            best.brain().weights(),
            best.brain().bias()
        );
    }
}
