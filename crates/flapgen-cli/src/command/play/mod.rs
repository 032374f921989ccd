use flapgen_engine::VersusParams;

use crate::{command::play::app::PlayApp, tui::Tui, util};

mod app;

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Seed for the course and the opponents' brains (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

pub(crate) fn run(arg: &PlayArg) -> anyhow::Result<()> {
    let rng = util::rng_from_seed(arg.seed);
    let mut app = PlayApp::new(VersusParams::DEFAULT, rng);
    Tui::new().run(&mut app)?;

    let standings = app.standings();
    if let Some(top) = standings.first() {
        eprintln!("Best of the last match: {} with {}", top.contender, top.score);
    }
    Ok(())
}
