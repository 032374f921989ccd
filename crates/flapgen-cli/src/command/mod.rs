use clap::{Parser, Subcommand};

use self::{evolve::EvolveArg, play::PlayArg};

mod evolve;
mod play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Evolve bird brains with a genetic algorithm
    Evolve(#[clap(flatten)] EvolveArg),
    /// Race three AI birds yourself
    Play(#[clap(flatten)] PlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args
        .mode
        .unwrap_or_else(|| Mode::Evolve(EvolveArg::default()))
    {
        Mode::Evolve(arg) => evolve::run(&arg)?,
        Mode::Play(arg) => play::run(&arg)?,
    }
    Ok(())
}
