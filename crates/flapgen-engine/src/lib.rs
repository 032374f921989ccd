//! Simulation core for flapgen.
//!
//! Birds fall under gravity, flap on command of a tiny fixed-topology brain and
//! die when they leave the playfield or hit a pipe.
//!
//! - [`core`] - value types: [`Bird`] (physics), [`Pipe`] (collision), [`Brain`]
//!   (decision function)
//! - [`engine`] - time-stepped behaviour: the scrolling [`Course`], the
//!   per-generation [`Flight`] loop, fitness and scoring rules, and the
//!   human-vs-AI [`VersusMatch`]
//!
//! Nothing in this crate touches a terminal, a clock or a global random source.
//! Every random draw goes through an `&mut R where R: Rng` handed in by the
//! caller, so a seeded generator replays a run exactly.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;
