//! Time-stepped simulation built on the [`core`](crate::core) types.
//!
//! - [`Course`] - the set of scrolling pipes and its [`Recycle`] policy
//! - [`Flight`] - one generation: a population of brained birds flying until
//!   they all die, the frame cap is reached or the observer asks to quit
//! - [`fitness`] - survival-weighted fitness of a bird
//! - [`ScoringPolicy`] - how live birds earn points
//! - [`VersusMatch`] - one human bird racing a few AI birds, without a frame cap
//!
//! # Frame order
//!
//! Both [`Flight`] and [`VersusMatch`] advance a frame the same way: the pipes
//! scroll first, then every live bird in list order decides, flaps, moves and
//! is checked against the bounds and every pipe before it is credited.

pub use self::{course::*, flight::*, scoring::*, versus::*};

mod course;
pub mod fitness;
mod flight;
mod scoring;
mod versus;

use crate::core::{Bird, DeathCause, PhysicsParams, Pipe};

/// Advances a single live bird through one frame.
///
/// `flap_requested` is an extra flap command on top of the bird's own brain
/// (used for the human player). Returns the cause if the bird died this frame.
pub(crate) fn fly_bird(
    bird: &mut Bird,
    pipes: &[Pipe],
    physics: &PhysicsParams,
    scoring: &ScoringPolicy,
    flap_requested: bool,
) -> Option<DeathCause> {
    if !bird.is_alive() {
        return None;
    }
    if flap_requested || bird.wants_flap(pipes) {
        bird.flap(physics);
    }

    bird.advance(physics);
    if !bird.is_alive() {
        return Some(DeathCause::OutOfBounds);
    }

    if pipes
        .iter()
        .any(|pipe| pipe.collides(bird.position(), physics.radius))
    {
        bird.kill(DeathCause::Collision);
        return Some(DeathCause::Collision);
    }

    scoring.credit(bird, pipes);
    None
}
