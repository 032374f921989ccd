//! Value types shared by every simulation mode.
//!
//! - [`Bird`] - a circular agent with vertical physics ([`PhysicsParams`])
//! - [`Pipe`] - an obstacle with a passable [`Gap`] and the collision test
//! - [`Brain`] - four weights and a bias mapping [`Sensors`] to a flap decision
//!
//! The playfield uses screen coordinates: `x` grows to the right, `y` grows
//! downwards, and the visible area is 800 by 600 units.

pub use self::{bird::*, brain::*, pipe::*};

mod bird;
mod brain;
mod pipe;

/// Width of the visible playfield in world units.
pub const FIELD_WIDTH: f64 = 800.0;

/// Height of the visible playfield in world units.
pub const FIELD_HEIGHT: f64 = 600.0;

/// A point in world coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
