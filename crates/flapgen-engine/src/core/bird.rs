use crate::core::{Brain, Pipe, PipeId, Position};

/// Constants driving vertical bird motion and the playfield bounds.
///
/// # Example
///
/// ```
/// use flapgen_engine::{Bird, Pilot, PhysicsParams, Position};
///
/// let physics = PhysicsParams::DEFAULT;
/// let mut bird = Bird::new(Position::new(100.0, 300.0), Pilot::Human);
///
/// bird.advance(&physics);
/// assert_eq!(bird.position().y, 300.0);
/// assert_eq!(bird.velocity(), 0.4);
///
/// bird.flap(&physics);
/// assert_eq!(bird.velocity(), -7.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    /// Velocity gained every frame (units/frame²).
    pub gravity: f64,
    /// Velocity a flap sets, replacing the current one.
    pub flap_velocity: f64,
    /// A bird at or above this height is out of bounds.
    pub ceiling: f64,
    /// A bird at or below this height is out of bounds.
    pub floor: f64,
    /// Collision radius of every bird.
    pub radius: f64,
}

impl PhysicsParams {
    pub const DEFAULT: Self = Self {
        gravity: 0.4,
        flap_velocity: -7.0,
        ceiling: 0.0,
        floor: 580.0,
        radius: 12.0,
    };
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Why a bird stopped flying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum DeathCause {
    #[display("left the playfield")]
    OutOfBounds,
    #[display("hit a pipe")]
    Collision,
}

/// Life cycle of a bird within one run. `Dead` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum BirdState {
    Alive,
    Dead(DeathCause),
}

/// Who decides when a bird flaps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pilot {
    /// Flaps only on explicit requests from the player.
    Human,
    /// Flaps whenever the brain says so.
    Brain(Brain),
}

/// A simulated bird.
///
/// The horizontal position is fixed at spawn; pipes scroll past instead.
/// The score only ever increases, and the fitness is set exactly once, when
/// the bird dies or when the run it belongs to ends.
#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    position: Position,
    velocity: f64,
    state: BirdState,
    score: u32,
    fitness: Option<f64>,
    pilot: Pilot,
    last_passed: Option<PipeId>,
}

impl Bird {
    /// Creates a live bird at rest.
    #[must_use]
    pub const fn new(position: Position, pilot: Pilot) -> Self {
        Self {
            position,
            velocity: 0.0,
            state: BirdState::Alive,
            score: 0,
            fitness: None,
            pilot,
            last_passed: None,
        }
    }

    /// Returns the bird with a different starting velocity.
    #[must_use]
    pub fn with_velocity(self, velocity: f64) -> Self {
        Self { velocity, ..self }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    #[must_use]
    pub const fn state(&self) -> BirdState {
        self.state
    }

    #[must_use]
    pub const fn is_alive(&self) -> bool {
        matches!(self.state, BirdState::Alive)
    }

    /// Number of frames or pipes credited so far, depending on the scoring policy.
    #[must_use]
    pub const fn score(&self) -> u32 {
        self.score
    }

    /// Fitness, once the bird has died or its run has ended.
    #[must_use]
    pub const fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    #[must_use]
    pub const fn pilot(&self) -> &Pilot {
        &self.pilot
    }

    /// Returns the brain for AI-controlled birds.
    #[must_use]
    pub const fn brain(&self) -> Option<&Brain> {
        match &self.pilot {
            Pilot::Human => None,
            Pilot::Brain(brain) => Some(brain),
        }
    }

    #[must_use]
    pub const fn is_human(&self) -> bool {
        matches!(self.pilot, Pilot::Human)
    }

    /// Asks the bird's brain whether to flap. Human-piloted birds never do.
    #[must_use]
    pub fn wants_flap(&self, pipes: &[Pipe]) -> bool {
        self.brain()
            .is_some_and(|brain| brain.decide(self.position, self.velocity, pipes))
    }

    /// Replaces the current velocity with the flap impulse. Dead birds ignore it.
    pub fn flap(&mut self, physics: &PhysicsParams) {
        if self.is_alive() {
            self.velocity = physics.flap_velocity;
        }
    }

    /// Integrates one frame of vertical motion and applies the bounds check.
    ///
    /// The position advances by the velocity the bird entered the frame with,
    /// then gravity is added for the next frame. Gravity applied after the move
    /// keeps a bird at rest on the ceiling out of bounds, and a falling bird
    /// reaches the floor one frame later than with gravity applied first.
    pub fn advance(&mut self, physics: &PhysicsParams) {
        if !self.is_alive() {
            return;
        }
        self.position.y += self.velocity;
        self.velocity += physics.gravity;
        if self.is_out_of_bounds(physics) {
            self.kill(DeathCause::OutOfBounds);
        }
    }

    #[must_use]
    pub fn is_out_of_bounds(&self, physics: &PhysicsParams) -> bool {
        self.position.y <= physics.ceiling || self.position.y >= physics.floor
    }

    pub(crate) fn kill(&mut self, cause: DeathCause) {
        if self.is_alive() {
            self.state = BirdState::Dead(cause);
        }
    }

    pub(crate) fn settle_fitness(&mut self, fitness: f64) {
        if self.fitness.is_none() {
            self.fitness = Some(fitness);
        }
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub(crate) const fn last_passed(&self) -> Option<PipeId> {
        self.last_passed
    }

    pub(crate) fn mark_passed(&mut self, pipe: PipeId) {
        self.last_passed = Some(pipe);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHYSICS: PhysicsParams = PhysicsParams::DEFAULT;

    fn bird_at(y: f64) -> Bird {
        Bird::new(Position::new(100.0, y), Pilot::Human)
    }

    #[test]
    fn test_gravity_accumulates() {
        let mut bird = bird_at(300.0);
        bird.advance(&PHYSICS);
        bird.advance(&PHYSICS);
        bird.advance(&PHYSICS);

        // 0 + 0.4 + 0.8
        assert!((bird.position().y - 301.2).abs() < 1e-9);
        assert!((bird.velocity() - 1.2).abs() < 1e-9);
        assert!(bird.is_alive());
    }

    #[test]
    fn test_flap_overrides_velocity() {
        let mut bird = bird_at(300.0).with_velocity(5.5);
        bird.flap(&PHYSICS);
        assert_eq!(bird.velocity(), -7.0);

        bird.advance(&PHYSICS);
        assert!((bird.position().y - 293.0).abs() < 1e-9);
        assert!((bird.velocity() + 6.6).abs() < 1e-9);
    }

    #[test]
    fn test_dead_bird_is_frozen() {
        let mut bird = bird_at(300.0);
        bird.kill(DeathCause::Collision);
        bird.flap(&PHYSICS);
        bird.advance(&PHYSICS);

        assert_eq!(bird.position().y, 300.0);
        assert_eq!(bird.velocity(), 0.0);
        assert_eq!(bird.state(), BirdState::Dead(DeathCause::Collision));
    }

    #[test]
    fn test_ceiling_kills_bird_at_zero() {
        for velocity in [0.0, -0.1, -3.0, -7.0] {
            let mut bird = bird_at(0.0).with_velocity(velocity);
            bird.advance(&PHYSICS);
            assert_eq!(
                bird.state(),
                BirdState::Dead(DeathCause::OutOfBounds),
                "velocity {velocity}"
            );
        }
    }

    #[test]
    fn test_resting_bird_reaches_floor_on_frame_38() {
        // y after n frames is 300 + 0.2 n (n - 1)
        let mut bird = bird_at(300.0);
        for _ in 0..37 {
            bird.advance(&PHYSICS);
        }
        assert!(bird.is_alive());
        assert!((bird.position().y - 566.4).abs() < 1e-9);
        bird.advance(&PHYSICS);
        assert_eq!(bird.state(), BirdState::Dead(DeathCause::OutOfBounds));
    }

    #[test]
    fn test_floor_kills_falling_bird() {
        for velocity in [0.1, 0.5, 4.0] {
            let mut bird = bird_at(579.9).with_velocity(velocity);
            bird.advance(&PHYSICS);
            assert_eq!(
                bird.state(),
                BirdState::Dead(DeathCause::OutOfBounds),
                "velocity {velocity}"
            );
        }
    }

    #[test]
    fn test_first_death_cause_sticks() {
        let mut bird = bird_at(300.0);
        bird.kill(DeathCause::OutOfBounds);
        bird.kill(DeathCause::Collision);
        assert_eq!(bird.state(), BirdState::Dead(DeathCause::OutOfBounds));
    }

    #[test]
    fn test_fitness_settles_once() {
        let mut bird = bird_at(300.0);
        assert_eq!(bird.fitness(), None);
        bird.settle_fitness(4.5);
        bird.settle_fitness(9.0);
        assert_eq!(bird.fitness(), Some(4.5));
    }

    #[test]
    fn test_human_never_wants_flap() {
        let bird = bird_at(590.0);
        assert!(!bird.wants_flap(&[]));
    }
}
