use std::cmp::Reverse;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    core::{Bird, Brain, BrainInit, PhysicsParams, Pilot, Pipe, Position},
    engine::{Course, CourseParams, ScoringPolicy, fly_bird},
};

/// Settings of a human-vs-AI match.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VersusParams {
    pub physics: PhysicsParams,
    pub course: CourseParams,
    pub scoring: ScoringPolicy,
    pub brain_init: BrainInit,
    pub human_spawn: Position,
    /// One AI bird is spawned per entry.
    pub ai_spawns: [Position; 3],
}

impl VersusParams {
    pub const DEFAULT: Self = Self {
        physics: PhysicsParams::DEFAULT,
        course: CourseParams::VERSUS,
        scoring: ScoringPolicy::PIPES_PASSED,
        brain_init: BrainInit::VERSUS,
        human_spawn: Position::new(100.0, 250.0),
        ai_spawns: [
            Position::new(100.0, 300.0),
            Position::new(100.0, 350.0),
            Position::new(100.0, 200.0),
        ],
    };
}

impl Default for VersusParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A participant of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum Contender {
    #[display("You")]
    Human,
    /// AI bird, by index into [`VersusMatch::ai_birds`].
    #[display("AI {}", _0 + 1)]
    Ai(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MatchState {
    Playing,
    /// Every bird is dead. Only [`VersusMatch::restart`] leaves this state.
    GameOver,
}

/// One line of the scoreboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Standing {
    pub contender: Contender,
    pub score: u32,
    pub alive: bool,
}

/// A human-controlled bird racing a few freshly randomized AI birds.
///
/// There is no frame cap: the match goes on until every bird is dead.
///
/// # Example
///
/// ```
/// use flapgen_engine::{Contender, VersusMatch, VersusParams};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(7);
/// let mut game = VersusMatch::new(VersusParams::DEFAULT, &mut rng);
///
/// game.request_flap();
/// game.step(&mut rng);
/// assert!((game.human().velocity() + 6.6).abs() < 1e-9);
/// assert_eq!(game.standings()[0].contender, Contender::Human);
/// ```
#[derive(Debug, Clone)]
pub struct VersusMatch {
    params: VersusParams,
    human: Bird,
    ai_birds: Vec<Bird>,
    course: Course,
    frame: usize,
    flap_pending: bool,
    state: MatchState,
}

impl VersusMatch {
    pub fn new<R>(params: VersusParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let human = Bird::new(params.human_spawn, Pilot::Human);
        let ai_birds = params
            .ai_spawns
            .iter()
            .map(|&spawn| Bird::new(spawn, Pilot::Brain(Brain::random(rng, &params.brain_init))))
            .collect();
        let course = Course::new(params.course, rng);
        Self {
            params,
            human,
            ai_birds,
            course,
            frame: 0,
            flap_pending: false,
            state: MatchState::Playing,
        }
    }

    /// Starts over with new AI brains and a new course.
    pub fn restart<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        debug!(frame = self.frame, "match restarted");
        *self = Self::new(self.params, rng);
    }

    #[must_use]
    pub const fn params(&self) -> &VersusParams {
        &self.params
    }

    #[must_use]
    pub const fn human(&self) -> &Bird {
        &self.human
    }

    #[must_use]
    pub fn ai_birds(&self) -> &[Bird] {
        &self.ai_birds
    }

    /// All birds, the human first.
    pub fn birds(&self) -> impl Iterator<Item = (Contender, &Bird)> + '_ {
        let ai = self
            .ai_birds
            .iter()
            .enumerate()
            .map(|(index, bird)| (Contender::Ai(index), bird));
        std::iter::once((Contender::Human, &self.human)).chain(ai)
    }

    #[must_use]
    pub fn pipes(&self) -> &[Pipe] {
        self.course.pipes()
    }

    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    #[must_use]
    pub const fn state(&self) -> MatchState {
        self.state
    }

    /// Makes the human bird flap on the next frame.
    ///
    /// Requests are edge-triggered: several requests before the next frame
    /// count as one, and a request is consumed by the frame that follows it.
    pub fn request_flap(&mut self) {
        if self.human.is_alive() {
            self.flap_pending = true;
        }
    }

    /// Simulates one frame. Does nothing once the match is over.
    pub fn step<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.state.is_game_over() {
            return;
        }
        self.course.advance(rng);

        let frame = self.frame;
        let Self {
            params,
            human,
            ai_birds,
            course,
            flap_pending,
            ..
        } = self;
        let pipes = course.pipes();
        let flap = std::mem::take(flap_pending);

        let before = human.score();
        if let Some(cause) = fly_bird(human, pipes, &params.physics, &params.scoring, flap) {
            info!(frame, score = human.score(), %cause, "player died");
        } else if human.score() > before {
            debug!(score = human.score(), "player passed a pipe");
        }
        for (index, bird) in ai_birds.iter_mut().enumerate() {
            if let Some(cause) = fly_bird(bird, pipes, &params.physics, &params.scoring, false) {
                debug!(ai = index, score = bird.score(), %cause, "AI bird died");
            }
        }

        self.frame += 1;
        if !self.human.is_alive() && self.ai_birds.iter().all(|bird| !bird.is_alive()) {
            self.state = MatchState::GameOver;
            info!(frame = self.frame, winner = %self.winner(), "match over");
        }
    }

    /// The scoreboard, best score first; the human comes first on ties.
    #[must_use]
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<_> = self
            .birds()
            .map(|(contender, bird)| Standing {
                contender,
                score: bird.score(),
                alive: bird.is_alive(),
            })
            .collect();
        // stable, so list order (human first) breaks ties
        standings.sort_by_key(|standing| Reverse(standing.score));
        standings
    }

    /// The contender at the top of the scoreboard.
    #[must_use]
    pub fn winner(&self) -> Contender {
        self.standings()
            .first()
            .map_or(Contender::Human, |standing| standing.contender)
    }
}
