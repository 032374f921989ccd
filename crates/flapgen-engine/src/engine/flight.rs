use rand::Rng;
use tracing::{debug, trace};

use crate::{
    core::{Bird, Brain, PhysicsParams, Pilot, Pipe, Position},
    engine::{Course, CourseParams, ScoringPolicy, fitness, fly_bird},
};

/// Settings of one generation's flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightParams {
    pub physics: PhysicsParams,
    pub course: CourseParams,
    pub scoring: ScoringPolicy,
    /// Where every bird starts.
    pub spawn: Position,
    /// The flight stops after this many frames even if birds are still alive.
    pub max_frames: usize,
}

impl FlightParams {
    pub const EVOLUTION: Self = Self {
        physics: PhysicsParams::DEFAULT,
        course: CourseParams::EVOLUTION,
        scoring: ScoringPolicy::Survival,
        spawn: Position::new(100.0, 300.0),
        max_frames: 1000,
    };
}

impl Default for FlightParams {
    fn default() -> Self {
        Self::EVOLUTION
    }
}

/// Answer of a [`FlightObserver`] at a frame boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum FrameControl {
    Continue,
    Quit,
}

/// Read-only picture of a flight at a frame boundary.
#[derive(Debug, Clone, Copy)]
pub struct FlightView<'a> {
    frame: usize,
    birds: &'a [Bird],
    pipes: &'a [Pipe],
}

impl<'a> FlightView<'a> {
    #[must_use]
    pub const fn new(frame: usize, birds: &'a [Bird], pipes: &'a [Pipe]) -> Self {
        Self {
            frame,
            birds,
            pipes,
        }
    }

    /// Number of frames simulated so far.
    #[must_use]
    pub const fn frame(&self) -> usize {
        self.frame
    }

    #[must_use]
    pub const fn birds(&self) -> &'a [Bird] {
        self.birds
    }

    #[must_use]
    pub const fn pipes(&self) -> &'a [Pipe] {
        self.pipes
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.birds.iter().filter(|bird| bird.is_alive()).count()
    }

    /// Index of the bird to highlight: the first live bird in population order.
    ///
    /// Populations keep the previous generation's elites at the front, so this
    /// is the best-ranked bird still flying.
    #[must_use]
    pub fn leader(&self) -> Option<usize> {
        self.birds.iter().position(Bird::is_alive)
    }
}

/// The external collaborator a flight yields to once per frame.
///
/// Called at every frame boundary before the frame is simulated, with the state
/// left by the previous frame. Returning [`FrameControl::Quit`] aborts the flight.
pub trait FlightObserver {
    fn on_frame(&mut self, view: &FlightView<'_>) -> FrameControl;
}

impl<F> FlightObserver for F
where
    F: FnMut(&FlightView<'_>) -> FrameControl,
{
    fn on_frame(&mut self, view: &FlightView<'_>) -> FrameControl {
        self(view)
    }
}

/// Observer that never quits, for headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unobserved;

impl FlightObserver for Unobserved {
    fn on_frame(&mut self, _view: &FlightView<'_>) -> FrameControl {
        FrameControl::Continue
    }
}

/// Why a flight that ran to completion stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum Termination {
    /// The frame cap was reached.
    FrameLimit,
    /// Every bird died before the frame cap.
    Extinction,
}

/// Result of [`Flight::run`].
#[derive(Debug, Clone, derive_more::IsVariant)]
pub enum FlightOutcome {
    Completed(FlightReport),
    /// The observer asked to quit at the given frame boundary. Fitness of the
    /// birds still alive at that point was never computed.
    Aborted { frame: usize },
}

impl FlightOutcome {
    /// Returns the report if the flight ran to completion.
    #[must_use]
    pub fn completed(self) -> Option<FlightReport> {
        match self {
            Self::Completed(report) => Some(report),
            Self::Aborted { .. } => None,
        }
    }
}

/// Final state of a completed flight. Every bird has its fitness set.
#[derive(Debug, Clone)]
pub struct FlightReport {
    birds: Vec<Bird>,
    frames: usize,
    termination: Termination,
}

impl FlightReport {
    #[must_use]
    pub fn birds(&self) -> &[Bird] {
        &self.birds
    }

    /// Total number of frames simulated.
    #[must_use]
    pub const fn frames(&self) -> usize {
        self.frames
    }

    #[must_use]
    pub const fn termination(&self) -> Termination {
        self.termination
    }

    /// Birds still alive when the flight ended.
    #[must_use]
    pub fn survivors(&self) -> usize {
        self.birds.iter().filter(|bird| bird.is_alive()).count()
    }

    #[must_use]
    pub fn into_birds(self) -> Vec<Bird> {
        self.birds
    }

    /// Fitness of every bird, in population order.
    pub fn fitness(&self) -> impl Iterator<Item = f64> + '_ {
        self.birds
            .iter()
            .map(|bird| bird.fitness().unwrap_or_default())
    }
}

/// One generation's simulation: a population of brained birds over one course.
///
/// # Example
///
/// ```
/// use flapgen_engine::{Brain, Flight, FlightParams, Unobserved};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(42);
/// let flight = Flight::new([Brain::ZERO; 4], FlightParams::EVOLUTION, &mut rng);
///
/// let report = flight.run(&mut rng, &mut Unobserved).completed().unwrap();
/// assert!(report.termination().is_extinction());
/// assert!(report.fitness().all(|fitness| fitness > 0.0));
/// ```
#[derive(Debug, Clone)]
pub struct Flight {
    params: FlightParams,
    birds: Vec<Bird>,
    course: Course,
    frame: usize,
}

impl Flight {
    /// Spawns one bird per brain at the spawn point and lays out a fresh course.
    pub fn new<I, R>(brains: I, params: FlightParams, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = Brain>,
        R: Rng + ?Sized,
    {
        let birds = brains
            .into_iter()
            .map(|brain| Bird::new(params.spawn, Pilot::Brain(brain)))
            .collect();
        Self {
            params,
            birds,
            course: Course::new(params.course, rng),
            frame: 0,
        }
    }

    #[must_use]
    pub const fn params(&self) -> &FlightParams {
        &self.params
    }

    #[must_use]
    pub fn birds(&self) -> &[Bird] {
        &self.birds
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
    pub fn view(&self) -> FlightView<'_> {
        FlightView::new(self.frame, &self.birds, self.course.pipes())
    }

    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.view().alive_count()
    }

    /// Returns whether another call to [`Flight::step`] would do anything.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.frame >= self.params.max_frames || self.alive_count() == 0
    }

    /// Simulates one frame: scroll the course, then fly every live bird.
    ///
    /// A bird that dies gets its fitness right away, from its score and the
    /// index of the frame it died in.
    pub fn step<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        if self.is_over() {
            return;
        }
        self.course.advance(rng);

        let pipes = self.course.pipes();
        for (index, bird) in self.birds.iter_mut().enumerate() {
            let params = &self.params;
            if let Some(cause) = fly_bird(bird, pipes, &params.physics, &params.scoring, false) {
                let fitness = fitness::evaluate(bird.score(), self.frame);
                bird.settle_fitness(fitness);
                trace!(bird = index, frame = self.frame, %cause, fitness, "bird died");
            }
        }
        self.frame += 1;
    }

    /// Runs the flight to completion, yielding to `observer` once per frame.
    ///
    /// Stops when every bird is dead, when the frame cap is reached, or when
    /// the observer returns [`FrameControl::Quit`]. On completion the birds
    /// still alive get their fitness from the final frame count.
    pub fn run<R, O>(mut self, rng: &mut R, observer: &mut O) -> FlightOutcome
    where
        R: Rng + ?Sized,
        O: FlightObserver + ?Sized,
    {
        while self.frame < self.params.max_frames {
            if observer.on_frame(&self.view()).is_quit() {
                debug!(frame = self.frame, "flight aborted by observer");
                return FlightOutcome::Aborted { frame: self.frame };
            }
            if self.alive_count() == 0 {
                break;
            }
            self.step(rng);
        }
        FlightOutcome::Completed(self.finish())
    }

    fn finish(mut self) -> FlightReport {
        let termination = if self.frame >= self.params.max_frames {
            Termination::FrameLimit
        } else {
            Termination::Extinction
        };
        let frames = self.frame;
        for bird in self.birds.iter_mut().filter(|bird| bird.is_alive()) {
            bird.settle_fitness(fitness::evaluate(bird.score(), frames));
        }
        FlightReport {
            birds: self.birds,
            frames,
            termination,
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;
    use crate::core::{BirdState, BrainInit, DeathCause};

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(2024)
    }

    fn completed(outcome: FlightOutcome) -> FlightReport {
        match outcome {
            FlightOutcome::Completed(report) => report,
            FlightOutcome::Aborted { frame } => panic!("aborted at frame {frame}"),
        }
    }

    #[test]
    fn test_zero_brains_fall_to_the_floor() {
        let mut rng = rng();
        let flight = Flight::new([Brain::ZERO; 20], FlightParams::EVOLUTION, &mut rng);
        let report = completed(flight.run(&mut rng, &mut Unobserved));

        // y after n frames is 300 + 0.2 n (n - 1); it reaches 580 on frame 38,
        // which has index 37. Each of the 37 earlier frames scored a point.
        assert_eq!(report.frames(), 38);
        assert!(report.termination().is_extinction());
        let expected = fitness::evaluate(37, 37);
        for bird in report.birds() {
            assert_eq!(bird.state(), BirdState::Dead(DeathCause::OutOfBounds));
            assert_eq!(bird.score(), 37);
            assert_eq!(bird.fitness(), Some(expected));
        }
    }

    #[test]
    fn test_frame_cap_settles_survivors() {
        let mut rng = rng();
        let params = FlightParams {
            max_frames: 10,
            ..FlightParams::EVOLUTION
        };
        let flight = Flight::new([Brain::ZERO; 3], params, &mut rng);
        let report = completed(flight.run(&mut rng, &mut Unobserved));

        assert_eq!(report.frames(), 10);
        assert!(report.termination().is_frame_limit());
        assert_eq!(report.survivors(), 3);
        for bird in report.birds() {
            assert_eq!(bird.score(), 10);
            assert_eq!(bird.fitness(), Some(fitness::evaluate(10, 10)));
        }
    }

    #[test]
    fn test_observer_is_called_once_per_frame() {
        let mut rng = rng();
        let params = FlightParams {
            max_frames: 25,
            ..FlightParams::EVOLUTION
        };
        let flight = Flight::new([Brain::ZERO; 2], params, &mut rng);
        let mut frames = vec![];
        let mut observer = |view: &FlightView<'_>| {
            frames.push(view.frame());
            FrameControl::Continue
        };
        completed(flight.run(&mut rng, &mut observer));
        assert_eq!(frames, (0..25).collect::<Vec<_>>());
    }

    #[test]
    fn test_quit_aborts_flight() {
        let mut rng = rng();
        let flight = Flight::new([Brain::ZERO; 5], FlightParams::EVOLUTION, &mut rng);
        let mut observer = |view: &FlightView<'_>| {
            if view.frame() == 12 {
                FrameControl::Quit
            } else {
                FrameControl::Continue
            }
        };
        let outcome = flight.run(&mut rng, &mut observer);
        assert!(matches!(outcome, FlightOutcome::Aborted { frame: 12 }));
    }

    #[test]
    fn test_dead_birds_stay_in_population() {
        let mut rng = rng();
        let mut flight = Flight::new([Brain::ZERO; 4], FlightParams::EVOLUTION, &mut rng);
        while !flight.is_over() {
            flight.step(&mut rng);
        }
        assert_eq!(flight.birds().len(), 4);
        assert_eq!(flight.alive_count(), 0);
        assert_eq!(flight.view().leader(), None);

        let frame = flight.frame();
        flight.step(&mut rng);
        assert_eq!(flight.frame(), frame);
    }

    #[test]
    fn test_same_seed_same_flight() {
        let brains: Vec<_> = {
            let mut rng = Pcg32::seed_from_u64(9);
            (0..20)
                .map(|_| Brain::random(&mut rng, &BrainInit::EVOLUTION))
                .collect()
        };
        let run = |seed| {
            let mut rng = Pcg32::seed_from_u64(seed);
            let flight = Flight::new(brains.iter().copied(), FlightParams::EVOLUTION, &mut rng);
            completed(flight.run(&mut rng, &mut Unobserved))
                .fitness()
                .collect::<Vec<_>>()
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_living_longer_ranks_higher() {
        let mut rng = rng();
        // flapping every frame reaches the ceiling on frame 43, falling
        // reaches the floor on frame 38
        let flapper = Brain::new([0.0; 4], 3.0);
        let flight = Flight::new([Brain::ZERO, flapper], FlightParams::EVOLUTION, &mut rng);
        let report = completed(flight.run(&mut rng, &mut Unobserved));
        let fitness: Vec<_> = report.fitness().collect();
        assert_eq!(report.birds()[1].score(), 42);
        assert!(report.birds()[0].score() < report.birds()[1].score());
        assert!(fitness[0] < fitness[1]);
    }
}
