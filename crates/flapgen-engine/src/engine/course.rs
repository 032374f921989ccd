use arrayvec::ArrayVec;
use rand::Rng;

use crate::core::{Gap, Pipe, PipeId};

/// Upper bound on the number of pipes a course holds at once.
pub const MAX_PIPES: usize = 4;

/// What happens to pipes once they scroll off the left edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Recycle {
    /// A pipe whose left edge passes `-width` jumps back to
    /// `respawn_x + U(0, jitter)` with a fresh gap. The pipe count never changes.
    Wrap { respawn_x: f64, jitter: f64 },
    /// A pipe whose left edge reaches `-width` is removed. While there are
    /// fewer than `max_pipes` pipes and the last one is left of
    /// `spawn_before_x`, a new pipe is appended `spacing` units after it.
    Stream {
        spacing: f64,
        max_pipes: usize,
        spawn_before_x: f64,
    },
}

/// Layout and motion of a pipe course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CourseParams {
    /// Horizontal distance every pipe moves per frame.
    pub speed: f64,
    pub pipe_width: f64,
    /// Height of every gap.
    pub gap_size: f64,
    /// Lowest possible gap centre.
    pub gap_center_min: f64,
    /// Highest possible gap centre.
    pub gap_center_max: f64,
    /// Left edges of the pipes present at the start of a run.
    pub initial_x: [f64; 3],
    pub recycle: Recycle,
}

impl CourseParams {
    /// Course flown by every generation of an evolution run.
    pub const EVOLUTION: Self = Self {
        speed: 2.5,
        pipe_width: 80.0,
        gap_size: 200.0,
        gap_center_min: 150.0,
        gap_center_max: 450.0,
        initial_x: [400.0, 600.0, 800.0],
        recycle: Recycle::Wrap {
            respawn_x: 800.0,
            jitter: 100.0,
        },
    };

    /// Course of a human-vs-AI match: slower, tighter gaps, endless stream.
    pub const VERSUS: Self = Self {
        speed: 2.0,
        pipe_width: 80.0,
        gap_size: 180.0,
        gap_center_min: 180.0,
        gap_center_max: 420.0,
        initial_x: [400.0, 600.0, 800.0],
        recycle: Recycle::Stream {
            spacing: 200.0,
            max_pipes: MAX_PIPES,
            spawn_before_x: 600.0,
        },
    };

    fn random_gap<R>(&self, rng: &mut R) -> Gap
    where
        R: Rng + ?Sized,
    {
        Gap::random(rng, self.gap_center_min..=self.gap_center_max, self.gap_size)
    }
}

/// The pipes of one run, owned by that run.
///
/// # Example
///
/// ```
/// use flapgen_engine::{Course, CourseParams};
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut rng = Pcg32::seed_from_u64(0);
/// let mut course = Course::new(CourseParams::EVOLUTION, &mut rng);
/// assert_eq!(course.pipes().len(), 3);
///
/// course.advance(&mut rng);
/// assert_eq!(course.pipes()[0].x(), 397.5);
/// ```
#[derive(Debug, Clone)]
pub struct Course {
    params: CourseParams,
    pipes: ArrayVec<Pipe, MAX_PIPES>,
    next_id: u64,
}

impl Course {
    /// Places the initial pipes, each with a random gap.
    pub fn new<R>(params: CourseParams, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let mut course = Self {
            params,
            pipes: ArrayVec::new(),
            next_id: 0,
        };
        for x in params.initial_x {
            course.spawn(x, rng);
        }
        course
    }

    #[must_use]
    pub const fn params(&self) -> &CourseParams {
        &self.params
    }

    #[must_use]
    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    /// Scrolls every pipe by one frame and recycles those that left the field.
    pub fn advance<R>(&mut self, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let params = self.params;
        for pipe in &mut self.pipes {
            pipe.scroll(params.speed);
        }

        match params.recycle {
            Recycle::Wrap { respawn_x, jitter } => {
                for pipe in &mut self.pipes {
                    if pipe.x() < -pipe.width() {
                        let x = respawn_x + rng.random_range(0.0..=jitter);
                        pipe.relocate(x, params.random_gap(rng));
                    }
                }
            }
            Recycle::Stream {
                spacing,
                max_pipes,
                spawn_before_x,
            } => {
                self.pipes.retain(|pipe| pipe.x() > -pipe.width());
                let max_pipes = max_pipes.min(MAX_PIPES);
                let needs_pipe = self
                    .pipes
                    .last()
                    .is_none_or(|last| last.x() < spawn_before_x);
                if self.pipes.len() < max_pipes && needs_pipe {
                    let x = self
                        .pipes
                        .last()
                        .map_or(params.initial_x[0], |last| last.x() + spacing);
                    self.spawn(x, rng);
                }
            }
        }
    }

    fn spawn<R>(&mut self, x: f64, rng: &mut R)
    where
        R: Rng + ?Sized,
    {
        let id = PipeId::new(self.next_id);
        let pipe = Pipe::with_id(id, x, self.params.pipe_width, self.params.random_gap(rng));
        if self.pipes.try_push(pipe).is_ok() {
            self.next_id += 1;
        }
    }
}
