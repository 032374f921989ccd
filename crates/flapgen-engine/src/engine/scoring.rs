use crate::core::{Bird, Pipe};

/// How a bird that survived a frame earns points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScoringPolicy {
    /// One point for every frame survived. Used by evolution runs.
    Survival,
    /// One point per pipe, credited once, when the pipe's trailing edge is
    /// more than `margin` units behind the bird. Used by versus matches.
    PipesPassed { margin: f64 },
}

impl ScoringPolicy {
    pub const PIPES_PASSED: Self = Self::PipesPassed { margin: 5.0 };

    pub(crate) fn credit(&self, bird: &mut Bird, pipes: &[Pipe]) {
        match *self {
            Self::Survival => bird.add_score(1),
            Self::PipesPassed { margin } => {
                let x = bird.position().x;
                let last = bird.last_passed();
                let passed = pipes.iter().find(|pipe| {
                    last.is_none_or(|last| pipe.id() > last) && pipe.is_cleared_by(x, margin)
                });
                if let Some(pipe) = passed {
                    bird.add_score(1);
                    bird.mark_passed(pipe.id());
                }
            }
        }
    }
}
