use std::ops::RangeInclusive;

use rand::Rng;

use crate::core::Position;

/// Identifies a pipe within one course. Ids grow in spawn order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PipeId(u64);

impl PipeId {
    pub(crate) const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Vertical bounds of the passable opening of a pipe.
///
/// Everything above `top` and below `bottom` is solid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap {
    pub top: f64,
    pub bottom: f64,
}

impl Gap {
    /// Creates a gap of `size` units centred on `center`.
    #[must_use]
    pub fn around(center: f64, size: f64) -> Self {
        let half = size / 2.0;
        Self {
            top: center - half,
            bottom: center + half,
        }
    }

    /// Creates a gap of `size` units with its centre drawn uniformly from `centers`.
    pub fn random<R>(rng: &mut R, centers: RangeInclusive<f64>, size: f64) -> Self
    where
        R: Rng + ?Sized,
    {
        Self::around(rng.random_range(centers), size)
    }

    #[must_use]
    pub fn center(&self) -> f64 {
        f64::midpoint(self.top, self.bottom)
    }
}

/// A scrolling obstacle: two solid columns separated by a [`Gap`].
///
/// # Collision
///
/// [`Pipe::collides`] treats the bird as the bounding box of its circle, not
/// as a true circle. A bird grazing the corner of a pipe with its box but not
/// with its circle still dies.
///
/// ```
/// use flapgen_engine::{Gap, Pipe, Position};
///
/// let bird = Position::new(100.0, 300.0);
/// let pipe = Pipe::new(100.0, 80.0, Gap { top: 100.0, bottom: 500.0 });
/// assert!(!pipe.collides(bird, 12.0));
///
/// let pipe = Pipe::new(100.0, 80.0, Gap { top: 310.0, bottom: 500.0 });
/// assert!(pipe.collides(bird, 12.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pipe {
    id: PipeId,
    x: f64,
    width: f64,
    gap: Gap,
}

impl Pipe {
    /// Creates a standalone pipe with id 0. Courses assign their own ids.
    #[must_use]
    pub const fn new(x: f64, width: f64, gap: Gap) -> Self {
        Self::with_id(PipeId::new(0), x, width, gap)
    }

    pub(crate) const fn with_id(id: PipeId, x: f64, width: f64, gap: Gap) -> Self {
        Self { id, x, width, gap }
    }

    #[must_use]
    pub const fn id(&self) -> PipeId {
        self.id
    }

    /// Left edge.
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.x
    }

    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Right (trailing) edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[must_use]
    pub const fn gap(&self) -> Gap {
        self.gap
    }

    pub(crate) fn scroll(&mut self, dx: f64) {
        self.x -= dx;
    }

    pub(crate) fn relocate(&mut self, x: f64, gap: Gap) {
        self.x = x;
        self.gap = gap;
    }

    /// Returns whether a bird of the given `radius` centred at `center` hits this pipe.
    ///
    /// True iff the horizontal extents overlap and the vertical extent of the
    /// bird reaches above the gap top or below the gap bottom.
    #[must_use]
    pub fn collides(&self, center: Position, radius: f64) -> bool {
        let overlaps_x = center.x + radius > self.x && center.x - radius < self.right();
        let outside_gap = center.y - radius < self.gap.top || center.y + radius > self.gap.bottom;
        overlaps_x && outside_gap
    }

    /// Returns whether the trailing edge is more than `margin` units behind `bird_x`.
    #[must_use]
    pub fn is_cleared_by(&self, bird_x: f64, margin: f64) -> bool {
        self.right() < bird_x - margin
    }
}
