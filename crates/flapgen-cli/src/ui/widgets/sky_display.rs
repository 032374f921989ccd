use flapgen_engine::{FIELD_HEIGHT, FIELD_WIDTH, PhysicsParams, Pipe, Position};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// A bird to draw on top of the sky.
#[derive(Debug, Clone, Copy)]
pub struct BirdSprite {
    pub position: Position,
    pub style: Style,
    pub symbol: &'static str,
}

impl BirdSprite {
    pub fn new(position: Position, style: Style) -> Self {
        Self {
            position,
            style,
            symbol: "●",
        }
    }
}

/// The playfield scaled down to the widget area: sky, pipes, ground and birds.
#[derive(Debug)]
pub struct SkyDisplay<'a> {
    pipes: &'a [Pipe],
    birds: Vec<BirdSprite>,
    floor: f64,
    block: Option<BlockWidget<'a>>,
}

impl<'a> SkyDisplay<'a> {
    pub fn new(pipes: &'a [Pipe]) -> Self {
        Self {
            pipes,
            birds: vec![],
            floor: PhysicsParams::DEFAULT.floor,
            block: None,
        }
    }

    /// Birds are drawn in order, so later ones end up on top.
    pub fn birds<I>(self, birds: I) -> Self
    where
        I: IntoIterator<Item = BirdSprite>,
    {
        Self {
            birds: birds.into_iter().collect(),
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn cell_style(&self, x: f64, y: f64) -> Style {
        if y >= self.floor {
            return style::GROUND;
        }
        let in_pipe = self.pipes.iter().any(|pipe| {
            let gap = pipe.gap();
            x >= pipe.x() && x <= pipe.right() && (y < gap.top || y > gap.bottom)
        });
        if in_pipe { style::PIPE } else { style::SKY }
    }
}

/// Maps a world coordinate to a cell offset within `cells` cells.
#[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_cell(value: f64, extent: f64, cells: u16) -> Option<u16> {
    let cell = (value / extent * f64::from(cells)).floor();
    (cell >= 0.0 && cell < f64::from(cells)).then_some(cell as u16)
}

/// World coordinate at the centre of cell `cell` out of `cells`.
fn from_cell(cell: u16, extent: f64, cells: u16) -> f64 {
    (f64::from(cell) + 0.5) * extent / f64::from(cells)
}

impl Widget for SkyDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);
        if area.is_empty() {
            return;
        }

        for row in 0..area.height {
            let y = from_cell(row, FIELD_HEIGHT, area.height);
            for col in 0..area.width {
                let x = from_cell(col, FIELD_WIDTH, area.width);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(" ").set_style(self.cell_style(x, y));
                }
            }
        }

        for bird in &self.birds {
            let Some(col) = to_cell(bird.position.x, FIELD_WIDTH, area.width) else {
                continue;
            };
            let Some(row) = to_cell(bird.position.y, FIELD_HEIGHT, area.height) else {
                continue;
            };
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol(bird.symbol).set_style(bird.style);
            }
        }
    }
}
