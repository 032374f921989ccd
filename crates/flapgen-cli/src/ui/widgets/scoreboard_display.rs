use flapgen_engine::{Contender, Standing};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::Color,
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::{color, style};

/// Ranked scores of a versus match.
#[derive(Debug)]
pub struct ScoreboardDisplay<'a> {
    standings: &'a [Standing],
    block: Option<BlockWidget<'a>>,
}

impl<'a> ScoreboardDisplay<'a> {
    pub fn new(standings: &'a [Standing]) -> Self {
        Self {
            standings,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }
}

pub fn contender_color(contender: Contender) -> Color {
    match contender {
        Contender::Human => color::YELLOW,
        Contender::Ai(index) => color::OPPONENTS[index % color::OPPONENTS.len()],
    }
}

impl Widget for ScoreboardDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let row_areas =
            Layout::vertical(self.standings.iter().map(|_| Constraint::Length(1))).split(area);
        for (rank, (standing, area)) in self.standings.iter().zip(row_areas.iter()).enumerate() {
            let marker = Span::styled("● ", style::DEFAULT.fg(contender_color(standing.contender)));
            let text_style = if standing.alive {
                style::DEFAULT
            } else {
                style::DIM
            };
            let [label_area, value_area] = area.layout(&Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(6),
            ]));
            Line::from(vec![
                Span::styled(format!("{}. ", rank + 1), text_style),
                marker,
                Span::styled(standing.contender.to_string(), text_style),
            ])
            .render(label_area, buf);
            Line::styled(standing.score.to_string(), text_style)
                .right_aligned()
                .render(value_area, buf);
        }
    }
}
