use std::iter;

use flapgen_training::trainer::{EvolutionStatus, GenerationSummary};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Progress panel of an evolution run.
#[derive(Debug)]
pub struct GenerationStatsDisplay<'a> {
    status: EvolutionStatus,
    frame: usize,
    alive: usize,
    population: usize,
    last: Option<&'a GenerationSummary>,
    turbo: bool,
    block: Option<BlockWidget<'a>>,
}

impl<'a> GenerationStatsDisplay<'a> {
    pub fn new(status: EvolutionStatus, frame: usize, alive: usize, population: usize) -> Self {
        Self {
            status,
            frame,
            alive,
            population,
            last: None,
            turbo: false,
            block: None,
        }
    }

    /// Summary of the previous generation, if there was one.
    pub fn last(self, last: Option<&'a GenerationSummary>) -> Self {
        Self { last, ..self }
    }

    pub fn turbo(self, turbo: bool) -> Self {
        Self { turbo, ..self }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            (
                "GENERATION:",
                format!(
                    "{}/{}",
                    self.status.generation + 1,
                    self.status.generations
                ),
            ),
            ("FRAME:", self.frame.to_string()),
            ("ALIVE:", format!("{}/{}", self.alive, self.population)),
            ("BEST EVER:", format!("{:.1}", self.status.best_fitness)),
            ("", String::new()),
        ];
        if let Some(last) = self.last {
            rows.extend([
                ("LAST BEST:", format!("{:.1}", last.stats.max)),
                ("LAST MEAN:", format!("{:.1}", last.stats.mean)),
                ("LAST WORST:", format!("{:.1}", last.stats.min)),
                ("SURVIVORS:", last.survivors.to_string()),
            ]);
        }
        rows
    }
}

impl Widget for GenerationStatsDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let mut rows = self.rows();
        rows.push(("", String::new()));
        rows.push((if self.turbo { "TURBO" } else { "" }, String::new()));
        rows.push(("q: quit", String::new()));

        let row_areas = Layout::vertical(rows.iter().map(|_| Constraint::Length(1))).split(area);
        for ((label, value), area) in iter::zip(rows, row_areas.iter().copied()) {
            let [label_area, value_area] = area.layout(&Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Fill(1),
            ]));
            Line::styled(label, style::DEFAULT)
                .left_aligned()
                .render(label_area, buf);
            Line::styled(value, style::DEFAULT)
                .right_aligned()
                .render(value_area, buf);
        }
    }
}
