use std::{io, time::Duration};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use flapgen_engine::{FlightView, FrameControl};
use flapgen_training::trainer::{EvolutionObserver, EvolutionStatus, GenerationSummary};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    text::Line,
    widgets::Block,
};

use crate::{
    tui::Pacer,
    ui::widgets::{BirdSprite, GenerationStatsDisplay, SkyDisplay, style},
};

const FPS: f64 = 45.0;

/// Draws every frame of an evolution run and turns `q`/`Esc` into a quit.
pub(super) struct TerminalObserver<'a> {
    terminal: &'a mut DefaultTerminal,
    population: usize,
    turbo: bool,
    pacer: Pacer,
    last: Option<GenerationSummary>,
    error: Option<io::Error>,
}

impl<'a> TerminalObserver<'a> {
    pub(super) fn new(terminal: &'a mut DefaultTerminal, population: usize, turbo: bool) -> Self {
        Self {
            terminal,
            population,
            turbo,
            pacer: Pacer::from_rate(FPS),
            last: None,
            error: None,
        }
    }

    /// Reports the first terminal error that interrupted the run, if any.
    pub(super) fn finish(mut self) -> anyhow::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err.into());
        }
        Ok(())
    }

    /// Drains pending terminal events. Returns whether the user asked to quit.
    fn handle_events(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
                KeyCode::Char('t') => self.turbo = !self.turbo,
                _ => {}
            }
        }
        Ok(false)
    }

    fn frame(&mut self, status: &EvolutionStatus, view: &FlightView<'_>) -> io::Result<FrameControl> {
        if self.handle_events()? {
            return Ok(FrameControl::Quit);
        }

        let due = if self.turbo {
            self.pacer.poll()
        } else {
            self.pacer.wait();
            true
        };
        if due {
            let stats = GenerationStatsDisplay::new(
                *status,
                view.frame(),
                view.alive_count(),
                self.population,
            )
            .last(self.last.as_ref())
            .turbo(self.turbo)
            .block(Block::bordered().title(Line::from("STATS").centered()));
            self.terminal
                .draw(|frame| draw_view(frame, view, stats))?;
        }
        Ok(FrameControl::Continue)
    }
}

fn draw_view(frame: &mut Frame, view: &FlightView<'_>, stats: GenerationStatsDisplay<'_>) {
    let leader = view.leader();
    let followers = view
        .birds()
        .iter()
        .enumerate()
        .filter(|&(index, bird)| bird.is_alive() && Some(index) != leader)
        .map(|(_, bird)| BirdSprite::new(bird.position(), style::BIRD));
    let leader = leader.map(|index| BirdSprite::new(view.birds()[index].position(), style::LEADER));
    let sky = SkyDisplay::new(view.pipes())
        .birds(followers.chain(leader))
        .block(Block::bordered().title(Line::from("FLAPGEN").centered()));

    let [sky_area, stats_area] =
        Layout::horizontal([Constraint::Fill(1), Constraint::Length(28)]).areas(frame.area());
    frame.render_widget(sky, sky_area);
    frame.render_widget(stats, stats_area);
}

impl EvolutionObserver for TerminalObserver<'_> {
    fn on_frame(&mut self, status: &EvolutionStatus, view: &FlightView<'_>) -> FrameControl {
        match self.frame(status, view) {
            Ok(control) => control,
            Err(err) => {
                self.error = Some(err);
                FrameControl::Quit
            }
        }
    }

    fn on_generation(&mut self, summary: &GenerationSummary) {
        self.last = Some(*summary);
    }
}
