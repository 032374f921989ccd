use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use flapgen_engine::{Contender, Standing, VersusMatch, VersusParams};
use rand_pcg::Pcg32;
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    text::Line,
    widgets::{Block, Clear, Paragraph},
};

use crate::{
    tui::{App, Tui},
    ui::widgets::{BirdSprite, ScoreboardDisplay, SkyDisplay, contender_color, style},
};

const FPS: f64 = 60.0;

/// A versus match driven by the keyboard.
#[derive(Debug)]
pub(super) struct PlayApp {
    game: VersusMatch,
    rng: Pcg32,
    exit: bool,
}

impl PlayApp {
    pub(super) fn new(params: VersusParams, mut rng: Pcg32) -> Self {
        Self {
            game: VersusMatch::new(params, &mut rng),
            rng,
            exit: false,
        }
    }

    pub(super) fn standings(&self) -> Vec<Standing> {
        self.game.standings()
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char(' ') | KeyCode::Up => self.game.request_flap(),
            KeyCode::Char('r') if self.game.state().is_game_over() => {
                self.game.restart(&mut self.rng);
            }
            KeyCode::Char('q') | KeyCode::Esc => self.exit = true,
            _ => {}
        }
    }
}

impl App for PlayApp {
    fn init(&mut self, tui: &mut Tui) {
        tui.set_tick_rate(FPS);
    }

    fn should_exit(&self) -> bool {
        self.exit
    }

    fn handle_event(&mut self, _tui: &mut Tui, event: Event) {
        if let Event::Key(key) = event {
            self.handle_key(key);
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let sprites = self
            .game
            .birds()
            .filter(|(_, bird)| bird.is_alive())
            .map(|(contender, bird)| {
                BirdSprite::new(bird.position(), style::on_sky(contender_color(contender)))
            })
            .collect::<Vec<_>>();
        // draw the player last so it stays visible when birds overlap
        let sprites = sprites.iter().skip(1).chain(sprites.iter().take(1)).copied();
        let sky = SkyDisplay::new(self.game.pipes())
            .birds(sprites)
            .block(Block::bordered().title(Line::from("FLAPGEN VERSUS").centered()));

        let standings = self.game.standings();
        let scoreboard = ScoreboardDisplay::new(&standings).block(
            Block::bordered()
                .title(Line::from("SCORE").centered())
                .style(style::DEFAULT),
        );

        let [sky_area, side_area] =
            Layout::horizontal([Constraint::Fill(1), Constraint::Length(24)]).areas(frame.area());
        let [score_area, help_area] =
            Layout::vertical([Constraint::Length(6), Constraint::Fill(1)]).areas(side_area);
        frame.render_widget(sky, sky_area);
        frame.render_widget(scoreboard, score_area);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from("space: flap"),
                Line::from("r: restart"),
                Line::from("q: quit"),
            ])
            .style(style::DIM)
            .block(Block::bordered().style(style::DEFAULT)),
            help_area,
        );

        if self.game.state().is_game_over() {
            let message = match self.game.winner() {
                Contender::Human => "You win!".to_owned(),
                winner => format!("{winner} wins"),
            };
            let [popup] = Layout::vertical([Constraint::Length(4)])
                .flex(Flex::Center)
                .areas(sky_area);
            let [popup] = Layout::horizontal([Constraint::Length(24)])
                .flex(Flex::Center)
                .areas(popup);
            frame.render_widget(Clear, popup);
            frame.render_widget(
                Paragraph::new(vec![
                    Line::from("GAME OVER").centered(),
                    Line::from(message).centered(),
                ])
                .block(Block::bordered().border_style(style::DEFAULT))
                .style(style::DEFAULT),
                popup,
            );
        }
    }

    fn update(&mut self, _tui: &mut Tui) {
        self.game.step(&mut self.rng);
    }
}
