use crossterm::event::Event;
use ratatui::Frame;

use crate::tui::Tui;

/// A screen driven by [`Tui::run`].
pub trait App {
    /// Runs once before the first frame; set the tick rate here.
    fn init(&mut self, tui: &mut Tui);

    fn should_exit(&self) -> bool;

    fn handle_event(&mut self, tui: &mut Tui, event: Event);

    /// Renders the current state. Only called after something changed.
    fn draw(&self, frame: &mut Frame);

    /// Advances the state by one tick.
    fn update(&mut self, tui: &mut Tui);
}
