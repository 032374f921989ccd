use std::time::Duration;

use crate::tui::{App, event::TuiEvent, event_loop::EventLoop};

/// Fixed-rate terminal runtime for an [`App`].
#[derive(Default, Debug)]
pub struct Tui {
    events: EventLoop,
}

impl Tui {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ticks per second. Ticks stay disabled until this is called.
    pub fn set_tick_rate(&mut self, rate: f64) {
        let interval = Duration::from_secs_f64(1.0 / rate);
        self.events.set_tick_interval(Some(interval));
    }

    /// Takes over the terminal and drives `app` until it asks to exit.
    ///
    /// Ticks go to [`App::update`], key and resize events to
    /// [`App::handle_event`], and every change is followed by one [`App::draw`].
    pub fn run<A>(mut self, app: &mut A) -> anyhow::Result<()>
    where
        A: App,
    {
        app.init(&mut self);

        ratatui::run(|terminal| {
            while !app.should_exit() {
                match self.events.next()? {
                    TuiEvent::Tick => app.update(&mut self),
                    TuiEvent::Crossterm(event) => app.handle_event(&mut self, event),
                    TuiEvent::Render => {
                        terminal.draw(|frame| app.draw(frame))?;
                    }
                }
            }
            Ok(())
        })
    }
}
