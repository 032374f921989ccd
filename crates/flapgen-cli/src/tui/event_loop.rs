use std::{
    io,
    time::{Duration, Instant},
};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Produces ticks at a fixed interval, a render after every state change and
/// terminal events in between.
#[derive(Debug)]
pub(super) struct EventLoop {
    tick_interval: Option<Duration>,
    last_tick: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub(super) fn new() -> Self {
        Self {
            tick_interval: None,
            last_tick: Instant::now(),
            // first frame must be drawn before any event arrives
            dirty: true,
        }
    }

    /// Pass `None` to disable tick events.
    pub(super) fn set_tick_interval(&mut self, interval: Option<Duration>) {
        self.tick_interval = interval;
    }

    /// Blocks until the next tick is due or a terminal event arrives.
    pub(super) fn next(&mut self) -> io::Result<TuiEvent> {
        loop {
            if self.dirty {
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            let now = Instant::now();
            let timeout = match self.tick_interval {
                Some(interval) => {
                    let next_tick_at = self.last_tick + interval;
                    if now >= next_tick_at {
                        self.last_tick = now;
                        self.dirty = true;
                        return Ok(TuiEvent::Tick);
                    }
                    Some(next_tick_at - now)
                }
                None => None,
            };

            let ready = match timeout {
                Some(timeout) => event::poll(timeout)?,
                None => true,
            };
            if ready {
                self.dirty = true;
                return Ok(event::read()?.into());
            }
        }
    }
}
