//! Minimal tick/render loop for ratatui applications.

mod app;
mod event;
mod event_loop;
mod pacer;
mod runner;

pub use self::{app::App, pacer::Pacer, runner::Tui};
