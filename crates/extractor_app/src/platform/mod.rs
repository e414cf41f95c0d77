//! Terminal front end: configuration, command input, rendering and effect execution.
mod app;
pub mod config;
mod effects;
mod ui;

pub use app::run_app;
