//! Command-line interface for Stream Sentry
//!
//! Argument parsing, the check command handler, and progress rendering.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::Cli;
pub use commands::handle_check;
pub use progress::BatchProgressBar;
