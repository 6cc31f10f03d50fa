//! Command-line surface: argument parsing and diagnostic logging setup.

pub mod args;
pub mod logging;

pub use args::Cli;
pub use logging::init_tracing;
