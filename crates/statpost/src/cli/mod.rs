//! Command-line interface module.

mod commands;
mod run;
mod state;

pub use commands::{Cli, Commands, OutputFormat};
pub use run::{invoke_once, run_once};
pub use state::show_state;
