pub mod commands;
pub mod output;

pub use commands::{run_cli, CliError};
