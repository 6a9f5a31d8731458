//! Command implementations.

mod config;
mod history;
mod run;

pub use config::cmd_config;
pub use history::cmd_history;
pub use run::{cmd_run, execute, summary};
