#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod inspect;
pub mod logging;
pub mod merge;
pub mod prune;
pub mod resolve;

pub use cli::{run, run_from_env};
pub use config::TscatConfig;
pub use error::{CliError, Result};
