//! `storefront` command line: drive the cart store from a terminal.

pub mod cli;
pub mod config;
pub mod render;

pub use cli::{Cli, Commands, Report};
pub use config::CliConfig;
