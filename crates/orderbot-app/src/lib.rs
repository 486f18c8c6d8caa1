//! OrderBot application library
//!
//! Command line, configuration and the two hosts (web and terminal) that
//! drive [`orderbot_chat::OrderBot`].

pub mod app;
pub mod cli;
pub mod config;
pub mod web;

pub use app::{run_repl_mode, run_web_server, setup_from_cli, AppConfig};
pub use cli::Cli;
