//! Presentation layer for chamber-vote
//!
//! This crate contains CLI definitions and output formatters.

pub mod cli;
pub mod output;

// Re-export commonly used types
pub use cli::commands::{
    AddInitiativeArgs, Cli, Command, CreateSessionArgs, InitiativeCommand, OutputFormat,
    SessionCommand, VoteCommand,
};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{OutputFormatter, TallyView};
pub use output::{configure_color, formatter_for};
pub use output::json::JsonFormatter;
