//! Output formatting for command results

pub mod console;
pub mod formatter;
pub mod json;

use crate::cli::commands::OutputFormat;
use formatter::OutputFormatter;

/// Formatter for the selected output format
pub fn formatter_for(format: OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(console::ConsoleFormatter),
        OutputFormat::Json => Box::new(json::JsonFormatter),
    }
}

/// Turn ANSI colors off when disabled; otherwise leave terminal detection in charge
pub fn configure_color(enabled: bool) {
    if !enabled {
        colored::control::set_override(false);
    }
}
