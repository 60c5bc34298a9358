//! CLI command implementations

pub mod json_output;
pub mod plan;
pub mod session;
pub mod switch;
pub mod validate;

use colored::Colorize;

use json_output::{JsonError, JsonWarning};

/// Prints coded errors and warnings the same way for every command.
pub(crate) fn print_messages(errors: &[JsonError], warnings: &[JsonWarning]) {
    if !errors.is_empty() {
        println!("\n{}", "Errors:".red().bold());
        for error in errors {
            let path_info = error
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "x".red(),
                error.code.red(),
                path_info.dimmed(),
                error.message
            );
        }
    }

    if !warnings.is_empty() {
        println!("\n{}", "Warnings:".yellow().bold());
        for warning in warnings {
            let path_info = warning
                .path
                .as_ref()
                .map(|p| format!(" at {}", p))
                .unwrap_or_default();
            println!(
                "  {} [{}]{}: {}",
                "!".yellow(),
                warning.code.yellow(),
                path_info.dimmed(),
                warning.message
            );
        }
    }
}
