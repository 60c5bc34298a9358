//! Session command implementation
//!
//! Shows or clears the persisted session context.

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use std::process::ExitCode;

use crate::session::SessionContext;

/// Print the session context.
pub fn show(session: &SessionContext, path: &Path, json_output: bool) -> Result<ExitCode> {
    if json_output {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Session:".cyan().bold(), path.display());
    let unset = || "-".dimmed().to_string();
    println!(
        "  {:<16} {}",
        "last directory",
        session
            .last_directory
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(unset)
    );
    println!(
        "  {:<16} {}",
        "last preset",
        session
            .last_preset
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(unset)
    );
    println!(
        "  {:<16} {}",
        "last window",
        session
            .last_window
            .map(|w| format!("{}..{}", w.start, w.end))
            .unwrap_or_else(unset)
    );
    Ok(ExitCode::SUCCESS)
}

/// Forget every remembered value.
pub fn clear(session: &mut SessionContext) -> Result<ExitCode> {
    session.clear();
    println!("{} session cleared", "OK".green().bold());
    Ok(ExitCode::SUCCESS)
}
