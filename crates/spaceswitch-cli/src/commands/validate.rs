//! Validate command implementation
//!
//! Checks a preset's shape and, given a scene snapshot, that every reference
//! resolves to a node of the right type.

use anyhow::{Context, Result};
use colored::Colorize;
use spaceswitch_bake::{Advisory, TransitionPlanner};
use spaceswitch_spec::{load_preset, validate_settings, validate_switch, BakeRequest};
use std::path::Path;
use std::process::ExitCode;

use super::json_output::{print_json, JsonError, JsonWarning, ValidateOutput};
use super::print_messages;
use crate::input::{load_scene, load_settings};
use crate::session::SessionContext;

/// Run the validate command
///
/// # Returns
/// Exit code: 0 if valid, 1 if invalid
pub fn run(
    preset: Option<&str>,
    scene: Option<&str>,
    settings: Option<&str>,
    json_output: bool,
    session: &mut SessionContext,
) -> Result<ExitCode> {
    let preset_path = session.resolve_preset(preset)?;
    if !json_output {
        println!("{} {}", "Validating:".cyan().bold(), preset_path.display());
    }

    let output = check(&preset_path, scene.map(Path::new), settings)?;
    session.remember_preset(&preset_path);

    if json_output {
        print_json(&output)?;
    } else {
        if let Some(mode) = &output.mode {
            println!("{} {}", "Mode:".dimmed(), mode);
        }
        print_messages(&output.errors, &output.warnings);
        if output.success {
            println!("\n{} Preset is valid", "SUCCESS".green().bold());
        } else {
            println!(
                "\n{} Preset has {} error(s)",
                "FAILED".red().bold(),
                output.errors.len()
            );
        }
    }

    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Validates a preset file, optionally against a scene snapshot.
///
/// A preset that cannot be read or parsed is an `Err`; everything else is
/// reported in the returned output.
pub fn check(
    preset_path: &Path,
    scene_path: Option<&Path>,
    settings_path: Option<&str>,
) -> Result<ValidateOutput> {
    let spec = load_preset(preset_path)
        .with_context(|| format!("Failed to load preset: {}", preset_path.display()))?;
    let settings = load_settings(settings_path)?;

    let mut result = validate_switch(&spec);
    result.merge(validate_settings(&settings));

    let mut errors: Vec<JsonError> = result.errors.iter().map(JsonError::from).collect();
    let mut warnings: Vec<JsonWarning> = result.warnings.iter().map(JsonWarning::from).collect();

    if let (Some(scene_path), true) = (scene_path, errors.is_empty()) {
        let scene = load_scene(scene_path)?;
        let planner = TransitionPlanner::new(settings);
        match planner.prepare(&scene, &spec, &BakeRequest::current_frame()) {
            Ok(prepared) => warnings.extend(
                prepared
                    .advisories
                    .iter()
                    .filter(|a| matches!(a, Advisory::RotateOrderMismatch { .. }))
                    .map(JsonWarning::from),
            ),
            Err(err) => errors.push(JsonError::from(&err)),
        }
    }

    Ok(ValidateOutput {
        success: errors.is_empty(),
        mode: Some(spec.mode_name().to_string()),
        errors,
        warnings,
    })
}
