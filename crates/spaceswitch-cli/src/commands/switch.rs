//! Switch command implementation
//!
//! Plans and executes a switch on a scene snapshot, then writes the scene
//! back (or to `--output`).

use anyhow::Result;
use colored::Colorize;
use spaceswitch_bake::{BakeError, SwitchReport, Switcher};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use super::json_output::{error_codes, print_json, JsonError, JsonWarning, PlanOutput};
use super::plan::print_plan;
use super::print_messages;
use crate::input::{load_inputs, save_scene, BakeOptions, LoadedInputs};
use crate::session::SessionContext;

/// Run the switch command
///
/// # Arguments
/// * `options` - Preset, scene, settings and bake request options
/// * `output` - Where to write the scene (default: overwrite the input)
/// * `json_output` - Whether to output machine-readable JSON diagnostics
pub fn run(
    options: &BakeOptions,
    output: Option<&str>,
    json_output: bool,
    session: &mut SessionContext,
) -> Result<ExitCode> {
    let start = Instant::now();
    let mut inputs = match load_inputs(options, session) {
        Ok(inputs) => inputs,
        Err(err) if json_output => {
            let error = JsonError::new(error_codes::INPUT_LOAD, format!("{:#}", err));
            print_json(&PlanOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err),
    };
    let out_path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&options.scene));

    if !json_output {
        println!(
            "{} {} ({}, {})",
            "Switching:".cyan().bold(),
            inputs.preset_path.display(),
            inputs.spec.mode_name(),
            inputs.request.mode
        );
    }

    let report = match switch_scene(&mut inputs) {
        Ok(report) => report,
        Err(err) => {
            // Failed mid-run: the snapshot on disk is left as it was.
            if json_output {
                print_json(&PlanOutput::failure(vec![JsonError::from(&err)]))?;
            } else {
                print_messages(&[JsonError::from(&err)], &[]);
                println!("\n{} scene not written", "FAILED".red().bold());
            }
            return Ok(ExitCode::from(1));
        }
    };

    if let Err(err) = save_scene(&inputs.scene, &out_path) {
        if json_output {
            let error = JsonError::new(error_codes::SCENE_WRITE, format!("{:#}", err));
            print_json(&PlanOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
        return Err(err);
    }

    let warnings: Vec<JsonWarning> = report.advisories.iter().map(JsonWarning::from).collect();
    if json_output {
        print_json(&PlanOutput {
            success: true,
            executed: true,
            plan: Some(report.plan),
            errors: Vec::new(),
            warnings,
        })?;
    } else {
        print_messages(&[], &warnings);
        print_plan(&report.plan);
        println!(
            "\n{} Wrote {} ({}ms)",
            "SUCCESS".green().bold(),
            out_path.display(),
            start.elapsed().as_millis()
        );
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the switch on the loaded scene.
pub fn switch_scene(inputs: &mut LoadedInputs) -> Result<SwitchReport, BakeError> {
    Switcher::new(inputs.settings.clone()).run(&mut inputs.scene, &inputs.spec, &inputs.request)
}
