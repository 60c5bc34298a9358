//! Plan command implementation
//!
//! Prints the ordered steps a switch would run, without writing the scene.

use anyhow::Result;
use colored::Colorize;
use spaceswitch_bake::{
    Advisory, BakeError, PoseAction, TransitionPlan, TransitionPlanner, TransitionStep,
};
use std::process::ExitCode;

use super::json_output::{error_codes, print_json, JsonError, JsonWarning, PlanOutput};
use super::print_messages;
use crate::input::{load_inputs, BakeOptions, LoadedInputs};
use crate::session::SessionContext;

/// Run the plan command
pub fn run(
    options: &BakeOptions,
    json_output: bool,
    session: &mut SessionContext,
) -> Result<ExitCode> {
    let mut inputs = match load_inputs(options, session) {
        Ok(inputs) => inputs,
        Err(err) if json_output => {
            let error = JsonError::new(error_codes::INPUT_LOAD, format!("{:#}", err));
            print_json(&PlanOutput::failure(vec![error]))?;
            return Ok(ExitCode::from(1));
        }
        Err(err) => return Err(err),
    };

    let result = plan_switch(&mut inputs);

    if json_output {
        let output = match &result {
            Ok((plan, advisories)) => PlanOutput {
                success: true,
                executed: false,
                plan: Some(plan.clone()),
                errors: Vec::new(),
                warnings: advisories.iter().map(JsonWarning::from).collect(),
            },
            Err(err) => PlanOutput::failure(vec![JsonError::from(err)]),
        };
        print_json(&output)?;
    } else {
        println!(
            "{} {} ({}, {})",
            "Planning:".cyan().bold(),
            inputs.preset_path.display(),
            inputs.spec.mode_name(),
            inputs.request.mode
        );
        match &result {
            Ok((plan, advisories)) => {
                let warnings: Vec<JsonWarning> = advisories.iter().map(JsonWarning::from).collect();
                print_messages(&[], &warnings);
                print_plan(plan);
            }
            Err(err) => print_messages(&[JsonError::from(err)], &[]),
        }
    }

    Ok(if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Prepares and builds the plan on the loaded scene copy.
pub fn plan_switch(
    inputs: &mut LoadedInputs,
) -> Result<(TransitionPlan, Vec<Advisory>), BakeError> {
    let planner = TransitionPlanner::new(inputs.settings.clone());
    let prepared = planner.prepare(&inputs.scene, &inputs.spec, &inputs.request)?;
    let plan = planner.build(&mut inputs.scene, &inputs.spec, &prepared)?;
    Ok((plan, prepared.advisories))
}

pub(crate) fn print_plan(plan: &TransitionPlan) {
    println!("\n{} ({} steps)", "Steps:".bold(), plan.len());
    for step in &plan.steps {
        println!("{}", describe_step(step));
    }
}

/// One line per step: frame, role, drivers and targets.
pub(crate) fn describe_step(step: &TransitionStep) -> String {
    let mut parts = Vec::new();
    for driver in &step.set_drivers {
        parts.push(format!("set {}", driver));
    }
    for driver in &step.key_drivers {
        parts.push(format!("key {}.{}", driver.node, driver.attribute));
    }
    for target in &step.targets {
        let action = match &target.action {
            PoseAction::Hold => "hold",
            PoseAction::Apply { .. } => "apply",
            PoseAction::Translate { .. } => "translate",
            PoseAction::Rotate { .. } => "rotate",
            PoseAction::Probe { .. } => "probe",
        };
        parts.push(format!(
            "{} {} [{}]",
            action,
            target.control,
            target.channels.attribute_names().join(" ")
        ));
    }
    format!(
        "  {:>8} {:<12} {}",
        step.time,
        step.role.as_str(),
        parts.join("; ")
    )
}
