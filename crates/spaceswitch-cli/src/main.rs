//! Spaceswitch CLI - space and IK/FK switches on scene snapshots
//!
//! This binary validates switch presets, prints transition plans and runs
//! switches against JSON scene snapshots.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use spaceswitch_cli::commands;
use spaceswitch_cli::input::BakeOptions;
use spaceswitch_cli::session::SessionContext;

/// Spaceswitch - flip a control's space or IK/FK mode without moving it
#[derive(Parser)]
#[command(name = "spaceswitch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Session file (default: <config dir>/spaceswitch/session.json)
    #[arg(long, global = true)]
    session: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a preset, optionally against a scene snapshot
    Validate {
        /// Path to the preset file (default: last preset)
        #[arg(short, long)]
        preset: Option<String>,

        /// Scene snapshot to check references against
        #[arg(long)]
        scene: Option<String>,

        /// Path to a settings file (JSON)
        #[arg(long)]
        settings: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Print the steps a switch would run without writing the scene
    Plan {
        #[command(flatten)]
        bake: BakeArgs,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Run a switch and write the resulting scene
    Switch {
        #[command(flatten)]
        bake: BakeArgs,

        /// Output scene path (default: overwrite the input scene)
        #[arg(short, long)]
        output: Option<String>,

        /// Output machine-readable JSON diagnostics (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Show or clear the session context
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Args)]
struct BakeArgs {
    /// Path to the preset file (default: last preset)
    #[arg(short, long)]
    preset: Option<String>,

    /// Path to the scene snapshot (JSON)
    #[arg(short, long)]
    scene: String,

    /// Path to a settings file (JSON)
    #[arg(long)]
    settings: Option<String>,

    /// Which frames to switch (current, keys, every)
    #[arg(short, long, default_value = "current", value_parser = ["current", "keys", "every"])]
    mode: String,

    /// First frame of the bake window
    #[arg(long, requires = "end")]
    start: Option<f64>,

    /// Last frame of the bake window
    #[arg(long, requires = "start")]
    end: Option<f64>,

    /// Reuse the last window from the session
    #[arg(long, conflicts_with_all = ["start", "end"])]
    last_window: bool,
}

impl From<BakeArgs> for BakeOptions {
    fn from(args: BakeArgs) -> Self {
        BakeOptions {
            preset: args.preset,
            scene: args.scene,
            settings: args.settings,
            mode: args.mode,
            start: args.start,
            end: args.end,
            last_window: args.last_window,
        }
    }
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Print the remembered preset, directory and window
    Show {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
    /// Forget the remembered values
    Clear,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let session_path = cli
        .session
        .map(PathBuf::from)
        .or_else(SessionContext::default_path);
    let mut session = match &session_path {
        Some(path) => SessionContext::load(path).unwrap_or_else(|e| {
            log::warn!("ignoring session file: {:#}", e);
            SessionContext::default()
        }),
        None => SessionContext::default(),
    };

    let result = match cli.command {
        Commands::Validate {
            preset,
            scene,
            settings,
            json,
        } => commands::validate::run(
            preset.as_deref(),
            scene.as_deref(),
            settings.as_deref(),
            json,
            &mut session,
        ),
        Commands::Plan { bake, json } => {
            commands::plan::run(&BakeOptions::from(bake), json, &mut session)
        }
        Commands::Switch { bake, output, json } => commands::switch::run(
            &BakeOptions::from(bake),
            output.as_deref(),
            json,
            &mut session,
        ),
        Commands::Session { command } => match command {
            SessionCommands::Show { json } => commands::session::show(
                &session,
                session_path
                    .as_deref()
                    .unwrap_or_else(|| std::path::Path::new("-")),
                json,
            ),
            SessionCommands::Clear => commands::session::clear(&mut session),
        },
    };

    if result.is_ok() {
        if let Some(path) = &session_path {
            if let Err(e) = session.save(path) {
                log::warn!("could not save session: {:#}", e);
            }
        }
    }

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_switch() {
        let cli = Cli::try_parse_from([
            "spaceswitch",
            "switch",
            "--preset",
            "hand.json",
            "--scene",
            "shot.json",
            "--mode",
            "keys",
            "--start",
            "10",
            "--end",
            "40",
            "-o",
            "out.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Switch { bake, output, json } => {
                assert_eq!(bake.preset.as_deref(), Some("hand.json"));
                assert_eq!(bake.scene, "shot.json");
                assert_eq!(bake.mode, "keys");
                assert_eq!(bake.start, Some(10.0));
                assert_eq!(bake.end, Some(40.0));
                assert_eq!(output.as_deref(), Some("out.json"));
                assert!(!json);
            }
            _ => panic!("expected switch command"),
        }
    }

    #[test]
    fn test_cli_defaults_to_current_frame() {
        let cli = Cli::try_parse_from(["spaceswitch", "plan", "-s", "shot.json"]).unwrap();
        match cli.command {
            Commands::Plan { bake, .. } => {
                assert_eq!(bake.mode, "current");
                assert!(bake.preset.is_none());
                assert!(!bake.last_window);
            }
            _ => panic!("expected plan command"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let result = Cli::try_parse_from([
            "spaceswitch",
            "plan",
            "-s",
            "shot.json",
            "--mode",
            "sometimes",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_start_requires_end() {
        let args = ["spaceswitch", "plan", "-s", "shot.json", "--start", "3"];
        let result = Cli::try_parse_from(args);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_counts_verbosity() {
        let cli = Cli::try_parse_from(["spaceswitch", "-vv", "session", "show"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Session {
                command: SessionCommands::Show { json },
            } => assert!(!json),
            _ => panic!("expected session show"),
        }
    }

    #[test]
    fn test_cli_parses_validate_with_scene() {
        let cli = Cli::try_parse_from([
            "spaceswitch",
            "validate",
            "-p",
            "arm.json",
            "--scene",
            "shot.json",
            "--json",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate {
                preset,
                scene,
                json,
                ..
            } => {
                assert_eq!(preset.as_deref(), Some("arm.json"));
                assert_eq!(scene.as_deref(), Some("shot.json"));
                assert!(json);
            }
            _ => panic!("expected validate command"),
        }
    }
}
