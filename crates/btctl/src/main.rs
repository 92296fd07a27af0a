//! btctl - BlueTiger motion platform CLI
//!
//! Drives a BlueTiger platform through the vendor driver: status checks,
//! effect playback, direct movement, telemetry replay and the deprecated
//! configuration calls.

#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(clippy::unwrap_used)]

mod commands;
mod completion;
mod error;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::*;
use crate::error::CliError;

#[derive(Parser)]
#[command(name = "btctl")]
#[command(about = "BlueTiger motion platform control")]
#[command(version)]
#[command(long_about = "
btctl talks to a BlueTiger motion platform through the vendor BTApi driver.
Every command opens a session (BTInit), does its work and shuts down again.

Use --mock to run against an in-memory platform without hardware.
Use --json for machine-readable output suitable for scripting.
")]
struct Cli {
    #[arg(
        long,
        global = true,
        help = "Output in JSON format for machine parsing"
    )]
    json: bool,

    /// Verbose logging
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file (YAML, JSON or key=value)
    #[arg(long, global = true, env = "BTCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Driver library, overriding the configuration
    #[arg(long, global = true, env = "BTCTL_LIBRARY", conflicts_with = "mock")]
    library: Option<PathBuf>,

    /// Use an in-memory platform instead of the driver
    #[arg(long, global = true)]
    mock: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report the platform status word
    Status,

    /// Show driver and device information
    Info,

    /// Pause motion
    Pause {
        /// Resume again after this many seconds
        #[arg(long)]
        hold_secs: Option<f64>,
    },

    /// Resume motion
    Resume,

    /// Effect scripts and playback
    #[command(subcommand)]
    Effect(EffectCommands),

    /// Move the platform directly
    #[command(subcommand)]
    Move(MoveCommands),

    /// Replay recorded simulator telemetry
    Feed(FeedArgs),

    /// Deprecated controller configuration
    #[command(subcommand)]
    Legacy(LegacyCommands),

    /// Configuration files
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("btctl={log_level},bluetiger={log_level}").into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    match execute_command(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                output::print_error_json(&e);
            } else {
                output::print_error_human(&e);
            }

            let code = e.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
            ExitCode::from(code)
        }
    }
}

async fn execute_command(cli: &Cli) -> Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        completion::generate_completion(*shell);
        return Ok(());
    }

    let ctx = Context::new(cli.config.as_deref(), cli.library.clone(), cli.mock, cli.json)?;
    match &cli.command {
        Commands::Status => commands::device::status(&ctx)?,
        Commands::Info => commands::device::info(&ctx)?,
        Commands::Pause { hold_secs } => commands::device::pause(&ctx, *hold_secs).await?,
        Commands::Resume => commands::device::resume(&ctx)?,
        Commands::Effect(cmd) => commands::effect::execute(cmd, &ctx)?,
        Commands::Move(cmd) => commands::motion::execute(cmd, &ctx)?,
        Commands::Feed(args) => commands::feed::execute(args, &ctx).await?,
        Commands::Legacy(cmd) => commands::legacy::execute(cmd, &ctx)?,
        Commands::Config(cmd) => commands::config::execute(cmd, &ctx)?,
        Commands::Completion { .. } => {}
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    type TestResult = Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn parse_status_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["btctl", "status"])?;
        assert!(!cli.json);
        assert!(!cli.mock);
        assert_eq!(cli.verbose, 0);
        assert!(matches!(cli.command, Commands::Status));
        Ok(())
    }

    #[test]
    fn parse_global_flags_after_subcommand() -> TestResult {
        let cli = Cli::try_parse_from(["btctl", "info", "--json", "--mock", "-vv"])?;
        assert!(cli.json);
        assert!(cli.mock);
        assert_eq!(cli.verbose, 2);
        Ok(())
    }

    #[test]
    fn library_conflicts_with_mock() {
        let result = Cli::try_parse_from(["btctl", "--mock", "--library", "x.so", "status"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_effect_play_defaults() -> TestResult {
        let cli = Cli::try_parse_from(["btctl", "effect", "play", "--slot", "4"])?;
        match cli.command {
            Commands::Effect(EffectCommands::Play {
                slot,
                amplitude,
                repetitions,
                file,
            }) => {
                assert_eq!(slot, 4);
                assert_eq!(amplitude, 255);
                assert_eq!(repetitions, 1);
                assert!(file.is_none());
            }
            _ => return Err("expected effect play".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_move_accepts_negative_values() -> TestResult {
        let cli = Cli::try_parse_from([
            "btctl",
            "move",
            "relative",
            "--position",
            "-0.1,0,0.05",
            "--angle",
            "-0.2",
        ])?;
        match cli.command {
            Commands::Move(MoveCommands::Relative(args)) => {
                assert!((args.position.x + 0.1).abs() < 1e-6);
                assert!((args.angle + 0.2).abs() < 1e-6);
            }
            _ => return Err("expected move relative".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_slot_out_of_range_rejected() {
        let result = Cli::try_parse_from(["btctl", "effect", "stop", "--slot", "256"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_feed_mode() -> TestResult {
        let cli = Cli::try_parse_from([
            "btctl", "feed", "--frames", "lap.jsonl", "--mode", "pitch-roll", "--fast",
        ])?;
        match cli.command {
            Commands::Feed(args) => {
                assert_eq!(args.mode, Some(FeedModeArg::PitchRoll));
                assert!(args.fast);
            }
            _ => return Err("expected feed".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_feed_rotation_vector_mode() -> TestResult {
        let cli = Cli::try_parse_from([
            "btctl", "feed", "--frames", "lap.jsonl", "--mode", "rotation-vector",
        ])?;
        match cli.command {
            Commands::Feed(args) => assert_eq!(args.mode, Some(FeedModeArg::RotationVector)),
            _ => return Err("expected feed".into()),
        }
        Ok(())
    }

    #[test]
    fn parse_legacy_address_set() -> TestResult {
        let cli = Cli::try_parse_from([
            "btctl",
            "legacy",
            "address",
            "set",
            "--mac",
            "00:1a:2b:3c:4d:5e",
            "--ip",
            "10.0.0.5",
            "--netmask",
            "255.0.0.0",
            "--router",
            "10.0.0.1",
        ])?;
        assert!(matches!(
            cli.command,
            Commands::Legacy(LegacyCommands::Address(AddressCommands::Set { dhcp: false, .. }))
        ));
        Ok(())
    }
}
