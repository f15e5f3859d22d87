//! Marquee CLI - Headless lifecycle demo host
//!
//! Features:
//! - Scripted lifecycle signal simulation against the simulated engine
//! - Policy inspection per host capability tier
//! - Text and JSON reports

use clap::{Parser, Subcommand};

mod commands;
mod output;

/// Marquee CLI - playback lifecycle toolkit
#[derive(Parser)]
#[command(name = "marquee-cli")]
#[command(version)]
#[command(about = "Playback session lifecycle simulation and inspection", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive a session through a sequence of host lifecycle signals
    Simulate {
        /// Media locator the session prepares on every activation
        #[arg(default_value = "https://storage.example.com/media/jazz_in_paris.mp3")]
        uri: String,

        /// Comma-separated signals (startable, visible, focus-lost, stopped)
        #[arg(
            short,
            long,
            default_value = "startable,visible,focus-lost,stopped,startable,visible"
        )]
        signals: String,

        /// Host platform API level (decides the lifecycle policy)
        #[arg(short, long, default_value = "24")]
        api_level: u32,

        /// Milliseconds of playback progress per signal while active
        #[arg(long, default_value = "5000")]
        advance_ms: u64,

        /// Start with playback paused instead of auto-playing
        #[arg(long)]
        paused: bool,

        /// Skip re-preparation when activation finds a live handle
        #[arg(long)]
        no_reprepare: bool,
    },

    /// Show which signals each policy reacts to
    Policies {
        /// Host platform API level (omit to show both tiers)
        #[arg(short, long)]
        api_level: Option<u32>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(level).init();

    match cli.command {
        Commands::Simulate {
            uri,
            signals,
            api_level,
            advance_ms,
            paused,
            no_reprepare,
        } => {
            commands::simulate(
                &uri,
                &signals,
                api_level,
                advance_ms,
                paused,
                no_reprepare,
                &cli.format,
            )?;
        }
        Commands::Policies { api_level } => {
            commands::policies(api_level, &cli.format);
        }
    }

    Ok(())
}
