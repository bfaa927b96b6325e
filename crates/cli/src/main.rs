use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use audiopref_cli::commands::{run_codecs, run_prefer};
use audiopref_cli::{setup_logging, AppConfig, PreferenceOverrides};
use audiopref_sdp_core::Direction;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "audiopref", version, about = "Reorder SDP codec lists to prefer a codec")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "AUDIOPREF_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (overrides the config file; RUST_LOG overrides both)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Move a codec to the front of a media section's format list
    Prefer {
        /// Media type of the m= line to rewrite
        #[arg(long)]
        media: Option<String>,
        /// Direction, for log output (send or recv)
        #[arg(long)]
        direction: Option<Direction>,
        /// Codec to prefer, e.g. opus/48000; empty means no preference
        #[arg(long)]
        codec: Option<String>,
        /// SDP file to read (stdin if omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
    /// List the codecs offered for a media type
    Codecs {
        /// Media type of the section to list
        #[arg(long, default_value = "audio")]
        media: String,
        /// SDP file to read (stdin if omitted)
        #[arg(long, short)]
        input: Option<PathBuf>,
    },
}

fn open_input(path: Option<&Path>) -> Result<Box<dyn Read>> {
    match path {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Ok(Box::new(file))
        }
        None => Ok(Box::new(io::stdin())),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if cli.json_logs {
        config.logging.json = true;
    }
    setup_logging(&config.logging)?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Prefer {
            media,
            direction,
            codec,
            input,
        } => {
            let overrides = PreferenceOverrides {
                media_type: media,
                direction,
                codec,
            };
            let preference = overrides.apply_to(&config.preference);
            tracing::debug!("Using preference {:?}", preference);
            run_prefer(&preference, &mut open_input(input.as_deref())?, &mut stdout)
        }
        Command::Codecs { media, input } => {
            run_codecs(&media, &mut open_input(input.as_deref())?, &mut stdout)
        }
    }
}
