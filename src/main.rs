//! blokit: play and record Blokus games against the computer from a text shell.
//!
//! ## Usage
//!
//! - `blokit` - Duo against the computer playing the second color
//! - `blokit --variant classic --computer 2,3,4` - four-color game
//! - `blokit --load game.blksgf` - continue a saved record

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use blokit_core::{Color, Variant};
use blokit_engine::{MAX_LEVEL, MIN_LEVEL};
use blokit_game::{Command, GameSession, SessionConfig, Shell};

/// Blokus game recorder and computer opponent
#[derive(Parser)]
#[command(name = "blokit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Game variant: duo, classic, or classic_2
    #[arg(long, default_value = "duo")]
    variant: Variant,

    /// Colors played by the computer, e.g. `2` or `2,4`
    #[arg(long, value_delimiter = ',', default_value = "2")]
    computer: Vec<Color>,

    /// Search level
    #[arg(
        long,
        default_value_t = 3,
        value_parser = clap::value_parser!(u8).range(MIN_LEVEL as i64..=MAX_LEVEL as i64)
    )]
    level: u8,

    /// Never consult the opening book
    #[arg(long)]
    no_book: bool,

    /// Record to open at startup
    #[arg(long)]
    load: Option<PathBuf>,

    /// Log debug output to stderr, overriding `RUST_LOG`
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
    info!("blokit starting");

    if let Some(color) = cli
        .computer
        .iter()
        .find(|c| c.index() >= cli.variant.num_colors())
    {
        anyhow::bail!("color {color} is not in play in {}", cli.variant);
    }

    let config = SessionConfig {
        variant: cli.variant,
        computer: cli.computer,
        level: cli.level,
        use_book: !cli.no_book,
        ..SessionConfig::default()
    };
    let mut shell = Shell::new(GameSession::new(config), io::stdout());
    let start = match cli.load {
        Some(path) => Command::Load(path),
        None => Command::New(None),
    };
    if shell.execute(start).context("failed to write to stdout")?.is_continue() {
        shell.run().context("shell terminated")?;
    }
    Ok(())
}
