#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a Wavefront Chase in the terminal.

mod driver;

use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use wavefront_chase_rendering::{ClearMode, Glyphs, TextBackend};
use wavefront_chase_simulation::{Config, Simulation};

use crate::driver::Outcome;

/// Watch a pursuer chase a wandering enemy across a grid.
#[derive(Debug, Parser)]
#[command(name = "wavefront-chase", version)]
struct CliArgs {
    /// Board width in cells; prompted for when omitted.
    #[arg(long, allow_negative_numbers = true)]
    width: Option<i64>,
    /// Board height in cells; prompted for when omitted.
    #[arg(long, allow_negative_numbers = true)]
    height: Option<i64>,
    /// Pause between ticks, in milliseconds.
    #[arg(long, default_value_t = 700)]
    delay_ms: u64,
    /// Print blank lines between frames instead of clearing the terminal.
    #[arg(long)]
    no_clear: bool,
    /// Seed for the enemy's random walk; drawn at random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Give up after this many ticks.
    #[arg(long)]
    max_ticks: Option<u64>,
}

/// Entry point for the Wavefront Chase command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let (width, height) = match (args.width, args.height) {
        (Some(width), Some(height)) => (width, height),
        _ => driver::prompt_dimensions(io::stdin().lock(), io::stdout())?,
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("enemy walk seed: {seed:#x}");

    let mut simulation = Simulation::new(Config::new(width, height).with_seed(seed))
        .context("failed to set up the board")?;

    let clear_mode = if args.no_clear {
        ClearMode::Newlines
    } else {
        ClearMode::Clear
    };
    let mut backend = TextBackend::new(io::stdout().lock(), Glyphs::default(), clear_mode);

    match driver::run(
        &mut simulation,
        &mut backend,
        Duration::from_millis(args.delay_ms),
        args.max_ticks,
    )? {
        Outcome::Caught { ticks } => println!("Enemy caught after {ticks} ticks."),
        Outcome::Stopped { ticks } => println!("Gave up after {ticks} ticks."),
    }

    Ok(())
}
