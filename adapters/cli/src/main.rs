#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless command-line driver for Cabin Chase.

mod config;
mod script;
mod simulation;
mod throttle;

use std::{
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{ensure, Context, Result};
use cabin_chase_world::query;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use self::{
    config::load_session_config,
    script::InputScript,
    simulation::Simulation,
    throttle::{FrameThrottle, MIN_FRAME_INTERVAL},
};

/// Command-line arguments accepted by the driver.
#[derive(Debug, Parser)]
#[command(name = "cabin-chase", about = "Runs a Cabin Chase session without a window")]
struct Args {
    /// TOML file with session tuning; defaults apply to missing fields.
    #[arg(long)]
    config: Option<PathBuf>,
    /// TOML input script replacing the keyboard; defaults to pressing start.
    #[arg(long)]
    script: Option<PathBuf>,
    /// Overrides the random seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Maximum number of frames to simulate.
    #[arg(long, default_value_t = 600)]
    frames: u64,
    /// Simulated duration of a frame in milliseconds.
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,
    /// Paces frames against the wall clock instead of running flat out.
    #[arg(long)]
    realtime: bool,
}

/// Entry point for the Cabin Chase command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    ensure!(args.frame_ms > 0, "--frame-ms must be at least 1");

    let mut config = load_session_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    let player_speed = config.player_speed;

    let script = match args.script.as_deref() {
        Some(path) => InputScript::load(path)?,
        None => InputScript::idle(),
    };
    let mut simulation = Simulation::new(config).context("failed to start the session")?;
    println!("{}", query::welcome_banner(simulation.world()));

    let mut cursor = script.cursor();
    let fixed_dt = Duration::from_millis(args.frame_ms);
    let mut throttle = FrameThrottle::new(MIN_FRAME_INTERVAL);
    while simulation.frames() < args.frames && !simulation.session().game_over {
        let dt = if args.realtime {
            let now = Instant::now();
            match throttle.poll(now) {
                Some(elapsed) => elapsed,
                None => {
                    thread::sleep(throttle.remaining(now));
                    continue;
                }
            }
        } else {
            fixed_dt
        };

        let input = cursor.next_frame(player_speed, dt);
        let _ = simulation.step(input, dt);
    }

    let session = simulation.session();
    info!(frames = simulation.frames(), "simulation finished");
    println!(
        "frames: {} | elapsed: {:.2}s | candies: {} | alive: {} | game over: {}",
        simulation.frames(),
        session.elapsed.as_secs_f32(),
        session.pickups.candies(),
        session.alive,
        session.game_over,
    );
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
