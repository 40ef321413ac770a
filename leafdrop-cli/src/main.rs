mod logging;
mod scene;
mod viewer;

use clap::{Parser, Subcommand};
use leafdrop_core::glam::Vec2;
use leafdrop_core::{format_error_chain, run_headless, RunReport, SimConfig, SimulationClock};
use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "leafdrop")]
#[command(about = "Water droplets forming on a leaf, falling and splashing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open a window and play the animation
    Run {
        /// Seed for the splash randomness (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Simulate without a window and print a summary
    Headless {
        /// Seed for the splash randomness (random when omitted)
        #[arg(long)]
        seed: Option<u64>,
        /// Number of ticks to simulate
        #[arg(long, default_value_t = 600)]
        ticks: u64,
    },
}

fn main() {
    logging::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { seed } => run_window(resolve_seed(seed)),
        Commands::Headless { seed, ticks } => run_headless_summary(resolve_seed(seed), ticks),
    };

    if let Err(e) = result {
        error!(error = %format_error_chain(&*e), "leafdrop stopped with an error");
        std::process::exit(1);
    }
}

fn resolve_seed(seed: Option<u64>) -> u64 {
    let seed = seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or_default()
    });
    info!(seed, "using seed");
    seed
}

/// Reference constants with droplets forming at the drawn leaf tip
fn config() -> SimConfig {
    let tip = scene::leaf_tip();
    SimConfig {
        origin: Vec2::new(tip.x, tip.y),
        ..SimConfig::default()
    }
}

fn run_window(seed: u64) -> Result<(), Box<dyn Error>> {
    let clock = SimulationClock::new(config(), seed)?;
    let report = viewer::run_window(clock)?;
    info!(ticks = report.ticks, impacts = report.impacts, "animation closed");
    Ok(())
}

fn run_headless_summary(seed: u64, ticks: u64) -> Result<(), Box<dyn Error>> {
    let report = run_headless(config(), seed, ticks)?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!("ticks = {}", report.ticks);
    println!("droplets_spawned = {}", report.droplets_spawned);
    println!("impacts = {}", report.impacts);
    println!("particles_spawned = {}", report.particles_spawned);
    println!("particles_expired = {}", report.particles_expired);
    println!("final_droplets = {}", report.final_droplets);
    println!("final_particles = {}", report.final_particles);
}
