//! Test helper utilities for leafdrop tests

use crate::clock::{SimulationClock, TickReport};
use crate::config::{DropletParams, SimConfig};
use crate::droplet::{Droplet, Phase};
use crate::error::TickError;
use crate::host::RenderSink;
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Check if two f32 values are approximately equal within tolerance
pub fn approx_eq_f32(a: f32, b: f32, tol: f32) -> bool {
    (a - b).abs() <= tol
}

/// Deterministic RNG for splash tests
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Clock time of tick `n` when ticking exactly on schedule from 0
pub fn tick_time(n: u64, tick_rate: u32) -> f64 {
    n as f64 / tick_rate as f64
}

/// A droplet that has just detached at height `y`
pub fn falling_droplet(x: f32, y: f32, params: &DropletParams) -> Droplet {
    Droplet {
        pos: Vec2::new(x, y),
        radius: params.max_radius,
        phase: Phase::Falling { velocity: 0.0 },
    }
}

/// Growth ticks needed to reach `max_radius`, replaying the per-tick sum
pub fn growth_ticks(params: &DropletParams) -> u32 {
    let mut radius = 0.0f32;
    let mut ticks = 0;
    while radius < params.max_radius {
        radius += params.growth_rate;
        ticks += 1;
    }
    ticks
}

/// Ticks a droplet released at `y0` with zero velocity needs to reach the
/// ground, replaying the discrete recurrence `v += g; y += v`
pub fn fall_ticks(y0: f32, params: &DropletParams) -> u32 {
    let mut y = y0;
    let mut v = 0.0f32;
    let mut ticks = 0;
    while y < params.ground_level {
        v += params.gravity;
        y += v;
        ticks += 1;
    }
    ticks
}

/// Tick the clock `count` times on schedule, continuing from its current
/// tick count
pub fn run_ticks<R: RenderSink + ?Sized>(
    clock: &mut SimulationClock,
    sink: &mut R,
    count: u64,
) -> Result<Vec<TickReport>, TickError> {
    let tick_rate = clock.config().tick_rate;
    let mut reports = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let now = tick_time(clock.ticks(), tick_rate);
        reports.push(clock.tick(now, sink)?);
    }
    Ok(reports)
}

/// Default constants with the splash count overridden
pub fn config_with_splash_count(count: usize) -> SimConfig {
    let mut config = SimConfig::default();
    config.splash.count = count;
    config
}

/// Sink that fails on the `fail_on`-th frame (0-based) and counts calls
#[derive(Debug, Default)]
pub struct FailingSink {
    pub fail_on: usize,
    pub calls: usize,
}

impl FailingSink {
    pub fn new(fail_on: usize) -> Self {
        Self { fail_on, calls: 0 }
    }
}

impl RenderSink for FailingSink {
    fn render_frame(
        &mut self,
        _droplets: &[Droplet],
        _particles: &[crate::splash::SplashParticle],
    ) -> Result<(), crate::error::RenderError> {
        let call = self.calls;
        self.calls += 1;
        if call == self.fail_on {
            Err(crate::error::RenderError::new("device lost"))
        } else {
            Ok(())
        }
    }
}
