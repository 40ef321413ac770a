//! Fixed-tick scheduler that owns the simulation state

use crate::config::SimConfig;
use crate::droplet::{spawn_if_due, update_droplets, Droplet};
use crate::error::{format_error_chain, SimError, TickError};
use crate::host::{QuitSignal, RenderSink, TimeSource};
use crate::splash::{spawn_batch, update_particles, SplashParticle};
use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, trace};

/// Ticks the pacing may fall behind before the schedule is re-anchored
const MAX_LAG_TICKS: f64 = 2.0;

/// Clock lifecycle; `Stopped` is terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockState {
    Running,
    Stopped,
}

/// Everything that changes from tick to tick
#[derive(Debug, Clone, Default)]
pub struct SimulationState {
    pub droplets: Vec<Droplet>,
    pub particles: Vec<SplashParticle>,
    pub last_spawn_time: f64,
}

/// What happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub now: f64,
    pub spawned: bool,
    /// Impact positions, in droplet order
    pub impacts: Vec<Vec2>,
    pub particles_spawned: usize,
    pub particles_expired: usize,
}

/// Totals over a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunReport {
    pub ticks: u64,
    pub droplets_spawned: u64,
    pub impacts: u64,
    pub particles_spawned: u64,
    pub particles_expired: u64,
    pub final_droplets: usize,
    pub final_particles: usize,
}

impl RunReport {
    fn record(&mut self, tick: &TickReport) {
        self.ticks += 1;
        self.droplets_spawned += tick.spawned as u64;
        self.impacts += tick.impacts.len() as u64;
        self.particles_spawned += tick.particles_spawned as u64;
        self.particles_expired += tick.particles_expired as u64;
    }
}

/// Deadlines at `origin + n / tick_rate`, computed from an integer count so
/// they never accumulate rounding error.
#[derive(Debug, Clone)]
struct Schedule {
    origin: f64,
    scheduled: u64,
    tick_rate: f64,
}

impl Schedule {
    fn new(tick_rate: u32) -> Self {
        Self {
            origin: 0.0,
            scheduled: 0,
            tick_rate: tick_rate as f64,
        }
    }

    fn reset(&mut self, now: f64) {
        self.origin = now;
        self.scheduled = 0;
    }

    /// Next tick boundary if it is still ahead of `now`.
    ///
    /// Falling more than `MAX_LAG_TICKS` behind re-anchors the schedule at
    /// `now` instead of running a burst of catch-up ticks.
    fn next_deadline(&mut self, now: f64) -> Option<f64> {
        self.scheduled += 1;
        let deadline = self.origin + self.scheduled as f64 / self.tick_rate;
        if deadline > now {
            Some(deadline)
        } else {
            if now - deadline > MAX_LAG_TICKS / self.tick_rate {
                trace!(lag = now - deadline, "pacing re-anchored");
                self.reset(now);
            }
            None
        }
    }
}

/// Sequences spawn, droplet update, particle update and render once per tick
pub struct SimulationClock {
    config: SimConfig,
    state: SimulationState,
    rng: ChaCha8Rng,
    clock_state: ClockState,
    ticks: u64,
    last_now: Option<f64>,
    schedule: Schedule,
}

impl SimulationClock {
    /// Build a clock from validated constants and a random seed
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let schedule = Schedule::new(config.tick_rate);
        Ok(Self {
            config,
            state: SimulationState::default(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            clock_state: ClockState::Running,
            ticks: 0,
            last_now: None,
            schedule,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn clock_state(&self) -> ClockState {
        self.clock_state
    }

    /// Ticks completed so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Anchor the spawn timer and the pacing schedule at `now`
    pub fn start(&mut self, now: f64) {
        self.state.last_spawn_time = now;
        self.schedule.reset(now);
    }

    pub fn stop(&mut self) {
        if self.clock_state == ClockState::Running {
            info!(ticks = self.ticks, "simulation clock stopped");
        }
        self.clock_state = ClockState::Stopped;
    }

    /// Run one tick at time `now`.
    ///
    /// Any failure is logged and stops the clock for good.
    pub fn tick<R: RenderSink + ?Sized>(
        &mut self,
        now: f64,
        sink: &mut R,
    ) -> Result<TickReport, TickError> {
        if self.clock_state == ClockState::Stopped {
            return Err(TickError::Stopped);
        }
        match self.step(now, sink) {
            Ok(report) => Ok(report),
            Err(err) => {
                error!(tick = self.ticks, error = %format_error_chain(&err), "tick failed");
                self.stop();
                Err(err)
            }
        }
    }

    fn step<R: RenderSink + ?Sized>(
        &mut self,
        now: f64,
        sink: &mut R,
    ) -> Result<TickReport, TickError> {
        if !now.is_finite() {
            return Err(TickError::NonFiniteTime(now));
        }
        if let Some(previous) = self.last_now {
            if now < previous {
                return Err(TickError::TimeWentBackwards { previous, now });
            }
        }
        self.last_now = Some(now);

        let tick = self.ticks;
        let config = &self.config;
        let state = &mut self.state;

        let spawned = match spawn_if_due(
            now,
            state.last_spawn_time,
            config.spawn_interval,
            config.origin,
        ) {
            Some((droplet, spawned_at)) => {
                debug!(tick, x = droplet.pos.x, y = droplet.pos.y, "droplet spawned");
                state.droplets.push(droplet);
                state.last_spawn_time = spawned_at;
                true
            }
            None => false,
        };

        let impacts = update_droplets(&mut state.droplets, 1, &config.droplet);

        let mut particles_spawned = 0;
        for impact in &impacts {
            debug!(tick, x = impact.x, y = impact.y, "droplet impact");
            let batch = spawn_batch(
                &mut self.rng,
                *impact,
                config.droplet.ground_level,
                &config.splash,
                config.tick_rate,
            );
            particles_spawned += batch.len();
            state.particles.extend(batch);
        }

        let particles_expired = update_particles(&mut state.particles, 1, config.splash_gravity());

        sink.render_frame(&state.droplets, &state.particles)?;

        trace!(
            tick,
            droplets = state.droplets.len(),
            particles = state.particles.len(),
            "tick complete"
        );
        self.ticks += 1;

        Ok(TickReport {
            tick,
            now,
            spawned,
            impacts,
            particles_spawned,
            particles_expired,
        })
    }

    /// Drive the clock until the quit signal fires or a tick fails.
    ///
    /// The pacing wait at the end of each tick is the only suspension point.
    pub fn run<T, R, Q>(
        &mut self,
        time: &mut T,
        sink: &mut R,
        quit: &mut Q,
    ) -> Result<RunReport, SimError>
    where
        T: TimeSource + ?Sized,
        R: RenderSink + ?Sized,
        Q: QuitSignal + ?Sized,
    {
        if self.clock_state == ClockState::Stopped {
            return Err(SimError::Tick {
                tick: self.ticks,
                source: TickError::Stopped,
            });
        }

        let start = time.now_seconds();
        self.start(start);
        info!(
            tick_rate = self.config.tick_rate,
            spawn_interval = self.config.spawn_interval,
            "simulation clock started"
        );

        let mut report = RunReport::default();
        loop {
            if quit.should_quit() {
                self.stop();
                break;
            }

            let now = time.now_seconds();
            match self.tick(now, sink) {
                Ok(tick) => report.record(&tick),
                Err(source) => {
                    return Err(SimError::Tick {
                        tick: self.ticks,
                        source,
                    })
                }
            }

            if let Some(deadline) = self.schedule.next_deadline(time.now_seconds()) {
                time.wait_until(deadline);
            }
        }

        report.final_droplets = self.state.droplets.len();
        report.final_particles = self.state.particles.len();
        Ok(report)
    }
}
