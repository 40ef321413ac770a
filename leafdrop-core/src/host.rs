//! Collaborators the clock talks to: time, rendering and the quit signal

use crate::droplet::Droplet;
use crate::error::RenderError;
use crate::splash::SplashParticle;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time in seconds, plus a way to wait for a deadline
pub trait TimeSource {
    fn now_seconds(&mut self) -> f64;

    /// Block until `deadline` (seconds on this source's timeline)
    fn wait_until(&mut self, deadline: f64);
}

/// Receives a read-only view of every frame
pub trait RenderSink {
    fn render_frame(
        &mut self,
        droplets: &[Droplet],
        particles: &[SplashParticle],
    ) -> Result<(), RenderError>;
}

/// Polled once per tick; `true` stops the loop
pub trait QuitSignal {
    fn should_quit(&mut self) -> bool;
}

/// Wall-clock time measured from construction; waits by sleeping
#[derive(Debug)]
pub struct MonotonicTime {
    epoch: Instant,
}

impl MonotonicTime {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for MonotonicTime {
    fn now_seconds(&mut self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn wait_until(&mut self, deadline: f64) {
        let remaining = deadline - self.now_seconds();
        if remaining > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(remaining));
        }
    }
}

/// Virtual time that jumps straight to each deadline.
///
/// Used for headless runs and tests: tick `n` of a run observes exactly
/// `start + n / tick_rate`.
#[derive(Debug, Clone, Default)]
pub struct SteppedTime {
    now: f64,
}

impl SteppedTime {
    pub fn new(start: f64) -> Self {
        Self { now: start }
    }
}

impl TimeSource for SteppedTime {
    fn now_seconds(&mut self) -> f64 {
        self.now
    }

    fn wait_until(&mut self, deadline: f64) {
        if deadline > self.now {
            self.now = deadline;
        }
    }
}

/// Quit flag shared with another thread (e.g. a window's close handler)
#[derive(Debug, Clone, Default)]
pub struct QuitFlag(Arc<AtomicBool>);

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl QuitSignal for QuitFlag {
    fn should_quit(&mut self) -> bool {
        self.is_raised()
    }
}

/// Allows a fixed number of ticks, then asks to quit
#[derive(Debug, Clone)]
pub struct QuitAfter {
    remaining: u64,
}

impl QuitAfter {
    pub fn new(ticks: u64) -> Self {
        Self { remaining: ticks }
    }
}

impl QuitSignal for QuitAfter {
    fn should_quit(&mut self) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.remaining -= 1;
        false
    }
}

/// Discards every frame
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn render_frame(&mut self, _: &[Droplet], _: &[SplashParticle]) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Owned copy of one rendered frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameSnapshot {
    pub droplets: Vec<Droplet>,
    pub particles: Vec<SplashParticle>,
}

impl FrameSnapshot {
    pub fn capture(droplets: &[Droplet], particles: &[SplashParticle]) -> Self {
        Self {
            droplets: droplets.to_vec(),
            particles: particles.to_vec(),
        }
    }
}

/// Keeps a copy of every frame it is handed
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub frames: Vec<FrameSnapshot>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last(&self) -> Option<&FrameSnapshot> {
        self.frames.last()
    }
}

impl RenderSink for FrameRecorder {
    fn render_frame(
        &mut self,
        droplets: &[Droplet],
        particles: &[SplashParticle],
    ) -> Result<(), RenderError> {
        self.frames.push(FrameSnapshot::capture(droplets, particles));
        Ok(())
    }
}
