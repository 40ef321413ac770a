//! Splash particles spawned where a droplet hits the ground

use crate::config::SplashParams;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::PI;

/// Remaining lifetime counted in whole ticks.
///
/// Each tick removes exactly `1 / tick_rate` seconds, so expiry happens on a
/// predictable tick instead of drifting with float subtraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lifetime {
    remaining: u32,
    tick_rate: u32,
}

impl Lifetime {
    /// Lifetime of `seconds`, rounded up to whole ticks and never below one
    pub fn from_seconds(seconds: f32, tick_rate: u32) -> Self {
        let exact = seconds as f64 * tick_rate as f64;
        let nearest = exact.round();
        // a product within a few f32 ulps of an integer is that integer
        let ticks = if (exact - nearest).abs() <= nearest.abs() * 4.0 * f32::EPSILON as f64 {
            nearest
        } else {
            exact.ceil()
        };
        Self {
            remaining: ticks.clamp(1.0, u32::MAX as f64) as u32,
            tick_rate,
        }
    }

    pub fn ticks(&self) -> u32 {
        self.remaining
    }

    /// Remaining life in seconds
    pub fn seconds(&self) -> f32 {
        self.remaining as f32 / self.tick_rate as f32
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// A short-lived particle thrown up by an impact
#[derive(Debug, Clone, PartialEq)]
pub struct SplashParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub life: Lifetime,
}

/// Result of advancing one particle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleOutcome {
    StillAlive,
    Expired,
}

impl SplashParticle {
    /// Ballistic step: move, apply `gravity` to vertical velocity, age one tick.
    pub fn advance(&mut self, ticks: u32, gravity: f32) -> ParticleOutcome {
        for _ in 0..ticks {
            if self.life.is_expired() {
                break;
            }
            self.pos += self.vel;
            self.vel.y += gravity;
            self.life.tick();
        }
        if self.life.is_expired() {
            ParticleOutcome::Expired
        } else {
            ParticleOutcome::StillAlive
        }
    }
}

/// Spawn one splash batch at `(impact.x, ground_level)`.
///
/// Launch angles cover the upper half-plane only. Screen y grows downward,
/// so every particle starts with a vertical velocity `<= 0`.
///
/// # Panics
///
/// Panics if `params.speed` or `params.size` is empty. `SimConfig::validate`
/// rejects such ranges.
pub fn spawn_batch<R: Rng + ?Sized>(
    rng: &mut R,
    impact: Vec2,
    ground_level: f32,
    params: &SplashParams,
    tick_rate: u32,
) -> Vec<SplashParticle> {
    let origin = Vec2::new(impact.x, ground_level);
    (0..params.count)
        .map(|_| {
            let angle: f32 = rng.gen_range(0.0..=PI);
            let speed = rng.gen_range(params.speed.clone());
            let radius = rng.gen_range(params.size.clone());
            SplashParticle {
                pos: origin,
                // sin(PI) is slightly negative in f32
                vel: Vec2::new(angle.cos() * speed, -angle.sin().max(0.0) * speed),
                radius,
                life: Lifetime::from_seconds(params.life_seconds, tick_rate),
            }
        })
        .collect()
}

/// Advance every particle, then remove the expired ones.
///
/// Returns how many particles expired this call.
pub fn update_particles(particles: &mut Vec<SplashParticle>, ticks: u32, gravity: f32) -> usize {
    let outcomes: Vec<_> = particles
        .iter_mut()
        .map(|particle| particle.advance(ticks, gravity))
        .collect();

    let expired = outcomes
        .iter()
        .filter(|outcome| **outcome == ParticleOutcome::Expired)
        .count();

    if expired > 0 {
        let mut alive = outcomes
            .iter()
            .map(|outcome| *outcome == ParticleOutcome::StillAlive);
        particles.retain(|_| alive.next().unwrap_or(false));
    }

    expired
}
