//! Simulation constants, fixed at startup
//!
//! Every rate here is expressed in per-tick units. The values only produce
//! the intended motion when the clock advances exactly one tick at a time at
//! `tick_rate` ticks per second.

use glam::Vec2;
use std::ops::Range;
use thiserror::Error;

/// Splash particles fall at half the droplet gravity
pub const SPLASH_GRAVITY_FACTOR: f32 = 0.5;

/// Invalid simulation constants
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },
    #[error("{name} range {start}..{end} is empty or not finite")]
    EmptyRange {
        name: &'static str,
        start: f32,
        end: f32,
    },
    #[error("origin y = {origin_y} must lie above the ground at {ground_level}")]
    OriginBelowGround { origin_y: f32, ground_level: f32 },
    #[error("splash count must be at least 1")]
    NoSplashParticles,
}

/// Droplet growth and fall parameters
#[derive(Debug, Clone, PartialEq)]
pub struct DropletParams {
    /// Radius gained per tick while growing
    pub growth_rate: f32,
    pub max_radius: f32,
    /// Velocity gained per tick while falling
    pub gravity: f32,
    /// y coordinate of the ground line (screen space, y grows downward)
    pub ground_level: f32,
}

/// Splash batch parameters
#[derive(Debug, Clone, PartialEq)]
pub struct SplashParams {
    pub count: usize,
    /// Launch speed in units per tick
    pub speed: Range<f32>,
    pub size: Range<f32>,
    pub life_seconds: f32,
}

/// Full simulation configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    pub tick_rate: u32,
    pub spawn_interval: f64,
    /// Where new droplets form (the leaf tip)
    pub origin: Vec2,
    pub droplet: DropletParams,
    pub splash: SplashParams,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_rate: 60,
            spawn_interval: 3.0,
            origin: Vec2::new(496.0, 170.0),
            droplet: DropletParams {
                growth_rate: 0.4,
                max_radius: 10.0,
                gravity: 0.3,
                ground_level: 550.0,
            },
            splash: SplashParams {
                count: 7,
                speed: 3.0..6.0,
                size: 2.0..4.0,
                life_seconds: 0.6,
            },
        }
    }
}

impl SimConfig {
    /// Check every constant before the clock is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        positive("spawn interval", self.spawn_interval)?;
        positive("growth rate", self.droplet.growth_rate as f64)?;
        positive("max radius", self.droplet.max_radius as f64)?;
        positive("gravity", self.droplet.gravity as f64)?;
        positive("splash lifetime", self.splash.life_seconds as f64)?;
        non_empty("splash speed", &self.splash.speed)?;
        non_empty("splash size", &self.splash.size)?;

        if self.splash.count == 0 {
            return Err(ConfigError::NoSplashParticles);
        }
        if !self.origin.is_finite()
            || !self.droplet.ground_level.is_finite()
            || self.origin.y >= self.droplet.ground_level
        {
            return Err(ConfigError::OriginBelowGround {
                origin_y: self.origin.y,
                ground_level: self.droplet.ground_level,
            });
        }
        Ok(())
    }

    /// Per-tick gravity applied to splash particles
    pub fn splash_gravity(&self) -> f32 {
        self.droplet.gravity * SPLASH_GRAVITY_FACTOR
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_empty(name: &'static str, range: &Range<f32>) -> Result<(), ConfigError> {
    if range.start.is_finite() && range.end.is_finite() && range.start < range.end {
        Ok(())
    } else {
        Err(ConfigError::EmptyRange {
            name,
            start: range.start,
            end: range.end,
        })
    }
}
