pub mod clock;
pub mod config;
pub mod droplet;
pub mod error;
pub mod host;
pub mod runtime;
pub mod splash;

pub use glam;

pub use clock::{ClockState, RunReport, SimulationClock, SimulationState, TickReport};
pub use config::{ConfigError, DropletParams, SimConfig, SplashParams, SPLASH_GRAVITY_FACTOR};
pub use droplet::{spawn_if_due, update_droplets, Droplet, DropletOutcome, Phase};
pub use error::{format_error_chain, RenderError, SimError, TickError};
pub use host::{
    FrameRecorder, FrameSnapshot, MonotonicTime, NullSink, QuitAfter, QuitFlag, QuitSignal,
    RenderSink, SteppedTime, TimeSource,
};
pub use runtime::{run_headless, run_headless_with_sink};
pub use splash::{spawn_batch, update_particles, Lifetime, ParticleOutcome, SplashParticle};

// Test helpers module (public for integration tests)
// Always compiled - integration tests are separate crates and need access
pub mod tests;
