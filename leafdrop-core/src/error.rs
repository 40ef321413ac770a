//! Error types for the simulation and its collaborators

use crate::config::ConfigError;
use std::error::Error;
use std::fmt::Write;
use thiserror::Error;

/// The render sink could not present a frame
#[derive(Debug, Error)]
#[error("render failed: {message}")]
pub struct RenderError {
    message: String,
}

impl RenderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Failure during a single tick
#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("time source went backwards: {now}s after {previous}s")]
    TimeWentBackwards { previous: f64, now: f64 },
    #[error("time source returned a non-finite value: {0}")]
    NonFiniteTime(f64),
    #[error("clock is stopped")]
    Stopped,
}

/// Top-level simulation error
#[derive(Debug, Error)]
pub enum SimError {
    #[error("initialization failed")]
    Initialization(#[from] ConfigError),
    #[error("display setup failed: {0}")]
    Display(String),
    #[error("tick {tick} failed")]
    Tick {
        tick: u64,
        #[source]
        source: TickError,
    },
}

/// Render an error together with its chain of sources on one line
pub fn format_error_chain(error: &dyn Error) -> String {
    let mut msg = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(msg, ": {}", cause);
        source = cause.source();
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_render_cause() {
        let err = SimError::Tick {
            tick: 12,
            source: TickError::from(RenderError::new("surface lost")),
        };
        assert_eq!(
            format_error_chain(&err),
            "tick 12 failed: render failed: surface lost"
        );
    }

    #[test]
    fn config_error_is_initialization_failure() {
        let err = SimError::from(ConfigError::ZeroTickRate);
        assert_eq!(
            format_error_chain(&err),
            "initialization failed: tick rate must be positive"
        );
    }
}
