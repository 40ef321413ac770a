use crate::clock::{RunReport, SimulationClock};
use crate::config::SimConfig;
use crate::error::SimError;
use crate::host::{NullSink, QuitAfter, RenderSink, SteppedTime};

/// Run `ticks` ticks on virtual time without presenting frames
pub fn run_headless(config: SimConfig, seed: u64, ticks: u64) -> Result<RunReport, SimError> {
    run_headless_with_sink(config, seed, ticks, &mut NullSink)
}

/// Headless run that still hands every frame to `sink`
pub fn run_headless_with_sink<R: RenderSink + ?Sized>(
    config: SimConfig,
    seed: u64,
    ticks: u64,
    sink: &mut R,
) -> Result<RunReport, SimError> {
    let mut clock = SimulationClock::new(config, seed)?;
    let mut time = SteppedTime::new(0.0);
    clock.run(&mut time, sink, &mut QuitAfter::new(ticks))
}
