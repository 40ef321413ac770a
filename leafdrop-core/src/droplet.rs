use crate::config::DropletParams;
use glam::Vec2;

/// Lifecycle stage of a droplet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Hanging from the leaf tip and gaining radius
    Growing,
    /// Detached; the only phase that carries a velocity
    Falling { velocity: f32 },
}

/// A water droplet forming at the leaf tip
#[derive(Debug, Clone, PartialEq)]
pub struct Droplet {
    pub pos: Vec2,
    pub radius: f32,
    pub phase: Phase,
}

/// Result of advancing one droplet
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DropletOutcome {
    StillAlive,
    /// The droplet reached the ground and must be removed by the caller
    ImpactedGround { position: Vec2 },
}

impl Droplet {
    /// A fresh droplet at `origin` with zero radius
    pub fn new(origin: Vec2) -> Self {
        Self {
            pos: origin,
            radius: 0.0,
            phase: Phase::Growing,
        }
    }

    pub fn is_growing(&self) -> bool {
        matches!(self.phase, Phase::Growing)
    }

    /// Vertical velocity, zero while growing
    pub fn vertical_velocity(&self) -> f32 {
        match self.phase {
            Phase::Growing => 0.0,
            Phase::Falling { velocity } => velocity,
        }
    }

    /// Advance the droplet by `ticks` fixed ticks.
    ///
    /// Growth and gravity are per-tick quantities. Stops at the first tick
    /// that reaches the ground; the droplet is left at its impact position.
    pub fn advance(&mut self, ticks: u32, params: &DropletParams) -> DropletOutcome {
        for _ in 0..ticks {
            match &mut self.phase {
                Phase::Growing => {
                    self.radius += params.growth_rate;
                    if self.radius >= params.max_radius {
                        // Detaching does not apply gravity on the same tick
                        self.radius = params.max_radius;
                        self.phase = Phase::Falling { velocity: 0.0 };
                    }
                }
                Phase::Falling { velocity } => {
                    *velocity += params.gravity;
                    self.pos.y += *velocity;
                    if self.pos.y >= params.ground_level {
                        return DropletOutcome::ImpactedGround { position: self.pos };
                    }
                }
            }
        }
        DropletOutcome::StillAlive
    }
}

/// Decide whether a new droplet forms this tick.
///
/// Returns the droplet and the new last-spawn time when strictly more than
/// `spawn_interval` seconds have passed since `last_spawn_time`.
pub fn spawn_if_due(
    now: f64,
    last_spawn_time: f64,
    spawn_interval: f64,
    origin: Vec2,
) -> Option<(Droplet, f64)> {
    if now - last_spawn_time > spawn_interval {
        Some((Droplet::new(origin), now))
    } else {
        None
    }
}

/// Advance every droplet, then drop the ones that hit the ground.
///
/// Outcomes for the whole collection are computed before anything is
/// removed. Returns impact positions in collection order.
pub fn update_droplets(
    droplets: &mut Vec<Droplet>,
    ticks: u32,
    params: &DropletParams,
) -> Vec<Vec2> {
    let outcomes: Vec<_> = droplets
        .iter_mut()
        .map(|droplet| droplet.advance(ticks, params))
        .collect();

    let impacts: Vec<Vec2> = outcomes
        .iter()
        .filter_map(|outcome| match outcome {
            DropletOutcome::ImpactedGround { position } => Some(*position),
            DropletOutcome::StillAlive => None,
        })
        .collect();

    if !impacts.is_empty() {
        // retain visits each element exactly once, in order
        let mut alive = outcomes
            .iter()
            .map(|outcome| matches!(outcome, DropletOutcome::StillAlive));
        droplets.retain(|_| alive.next().unwrap_or(false));
    }

    impacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimConfig;

    #[test]
    fn falling_droplet_keeps_radius() {
        let params = SimConfig::default().droplet;
        let mut droplet = Droplet {
            pos: Vec2::new(0.0, 0.0),
            radius: params.max_radius,
            phase: Phase::Falling { velocity: 0.0 },
        };
        droplet.advance(5, &params);
        assert_eq!(droplet.radius, params.max_radius);
        assert!(droplet.vertical_velocity() > 0.0);
    }

    #[test]
    fn advance_stops_at_impact() {
        let params = SimConfig::default().droplet;
        let start_y = params.ground_level - 0.1;
        let mut droplet = Droplet {
            pos: Vec2::new(10.0, start_y),
            radius: params.max_radius,
            phase: Phase::Falling { velocity: 1.0 },
        };
        let outcome = droplet.advance(10, &params);
        let expected_y = start_y + (1.0 + params.gravity);
        assert_eq!(
            outcome,
            DropletOutcome::ImpactedGround {
                position: Vec2::new(10.0, expected_y)
            }
        );
        assert_eq!(droplet.vertical_velocity(), 1.0 + params.gravity);
    }
}
