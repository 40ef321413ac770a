//! Droplet state machine: growth, detachment, fall and impact

use glam::Vec2;
use leafdrop_core::droplet::{spawn_if_due, update_droplets, Droplet, DropletOutcome, Phase};
use leafdrop_core::tests::test_helpers::{fall_ticks, falling_droplet, growth_ticks};
use leafdrop_core::SimConfig;

#[test]
fn test_spawn_requires_strictly_more_than_interval() {
    let origin = Vec2::new(496.0, 170.0);
    assert!(spawn_if_due(3.0, 0.0, 3.0, origin).is_none());
    assert!(spawn_if_due(2.5, 0.0, 3.0, origin).is_none());

    let (droplet, last) = spawn_if_due(3.01, 0.0, 3.0, origin).expect("droplet due");
    assert_eq!(last, 3.01);
    assert_eq!(droplet.pos, origin);
    assert_eq!(droplet.radius, 0.0);
    assert_eq!(droplet.phase, Phase::Growing);
    assert_eq!(droplet.vertical_velocity(), 0.0);
}

#[test]
fn test_growing_droplet_has_no_velocity() {
    let params = SimConfig::default().droplet;
    let mut droplet = Droplet::new(Vec2::new(0.0, 0.0));

    while droplet.is_growing() {
        assert_eq!(droplet.vertical_velocity(), 0.0);
        assert_eq!(droplet.advance(1, &params), DropletOutcome::StillAlive);
    }
    // Detaching tick does not apply gravity
    assert_eq!(droplet.phase, Phase::Falling { velocity: 0.0 });
    assert_eq!(droplet.pos, Vec2::new(0.0, 0.0));
}

#[test]
fn test_radius_monotonic_and_clamped() {
    let params = SimConfig::default().droplet;
    let mut droplet = Droplet::new(Vec2::ZERO);
    let mut previous = droplet.radius;
    let mut ticks = 0;

    while droplet.is_growing() {
        droplet.advance(1, &params);
        ticks += 1;
        assert!(droplet.radius >= previous, "radius shrank while growing");
        assert!(droplet.radius <= params.max_radius, "radius overshot");
        previous = droplet.radius;
    }

    assert_eq!(droplet.radius, params.max_radius);
    assert_eq!(ticks, growth_ticks(&params));

    // max_radius / growth_rate, give or take float accumulation
    let nominal = (params.max_radius / params.growth_rate).round() as u32;
    assert!(ticks == nominal || ticks == nominal + 1);
}

#[test]
fn test_radius_frozen_while_falling() {
    let params = SimConfig::default().droplet;
    let mut droplet = falling_droplet(0.0, 0.0, &params);
    for _ in 0..20 {
        droplet.advance(1, &params);
        assert_eq!(droplet.radius, params.max_radius);
    }
}

#[test]
fn test_zero_ticks_is_a_no_op() {
    let params = SimConfig::default().droplet;

    let mut growing = Droplet::new(Vec2::new(5.0, 5.0));
    growing.advance(3, &params);
    let before = growing.clone();
    assert_eq!(growing.advance(0, &params), DropletOutcome::StillAlive);
    assert_eq!(growing, before);

    let mut falling = falling_droplet(5.0, 100.0, &params);
    falling.advance(2, &params);
    let before = falling.clone();
    assert_eq!(falling.advance(0, &params), DropletOutcome::StillAlive);
    assert_eq!(falling, before);
}

#[test]
fn test_fall_follows_discrete_recurrence() {
    let params = SimConfig::default().droplet;
    let y0 = 170.0;
    let mut droplet = falling_droplet(496.0, y0, &params);

    let expected = fall_ticks(y0, &params);
    let mut y = y0;
    let mut v = 0.0f32;
    for tick in 1..=expected {
        v += params.gravity;
        y += v;
        let outcome = droplet.advance(1, &params);
        assert_eq!(droplet.pos.y, y, "position diverged at tick {}", tick);
        assert_eq!(droplet.vertical_velocity(), v);
        if tick < expected {
            assert_eq!(outcome, DropletOutcome::StillAlive);
        } else {
            assert_eq!(
                outcome,
                DropletOutcome::ImpactedGround {
                    position: Vec2::new(496.0, y)
                }
            );
        }
    }

    // Not the continuous sqrt(2d/g) estimate
    assert_eq!(expected, 50);
}

#[test]
fn test_impacted_droplet_removed_same_tick() {
    let params = SimConfig::default().droplet;
    let mut droplets = vec![
        falling_droplet(100.0, params.ground_level - 0.2, &params),
        Droplet::new(Vec2::new(200.0, 170.0)),
        falling_droplet(300.0, 200.0, &params),
    ];

    let impacts = update_droplets(&mut droplets, 1, &params);

    assert_eq!(impacts.len(), 1);
    assert_eq!(impacts[0].x, 100.0);
    assert!(impacts[0].y >= params.ground_level);
    assert_eq!(droplets.len(), 2);
    assert_eq!(droplets[0].pos.x, 200.0);
    assert_eq!(droplets[1].pos.x, 300.0);
}

#[test]
fn test_adjacent_impacts_all_removed() {
    let params = SimConfig::default().droplet;
    let near_ground = params.ground_level - 0.1;
    let mut droplets = vec![
        falling_droplet(1.0, near_ground, &params),
        falling_droplet(2.0, near_ground, &params),
        falling_droplet(3.0, near_ground, &params),
        Droplet::new(Vec2::new(4.0, 170.0)),
        falling_droplet(5.0, near_ground, &params),
    ];

    let impacts = update_droplets(&mut droplets, 1, &params);

    let xs: Vec<f32> = impacts.iter().map(|p| p.x).collect();
    assert_eq!(xs, vec![1.0, 2.0, 3.0, 5.0]);
    assert_eq!(droplets.len(), 1);
    assert_eq!(droplets[0].pos.x, 4.0);
}

#[test]
fn test_growing_droplet_never_removed() {
    let params = SimConfig::default().droplet;
    // Growing below the ground line still only grows
    let mut droplets = vec![Droplet::new(Vec2::new(0.0, params.ground_level + 10.0))];
    let impacts = update_droplets(&mut droplets, 1, &params);
    assert!(impacts.is_empty());
    assert_eq!(droplets.len(), 1);
}

#[test]
fn test_each_droplet_impacts_exactly_once() {
    let params = SimConfig::default().droplet;
    let mut droplets = vec![Droplet::new(Vec2::new(496.0, 170.0))];
    let mut impact_count = 0;

    for _ in 0..500 {
        impact_count += update_droplets(&mut droplets, 1, &params).len();
    }

    assert_eq!(impact_count, 1);
    assert!(droplets.is_empty());
}
