//! Per-tick phases of the city simulation.
//!
//! The world runs them in a fixed order on every tick:
//! 1. [`traffic_phase`] moves each vehicle, bounces it off the city
//!    boundary, and drives the intersection turn state machine.
//! 2. [`drift_phase`] moves each cloud and recycles the ones that cross
//!    the far drift boundary.
//! 3. [`lighting_phase`] syncs every registered glow surface with the
//!    current night flag. The sky state itself is recomputed by the world
//!    before this phase runs.

use crate::{
    cloud::Cloud,
    config::CityParams,
    glow::GlowSurface,
    layout::StaticProp,
    road::{INTERSECTION_RANGE, RoadNetwork},
    vehicle::{Direction, Vehicle},
};
use rand::Rng;
use rand::seq::IndexedRandom;

/// Per-tick chance that a vehicle near a crossing starts a turn.
pub const TURN_PROBABILITY: f32 = 0.005;

/// Advances every vehicle by one fixed-step tick.
///
/// For each vehicle, in order:
///
/// 1. Move it `speed` world units along its committed heading.
/// 2. If it has crossed the square city boundary, clamp it back inside.
///    When the travel axis itself escaped, also reverse the heading, snap
///    the yaw, and drop any in-flight turn.
/// 3. If it is not turning and sits within [`INTERSECTION_RANGE`] of a
///    crossing, start a turn with probability [`TURN_PROBABILITY`], onto
///    one of the three other headings chosen uniformly.
/// 4. Advance the turn tween by `dt` and interpolate the yaw. When the
///    tween finishes, commit the pending heading and clamp the cross-axis
///    coordinate back inside the boundary.
///
/// Vehicles keep moving along the old heading while a turn tween plays;
/// only the yaw animates until the commit.
///
/// ### Parameters
/// - `vehicles` - Vehicles to advance; mutated in place.
/// - `roads` - Road network used for intersection tests.
/// - `params` - Provides the boundary half-extent (`grid_radius`).
/// - `dt` - Fixed tick duration in seconds.
/// - `rng` - Randomness for turn triggers and turn targets.
pub fn traffic_phase(
    vehicles: &mut [Vehicle],
    roads: &RoadNetwork,
    params: &CityParams,
    dt: f32,
    rng: &mut impl Rng,
) {
    let bound = params.grid_radius;

    for v in vehicles.iter_mut() {
        v.pos += v.dir.unit() * v.speed;

        if v.pos.x.abs() > bound || v.pos.y.abs() > bound {
            let travel_escaped = if v.dir.along_x() {
                v.pos.x.abs() > bound
            } else {
                v.pos.y.abs() > bound
            };
            v.pos.x = v.pos.x.clamp(-bound, bound);
            v.pos.y = v.pos.y.clamp(-bound, bound);
            if travel_escaped {
                v.dir = v.dir.reversed();
                v.target_dir = v.dir;
                v.yaw = v.dir.yaw();
                v.turn = None;
            }
        }

        if v.turn.is_none()
            && roads.near_intersection(v.pos, INTERSECTION_RANGE)
            && rng.random::<f32>() < TURN_PROBABILITY
        {
            // Every heading except the current one, U-turns included.
            let candidates: Vec<Direction> =
                Direction::ALL.into_iter().filter(|&d| d != v.dir).collect();
            if let Some(&to) = candidates.choose(rng) {
                v.begin_turn(to);
            }
        }

        if let Some(turn) = &mut v.turn {
            turn.advance(dt);
            v.yaw = turn.current_yaw();
            if turn.finished() {
                v.dir = v.target_dir;
                v.yaw = v.dir.yaw();
                v.turn = None;
                // The drift along the old heading must not leave the city.
                if v.dir.along_x() {
                    v.pos.y = v.pos.y.clamp(-bound, bound);
                } else {
                    v.pos.x = v.pos.x.clamp(-bound, bound);
                }
            }
        }
    }
}

/// Drifts every cloud along +x and recycles the ones past the far
/// boundary back to the entry boundary, keeping the population constant.
///
/// ### Parameters
/// - `clouds` - Clouds to advance; mutated in place.
/// - `params` - Provides the grid radius the drift boundaries derive from.
/// - `rng` - Randomness for respawned cloud attributes.
pub fn drift_phase(clouds: &mut [Cloud], params: &CityParams, rng: &mut impl Rng) {
    let limit = Cloud::drift_limit(params.grid_radius);
    for cloud in clouds.iter_mut() {
        cloud.pos.x += cloud.drift_speed;
        if cloud.pos.x > limit {
            cloud.respawn_at_entry(params.grid_radius, rng);
        }
    }
}

/// Applies the day/night flag to every surface in the glow registry.
///
/// Registered windows are lit exactly when it is night; windows that were
/// not registered never light up, so the sweep touches nothing else.
/// Vehicle headlights follow the same flag.
///
/// ### Parameters
/// - `registry` - Glow handles built for the current entity set.
/// - `props` - Static props the window handles index into.
/// - `vehicles` - Vehicles the headlight handles index into.
/// - `night` - Current night flag from the sky state.
///
/// ### Panics
/// Panics if a handle indexes outside `props` or `vehicles`, i.e. the
/// registry is stale for this entity set.
pub fn lighting_phase(
    registry: &[GlowSurface],
    props: &mut [StaticProp],
    vehicles: &mut [Vehicle],
    night: bool,
) {
    for surface in registry {
        match *surface {
            GlowSurface::Window { prop, window } => {
                if let StaticProp::Building(b) = &mut props[prop] {
                    b.windows[window].lit = night;
                }
            }
            GlowSurface::Headlights { vehicle } => {
                vehicles[vehicle].headlights_on = night;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glow::build_registry;
    use crate::layout::{Building, Window};
    use glam::{Vec2, Vec3};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::f32::consts::PI;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn boundary_bounce_reverses_and_clamps() {
        let roads = RoadNetwork::default();
        let params = CityParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        // Already past the +x boundary; one tick must turn it around.
        let mut vehicles = vec![Vehicle::at(Vec2::new(15.05, 3.0), Direction::PosX, 0.05)];
        traffic_phase(&mut vehicles, &roads, &params, DT, &mut rng);

        let v = &vehicles[0];
        assert_eq!(v.dir, Direction::NegX);
        assert_eq!(v.target_dir, Direction::NegX);
        assert_eq!(v.yaw, PI);
        assert_eq!(v.pos.x, 15.0);
        assert_eq!(v.pos.y, 3.0);
        assert!(v.turn.is_none());
    }

    #[test]
    fn vehicles_stay_inside_the_boundary() {
        let roads = RoadNetwork::default();
        let params = CityParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(2);

        let mut vehicles: Vec<Vehicle> = (0..10)
            .map(|_| Vehicle::spawn(&roads, &params, &mut rng))
            .collect();

        for _ in 0..2000 {
            traffic_phase(&mut vehicles, &roads, &params, DT, &mut rng);
            for v in &vehicles {
                assert!(v.pos.x.abs() <= params.grid_radius);
                assert!(v.pos.y.abs() <= params.grid_radius);
            }
        }
    }

    #[test]
    fn heading_stays_committed_while_the_tween_plays() {
        let roads = RoadNetwork::default();
        let params = CityParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        // On the x = 0 lane, right at the z = 5 crossing.
        let mut vehicles = vec![Vehicle::at(Vec2::new(0.0, 5.0), Direction::PosZ, 0.05)];
        vehicles[0].begin_turn(Direction::PosX);

        // 10 of the 30 ticks the tween needs.
        for _ in 0..10 {
            traffic_phase(&mut vehicles, &roads, &params, DT, &mut rng);
        }

        let v = &vehicles[0];
        assert_eq!(v.dir, Direction::PosZ);
        assert_eq!(v.target_dir, Direction::PosX);
        assert!(v.turn.is_some());
        // Still moving along z only.
        assert_eq!(v.pos.x, 0.0);
        assert!(v.pos.y > 5.0);
        // Yaw is partway from -PI/2 toward 0.
        assert!(v.yaw > Direction::PosZ.yaw());
        assert!(v.yaw < Direction::PosX.yaw());
    }

    #[test]
    fn finished_turn_commits_and_keeps_the_drift() {
        let roads = RoadNetwork::default();
        let params = CityParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);

        let mut vehicles = vec![Vehicle::at(Vec2::new(0.0, 5.0), Direction::PosZ, 0.06)];
        vehicles[0].begin_turn(Direction::PosX);

        // The tween finishes on tick 30 (0.5 s at 1/60 s per tick). The
        // vehicle keeps moving along z the whole time, so the commit finds
        // it past the crossing; the overshoot stays, only the heading and
        // yaw change.
        for _ in 0..30 {
            traffic_phase(&mut vehicles, &roads, &params, DT, &mut rng);
        }

        let v = &vehicles[0];
        assert_eq!(v.dir, Direction::PosX);
        assert!(v.turn.is_none());
        assert_eq!(v.yaw, Direction::PosX.yaw());
        assert!((v.pos.y - 6.8).abs() < 1e-3);
        assert!(v.pos.y <= params.grid_radius);
    }

    #[test]
    fn clouds_recycle_without_changing_the_population() {
        let params = CityParams::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let limit = Cloud::drift_limit(params.grid_radius);

        let mut clouds = vec![
            Cloud {
                pos: Vec3::new(limit - 0.1, 20.0, 0.0),
                drift_speed: 0.2,
                puffs: 7,
            },
            Cloud {
                pos: Vec3::new(0.0, 18.0, 2.0),
                drift_speed: 0.2,
                puffs: 9,
            },
        ];

        drift_phase(&mut clouds, &params, &mut rng);

        assert_eq!(clouds.len(), 2);
        // The first crossed the far boundary and re-entered on the left.
        assert_eq!(clouds[0].pos.x, -limit);
        // The second just drifted.
        assert_eq!(clouds[1].pos.x, 0.2);
        assert_eq!(clouds[1].puffs, 9);
    }

    #[test]
    fn lighting_follows_the_night_flag() {
        let mut props = vec![StaticProp::Building(Building {
            pos: Vec2::new(7.0, 7.0),
            height: 5.0,
            windows: vec![
                Window {
                    glows_at_night: true,
                    lit: false,
                },
                Window {
                    glows_at_night: false,
                    lit: false,
                },
            ],
        })];
        let mut vehicles = vec![Vehicle::at(Vec2::ZERO, Direction::PosX, 0.05)];
        let registry = build_registry(&props, &vehicles);

        lighting_phase(&registry, &mut props, &mut vehicles, true);
        let StaticProp::Building(b) = &props[0] else {
            unreachable!()
        };
        assert!(b.windows[0].lit);
        assert!(!b.windows[1].lit);
        assert!(vehicles[0].headlights_on);

        lighting_phase(&registry, &mut props, &mut vehicles, false);
        let StaticProp::Building(b) = &props[0] else {
            unreachable!()
        };
        assert!(!b.windows[0].lit);
        assert!(!vehicles[0].headlights_on);
    }
}
