//! The complete city state and its update entry points.
//!
//! [`World`] owns every entity collection plus the seeded RNG, and is the
//! only type a frontend needs to drive the simulation: construct it, feed
//! parameter edits through [`World::set_param`], and call [`World::tick`]
//! at a fixed rate.

use crate::{
    cloud::{self, Cloud},
    config::{CityParams, Param},
    glow::{self, GlowSurface},
    layout::{self, StaticProp},
    phases,
    road::RoadNetwork,
    sky::TimeState,
    vehicle::Vehicle,
};
use glam::Vec2;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Duration of one logical tick in seconds. Frontends are expected to
/// call [`World::tick`] at this cadence; turn tweens and speeds are tuned
/// against it.
pub const TICK_DT: f32 = 1.0 / 60.0;

/// Vehicles spawned by [`World::new`].
pub const INITIAL_VEHICLES: usize = 10;

/// Placement attempts before [`World::add_streetlight`] gives up.
const STREETLIGHT_TRIES: usize = 100;

/// Full simulation state.
///
/// Entity collections are public so renderers can walk them directly;
/// everything that must stay consistent across mutations (parameters, the
/// RNG, the glow registry) goes through methods instead.
///
/// The glow registry holds handles into `props` and `vehicles`, so every
/// operation that reshapes either collection rebuilds it before returning.
pub struct World {
    pub roads: RoadNetwork,
    pub props: Vec<StaticProp>,
    pub vehicles: Vec<Vehicle>,
    pub clouds: Vec<Cloud>,
    pub sky: TimeState,

    params: CityParams,
    rng: ChaCha8Rng,
    glow: Vec<GlowSurface>,
}

impl World {
    /// Builds a fully populated world from parameters and a seed.
    ///
    /// The same `(params, seed)` pair always produces the same world, and
    /// identical [`World::tick`] sequences keep two such worlds identical.
    ///
    /// Startup performs, in order: road grid, prop layout,
    /// [`INITIAL_VEHICLES`] vehicles, the cloud field, then the sky and
    /// one lighting sweep so emissive state matches `time_of_day` from
    /// the first frame.
    pub fn new(params: CityParams, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let roads = RoadNetwork::default();
        let props = layout::generate_city(&params, &roads, &mut rng);
        let vehicles = (0..INITIAL_VEHICLES)
            .map(|_| Vehicle::spawn(&roads, &params, &mut rng))
            .collect();
        let clouds = cloud::spawn_field(params.grid_radius, &mut rng);
        let sky = TimeState::at_hour(params.time_of_day);

        let mut world = Self {
            roads,
            props,
            vehicles,
            clouds,
            sky,
            params,
            rng,
            glow: Vec::new(),
        };
        world.rebuild_glow();
        world.relight();
        world
    }

    /// Current parameter values.
    #[inline]
    pub fn params(&self) -> &CityParams {
        &self.params
    }

    /// Applies one parameter edit and its follow-up work.
    ///
    /// Layout-affecting parameters rebuild the whole prop set via
    /// [`World::regenerate`]; `time_of_day` only recomputes the sky and
    /// re-runs the lighting sweep. Vehicles and clouds survive either
    /// path.
    pub fn set_param(&mut self, param: Param) {
        param.apply(&mut self.params);
        if param.invalidates_layout() {
            self.regenerate();
        } else {
            self.relight();
        }
    }

    /// Advances the world by one fixed-step tick:
    ///
    /// 1. [`phases::traffic_phase`] moves the vehicles.
    /// 2. [`phases::drift_phase`] moves and recycles the clouds.
    /// 3. The sky is re-derived from `time_of_day` and
    ///    [`phases::lighting_phase`] syncs the glow surfaces with it.
    pub fn tick(&mut self) {
        phases::traffic_phase(
            &mut self.vehicles,
            &self.roads,
            &self.params,
            TICK_DT,
            &mut self.rng,
        );
        phases::drift_phase(&mut self.clouds, &self.params, &mut self.rng);
        self.relight();
    }

    /// Spawns `count` additional vehicles on random lanes.
    pub fn add_vehicles(&mut self, count: usize) {
        for _ in 0..count {
            let v = Vehicle::spawn(&self.roads, &self.params, &mut self.rng);
            self.vehicles.push(v);
        }
        self.rebuild_glow();
        self.relight();
    }

    /// Tries to place one streetlight on open ground.
    ///
    /// Samples up to [`STREETLIGHT_TRIES`] points in the buildable square
    /// and takes the first one that is off the road surface. Gives up
    /// silently when every attempt lands on a road.
    ///
    /// ### Returns
    /// `true` if a streetlight was placed.
    pub fn add_streetlight(&mut self) -> bool {
        let r = self.params.grid_radius;
        for _ in 0..STREETLIGHT_TRIES {
            let candidate = Vec2::new(
                self.rng.random_range(-r..=r),
                self.rng.random_range(-r..=r),
            );
            if !self.roads.is_on_road(candidate) {
                self.props.push(StaticProp::Streetlight { pos: candidate });
                self.rebuild_glow();
                return true;
            }
        }
        false
    }

    /// Removes one streetlight chosen uniformly at random.
    ///
    /// ### Returns
    /// `true` if a streetlight existed and was removed.
    pub fn remove_random_streetlight(&mut self) -> bool {
        let lights: Vec<usize> = self
            .props
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.is_streetlight().then_some(i))
            .collect();
        let Some(&idx) = lights.choose(&mut self.rng) else {
            return false;
        };
        self.props.remove(idx);
        self.rebuild_glow();
        true
    }

    /// Throws away the current prop set (streetlights included) and lays
    /// out a fresh one under the current parameters. Vehicles, clouds,
    /// and the RNG stream all carry over.
    pub fn regenerate(&mut self) {
        self.props = layout::generate_city(&self.params, &self.roads, &mut self.rng);
        self.rebuild_glow();
        self.relight();
    }

    fn rebuild_glow(&mut self) {
        self.glow = glow::build_registry(&self.props, &self.vehicles);
    }

    fn relight(&mut self) {
        self.sky = TimeState::at_hour(self.params.time_of_day);
        phases::lighting_phase(
            &self.glow,
            &mut self.props,
            &mut self.vehicles,
            self.sky.is_night,
        );
    }
}
