//! Static city props and the accept/reject layout generator.

use crate::config::CityParams;
use crate::road::RoadNetwork;
use glam::Vec2;
use rand::Rng;

/// Number of candidate points sampled per generation pass.
pub const PLACEMENT_CANDIDATES: usize = 200;

/// Probability that a single window glows after dark.
pub const WINDOW_GLOW_PROB: f32 = 0.3;

/// Height of the lowest window row.
const WINDOW_ROW_START: f32 = 1.0;
/// Vertical spacing between window rows.
const WINDOW_ROW_STEP: f32 = 0.5;
/// Windows per row: four facades, two columns each.
const WINDOWS_PER_ROW: usize = 8;

/// One facade window. `lit` is derived state, rewritten by the lighting
/// sweep from the global night flag; `glows_at_night` is rolled once at
/// generation time.
#[derive(Clone, Copy, Debug)]
pub struct Window {
    pub glows_at_night: bool,
    pub lit: bool,
}

#[derive(Clone, Debug)]
pub struct Building {
    pub pos: Vec2,
    pub height: f32,
    pub windows: Vec<Window>,
}

impl Building {
    /// Creates a building, populating its window grid bottom-up: one row
    /// every [`WINDOW_ROW_STEP`] starting at [`WINDOW_ROW_START`], eight
    /// windows per row. Each window independently glows at night with
    /// probability [`WINDOW_GLOW_PROB`].
    pub fn generate(pos: Vec2, height: f32, rng: &mut impl Rng) -> Self {
        let windows = (0..window_count(height))
            .map(|_| Window {
                glows_at_night: rng.random::<f32>() < WINDOW_GLOW_PROB,
                lit: false,
            })
            .collect();
        Self {
            pos,
            height,
            windows,
        }
    }
}

/// Number of windows a building of the given height carries.
pub fn window_count(height: f32) -> usize {
    if height <= WINDOW_ROW_START {
        return 0;
    }
    let rows = ((height - WINDOW_ROW_START) / WINDOW_ROW_STEP).ceil() as usize;
    rows * WINDOWS_PER_ROW
}

/// A placed static prop, tagged by kind.
#[derive(Clone, Debug)]
pub enum StaticProp {
    Building(Building),
    Park { pos: Vec2 },
    Streetlight { pos: Vec2 },
}

impl StaticProp {
    /// Ground position of the prop.
    pub fn pos(&self) -> Vec2 {
        match self {
            StaticProp::Building(b) => b.pos,
            StaticProp::Park { pos } => *pos,
            StaticProp::Streetlight { pos } => *pos,
        }
    }

    pub fn is_streetlight(&self) -> bool {
        matches!(self, StaticProp::Streetlight { .. })
    }
}

/// Scatters buildings and parks over the buildable square.
///
/// Samples [`PLACEMENT_CANDIDATES`] points uniformly in
/// `[-grid_radius, grid_radius]²` and rejects any that fall on a road.
/// For each accepted point, the green roll comes first: with probability
/// `green_space_ratio` the point becomes a park; otherwise, with
/// probability `building_density`, a building with height drawn uniformly
/// from `(0, max_building_height]`; otherwise nothing is placed.
///
/// This is accept/reject placement: the resulting counts vary from run
/// to run, and a smaller radius legitimately produces fewer props because
/// more candidates land near lanes.
///
/// ### Parameters
/// - `params` - Current city parameters (radius, densities, max height).
/// - `roads` - Lane set used for the occupancy rejection.
/// - `rng` - Randomness source for sampling and rolls.
///
/// ### Returns
/// The freshly generated prop set. Never contains streetlights; those are
/// placed by user action afterwards.
pub fn generate_city(
    params: &CityParams,
    roads: &RoadNetwork,
    rng: &mut impl Rng,
) -> Vec<StaticProp> {
    let r = params.grid_radius;
    let mut props = Vec::with_capacity(PLACEMENT_CANDIDATES / 2);

    for _ in 0..PLACEMENT_CANDIDATES {
        let pos = Vec2::new(rng.random_range(-r..=r), rng.random_range(-r..=r));
        if roads.is_on_road(pos) {
            continue;
        }

        if rng.random::<f32>() < params.green_space_ratio {
            props.push(StaticProp::Park { pos });
        } else if rng.random::<f32>() < params.building_density {
            // random::<f32>() is in [0, 1), so the height lands in (0, max].
            let height = params.max_building_height * (1.0 - rng.random::<f32>());
            props.push(StaticProp::Building(Building::generate(pos, height, rng)));
        }
    }

    props
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn params_with(density: f32, green: f32) -> CityParams {
        CityParams {
            building_density: density,
            green_space_ratio: green,
            ..CityParams::default()
        }
    }

    #[test]
    fn full_green_ratio_places_only_parks_and_none_on_roads() {
        let roads = RoadNetwork::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let props = generate_city(&params_with(0.0, 1.0), &roads, &mut rng);

        assert!(!props.is_empty());
        for prop in &props {
            assert!(matches!(prop, StaticProp::Park { .. }));
            assert!(!roads.is_on_road(prop.pos()));
        }
    }

    #[test]
    fn zero_ratios_place_nothing() {
        let roads = RoadNetwork::default();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let props = generate_city(&params_with(0.0, 0.0), &roads, &mut rng);
        assert!(props.is_empty());
    }

    #[test]
    fn full_density_places_buildings_with_heights_in_range() {
        let roads = RoadNetwork::default();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let params = params_with(1.0, 0.0);
        let props = generate_city(&params, &roads, &mut rng);

        assert!(!props.is_empty());
        for prop in &props {
            let StaticProp::Building(b) = prop else {
                panic!("expected only buildings, got {prop:?}");
            };
            assert!(b.height > 0.0);
            assert!(b.height <= params.max_building_height);
            assert!(b.pos.x.abs() <= params.grid_radius);
            assert!(b.pos.y.abs() <= params.grid_radius);
        }
    }

    #[test]
    fn candidate_budget_bounds_the_prop_count() {
        let roads = RoadNetwork::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let props = generate_city(&params_with(1.0, 1.0), &roads, &mut rng);
        assert!(props.len() <= PLACEMENT_CANDIDATES);
    }

    #[test]
    fn window_count_follows_the_row_grid() {
        // No rows fit below the first-row height.
        assert_eq!(window_count(0.5), 0);
        assert_eq!(window_count(1.0), 0);
        // Rows at y = 1.0 only.
        assert_eq!(window_count(1.2), 8);
        // Rows at y = 1.0 and 1.5.
        assert_eq!(window_count(2.0), 16);
        // Rows at y = 1.0, 1.5, 2.0 (2.5 itself is excluded).
        assert_eq!(window_count(2.5), 24);
    }

    #[test]
    fn generated_buildings_carry_their_window_grid() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let b = Building::generate(Vec2::ZERO, 4.0, &mut rng);
        assert_eq!(b.windows.len(), window_count(4.0));
        // Freshly generated windows start unlit.
        assert!(b.windows.iter().all(|w| !w.lit));
    }

    #[test]
    fn same_seed_reproduces_the_same_layout() {
        let roads = RoadNetwork::default();
        let params = CityParams::default();

        let a = generate_city(&params, &roads, &mut ChaCha8Rng::seed_from_u64(42));
        let b = generate_city(&params, &roads, &mut ChaCha8Rng::seed_from_u64(42));

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.pos(), y.pos());
            assert_eq!(std::mem::discriminant(x), std::mem::discriminant(y));
        }
    }
}
