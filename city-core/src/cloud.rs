//! Drifting clouds with a closed respawn loop.
//!
//! Clouds are the only entities that are never regenerated: the field is
//! created once per world, and a cloud leaving the far drift boundary is
//! immediately replaced at the entry boundary, so the population count
//! never changes.

use glam::Vec3;
use rand::Rng;

/// Number of clouds kept in the air.
pub const CLOUD_COUNT: usize = 7;

/// Lowest cloud altitude; actual altitudes span `[min, min + span)`.
pub const CLOUD_MIN_ALTITUDE: f32 = 15.0;
pub const CLOUD_ALTITUDE_SPAN: f32 = 10.0;

/// The initial field spreads clouds over ±1.5 grid radii on both axes.
const FIELD_HALF_SPREAD: f32 = 1.5;
/// Clouds drift along +x and are recycled at ±3 grid radii.
const DRIFT_LIMIT: f32 = 3.0;

#[derive(Clone, Copy, Debug)]
pub struct Cloud {
    pub pos: Vec3,
    /// Constant +x drift per tick, fixed until the next respawn.
    pub drift_speed: f32,
    /// Number of puff spheres an adapter should compose this cloud from.
    pub puffs: u32,
}

impl Cloud {
    /// Distance from the origin at which clouds enter and leave.
    #[inline]
    pub fn drift_limit(grid_radius: f32) -> f32 {
        grid_radius * DRIFT_LIMIT
    }

    fn random_parts(rng: &mut impl Rng) -> (f32, f32, u32) {
        let y = CLOUD_MIN_ALTITUDE + rng.random::<f32>() * CLOUD_ALTITUDE_SPAN;
        let speed = 0.01 + rng.random::<f32>() * 0.02;
        let puffs = rng.random_range(5..15);
        (y, speed, puffs)
    }

    /// Spawns one cloud somewhere inside the startup field.
    pub fn spawn_in_field(grid_radius: f32, rng: &mut impl Rng) -> Self {
        let half = grid_radius * FIELD_HALF_SPREAD;
        let x = rng.random_range(-half..=half);
        let z = rng.random_range(-half..=half);
        let (y, drift_speed, puffs) = Self::random_parts(rng);
        Self {
            pos: Vec3::new(x, y, z),
            drift_speed,
            puffs,
        }
    }

    /// Recycles this cloud to the entry boundary with a fresh altitude,
    /// depth, speed, and puff count. Pairs with an exit at the far
    /// boundary, so the population never changes.
    pub fn respawn_at_entry(&mut self, grid_radius: f32, rng: &mut impl Rng) {
        let half = grid_radius * FIELD_HALF_SPREAD;
        let (y, drift_speed, puffs) = Self::random_parts(rng);
        self.pos = Vec3::new(-Self::drift_limit(grid_radius), y, rng.random_range(-half..=half));
        self.drift_speed = drift_speed;
        self.puffs = puffs;
    }
}

/// Creates the full startup cloud field.
pub fn spawn_field(grid_radius: f32, rng: &mut impl Rng) -> Vec<Cloud> {
    (0..CLOUD_COUNT)
        .map(|_| Cloud::spawn_in_field(grid_radius, rng))
        .collect()
}
