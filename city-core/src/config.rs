/// User-adjustable city parameters.
///
/// All fields are plain data; mutation goes through
/// [`crate::world::World::set_param`] so that layout-affecting changes
/// trigger a rebuild. The core does not validate ranges; adapters are
/// expected to clamp ratios to `[0, 1]` and sizes to non-negative values
/// before handing them over.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CityParams {
    /// Half-extent of the buildable square, in world units.
    pub grid_radius: f32,
    /// Upper bound for generated building heights.
    pub max_building_height: f32,
    /// Probability that an accepted candidate cell becomes a building.
    pub building_density: f32,
    /// Probability that an accepted candidate cell becomes a park,
    /// checked before the building roll.
    pub green_space_ratio: f32,
    /// Hour of day in `[0, 24)`.
    pub time_of_day: f32,
}

impl Default for CityParams {
    fn default() -> Self {
        Self {
            grid_radius: 15.0,
            max_building_height: 15.0,
            building_density: 0.5,
            green_space_ratio: 0.3,
            time_of_day: 12.0,
        }
    }
}

/// A single parameter change, tagged with the parameter it targets.
///
/// Every variant except [`Param::TimeOfDay`] invalidates the current
/// layout and forces a full regeneration; the time of day only triggers
/// a lighting recompute.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Param {
    GridRadius(f32),
    MaxBuildingHeight(f32),
    BuildingDensity(f32),
    GreenSpaceRatio(f32),
    TimeOfDay(f32),
}

impl Param {
    /// Whether applying this change requires rebuilding the static layout.
    pub fn invalidates_layout(self) -> bool {
        !matches!(self, Param::TimeOfDay(_))
    }

    /// Writes the carried value into the matching field of `params`.
    pub fn apply(self, params: &mut CityParams) {
        match self {
            Param::GridRadius(v) => params.grid_radius = v,
            Param::MaxBuildingHeight(v) => params.max_building_height = v,
            Param::BuildingDensity(v) => params.building_density = v,
            Param::GreenSpaceRatio(v) => params.green_space_ratio = v,
            Param::TimeOfDay(v) => params.time_of_day = v,
        }
    }
}
