//! Road network descriptor and the occupancy classifier.
//!
//! Ground positions are `glam::Vec2` values where `x` is the world x axis
//! and `y` is the world z axis. Lanes are idealized infinite strips, so
//! every query is a per-lane perpendicular-distance test.

use glam::Vec2;

/// Drawn width of a road strip, used by adapters for geometry.
pub const ROAD_WIDTH: f32 = 2.0;

/// Minimum clearance between a lane centerline and any static prop.
pub const PROP_BUFFER: f32 = 1.4;

/// How close a vehicle must be to a lane centerline to count as "at"
/// that lane when testing for intersections.
pub const INTERSECTION_RANGE: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    /// Constant x, running along the z axis.
    Vertical,
    /// Constant z, running along the x axis.
    Horizontal,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lane {
    pub orientation: Orientation,
    pub offset: f32,
}

impl Lane {
    /// Perpendicular distance from `p` to this lane's centerline.
    #[inline]
    pub fn distance_to(&self, p: Vec2) -> f32 {
        match self.orientation {
            Orientation::Vertical => (p.x - self.offset).abs(),
            Orientation::Horizontal => (p.y - self.offset).abs(),
        }
    }
}

/// The fixed set of lanes defining the drivable grid.
#[derive(Clone, Debug)]
pub struct RoadNetwork {
    pub lanes: Vec<Lane>,
}

impl Default for RoadNetwork {
    /// The fixed five-lane grid: vertical lanes at x = -10, 0, 10 and
    /// horizontal lanes at z = -5, 5.
    fn default() -> Self {
        let mut lanes = Vec::with_capacity(5);
        for offset in [-10.0, 0.0, 10.0] {
            lanes.push(Lane {
                orientation: Orientation::Vertical,
                offset,
            });
        }
        for offset in [-5.0, 5.0] {
            lanes.push(Lane {
                orientation: Orientation::Horizontal,
                offset,
            });
        }
        Self { lanes }
    }
}

impl RoadNetwork {
    /// Tests whether `p` lies within the prop clearance buffer of any lane.
    ///
    /// Returns `true` iff some lane's perpendicular distance to `p` is
    /// strictly below [`PROP_BUFFER`]; a point at exactly the buffer
    /// distance is off-road. Used to keep buildings, parks, and
    /// streetlights off the drivable strips.
    ///
    /// ### Parameters
    /// - `p` - Ground position (x, z).
    ///
    /// ### Returns
    /// `true` if `p` is road-occupied, `false` otherwise. O(lanes).
    pub fn is_on_road(&self, p: Vec2) -> bool {
        self.lanes.iter().any(|lane| lane.distance_to(p) < PROP_BUFFER)
    }

    /// Tests whether `p` sits at an intersection.
    ///
    /// A point is at an intersection when it is within `within` of the
    /// centerline of *both* some vertical lane and some horizontal lane.
    /// Vehicles use [`INTERSECTION_RANGE`] for `within` when deciding
    /// whether a turn is available.
    pub fn near_intersection(&self, p: Vec2, within: f32) -> bool {
        let near = |orientation| {
            self.lanes
                .iter()
                .filter(|lane| lane.orientation == orientation)
                .any(|lane| lane.distance_to(p) < within)
        };
        near(Orientation::Vertical) && near(Orientation::Horizontal)
    }

    /// Iterates the lanes with the given orientation.
    pub fn lanes_with(&self, orientation: Orientation) -> impl Iterator<Item = &Lane> {
        self.lanes
            .iter()
            .filter(move |lane| lane.orientation == orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_three_vertical_and_two_horizontal_lanes() {
        let roads = RoadNetwork::default();
        assert_eq!(roads.lanes.len(), 5);
        assert_eq!(roads.lanes_with(Orientation::Vertical).count(), 3);
        assert_eq!(roads.lanes_with(Orientation::Horizontal).count(), 2);
    }

    #[test]
    fn points_inside_the_buffer_are_on_road() {
        let roads = RoadNetwork::default();

        // Directly on the vertical lane at x = 10.
        assert!(roads.is_on_road(Vec2::new(10.0, 7.0)));
        // Just inside the buffer on either side of it.
        assert!(roads.is_on_road(Vec2::new(10.0 + 1.39, 7.0)));
        assert!(roads.is_on_road(Vec2::new(10.0 - 1.39, 7.0)));
        // On the horizontal lane at z = -5.
        assert!(roads.is_on_road(Vec2::new(3.0, -5.0)));
    }

    #[test]
    fn points_outside_the_buffer_are_off_road() {
        let roads = RoadNetwork::default();

        // Far from every lane.
        assert!(!roads.is_on_road(Vec2::new(5.0, 1.8)));
        // Beyond the buffer of the nearest lane.
        assert!(!roads.is_on_road(Vec2::new(10.0 + 1.41, 7.0)));
    }

    #[test]
    fn exact_buffer_distance_is_off_road() {
        let roads = RoadNetwork::default();
        // Strict comparison: distance == PROP_BUFFER reports false.
        assert!(!roads.is_on_road(Vec2::new(PROP_BUFFER, 1.8)));
    }

    #[test]
    fn intersections_require_both_orientations() {
        let roads = RoadNetwork::default();

        // The crossing of x = 10 and z = 5.
        assert!(roads.near_intersection(Vec2::new(10.2, 4.8), INTERSECTION_RANGE));
        // On a vertical lane but between horizontal lanes.
        assert!(!roads.near_intersection(Vec2::new(10.0, 0.0), INTERSECTION_RANGE));
        // On a horizontal lane but between vertical lanes.
        assert!(!roads.near_intersection(Vec2::new(5.0, 5.0), INTERSECTION_RANGE));
        // Nowhere near any lane.
        assert!(!roads.near_intersection(Vec2::new(6.0, 2.0), INTERSECTION_RANGE));
    }
}
