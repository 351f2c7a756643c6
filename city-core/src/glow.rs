use crate::layout::StaticProp;
use crate::types::{PropId, VehicleId};
use crate::vehicle::Vehicle;

/// A handle to one surface whose emissive state follows the day/night cycle.
///
/// Handles index into the world's prop and vehicle arrays, so a registry is
/// only valid until the entity set it was built from changes. The world
/// rebuilds the registry after regeneration, vehicle spawns, and streetlight
/// edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GlowSurface {
    /// One window of a building prop.
    Window { prop: PropId, window: usize },
    /// The headlight pair of a vehicle.
    Headlights { vehicle: VehicleId },
}

/// Collects every glow-capable surface into an explicit registry.
///
/// Only windows flagged `glows_at_night` are registered. The rest never
/// light up, so the nightly sweep can skip them instead of re-testing every
/// window on every tick.
///
/// ### Parameters
/// - `props` - Current static props; building windows are scanned.
/// - `vehicles` - Current vehicles; each contributes its headlights.
///
/// ### Returns
/// Handles for every surface the lighting phase must keep in sync.
pub fn build_registry(props: &[StaticProp], vehicles: &[Vehicle]) -> Vec<GlowSurface> {
    let mut surfaces = Vec::new();
    for (prop, p) in props.iter().enumerate() {
        if let StaticProp::Building(b) = p {
            for (window, w) in b.windows.iter().enumerate() {
                if w.glows_at_night {
                    surfaces.push(GlowSurface::Window { prop, window });
                }
            }
        }
    }
    for vehicle in 0..vehicles.len() {
        surfaces.push(GlowSurface::Headlights { vehicle });
    }
    surfaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Building, Window};
    use crate::vehicle::Direction;
    use glam::Vec2;

    fn building_with_glows(glows: &[bool]) -> StaticProp {
        StaticProp::Building(Building {
            pos: Vec2::ZERO,
            height: 5.0,
            windows: glows
                .iter()
                .map(|&g| Window {
                    glows_at_night: g,
                    lit: false,
                })
                .collect(),
        })
    }

    #[test]
    fn registers_only_glow_capable_windows() {
        let props = vec![
            building_with_glows(&[true, false, true]),
            StaticProp::Park { pos: Vec2::ZERO },
            building_with_glows(&[false]),
        ];

        let registry = build_registry(&props, &[]);

        assert_eq!(
            registry,
            vec![
                GlowSurface::Window { prop: 0, window: 0 },
                GlowSurface::Window { prop: 0, window: 2 },
            ]
        );
    }

    #[test]
    fn registers_headlights_for_every_vehicle() {
        let vehicles = vec![
            Vehicle::at(Vec2::ZERO, Direction::PosX, 0.05),
            Vehicle::at(Vec2::new(1.0, 0.0), Direction::NegZ, 0.07),
        ];

        let registry = build_registry(&[], &vehicles);

        assert_eq!(
            registry,
            vec![
                GlowSurface::Headlights { vehicle: 0 },
                GlowSurface::Headlights { vehicle: 1 },
            ]
        );
    }

    #[test]
    fn streetlights_contribute_nothing() {
        let props = vec![StaticProp::Streetlight { pos: Vec2::ZERO }];
        assert!(build_registry(&props, &[]).is_empty());
    }
}
