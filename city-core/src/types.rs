/// Identifier for a static prop in a [`crate::world::World`].
///
/// This is an index into `World::props`, and is only meaningful until the
/// prop set is next rebuilt (regeneration or a streetlight removal).
pub type PropId = usize;

/// Identifier for a vehicle in a [`crate::world::World`].
///
/// This is an index into `World::vehicles`. Vehicles are never removed
/// individually, so an id stays valid for the lifetime of its `World`.
pub type VehicleId = usize;
