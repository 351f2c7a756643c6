//! Core procedural mini-city simulation library.
//!
//! Main components:
//! - [`road`] - the fixed five-lane road grid and occupancy tests.
//! - [`layout`] - accept/reject placement of buildings and parks.
//! - [`vehicle`] - vehicles and their intersection turn state machine.
//! - [`cloud`] - drifting clouds with a closed respawn loop.
//! - [`sky`] - day/night sky state derived from the hour.
//! - [`glow`] - registry of surfaces that light up at night.
//! - [`phases`] - per-tick simulation phases / pipeline.
//! - [`world`] - the facade tying all of the above together.
//! - [`config`] - tunable city parameters and their edit semantics.
//! - [`types`] - shared type aliases and IDs.

pub mod cloud;
pub mod config;
pub mod glow;
pub mod layout;
pub mod phases;
pub mod road;
pub mod sky;
pub mod types;
pub mod vehicle;
pub mod world;
