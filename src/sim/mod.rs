//! Simulation core
//!
//! All gameplay logic lives here. This module is single-threaded and
//! deterministic:
//! - Driven solely by the timeline's tick events
//! - Stable composition order (tiles, player, bodies, spawned)
//! - No rendering or platform dependencies; entities carry opaque draw
//!   callbacks invoked by the outside renderer

pub mod entity;
pub mod physics;
pub mod player;
pub mod world;

pub use entity::{DrawFn, Entity, SimError, tile, validate_size};
pub use physics::{accelerating, clip_position, collision_step, moving_entity, overlaps};
pub use player::{PlayerRig, grounded, player_rig};
pub use world::{Scene, World};
