//! Tilefall - reactive 2D platformer simulation core
//!
//! Core modules:
//! - `reactive`: Minimal synchronous signal/event substrate (timeline-driven)
//! - `sim`: Collision-aware physics, entity model, world composition
//! - `render`: Draw-surface capability consumed by entity draw callbacks
//! - `tuning`: Data-driven physics balance
//!
//! The library produces a time-varying list of [`sim::Entity`] values once
//! per clock tick; an external renderer reads the current list and invokes
//! each entity's draw callback with a [`render::DrawSurface`].

pub mod reactive;
pub mod render;
pub mod sim;
pub mod tuning;

pub use sim::{Entity, Scene, SimError, World};
pub use tuning::{JumpGate, Tuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// World dimensions in pixels
    pub const GAME_SIZE: Vec2 = Vec2::new(1000.0, 1000.0);

    /// Side length of a static tile; grid indices scale by this
    pub const TILE_HEIGHT: f32 = 32.0;

    /// Fixed demo timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Tileset image and the source cell used for all tiles
    pub const TILESET_TEXTURE: &str = "tileset.png";
    pub const TILE_SRC: (u32, u32, u32, u32) = (5 * 16, 2 * 16, 16, 16);

    /// Player sprite sheet: one 50x36 frame per facing direction
    pub const PLAYER_TEXTURE: &str = "player.png";
    pub const PLAYER_SRC_RIGHT: (u32, u32, u32, u32) = (0, 0, 50, 36);
    pub const PLAYER_SRC_LEFT: (u32, u32, u32, u32) = (50, 0, 50, 36);
}

/// Convert a tile grid index to its world-space top-left corner
#[inline]
pub fn grid_to_world(index: glam::IVec2) -> Vec2 {
    Vec2::new(
        index.x as f32 * consts::TILE_HEIGHT,
        index.y as f32 * consts::TILE_HEIGHT,
    )
}
