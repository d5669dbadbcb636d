//! Entity model and tile builder
//!
//! An [`Entity`] is an immutable snapshot of a renderable body: position,
//! size, and an opaque draw callback. A moving body is a time-varying
//! entity value; each tick produces a fresh snapshot.

use std::fmt;
use std::rc::Rc;

use glam::{IVec2, Vec2};
use thiserror::Error;

use crate::consts::{TILESET_TEXTURE, TILE_HEIGHT, TILE_SRC};
use crate::grid_to_world;
use crate::render::DrawSurface;

/// Side-effecting draw callback; pure data from the simulation's view.
pub type DrawFn = Rc<dyn Fn(&mut dyn DrawSurface)>;

/// Simulation construction errors.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("entity size must be positive, got {width}x{height}")]
    InvalidEntity { width: f32, height: f32 },
}

/// A renderable simulated body. Position is the top-left corner in world
/// space (y grows downward); size never changes after creation.
#[derive(Clone)]
pub struct Entity {
    pub position: Vec2,
    pub size: Vec2,
    pub draw: DrawFn,
}

impl Entity {
    /// Build an entity, rejecting degenerate sizes.
    pub fn new(position: Vec2, size: Vec2, draw: DrawFn) -> Result<Self, SimError> {
        validate_size(size)?;
        Ok(Self {
            position,
            size,
            draw,
        })
    }

    pub fn min(&self) -> Vec2 {
        self.position
    }

    pub fn max(&self) -> Vec2 {
        self.position + self.size
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("position", &self.position)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Check an entity size is usable for overlap tests.
pub fn validate_size(size: Vec2) -> Result<(), SimError> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Err(SimError::InvalidEntity {
            width: size.x,
            height: size.y,
        });
    }
    Ok(())
}

/// Build the static tile at `index`. Tiles are grid-aligned, never move,
/// and all render the same tileset cell.
pub fn tile(index: IVec2) -> Entity {
    let position = grid_to_world(index);
    let size = Vec2::splat(TILE_HEIGHT);
    Entity {
        position,
        size,
        draw: Rc::new(move |surface| {
            let (sx, sy, sw, sh) = TILE_SRC;
            let sprite = surface.subregion(TILESET_TEXTURE, sx, sy, sw, sh);
            surface.draw(sprite, position, Some(size));
        }),
    }
}
