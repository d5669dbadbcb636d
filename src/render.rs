//! Draw-surface capability
//!
//! Rendering is out of the simulation's hands: each entity carries an opaque
//! draw callback invoked once per frame with a [`DrawSurface`]. The surface
//! resolves texture names and sub-regions to opaque handles through a table
//! it owns (no ambient global cache) and exposes one batch-draw operation.

use std::collections::HashMap;

use glam::Vec2;

/// Opaque handle to a texture or a texture sub-region, valid only for the
/// surface that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(u32);

/// Capability handed to entity draw callbacks.
pub trait DrawSurface {
    /// Resolve a whole texture by name.
    fn texture(&mut self, name: &str) -> SpriteHandle;

    /// Resolve a sub-region of a texture by name and source pixel rect.
    fn subregion(&mut self, name: &str, x: u32, y: u32, w: u32, h: u32) -> SpriteHandle;

    /// Queue a draw of `sprite` at world position `pos`, optionally scaled
    /// to `dst_size` (source size when `None`).
    fn draw(&mut self, sprite: SpriteHandle, pos: Vec2, dst_size: Option<Vec2>);
}

/// Interning table from texture names and source rects to handles. Owned by
/// a surface implementation; handles are stable for the table's lifetime.
#[derive(Debug, Default)]
pub struct HandleTable {
    entries: HashMap<SpriteKey, SpriteHandle>,
    names: Vec<SpriteKey>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SpriteKey {
    pub texture: String,
    /// Source rect; `None` means the whole texture.
    pub region: Option<(u32, u32, u32, u32)>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, key: SpriteKey) -> SpriteHandle {
        if let Some(handle) = self.entries.get(&key) {
            return *handle;
        }
        let handle = SpriteHandle(self.names.len() as u32);
        self.names.push(key.clone());
        self.entries.insert(key, handle);
        handle
    }

    /// Look up the key a handle was issued for.
    pub fn key(&self, handle: SpriteHandle) -> Option<&SpriteKey> {
        self.names.get(handle.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// A single recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub sprite: SpriteHandle,
    pub pos: Vec2,
    pub dst_size: Option<Vec2>,
}

/// Surface that records draw calls instead of rendering. Used by tests and
/// the headless demo binary.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub table: HandleTable,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop recorded calls, keeping resolved handles.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawSurface for RecordingSurface {
    fn texture(&mut self, name: &str) -> SpriteHandle {
        self.table.resolve(SpriteKey {
            texture: name.to_owned(),
            region: None,
        })
    }

    fn subregion(&mut self, name: &str, x: u32, y: u32, w: u32, h: u32) -> SpriteHandle {
        self.table.resolve(SpriteKey {
            texture: name.to_owned(),
            region: Some((x, y, w, h)),
        })
    }

    fn draw(&mut self, sprite: SpriteHandle, pos: Vec2, dst_size: Option<Vec2>) {
        self.calls.push(DrawCall {
            sprite,
            pos,
            dst_size,
        });
    }
}

/// Invoke every entity's draw callback against `surface`, in composition
/// order (tiles first).
pub fn render_frame(entities: &[crate::sim::Entity], surface: &mut dyn DrawSurface) {
    for entity in entities {
        (entity.draw)(surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_interned() {
        let mut surface = RecordingSurface::new();
        let a = surface.subregion("tileset.png", 80, 32, 16, 16);
        let b = surface.subregion("tileset.png", 80, 32, 16, 16);
        let c = surface.subregion("tileset.png", 0, 0, 16, 16);
        let d = surface.texture("tileset.png");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(surface.table.len(), 3);
    }

    #[test]
    fn draw_calls_are_recorded_in_order() {
        let mut surface = RecordingSurface::new();
        let sprite = surface.texture("player.png");
        surface.draw(sprite, Vec2::new(1.0, 2.0), None);
        surface.draw(sprite, Vec2::new(3.0, 4.0), Some(Vec2::new(50.0, 36.0)));

        assert_eq!(surface.calls.len(), 2);
        assert_eq!(surface.calls[0].pos, Vec2::new(1.0, 2.0));
        assert_eq!(surface.calls[1].dst_size, Some(Vec2::new(50.0, 36.0)));

        surface.clear();
        assert!(surface.calls.is_empty());
        assert_eq!(surface.table.len(), 1);
    }
}
