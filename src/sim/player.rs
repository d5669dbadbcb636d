//! Player controller and ground predicate
//!
//! Velocity is the pairing of a held horizontal impulse with a folded
//! vertical component (gravity accumulation, terminal clamp, jump resets).
//! The jump gate reads the previous tick's ground contact through a shared
//! cell the world driver refreshes after sampling, which bounds the
//! player-position / ground-predicate recursion to one step per tick.

use std::cell::Cell;
use std::rc::Rc;

use glam::Vec2;

use crate::consts::{PLAYER_SRC_LEFT, PLAYER_SRC_RIGHT, PLAYER_TEXTURE};
use crate::reactive::{Event, Signal, Timeline};
use crate::sim::entity::{DrawFn, Entity};
use crate::sim::physics::moving_entity;
use crate::tuning::{JumpGate, Tuning};

/// Per-tick inputs to the vertical velocity fold.
#[derive(Clone, Copy)]
enum VerticalStep {
    /// Gravity sample for the tick's elapsed seconds
    Gravity(f32),
    /// A jump impulse that passed the gate
    Jump,
}

/// The wired-up player: its entity stream plus the signals the world
/// driver needs to close the ground-contact loop.
pub struct PlayerRig {
    pub position: Signal<Vec2>,
    pub entity: Signal<Entity>,
    /// True = facing right. Held between direction presses.
    pub facing: Signal<bool>,
    pub size: Vec2,
}

/// Exact-contact ground test: true iff some tile's top edge equals the
/// player's bottom edge and their horizontal extents overlap.
///
/// Exact equality is intentional: the vertical clip snaps the bottom edge
/// onto tile tops exactly, and keeping this predicate standalone lets a
/// tolerance-band policy replace it without touching integration.
pub fn grounded(position: Vec2, size: Vec2, tiles: &[Entity]) -> bool {
    let bottom = position.y + size.y;
    let left = position.x;
    let right = position.x + size.x;

    tiles.iter().any(|t| {
        t.position.y == bottom && right > t.position.x && !(left > t.position.x + t.size.x)
    })
}

/// Build the player from its input events.
///
/// `ground` holds the previous tick's ground contact; the jump gate opens
/// on it per the tuning's [`JumpGate`] polarity.
pub fn player_rig(
    timeline: &Timeline,
    tuning: &Tuning,
    start: Vec2,
    tiles: &Signal<Vec<Entity>>,
    ground: Rc<Cell<bool>>,
    left: &Event<()>,
    right: &Event<()>,
    jump: &Event<()>,
) -> PlayerRig {
    let size = tuning.player_size;

    // A direction press overrides the running horizontal component; the
    // most recent impulse dominates.
    let move_speed = tuning.move_speed;
    let horizontal = left
        .map(move |()| -move_speed)
        .merge(&right.map(move |()| move_speed))
        .scan(timeline, 0.0f32, |_, impulse| impulse);

    let on_ground = {
        let ground = Rc::clone(&ground);
        Signal::from_fn(move || ground.get())
    };
    let gate_open_when = match tuning.jump_gate {
        JumpGate::Grounded => true,
        JumpGate::Airborne => false,
    };
    let allowed_jumps = jump.gate(&on_ground, gate_open_when);

    // Gravity first, jump second: a jump in the same tick wins outright.
    let gravity = tuning.gravity;
    let terminal = tuning.terminal_velocity;
    let jump_speed = tuning.jump_speed;
    let vertical = timeline
        .clock()
        .map(VerticalStep::Gravity)
        .merge(&allowed_jumps.map(|()| VerticalStep::Jump))
        .fold(timeline, 0.0f32, move |speed, step| match step {
            VerticalStep::Gravity(dt) => (speed + gravity * dt).clamp(-terminal, terminal),
            VerticalStep::Jump => -jump_speed,
        });

    let velocity = horizontal.combine(&vertical, Vec2::new);

    let facing = left
        .map(|()| false)
        .merge(&right.map(|()| true))
        .scan(timeline, true, |_, towards| towards);

    let paint_facing = facing.clone();
    let entity = moving_entity(
        timeline,
        start,
        &velocity,
        size,
        tiles,
        move |position, size| player_paint(position, size, paint_facing.clone()),
    );

    PlayerRig {
        position: entity.map(|e| e.position),
        entity,
        facing,
        size,
    }
}

/// Player draw callback: picks the sprite frame for the live facing
/// direction at render time.
fn player_paint(position: Vec2, size: Vec2, facing: Signal<bool>) -> DrawFn {
    Rc::new(move |surface| {
        let (sx, sy, sw, sh) = if facing.sample() {
            PLAYER_SRC_RIGHT
        } else {
            PLAYER_SRC_LEFT
        };
        let sprite = surface.subregion(PLAYER_TEXTURE, sx, sy, sw, sh);
        surface.draw(sprite, position, Some(size));
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    use crate::sim::entity::tile;

    #[test]
    fn grounded_requires_exact_bottom_contact() {
        let tiles = vec![tile(IVec2::new(5, 0))];
        let size = Vec2::new(38.0, 58.0);
        let resting_y = 0.0 - size.y; // bottom edge exactly at tile top (y=0)

        // Horizontal overlap with the tile spanning x in [160, 192]
        let over = Vec2::new(150.0, resting_y);
        assert!(grounded(over, size, &tiles));

        // A hair above the surface is airborne
        assert!(!grounded(Vec2::new(150.0, resting_y - 0.001), size, &tiles));

        // No horizontal overlap
        assert!(!grounded(Vec2::new(400.0, resting_y), size, &tiles));
    }

    #[test]
    fn grounded_boundary_at_tile_height() {
        // Tile at grid (5, 1): top edge at y = 32
        let tiles = vec![tile(IVec2::new(5, 1))];
        let size = Vec2::new(38.0, 32.0);

        assert!(grounded(
            Vec2::new(160.0, 32.0 - size.y),
            size,
            &tiles
        ));
        assert!(!grounded(
            Vec2::new(160.0, 31.999 - size.y),
            size,
            &tiles
        ));
    }
}
