//! World composition and spawn management
//!
//! Merges the static tile set, the optional player, scene-declared bodies,
//! and click-spawned bodies into one time-varying entity list, and drives
//! the per-tick pass: step the clock, sample the composition, refresh the
//! delayed ground-contact cell.

use std::cell::Cell;
use std::rc::Rc;

use glam::{IVec2, Vec2};

use crate::consts::{GAME_SIZE, PLAYER_SRC_RIGHT, PLAYER_TEXTURE};
use crate::reactive::{EventSink, Signal, Timeline, sequence, sink};
use crate::sim::entity::{DrawFn, Entity, SimError, tile, validate_size};
use crate::sim::physics::{accelerating, moving_entity};
use crate::sim::player::{PlayerRig, grounded, player_rig};
use crate::tuning::Tuning;

/// Static description of a level: tile grid indices, an optional player
/// start, and bodies already falling when the session begins.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub tiles: Vec<IVec2>,
    pub player_start: Option<Vec2>,
    /// (start position, initial velocity) pairs; acceleration comes from
    /// tuning like click-spawned bodies.
    pub bodies: Vec<(Vec2, Vec2)>,
}

impl Scene {
    /// The classic demo level: two floating platforms, a long floor row,
    /// three falling bodies, and the player dropped in at mid-screen.
    pub fn demo() -> Self {
        let mut tiles = Vec::new();
        tiles.extend((10..=16).map(|x| IVec2::new(x, 15)));
        tiles.extend((25..=31).map(|x| IVec2::new(x, 25)));
        tiles.extend((0..=120).map(|x| IVec2::new(x, 36)));

        Self {
            tiles,
            player_start: Some(Vec2::new(GAME_SIZE.x / 2.0, 0.0)),
            bodies: vec![
                (Vec2::new(GAME_SIZE.x / 2.0, 0.0), Vec2::new(0.0, 420.0)),
                (Vec2::new(GAME_SIZE.x / 3.0, 100.0), Vec2::new(0.0, 430.0)),
                (Vec2::new(2.0 * GAME_SIZE.x / 3.0, 50.0), Vec2::new(0.0, 440.0)),
            ],
        }
    }

    /// Only tiles, no player or bodies.
    pub fn tiles_only(tiles: Vec<IVec2>) -> Self {
        Self {
            tiles,
            ..Self::default()
        }
    }
}

/// The composed world. Owns the input sinks and the merged entity view;
/// contributing signals are read, never mutated, by the composition.
pub struct World {
    timeline: Timeline,
    /// Spawn trigger: one permanent simulated body per occurrence.
    pub clicked: EventSink<Vec2>,
    pub left: EventSink<()>,
    pub right: EventSink<()>,
    pub jump: EventSink<()>,
    entities: Signal<Vec<Entity>>,
    player: Option<PlayerRig>,
    tiles: Vec<Entity>,
    ground: Rc<Cell<bool>>,
}

impl World {
    pub fn new(timeline: &Timeline, tuning: Tuning, scene: Scene) -> Result<Self, SimError> {
        validate_size(tuning.player_size)?;
        validate_size(tuning.spawn_size)?;

        let (clicked, clicks) = sink::<Vec2>(timeline);
        let (left, left_ev) = sink::<()>(timeline);
        let (right, right_ev) = sink::<()>(timeline);
        let (jump, jump_ev) = sink::<()>(timeline);

        let tiles: Vec<Entity> = scene.tiles.iter().copied().map(tile).collect();
        // Dynamic bodies collide with tiles only, never with each other.
        let obstacles = Signal::constant(tiles.clone());

        let ground = Rc::new(Cell::new(false));
        let player = scene.player_start.map(|start| {
            player_rig(
                timeline,
                &tuning,
                start,
                &obstacles,
                Rc::clone(&ground),
                &left_ev,
                &right_ev,
                &jump_ev,
            )
        });

        let spawn_body = {
            let timeline = timeline.clone();
            let obstacles = obstacles.clone();
            let size = tuning.spawn_size;
            let dv = tuning.spawn_acceleration;
            move |start: Vec2, initial_velocity: Vec2| {
                moving_entity(
                    &timeline,
                    start,
                    &accelerating(&timeline, initial_velocity, dv),
                    size,
                    &obstacles,
                    body_paint,
                )
            }
        };

        // Scene bodies are a fixed registry of time-varying entities.
        let scene_bodies: Vec<Signal<Entity>> = scene
            .bodies
            .iter()
            .map(|&(start, v0)| spawn_body(start, v0))
            .collect();

        // Append-only spawn registry: one independent integrator per click.
        let spawn_v0 = tuning.spawn_velocity;
        let registry = clicks.fold(timeline, Vec::new(), move |mut bodies, click| {
            bodies.push(spawn_body(click, spawn_v0));
            bodies
        });
        let spawned = sequence(&registry);

        // Composition order: tiles, player, scene bodies, spawned.
        let fixed_bodies = sequence(&Signal::constant(scene_bodies));
        let player_entities: Signal<Vec<Entity>> = match &player {
            Some(rig) => rig.entity.map(|e| vec![e]),
            None => Signal::constant(Vec::new()),
        };
        let entities = Signal::constant(tiles.clone())
            .combine(&player_entities, append)
            .combine(&fixed_bodies, append)
            .combine(&spawned, append);

        Ok(Self {
            timeline: timeline.clone(),
            clicked,
            left,
            right,
            jump,
            entities,
            player,
            tiles,
            ground,
        })
    }

    /// Advance one frame: step the clock, resolve the composition, then
    /// refresh the ground cell from the just-sampled player position so
    /// next tick's jump gate sees this tick's contact state. Returns the
    /// frame's entity snapshot for the renderer.
    pub fn tick(&mut self, dt: f32) -> Vec<Entity> {
        self.timeline.step(dt);
        let frame = self.entities.sample();

        if let Some(rig) = &self.player {
            // Keep the facing fold drained even when nothing draws.
            let _ = rig.facing.sample();
            let contact = grounded(rig.position.sample(), rig.size, &self.tiles);
            self.ground.set(contact);
        }

        frame
    }

    /// The merged time-varying entity view.
    pub fn entities(&self) -> Signal<Vec<Entity>> {
        self.entities.clone()
    }

    /// Ground contact as of the most recent completed tick.
    pub fn on_ground(&self) -> bool {
        self.ground.get()
    }

    pub fn player(&self) -> Option<&PlayerRig> {
        self.player.as_ref()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }
}

fn append(mut a: Vec<Entity>, b: Vec<Entity>) -> Vec<Entity> {
    a.extend(b);
    a
}

/// Spawned bodies reuse the right-facing player frame.
fn body_paint(position: Vec2, size: Vec2) -> DrawFn {
    Rc::new(move |surface| {
        let (sx, sy, sw, sh) = PLAYER_SRC_RIGHT;
        let sprite = surface.subregion(PLAYER_TEXTURE, sx, sy, sw, sh);
        surface.draw(sprite, position, Some(size));
    })
}
