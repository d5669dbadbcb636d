//! Data-driven physics tuning
//!
//! All gameplay-facing numbers live here so balance changes never touch
//! integration logic. A tuning file is plain JSON with any subset of the
//! fields; missing fields fall back to defaults.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// When the jump impulse is allowed through.
///
/// `Grounded` is the usual platformer contract (jump only while resting on
/// a tile). `Airborne` inverts the gate, kept selectable for compatibility
/// with levels balanced around air jumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JumpGate {
    #[default]
    Grounded,
    Airborne,
}

/// Physics and entity balance values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Downward acceleration applied to the player (px/s²)
    pub gravity: f32,
    /// Cap on vertical speed magnitude; horizontal speed is unclamped
    pub terminal_velocity: f32,
    /// Horizontal speed set by a left/right impulse (px/s)
    pub move_speed: f32,
    /// Upward speed set by a jump impulse (px/s)
    pub jump_speed: f32,
    /// Jump permission policy
    pub jump_gate: JumpGate,
    /// Player body size (px)
    pub player_size: Vec2,
    /// Size of click-spawned bodies (px)
    pub spawn_size: Vec2,
    /// Initial velocity of click-spawned bodies (px/s)
    pub spawn_velocity: Vec2,
    /// Constant acceleration of click-spawned bodies (px/s²)
    pub spawn_acceleration: Vec2,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 350.0,
            terminal_velocity: 600.0,
            move_speed: 200.0,
            jump_speed: 450.0,
            jump_gate: JumpGate::default(),
            // 4x the 50x36 sprite frame
            player_size: Vec2::new(200.0, 144.0),
            spawn_size: Vec2::new(200.0, 144.0),
            spawn_velocity: Vec2::new(0.0, 220.0),
            spawn_acceleration: Vec2::new(0.0, 350.0),
        }
    }
}

impl Tuning {
    /// Load tuning from a JSON file, falling back to defaults when the path
    /// is absent or the file is missing/unparseable.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };

        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path.display());
                    tuning
                }
                Err(err) => {
                    log::warn!("Bad tuning file {}: {err}; using defaults", path.display());
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!("Cannot read {}: {err}; using defaults", path.display());
                Self::default()
            }
        }
    }
}
