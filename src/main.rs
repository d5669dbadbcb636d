//! Tilefall headless demo
//!
//! Runs the demo scene at a fixed timestep against a recording draw
//! surface, with a few scripted inputs, and logs what the renderer would
//! see each second. Pass a tuning JSON path as the first argument to
//! override physics balance.

use std::path::PathBuf;

use glam::Vec2;

use tilefall::consts::SIM_DT;
use tilefall::reactive::Timeline;
use tilefall::render::{RecordingSurface, render_frame};
use tilefall::sim::{Scene, World};
use tilefall::tuning::Tuning;

const DEMO_FRAMES: u64 = 600;

fn main() {
    env_logger::init();

    let tuning_path = std::env::args().nth(1).map(PathBuf::from);
    let tuning = Tuning::load(tuning_path.as_deref());

    let timeline = Timeline::new();
    let mut world = match World::new(&timeline, tuning, Scene::demo()) {
        Ok(world) => world,
        Err(err) => {
            log::error!("World construction failed: {err}");
            std::process::exit(1);
        }
    };

    let mut surface = RecordingSurface::new();

    for frame in 0..DEMO_FRAMES {
        // Scripted input: spawn a body, take a stroll, hop
        match frame {
            60 => world.clicked.send(Vec2::new(500.0, 100.0)),
            180 => world.clicked.send(Vec2::new(250.0, 50.0)),
            240 => world.right.send(()),
            360 => world.jump.send(()),
            420 => world.left.send(()),
            _ => {}
        }

        let entities = world.tick(SIM_DT);

        surface.clear();
        render_frame(&entities, &mut surface);

        if frame % 60 == 0 {
            log::info!(
                "frame {frame}: {} entities, {} draw calls, on_ground={}",
                entities.len(),
                surface.calls.len(),
                world.on_ground()
            );
        }
    }

    log::info!("demo finished after {DEMO_FRAMES} frames");
}
