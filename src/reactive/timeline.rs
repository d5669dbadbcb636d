//! The global update clock
//!
//! A [`Timeline`] is the sole driver of time: one `step(dt)` per frame
//! advances the tick stamp and records the elapsed seconds for that tick.
//! Everything stateful in the graph keys its once-per-tick advance off the
//! stamp.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::event::Event;

struct TimelineState {
    stamp: u64,
    dt: f32,
}

/// Shared clock handle. Cheap to clone; all clones observe the same ticks.
#[derive(Clone)]
pub struct Timeline {
    inner: Rc<RefCell<TimelineState>>,
}

impl Timeline {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(TimelineState { stamp: 0, dt: 0.0 })),
        }
    }

    /// Advance the clock by one tick of `dt` elapsed seconds.
    pub fn step(&self, dt: f32) {
        let mut state = self.inner.borrow_mut();
        state.stamp += 1;
        state.dt = dt;
    }

    /// Stamp of the current tick. Zero before the first `step`.
    pub fn stamp(&self) -> u64 {
        self.inner.borrow().stamp
    }

    /// Elapsed seconds of the current tick.
    pub fn dt(&self) -> f32 {
        self.inner.borrow().dt
    }

    /// The clock as an event stream: one occurrence per tick carrying the
    /// tick's elapsed seconds.
    pub fn clock(&self) -> Event<f32> {
        let timeline = self.clone();
        Event::from_poll(move |stamp| {
            if stamp > 0 && stamp == timeline.stamp() {
                vec![timeline.dt()]
            } else {
                Vec::new()
            }
        })
    }
}

impl Default for Timeline {
    fn default() -> Self {
        Self::new()
    }
}
