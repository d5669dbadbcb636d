//! Collision-aware motion
//!
//! The heart of the simulation: axis-aligned overlap testing, per-axis
//! clipping, and the folding step that turns velocity samples into clipped
//! positions against whatever the obstacle signal currently holds.

use glam::Vec2;

use crate::reactive::{Signal, Timeline, integral, integrate_with};
use crate::sim::entity::{DrawFn, Entity};

/// Would a body at `position` with `size` overlap `other`? Strict
/// inequalities: edge-touching rectangles do not overlap.
pub fn overlaps(position: Vec2, size: Vec2, other: &Entity) -> bool {
    let min = position;
    let max = position + size;
    let other_min = other.min();
    let other_max = other.max();

    min.x < other_max.x && max.x > other_min.x && min.y < other_max.y && max.y > other_min.y
}

/// Clip a tentative position against one obstacle, per axis, based on the
/// sign of the velocity that produced it.
///
/// An axis is clipped only when the leading edge crossed the obstacle's
/// near edge this step (the trailing edge had not already passed it); a
/// zero velocity component leaves its axis untouched. Both axes may clip
/// in one call. With diagonal motion past a partially-in-path obstacle the
/// result is an approximation, not a swept resolution.
pub fn clip_position(tentative: Vec2, size: Vec2, velocity: Vec2, other: &Entity) -> Vec2 {
    let mut clipped = tentative;
    let other_min = other.min();
    let other_max = other.max();

    if velocity.x > 0.0 {
        // Moving right: right edge crossed other's left edge
        if tentative.x + size.x > other_min.x && tentative.x < other_min.x {
            clipped.x = other_min.x - size.x;
        }
    } else if velocity.x < 0.0 {
        // Moving left: left edge crossed other's right edge
        if tentative.x < other_max.x && tentative.x + size.x > other_max.x {
            clipped.x = other_max.x;
        }
    }

    if velocity.y > 0.0 {
        // Moving down: bottom edge crossed other's top edge
        if tentative.y + size.y > other_min.y && tentative.y < other_min.y {
            clipped.y = other_min.y - size.y;
        }
    } else if velocity.y < 0.0 {
        // Moving up: top edge crossed other's bottom edge
        if tentative.y < other_max.y && tentative.y + size.y > other_max.y {
            clipped.y = other_max.y;
        }
    }

    clipped
}

/// The per-step combiner handed to [`integrate_with`]: advance by the
/// (already dt-scaled) velocity sample, then clip against every currently
/// overlapping obstacle in composition order. When several obstacles
/// overlap, the last one in order wins per call. No overlap means the
/// tentative position stands.
pub fn collision_step(
    size: Vec2,
    obstacles: Signal<Vec<Entity>>,
) -> impl FnMut(Vec2, Vec2) -> Vec2 {
    move |accumulated, velocity| {
        let tentative = accumulated + velocity;
        let others = obstacles.sample();

        let mut clipped = tentative;
        for other in &others {
            if overlaps(tentative, size, other) {
                clipped = clip_position(tentative, size, velocity, other);
            }
        }
        clipped
    }
}

/// A velocity `v0` accelerating by `dv` per second.
pub fn accelerating(timeline: &Timeline, v0: Vec2, dv: Vec2) -> Signal<Vec2> {
    integral(timeline, &Signal::constant(dv), Vec2::ZERO).map(move |gained| v0 + gained)
}

/// Wire a start position and a velocity signal through collision-aware
/// integration against `obstacles`, producing entity snapshots painted by
/// `paint(position, size)`.
///
/// Callers validate `size` up front (see [`crate::sim::entity::validate_size`]).
pub fn moving_entity(
    timeline: &Timeline,
    start: Vec2,
    velocity: &Signal<Vec2>,
    size: Vec2,
    obstacles: &Signal<Vec<Entity>>,
    paint: impl Fn(Vec2, Vec2) -> DrawFn + 'static,
) -> Signal<Entity> {
    debug_assert!(size.x > 0.0 && size.y > 0.0);

    let position = integrate_with(
        timeline,
        velocity,
        start,
        collision_step(size, obstacles.clone()),
    );

    position.map(move |position| Entity {
        position,
        size,
        draw: paint(position, size),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;
    use proptest::prelude::*;

    use crate::sim::entity::tile;

    fn obstacle(position: Vec2, size: Vec2) -> Entity {
        Entity {
            position,
            size,
            draw: std::rc::Rc::new(|_| {}),
        }
    }

    #[test]
    fn edge_touching_is_not_overlap() {
        let other = obstacle(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
        // Right edge exactly on other's left edge
        assert!(!overlaps(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0), &other));
        // One pixel of penetration
        assert!(overlaps(Vec2::new(0.5, 0.0), Vec2::new(10.0, 10.0), &other));
    }

    #[test]
    fn zero_velocity_never_clips() {
        let other = obstacle(Vec2::new(0.0, 0.0), Vec2::new(32.0, 32.0));
        // Even when already overlapping, a zero-velocity step is identity
        let tentative = Vec2::new(10.0, 10.0);
        assert_eq!(
            clip_position(tentative, Vec2::new(16.0, 16.0), Vec2::ZERO, &other),
            tentative
        );
    }

    #[test]
    fn falling_body_clips_to_tile_top() {
        // Tile at grid (10,10): world rect [320,352] on both axes
        let t = tile(IVec2::new(10, 10));
        let size = Vec2::new(38.0, 58.0);
        let velocity = Vec2::new(0.0, 50.0);

        // One 1-second tick from y=250: tentative y=300, bottom edge 358
        // crosses the tile top at 320
        let tentative = Vec2::new(330.0, 250.0) + velocity;
        assert!(overlaps(tentative, size, &t));

        let clipped = clip_position(tentative, size, velocity, &t);
        assert_eq!(clipped.y, 320.0 - 58.0);
        assert_eq!(clipped.x, tentative.x);
        assert!(!overlaps(clipped, size, &t));
    }

    #[test]
    fn collision_step_is_identity_at_zero_velocity() {
        let tiles = Signal::constant(vec![tile(IVec2::new(0, 1))]);
        let mut step = collision_step(Vec2::new(16.0, 16.0), tiles);
        let here = Vec2::new(5.0, 10.0);
        assert_eq!(step(here, Vec2::ZERO), here);

        let empty = Signal::constant(Vec::new());
        let mut step = collision_step(Vec2::new(16.0, 16.0), empty);
        assert_eq!(step(here, Vec2::ZERO), here);
    }

    #[test]
    fn later_obstacle_wins_when_both_overlap() {
        // Two stacked obstacles both in the path of a downward move; the
        // clip against the second replaces the clip against the first.
        let first = obstacle(Vec2::new(0.0, 100.0), Vec2::new(100.0, 10.0));
        let second = obstacle(Vec2::new(0.0, 104.0), Vec2::new(100.0, 10.0));
        let tiles = Signal::constant(vec![first, second]);

        // Tentative y=90: bottom edge 110 crosses both tops (100, 104)
        // while the top edge is still above both
        let size = Vec2::new(20.0, 20.0);
        let mut step = collision_step(size, tiles);
        let clipped = step(Vec2::new(40.0, 85.0), Vec2::new(0.0, 5.0));
        assert_eq!(clipped.y, 104.0 - size.y);
    }

    #[test]
    fn accelerating_velocity_grows_linearly() {
        let timeline = Timeline::new();
        let v = accelerating(&timeline, Vec2::new(0.0, 220.0), Vec2::new(0.0, 350.0));

        assert_eq!(v.sample(), Vec2::new(0.0, 220.0));
        timeline.step(1.0);
        assert_eq!(v.sample(), Vec2::new(0.0, 570.0));
        timeline.step(1.0);
        assert_eq!(v.sample(), Vec2::new(0.0, 920.0));
    }

    #[test]
    fn moving_entity_falls_and_rests_on_tiles() {
        let timeline = Timeline::new();
        // Floor row at y = 320
        let tiles: Vec<Entity> = (0..20).map(|x| tile(IVec2::new(x, 10))).collect();
        let obstacles = Signal::constant(tiles.clone());

        let body = moving_entity(
            &timeline,
            Vec2::new(100.0, 0.0),
            &Signal::constant(Vec2::new(0.0, 100.0)),
            Vec2::new(38.0, 58.0),
            &obstacles,
            |_, _| std::rc::Rc::new(|_| {}),
        );

        for _ in 0..10 {
            timeline.step(0.5);
            let snapshot = body.sample();
            for t in &tiles {
                assert!(!overlaps(snapshot.position, snapshot.size, t));
            }
        }
        // Came to rest with bottom on the tile row top
        assert_eq!(body.sample().position.y, 320.0 - 58.0);
    }

    proptest! {
        #[test]
        fn overlap_is_reflexive_under_role_swap(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            aw in 1.0f32..100.0, ah in 1.0f32..100.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            bw in 1.0f32..100.0, bh in 1.0f32..100.0,
        ) {
            let a_pos = Vec2::new(ax, ay);
            let a_size = Vec2::new(aw, ah);
            let b = obstacle(Vec2::new(bx, by), Vec2::new(bw, bh));
            let a = obstacle(a_pos, a_size);

            prop_assert_eq!(
                overlaps(a_pos, a_size, &b),
                overlaps(b.position, b.size, &a)
            );
        }

        #[test]
        fn clip_resolves_penetration_for_bounded_steps(
            start_x in -200.0f32..-1.0, start_y in -200.0f32..-1.0,
            w in 4.0f32..80.0, h in 4.0f32..80.0,
            vx in 0.0f32..1.0, vy in 0.0f32..1.0,
        ) {
            // Obstacle fixed at the origin; body starts up-left of it and
            // moves down-right by less than its own extent per step, so the
            // leading edge cannot tunnel fully past the near edge.
            let other = obstacle(Vec2::ZERO, Vec2::new(64.0, 64.0));
            let size = Vec2::new(w, h);
            let start = Vec2::new(start_x.min(-w), start_y.min(-h));
            let velocity = Vec2::new(vx * (w - 0.5), vy * (h - 0.5));

            prop_assume!(!overlaps(start, size, &other));
            let mut here = start;
            for _ in 0..16 {
                let tentative = here + velocity;
                here = if overlaps(tentative, size, &other) {
                    clip_position(tentative, size, velocity, &other)
                } else {
                    tentative
                };
                prop_assert!(!overlaps(here, size, &other));
            }
        }

        #[test]
        fn horizontal_moves_never_change_y(
            start_x in -300.0f32..300.0, start_y in -300.0f32..300.0,
            vx in -50.0f32..50.0,
        ) {
            let other = obstacle(Vec2::ZERO, Vec2::new(64.0, 64.0));
            let size = Vec2::new(20.0, 20.0);
            let velocity = Vec2::new(vx, 0.0);
            let tentative = Vec2::new(start_x, start_y) + velocity;

            let clipped = clip_position(tentative, size, velocity, &other);
            prop_assert_eq!(clipped.y, tentative.y);
        }
    }
}
