//! Time-varying values
//!
//! A [`Signal`] is a shareable handle to a value that can change over ticks
//! and is always synchronously sampleable. Pure combinators (`map`,
//! `combine`, `sequence`) recompute on demand; stateful accumulators
//! ([`integrate_with`], [`Event::fold`]) advance once per tick.
//!
//! [`Event::fold`]: crate::reactive::event::Event::fold

use std::cell::RefCell;
use std::ops::{Add, Mul};
use std::rc::Rc;

use crate::reactive::timeline::Timeline;

/// A time-varying value.
pub struct Signal<T> {
    node: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

impl<T: Clone + 'static> Signal<T> {
    /// A signal that always holds `value`.
    pub fn constant(value: T) -> Self {
        Self::from_fn(move || value.clone())
    }

    /// A signal computed from an arbitrary sampling function. The function
    /// must be consistent within a tick (read only memoized nodes, external
    /// cells updated between ticks, or pure data).
    pub fn from_fn(f: impl Fn() -> T + 'static) -> Self {
        Self { node: Rc::new(f) }
    }

    /// Current value.
    pub fn sample(&self) -> T {
        (self.node)()
    }

    pub fn map<U: Clone + 'static>(&self, f: impl Fn(T) -> U + 'static) -> Signal<U> {
        let source = self.clone();
        Signal::from_fn(move || f(source.sample()))
    }

    /// Combine two signals through an arbitrary merge function.
    pub fn combine<U: Clone + 'static, V: Clone + 'static>(
        &self,
        other: &Signal<U>,
        f: impl Fn(T, U) -> V + 'static,
    ) -> Signal<V> {
        let a = self.clone();
        let b = other.clone();
        Signal::from_fn(move || f(a.sample(), b.sample()))
    }
}

/// Collapse a time-varying collection of signals into one time-varying
/// collection of current element values. Every element is re-sampled on
/// each sample of the result.
pub fn sequence<T: Clone + 'static>(outer: &Signal<Vec<Signal<T>>>) -> Signal<Vec<T>> {
    let outer = outer.clone();
    Signal::from_fn(move || outer.sample().iter().map(Signal::sample).collect())
}

/// Fold a rate signal into an accumulated value, advancing once per clock
/// tick. The combiner receives the accumulated value and the rate sample
/// already scaled by the tick's elapsed seconds.
pub fn integrate_with<T>(
    timeline: &Timeline,
    rate: &Signal<T>,
    start: T,
    combine: impl FnMut(T, T) -> T + 'static,
) -> Signal<T>
where
    T: Copy + Mul<f32, Output = T> + 'static,
{
    struct IntegrateState<T, F> {
        last_stamp: u64,
        acc: T,
        combine: F,
    }

    let rate = rate.clone();
    let timeline = timeline.clone();
    let state = Rc::new(RefCell::new(IntegrateState {
        last_stamp: 0,
        acc: start,
        combine,
    }));

    Signal::from_fn(move || {
        let stamp = timeline.stamp();
        if state.borrow().last_stamp < stamp {
            // Sample the rate before re-borrowing; it may reach other nodes.
            let step = rate.sample() * timeline.dt();
            let mut st = state.borrow_mut();
            if st.last_stamp < stamp {
                st.last_stamp = stamp;
                let IntegrateState { acc, combine, .. } = &mut *st;
                *acc = combine(*acc, step);
            }
        }
        state.borrow().acc
    })
}

/// Plain time integral of a rate signal: accumulated value advances by
/// `rate * dt` each tick from `start`.
pub fn integral<T>(timeline: &Timeline, rate: &Signal<T>, start: T) -> Signal<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T> + 'static,
{
    integrate_with(timeline, rate, start, |acc, step| acc + step)
}
