//! Discrete event streams
//!
//! An [`Event`] produces zero or more occurrences per tick. Occurrences
//! pushed through an [`EventSink`] between ticks become visible on the next
//! tick. Polling is memoized at the sink so every downstream reader of a
//! tick sees the same occurrences.

use std::cell::RefCell;
use std::rc::Rc;

use crate::reactive::signal::Signal;
use crate::reactive::timeline::Timeline;

/// A discrete stream of occurrences, polled by tick stamp.
pub struct Event<T> {
    node: Rc<dyn Fn(u64) -> Vec<T>>,
}

impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

struct SinkState<T> {
    /// Occurrences waiting for delivery, tagged with the stamp they become
    /// visible at.
    pending: Vec<(u64, T)>,
    cached_stamp: u64,
    cached: Vec<T>,
}

/// Push side of an event stream. Values sent between ticks are delivered on
/// the following tick.
pub struct EventSink<T> {
    timeline: Timeline,
    shared: Rc<RefCell<SinkState<T>>>,
}

impl<T> EventSink<T> {
    pub fn send(&self, value: T) {
        let due = self.timeline.stamp() + 1;
        self.shared.borrow_mut().pending.push((due, value));
    }
}

/// Create a sink/stream pair on the given timeline.
pub fn sink<T: Clone + 'static>(timeline: &Timeline) -> (EventSink<T>, Event<T>) {
    let shared = Rc::new(RefCell::new(SinkState {
        pending: Vec::new(),
        cached_stamp: u64::MAX,
        cached: Vec::new(),
    }));

    let push = EventSink {
        timeline: timeline.clone(),
        shared: Rc::clone(&shared),
    };

    let event = Event::from_poll(move |stamp| {
        let mut state = shared.borrow_mut();
        if state.cached_stamp != stamp {
            let mut due = Vec::new();
            let mut rest = Vec::new();
            for (tag, value) in state.pending.drain(..) {
                if tag <= stamp {
                    due.push(value);
                } else {
                    rest.push((tag, value));
                }
            }
            state.pending = rest;
            state.cached = due;
            state.cached_stamp = stamp;
        }
        state.cached.clone()
    });

    (push, event)
}

impl<T: Clone + 'static> Event<T> {
    pub(crate) fn from_poll(poll: impl Fn(u64) -> Vec<T> + 'static) -> Self {
        Self {
            node: Rc::new(poll),
        }
    }

    /// Occurrences of this stream at `stamp`.
    pub fn poll(&self, stamp: u64) -> Vec<T> {
        (self.node)(stamp)
    }

    pub fn map<U: Clone + 'static>(&self, f: impl Fn(T) -> U + 'static) -> Event<U> {
        let source = self.clone();
        Event::from_poll(move |stamp| source.poll(stamp).into_iter().map(&f).collect())
    }

    /// Merge two streams; within a tick, `self`'s occurrences come first.
    pub fn merge(&self, other: &Event<T>) -> Event<T> {
        let a = self.clone();
        let b = other.clone();
        Event::from_poll(move |stamp| {
            let mut occurrences = a.poll(stamp);
            occurrences.extend(b.poll(stamp));
            occurrences
        })
    }

    /// Pass occurrences only while `condition` samples equal to `open_when`;
    /// suppressed occurrences are dropped, not queued.
    pub fn gate(&self, condition: &Signal<bool>, open_when: bool) -> Event<T> {
        let source = self.clone();
        let condition = condition.clone();
        Event::from_poll(move |stamp| {
            if condition.sample() == open_when {
                source.poll(stamp)
            } else {
                Vec::new()
            }
        })
    }

    /// Accumulate occurrences into a time-varying value. The fold advances
    /// once per tick, on first sample.
    pub fn fold<A: Clone + 'static>(
        &self,
        timeline: &Timeline,
        initial: A,
        f: impl FnMut(A, T) -> A + 'static,
    ) -> Signal<A> {
        struct FoldState<A, F> {
            last_stamp: u64,
            acc: A,
            f: F,
        }

        let source = self.clone();
        let timeline = timeline.clone();
        let state = Rc::new(RefCell::new(FoldState {
            last_stamp: 0,
            acc: initial,
            f,
        }));

        Signal::from_fn(move || {
            let stamp = timeline.stamp();
            if state.borrow().last_stamp < stamp {
                // Poll before re-borrowing: upstream may touch other nodes.
                let occurrences = source.poll(stamp);
                let mut st = state.borrow_mut();
                if st.last_stamp < stamp {
                    st.last_stamp = stamp;
                    let FoldState { acc, f, .. } = &mut *st;
                    for occurrence in occurrences {
                        *acc = f(acc.clone(), occurrence);
                    }
                }
            }
            state.borrow().acc.clone()
        })
    }

    /// Stateful fold over events only. Same advance discipline as [`fold`];
    /// the name matches its use for held values (latest occurrence wins).
    ///
    /// [`fold`]: Event::fold
    pub fn scan<A: Clone + 'static>(
        &self,
        timeline: &Timeline,
        initial: A,
        f: impl FnMut(A, T) -> A + 'static,
    ) -> Signal<A> {
        self.fold(timeline, initial, f)
    }
}
