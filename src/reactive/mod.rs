//! Minimal synchronous reactive substrate
//!
//! Single-threaded, pull-based signals and discrete event streams driven by
//! one broadcast clock ([`Timeline`]). All sampling is synchronous: a signal
//! always has a current value, and stateful nodes (folds, integrals) advance
//! exactly once per clock tick, on first sample at that tick's stamp. Pure
//! combinators recompute freely; because stateful nodes are memoized against
//! the stamp, every reader within a tick observes one consistent snapshot.
//!
//! Discipline: every live stateful signal must be sampled each tick. The
//! world driver guarantees this by sampling the full entity composition
//! (plus the handful of signals nothing else reaches) in its per-tick pass.

pub mod event;
pub mod signal;
pub mod timeline;

pub use event::{Event, EventSink, sink};
pub use signal::{Signal, integral, integrate_with, sequence};
pub use timeline::Timeline;
