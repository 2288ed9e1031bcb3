#![forbid(unsafe_code)]

//! Time-driven animation primitives.
//!
//! Animations are advanced explicitly with [`Animation::tick`], so the caller
//! owns the clock. That keeps transitions deterministic under test.

pub mod spring;

pub use spring::Spring;

use web_time::Duration;

/// A value that evolves over time toward completion.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has settled.
    fn is_complete(&self) -> bool;

    /// Current progress, normalized to `[0.0, 1.0]`.
    fn value(&self) -> f32;

    /// Return to the initial state.
    fn reset(&mut self);
}
