#![forbid(unsafe_code)]

//! Runtime state for Perch tooltips.
//!
//! - [`ActivationController`] decides which target's tooltip is shown.
//! - [`DeferredQueue`] holds the continuations that finish a switch from one
//!   tooltip to another on the host's next event-loop turn.
//! - [`Debouncer`] delays clearing the active identity after a hide.
//! - [`OverlayConfig`] gathers every tunable as data.

pub mod activation;
pub mod config;
pub mod debounce;
pub mod deferred;

pub use activation::{ActivationController, ActivationState, Phase};
pub use config::{ConfigError, MotionConfig, OverlayConfig};
pub use debounce::{DEFAULT_HIDE_DEBOUNCE, Debouncer};
pub use deferred::DeferredQueue;
