#![forbid(unsafe_code)]

//! Presentation glue for Perch tooltips.
//!
//! - [`registry`]: targets, their registration order and where they are.
//! - [`bubble`]: the bubble outline with its integrated pointer.
//! - [`transition`]: spring-driven appear/dismiss motion.
//! - [`overlay`]: [`TooltipOverlay`], which wires the placement solver, the
//!   activation controller and the hide debounce together.
//!
//! Drawing, gesture recognition and text measurement belong to the host
//! toolkit. The overlay hands it geometry and takes back taps, pointer
//! positions and the measured bubble size.

pub mod bubble;
pub mod overlay;
pub mod registry;
pub mod transition;

pub use bubble::{BubbleShape, PathCommand};
pub use overlay::{TooltipLayout, TooltipOverlay, Viewport};
pub use registry::{AnchorLookup, ResolvedRects, TargetRegistration, TargetRegistry};
pub use transition::{Transition, TransitionFrame, scale_anchor};
