#![forbid(unsafe_code)]

//! Perch: anchored tooltip overlays.
//!
//! This crate is the public surface. It re-exports the types a host needs
//! from the internal crates and offers a [`prelude`].
//!
//! # Example
//!
//! ```
//! use perch::prelude::*;
//!
//! let mut overlay = TooltipOverlay::new(OverlayConfig::default());
//! overlay.register(TargetRegistration::new("save", "Save the document").preferred(Side::Top));
//!
//! let mut rects = ResolvedRects::new();
//! rects.insert("save", Rect::new(40.0, 400.0, 120.0, 44.0));
//!
//! overlay.tap("save", Instant::now());
//! let layout = overlay
//!     .layout(&rects, Viewport::new(Size::new(390.0, 844.0)))
//!     .expect("save is active and resolvable");
//! assert_eq!(layout.placement.side, Side::Top);
//! ```

pub mod error;

pub use error::{DegradationAction, Error, Result, config_or_default};

// --- Geometry and motion ---------------------------------------------------

pub use perch_core::animation::{Animation, Spring};
pub use perch_core::{Insets, Point, Rect, Size};
pub use web_time::{Duration, Instant};

// --- Placement -------------------------------------------------------------

pub use perch_layout::{
    ArrowBounds, Clearances, NormalizedRect, Placement, PlacementRequest, PreferredSide, Side,
    UsableArea, denormalize, solve,
};

// --- Style -----------------------------------------------------------------

pub use perch_style::{Font, ParseColorError, Rgba, TooltipStyle};

// --- Runtime ---------------------------------------------------------------

pub use perch_runtime::{
    ActivationController, ActivationState, ConfigError, Debouncer, DeferredQueue, MotionConfig,
    OverlayConfig, Phase,
};

// --- Widgets ---------------------------------------------------------------

pub use perch_widgets::{
    AnchorLookup, BubbleShape, PathCommand, ResolvedRects, TargetRegistration, TargetRegistry,
    TooltipLayout, TooltipOverlay, Transition, TransitionFrame, Viewport,
};

/// Common imports for hosts embedding a tooltip overlay.
pub mod prelude {
    pub use crate::{
        AnchorLookup, Insets, Instant, OverlayConfig, Phase, Point, PreferredSide, Rect,
        ResolvedRects, Side, Size, TargetRegistration, TooltipLayout, TooltipOverlay, TooltipStyle,
        Viewport,
    };
}
