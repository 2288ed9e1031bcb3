#![forbid(unsafe_code)]

//! Tooltip placement.
//!
//! [`solve`] takes a [`PlacementRequest`] (target rectangle, container size,
//! measured tooltip size, preferred side, gap and obstructions) and returns a
//! [`Placement`]: the side the bubble ends up on, its clamped frame, where the
//! pointer attaches along the facing edge, and a [`NormalizedRect`] that can be
//! re-projected with [`denormalize`] when the container is resized.
//!
//! The solver is pure and total. Degenerate geometry is clamped, never
//! rejected.
//!
//! # Example
//!
//! ```
//! use perch_layout::{PlacementRequest, PreferredSide, Rect, Side, Size, solve};
//!
//! let request = PlacementRequest::new(
//!     Rect::new(150.0, 300.0, 100.0, 40.0),
//!     Size::new(400.0, 800.0),
//!     Size::new(180.0, 44.0),
//! )
//! .preferred(PreferredSide::Top);
//!
//! let placement = solve(&request);
//! assert_eq!(placement.side, Side::Top);
//! assert!(placement.frame.max_y() <= 300.0);
//! ```

pub mod normalize;
pub mod placement;

pub use normalize::{NormalizedRect, denormalize};
pub use perch_core::geometry::{Insets, Point, Rect, Size};
pub use placement::{
    ArrowBounds, Clearances, DEFAULT_GAP, DEFAULT_MARGIN, Placement, PlacementRequest, UsableArea,
    solve,
};

use serde::{Deserialize, Serialize};

/// A concrete side of the target that the bubble attaches to.
///
/// `Leading` is the left edge and `Trailing` the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Leading,
    Trailing,
}

impl Side {
    /// Every concrete side, in auto-placement precedence order.
    pub const ALL: [Side; 4] = [Side::Bottom, Side::Top, Side::Trailing, Side::Leading];

    /// The side across the target.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Leading => Self::Trailing,
            Self::Trailing => Self::Leading,
        }
    }

    /// Whether the bubble sits above or below the target.
    ///
    /// Vertical placements attach the pointer to a horizontal edge.
    #[inline]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// A requested side. `Auto` lets the solver pick the roomiest side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredSide {
    Top,
    Bottom,
    Leading,
    Trailing,
    #[default]
    Auto,
}

impl PreferredSide {
    /// The concrete side, or `None` for `Auto`.
    #[inline]
    pub const fn concrete(self) -> Option<Side> {
        match self {
            Self::Top => Some(Side::Top),
            Self::Bottom => Some(Side::Bottom),
            Self::Leading => Some(Side::Leading),
            Self::Trailing => Some(Side::Trailing),
            Self::Auto => None,
        }
    }
}

impl From<Side> for PreferredSide {
    fn from(side: Side) -> Self {
        match side {
            Side::Top => Self::Top,
            Side::Bottom => Self::Bottom,
            Side::Leading => Self::Leading,
            Side::Trailing => Self::Trailing,
        }
    }
}
