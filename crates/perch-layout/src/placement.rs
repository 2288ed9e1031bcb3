#![forbid(unsafe_code)]

//! The placement solver.
//!
//! Resolution order:
//!
//! 1. Shrink the container by margins and safe-area insets into a
//!    [`UsableArea`]. The bottom edge loses the larger of the safe-area bottom
//!    and the keyboard height (they overlap on screen, so never both).
//! 2. Measure [`Clearances`] around the target inside that area.
//! 3. Resolve the side. A concrete preference is kept when its clearance fits
//!    the tooltip plus the gap, and flipped to the opposite side otherwise.
//!    `Auto` takes the strictly largest clearance; ties go to
//!    bottom, then top, then trailing, then leading.
//! 4. Center the bubble on the target's cross-axis midpoint, `gap` away from
//!    the target, then clamp each axis into the usable area.
//! 5. Project the target midpoint onto the facing edge to get the arrow
//!    fraction, clamped into [`ArrowBounds`].

use serde::{Deserialize, Serialize};

use crate::normalize::NormalizedRect;
use crate::{Insets, Point, PreferredSide, Rect, Side, Size};

/// Default clearance between target and bubble.
pub const DEFAULT_GAP: f64 = 8.0;

/// Default margin kept between the bubble and every container edge.
pub const DEFAULT_MARGIN: f64 = 8.0;

/// The sub-range of `[0, 1]` the arrow fraction is clamped into.
///
/// The bounds keep the pointer off the bubble's rounded corners. One pair is
/// applied to both horizontal and vertical edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct ArrowBounds {
    min: f64,
    max: f64,
}

impl ArrowBounds {
    /// Lower bound used when none is configured.
    pub const DEFAULT_MIN: f64 = 0.08;
    /// Upper bound used when none is configured.
    pub const DEFAULT_MAX: f64 = 0.92;

    /// Create bounds, clamping both ends into `[0, 1]` and swapping an
    /// inverted pair. Non-finite input falls back to the defaults.
    pub fn new(min: f64, max: f64) -> Self {
        if !min.is_finite() || !max.is_finite() {
            return Self::default();
        }
        let (min, max) = (min.clamp(0.0, 1.0), max.clamp(0.0, 1.0));
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp a raw fraction. `NaN` (a zero-length edge) maps to the middle.
    pub fn clamp(&self, raw: f64) -> f64 {
        if raw.is_nan() {
            (self.min + self.max) / 2.0
        } else {
            raw.clamp(self.min, self.max)
        }
    }

    /// Whether `fraction` lies inside the bounds.
    pub fn contains(&self, fraction: f64) -> bool {
        fraction >= self.min && fraction <= self.max
    }
}

impl Default for ArrowBounds {
    fn default() -> Self {
        Self {
            min: Self::DEFAULT_MIN,
            max: Self::DEFAULT_MAX,
        }
    }
}

impl From<(f64, f64)> for ArrowBounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<ArrowBounds> for (f64, f64) {
    fn from(bounds: ArrowBounds) -> Self {
        (bounds.min, bounds.max)
    }
}

/// Everything the solver needs for one placement.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementRequest {
    /// Target bounds in container coordinates.
    pub target: Rect,
    /// Size of the container the bubble is drawn in.
    pub container: Size,
    /// Measured (or placeholder) size of the bubble.
    pub tooltip: Size,
    pub preferred: PreferredSide,
    /// Minimum clearance between target and bubble.
    pub gap: f64,
    pub margins: Insets,
    pub safe_area: Insets,
    /// Height of an on-screen keyboard covering the bottom of the container.
    pub keyboard_height: f64,
    pub arrow_bounds: ArrowBounds,
}

impl PlacementRequest {
    /// Create a request with `Auto` placement, the default gap and margins,
    /// and no obstructions.
    pub fn new(target: Rect, container: Size, tooltip: Size) -> Self {
        Self {
            target,
            container,
            tooltip,
            preferred: PreferredSide::Auto,
            gap: DEFAULT_GAP,
            margins: Insets::all(DEFAULT_MARGIN),
            safe_area: Insets::ZERO,
            keyboard_height: 0.0,
            arrow_bounds: ArrowBounds::default(),
        }
    }

    #[must_use]
    pub fn preferred(mut self, preferred: impl Into<PreferredSide>) -> Self {
        self.preferred = preferred.into();
        self
    }

    #[must_use]
    pub fn gap(mut self, gap: f64) -> Self {
        self.gap = gap;
        self
    }

    #[must_use]
    pub fn margins(mut self, margins: impl Into<Insets>) -> Self {
        self.margins = margins.into();
        self
    }

    #[must_use]
    pub fn safe_area(mut self, safe_area: Insets) -> Self {
        self.safe_area = safe_area;
        self
    }

    #[must_use]
    pub fn keyboard_height(mut self, height: f64) -> Self {
        self.keyboard_height = height;
        self
    }

    #[must_use]
    pub fn arrow_bounds(mut self, bounds: ArrowBounds) -> Self {
        self.arrow_bounds = bounds;
        self
    }
}

/// Output of [`solve`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// The side the bubble ended up on. Never `Auto`.
    pub side: Side,
    /// Bubble bounds, clamped into the usable area.
    pub frame: Rect,
    /// Pointer position along the facing edge as a fraction of its length.
    pub arrow_fraction: f64,
    /// `frame` relative to the container size.
    pub normalized: NormalizedRect,
}

/// The container area left after margins, safe area and keyboard.
///
/// `max_x < min_x` (or the vertical equivalent) is legal and simply means
/// there is no room.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UsableArea {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl UsableArea {
    /// Compute the usable area for a request.
    pub fn from_request(request: &PlacementRequest) -> Self {
        let PlacementRequest {
            container,
            margins,
            safe_area,
            keyboard_height,
            ..
        } = request;
        Self {
            min_x: margins.left + safe_area.left,
            max_x: container.width - margins.right - safe_area.right,
            min_y: margins.top + safe_area.top,
            max_y: container.height - margins.bottom - safe_area.bottom.max(*keyboard_height),
        }
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// The area as a rectangle (possibly with negative extents).
    pub fn rect(&self) -> Rect {
        Rect::new(self.min_x, self.min_y, self.width(), self.height())
    }

    /// Whether a bubble of `size` can fit at all.
    pub fn fits(&self, size: Size) -> bool {
        self.width() >= size.width && self.height() >= size.height
    }

    /// Clamp a bubble origin so a bubble of `size` stays inside the area.
    ///
    /// When the area is smaller than the bubble the leading edge wins.
    pub fn clamp_origin(&self, origin: Point, size: Size) -> Point {
        Point::new(
            origin.x.min(self.max_x - size.width).max(self.min_x),
            origin.y.min(self.max_y - size.height).max(self.min_y),
        )
    }
}

/// Free space on each side of the target, inside the usable area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clearances {
    pub above: f64,
    pub below: f64,
    pub leading: f64,
    pub trailing: f64,
}

impl Clearances {
    pub fn measure(target: &Rect, area: &UsableArea) -> Self {
        Self {
            above: target.min_y() - area.min_y,
            below: area.max_y - target.max_y(),
            leading: target.min_x() - area.min_x,
            trailing: area.max_x - target.max_x(),
        }
    }

    #[inline]
    pub fn on(&self, side: Side) -> f64 {
        match side {
            Side::Top => self.above,
            Side::Bottom => self.below,
            Side::Leading => self.leading,
            Side::Trailing => self.trailing,
        }
    }

    /// The roomiest side. Ties resolve in [`Side::ALL`] order.
    pub fn roomiest(&self) -> Side {
        let mut best = Side::ALL[0];
        for side in &Side::ALL[1..] {
            if self.on(*side) > self.on(best) {
                best = *side;
            }
        }
        best
    }
}

/// Solve a placement request.
pub fn solve(request: &PlacementRequest) -> Placement {
    let area = UsableArea::from_request(request);
    let clearances = Clearances::measure(&request.target, &area);
    let side = resolve_side(request, &clearances);

    let origin = area.clamp_origin(anchor_origin(request, side), request.tooltip);
    let frame = Rect::from_origin_size(origin, request.tooltip);
    let arrow_fraction = arrow_fraction(&request.target, &frame, side, &request.arrow_bounds);

    Placement {
        side,
        frame,
        arrow_fraction,
        normalized: NormalizedRect::from_rect(frame, request.container),
    }
}

fn resolve_side(request: &PlacementRequest, clearances: &Clearances) -> Side {
    let Some(preferred) = request.preferred.concrete() else {
        return clearances.roomiest();
    };

    let extent = if preferred.is_vertical() {
        request.tooltip.height
    } else {
        request.tooltip.width
    };
    if clearances.on(preferred) >= extent + request.gap {
        return preferred;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        target: "perch.layout",
        preferred = ?preferred,
        clearance = clearances.on(preferred),
        needed = extent + request.gap,
        "preferred side lacks clearance, flipping"
    );
    preferred.opposite()
}

/// Origin that puts the bubble `gap` away from the target on `side`,
/// centered on the target's cross axis.
fn anchor_origin(request: &PlacementRequest, side: Side) -> Point {
    let PlacementRequest {
        target,
        tooltip,
        gap,
        ..
    } = request;
    match side {
        Side::Top => Point::new(
            target.mid_x() - tooltip.width / 2.0,
            target.min_y() - gap - tooltip.height,
        ),
        Side::Bottom => Point::new(target.mid_x() - tooltip.width / 2.0, target.max_y() + gap),
        Side::Leading => Point::new(
            target.min_x() - gap - tooltip.width,
            target.mid_y() - tooltip.height / 2.0,
        ),
        Side::Trailing => Point::new(target.max_x() + gap, target.mid_y() - tooltip.height / 2.0),
    }
}

fn arrow_fraction(target: &Rect, frame: &Rect, side: Side, bounds: &ArrowBounds) -> f64 {
    let raw = if side.is_vertical() {
        (target.mid_x() - frame.min_x()) / frame.width
    } else {
        (target.mid_y() - frame.min_y()) / frame.height
    };
    bounds.clamp(raw)
}
