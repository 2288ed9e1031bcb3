#![forbid(unsafe_code)]

//! Container-relative rectangles.
//!
//! A [`NormalizedRect`] stores a frame as fractions of the container's width
//! and height, so a placement survives a container resize (rotation, window
//! drag) without re-running the solver, as long as the target kept its
//! relative position.

use serde::{Deserialize, Serialize};

use crate::{Point, Rect, Size};

/// A rectangle expressed as fractions of a container size.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedRect {
    pub origin: Point,
    pub size: Size,
}

impl NormalizedRect {
    /// Normalize `rect` against `container`.
    ///
    /// An axis whose container extent is zero or negative normalizes to `0`.
    pub fn from_rect(rect: Rect, container: Size) -> Self {
        Self {
            origin: Point::new(
                fraction(rect.x, container.width),
                fraction(rect.y, container.height),
            ),
            size: Size::new(
                fraction(rect.width, container.width),
                fraction(rect.height, container.height),
            ),
        }
    }

    /// Project back onto `container`. Same as [`denormalize`].
    #[inline]
    pub fn to_rect(&self, container: Size) -> Rect {
        denormalize(self, container)
    }
}

fn fraction(value: f64, extent: f64) -> f64 {
    if extent > 0.0 { value / extent } else { 0.0 }
}

/// Project a normalized rectangle onto a container of the given size.
pub fn denormalize(normalized: &NormalizedRect, container: Size) -> Rect {
    Rect::new(
        normalized.origin.x * container.width,
        normalized.origin.y * container.height,
        normalized.size.width * container.width,
        normalized.size.height * container.height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_componentwise() {
        let n = NormalizedRect::from_rect(
            Rect::new(100.0, 200.0, 50.0, 40.0),
            Size::new(400.0, 800.0),
        );
        assert_eq!(n.origin, Point::new(0.25, 0.25));
        assert_eq!(n.size, Size::new(0.125, 0.05));
    }

    #[test]
    fn denormalize_reprojects_onto_new_container() {
        let n = NormalizedRect {
            origin: Point::new(0.25, 0.5),
            size: Size::new(0.5, 0.1),
        };
        // Portrait to landscape.
        let rect = denormalize(&n, Size::new(800.0, 400.0));
        assert_eq!(rect, Rect::new(200.0, 200.0, 400.0, 40.0));
    }

    #[test]
    fn round_trip_same_container() {
        let container = Size::new(375.0, 667.0);
        let rect = Rect::new(13.7, 402.1, 181.3, 47.9);
        let back = NormalizedRect::from_rect(rect, container).to_rect(container);
        assert!(back.approx_eq(&rect, 1e-9), "{back:?} vs {rect:?}");
    }

    #[test]
    fn degenerate_container_axis_normalizes_to_zero() {
        let n = NormalizedRect::from_rect(Rect::new(10.0, 10.0, 5.0, 5.0), Size::new(0.0, 20.0));
        assert_eq!(n.origin.x, 0.0);
        assert_eq!(n.size.width, 0.0);
        assert_eq!(n.origin.y, 0.5);
        assert!(n.origin.x.is_finite());
    }
}
