#![forbid(unsafe_code)]

//! Appear and dismiss motion for a bubble.
//!
//! One normalized spring drives everything: at progress `p` the bubble is
//! drawn at `scale = s0 + (1 - s0) * p`, `opacity = p` and its center is
//! interpolated from a start point to its resting center. The start point
//! sits one target-height toward the target, so the bubble appears to grow
//! out of it. Scaling pivots on the pointer.

use perch_core::animation::{Animation, Spring};
use perch_core::{Point, Rect};
use perch_layout::{Placement, Side};
use perch_runtime::MotionConfig;
use web_time::Duration;

/// What to draw this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionFrame {
    pub scale: f64,
    pub opacity: f64,
    /// Bubble center in container coordinates.
    pub center: Point,
    /// Scale pivot in the bubble's unit square.
    pub anchor: Point,
}

/// Spring-driven appear/dismiss animation.
#[derive(Debug, Clone)]
pub struct Transition {
    spring: Spring,
    initial_scale: f64,
    start: Point,
    end: Point,
    anchor: Point,
}

impl Transition {
    /// Begin appearing for `placement`, whose pointer sits `arrow_offset`
    /// along the facing edge of a bubble anchored to `target`.
    pub fn appear(
        placement: &Placement,
        target: &Rect,
        arrow_offset: f64,
        motion: &MotionConfig,
    ) -> Self {
        let end = placement.frame.center();
        let dy = match placement.side {
            Side::Bottom => -target.height,
            _ => target.height,
        };
        Self {
            spring: motion.spring(),
            initial_scale: motion.initial_scale,
            start: end.offset(0.0, dy),
            end,
            anchor: scale_anchor(
                placement.side,
                &placement.frame,
                arrow_offset,
                motion.scale_anchor_inset,
            ),
        }
    }

    /// Reverse toward the hidden state from wherever the spring is now.
    pub fn dismiss(&mut self) {
        self.spring.set_target(0.0);
    }

    /// Whether the spring is heading toward the shown state.
    pub fn is_appearing(&self) -> bool {
        self.spring.target() > 0.5
    }

    /// Current spring position; 0 is hidden, 1 is shown.
    pub fn progress(&self) -> f64 {
        self.spring.position()
    }

    pub fn frame(&self) -> TransitionFrame {
        let p = self.progress();
        TransitionFrame {
            scale: self.initial_scale + (1.0 - self.initial_scale) * p,
            opacity: p.clamp(0.0, 1.0),
            center: Point::new(
                self.start.x + (self.end.x - self.start.x) * p,
                self.start.y + (self.end.y - self.start.y) * p,
            ),
            anchor: self.anchor,
        }
    }

    /// Settled in the hidden state.
    pub fn is_hidden(&self) -> bool {
        !self.is_appearing() && self.spring.is_at_rest()
    }
}

impl Animation for Transition {
    fn tick(&mut self, dt: Duration) {
        self.spring.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.spring.is_complete()
    }

    fn value(&self) -> f32 {
        self.spring.value()
    }

    fn reset(&mut self) {
        self.spring.reset();
    }
}

/// Scale pivot for a bubble on `side`: the pointer position on the facing
/// edge, in unit coordinates, kept `inset` away from the bubble's borders.
pub fn scale_anchor(side: Side, frame: &Rect, arrow_offset: f64, inset: f64) -> Point {
    let unit = |offset: f64, extent: f64| {
        if extent > 0.0 { offset / extent } else { 0.5 }
    };
    let raw = match side {
        Side::Bottom => Point::new(unit(arrow_offset, frame.width), 0.0),
        Side::Top => Point::new(unit(arrow_offset, frame.width), 1.0),
        Side::Leading => Point::new(1.0, unit(arrow_offset, frame.height)),
        Side::Trailing => Point::new(0.0, unit(arrow_offset, frame.height)),
    };
    let lo = inset.clamp(0.0, 0.5);
    let hi = 1.0 - lo;
    Point::new(raw.x.clamp(lo, hi), raw.y.clamp(lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_layout::{PlacementRequest, solve};
    use perch_core::Size;

    fn placed(target: Rect) -> Placement {
        solve(&PlacementRequest::new(
            target,
            Size::new(400.0, 800.0),
            Size::new(180.0, 44.0),
        ))
    }

    fn settle(t: &mut Transition) {
        for _ in 0..600 {
            t.tick(Duration::from_millis(16));
        }
    }

    #[test]
    fn starts_small_transparent_and_offset() {
        let target = Rect::new(150.0, 100.0, 100.0, 40.0);
        let placement = placed(target);
        assert_eq!(placement.side, Side::Bottom);

        let t = Transition::appear(&placement, &target, 90.0, &MotionConfig::default());
        let f = t.frame();
        assert_eq!(f.scale, 0.5);
        assert_eq!(f.opacity, 0.0);
        let end = placement.frame.center();
        // Below the target: starts one target-height higher.
        assert_eq!(f.center, Point::new(end.x, end.y - 40.0));
    }

    #[test]
    fn top_placement_starts_lower() {
        let target = Rect::new(150.0, 700.0, 100.0, 40.0);
        let placement = placed(target);
        assert_eq!(placement.side, Side::Top);
        let t = Transition::appear(&placement, &target, 90.0, &MotionConfig::default());
        assert_eq!(t.frame().center.y, placement.frame.center().y + 40.0);
    }

    #[test]
    fn settles_at_full_size() {
        let target = Rect::new(150.0, 100.0, 100.0, 40.0);
        let placement = placed(target);
        let mut t = Transition::appear(&placement, &target, 90.0, &MotionConfig::default());
        settle(&mut t);
        assert!(t.is_complete());
        let f = t.frame();
        assert!((f.scale - 1.0).abs() < 0.01);
        assert!((f.opacity - 1.0).abs() < 0.01);
        assert!((f.center.y - placement.frame.center().y).abs() < 0.5);
    }

    #[test]
    fn dismiss_runs_back_to_hidden() {
        let target = Rect::new(150.0, 100.0, 100.0, 40.0);
        let placement = placed(target);
        let mut t = Transition::appear(&placement, &target, 90.0, &MotionConfig::default());
        settle(&mut t);
        t.dismiss();
        assert!(!t.is_appearing());
        assert!(!t.is_hidden());
        settle(&mut t);
        assert!(t.is_hidden());
        assert!(t.frame().opacity < 0.01);
    }

    #[test]
    fn anchor_follows_pointer_and_stays_inset() {
        let frame = Rect::new(0.0, 0.0, 200.0, 50.0);
        assert_eq!(
            scale_anchor(Side::Bottom, &frame, 50.0, 0.02),
            Point::new(0.25, 0.02)
        );
        assert_eq!(
            scale_anchor(Side::Top, &frame, 50.0, 0.02),
            Point::new(0.25, 0.98)
        );
        assert_eq!(
            scale_anchor(Side::Leading, &frame, 25.0, 0.02),
            Point::new(0.98, 0.5)
        );
        assert_eq!(
            scale_anchor(Side::Trailing, &frame, 0.0, 0.02),
            Point::new(0.02, 0.02)
        );
    }

    #[test]
    fn anchor_on_empty_frame_is_centered() {
        let frame = Rect::new(0.0, 0.0, 0.0, 0.0);
        assert_eq!(
            scale_anchor(Side::Bottom, &frame, 10.0, 0.02),
            Point::new(0.5, 0.02)
        );
    }
}
