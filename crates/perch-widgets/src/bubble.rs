#![forbid(unsafe_code)]

//! Bubble outline with an integrated pointer.
//!
//! The outline is one continuous path: a rounded rectangle whose facing edge
//! (the edge toward the target) carries a triangular notch. The notch apex is
//! softened with a quadratic curve so the pointer tip is not a hard point.
//!
//! ```text
//!            ▲  apex (rounded by apex_radius)
//!       ╭───╱ ╲──────────╮
//!       │   label        │
//!       ╰────────────────╯
//!        ├──┤ guard = corner_radius + arrow_width / 2
//! ```
//!
//! The path is clockwise in y-down container coordinates. Arc angles are in
//! radians, measured from +x toward +y.

use std::f64::consts::{FRAC_PI_2, PI};

use perch_core::{Point, Rect, Size};
use perch_layout::{Placement, Side};
use perch_style::TooltipStyle;

/// One drawing instruction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Quadratic curve through `control` ending at `to`.
    QuadTo { control: Point, to: Point },
    /// Circular arc around `center`, sweeping clockwise from `start` to `end`.
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
    },
    Close,
}

/// The four edges of the bubble body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Top,
    Right,
    Bottom,
    Left,
}

impl Edge {
    /// Edge facing the target when the bubble sits on `side` of it.
    fn facing(side: Side) -> Self {
        match side {
            Side::Bottom => Self::Top,
            Side::Top => Self::Bottom,
            Side::Leading => Self::Right,
            Side::Trailing => Self::Left,
        }
    }
}

/// Outline geometry for one placed bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleShape {
    /// Bubble body, without the pointer.
    pub rect: Rect,
    pub side: Side,
    /// Pointer attachment as a fraction of the facing edge.
    pub arrow_fraction: f64,
    /// Base width along the edge, height away from it.
    pub arrow_size: Size,
    pub corner_radius: f64,
    /// Rounding of the pointer tip. Defaults to half the corner radius.
    pub apex_radius: f64,
}

impl BubbleShape {
    pub fn new(rect: Rect, side: Side, arrow_fraction: f64, arrow_size: Size) -> Self {
        Self {
            rect,
            side,
            arrow_fraction,
            arrow_size,
            corner_radius: 0.0,
            apex_radius: 0.0,
        }
    }

    /// Shape for a solved placement drawn in `style`.
    pub fn for_placement(placement: &Placement, arrow_size: Size, style: &TooltipStyle) -> Self {
        Self::new(
            placement.frame,
            placement.side,
            placement.arrow_fraction,
            arrow_size,
        )
        .corner_radius(style.corner_radius)
    }

    /// Set the corner radius; the apex radius follows at half of it.
    #[must_use]
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius.max(0.0);
        self.apex_radius = self.corner_radius / 2.0;
        self
    }

    #[must_use]
    pub fn apex_radius(mut self, radius: f64) -> Self {
        self.apex_radius = radius.max(0.0);
        self
    }

    /// Length of the facing edge.
    pub fn edge_length(&self) -> f64 {
        match Edge::facing(self.side) {
            Edge::Top | Edge::Bottom => self.rect.width,
            Edge::Left | Edge::Right => self.rect.height,
        }
    }

    /// Distance the pointer center keeps from each end of the facing edge.
    pub fn guard(&self) -> f64 {
        self.corner_radius + self.arrow_size.width.max(0.0) / 2.0
    }

    /// Pointer center, measured from the left (or top) end of the facing edge.
    ///
    /// Centered when the edge is shorter than two guards.
    pub fn arrow_offset(&self) -> f64 {
        let edge = self.edge_length();
        let guard = self.guard();
        if edge < 2.0 * guard {
            return edge / 2.0;
        }
        (self.arrow_fraction * edge).clamp(guard, edge - guard)
    }

    /// Where the pointer tip lands, in container coordinates.
    pub fn arrow_tip(&self) -> Point {
        let offset = self.arrow_offset();
        let h = self.arrow_size.height;
        let r = self.rect;
        match Edge::facing(self.side) {
            Edge::Top => Point::new(r.x + offset, r.y - h),
            Edge::Bottom => Point::new(r.x + offset, r.max_y() + h),
            Edge::Left => Point::new(r.x - h, r.y + offset),
            Edge::Right => Point::new(r.max_x() + h, r.y + offset),
        }
    }

    /// Body and pointer together.
    pub fn bounds(&self) -> Rect {
        let h = self.arrow_size.height.max(0.0);
        let r = self.rect;
        match Edge::facing(self.side) {
            Edge::Top => Rect::new(r.x, r.y - h, r.width, r.height + h),
            Edge::Bottom => Rect::new(r.x, r.y, r.width, r.height + h),
            Edge::Left => Rect::new(r.x - h, r.y, r.width + h, r.height),
            Edge::Right => Rect::new(r.x, r.y, r.width + h, r.height),
        }
    }

    /// The closed outline.
    pub fn path(&self) -> Vec<PathCommand> {
        let r = self.rect;
        let radius = self
            .corner_radius
            .min(r.width / 2.0)
            .min(r.height / 2.0)
            .max(0.0);
        let (x0, y0, x1, y1) = (r.min_x(), r.min_y(), r.max_x(), r.max_y());
        let facing = Edge::facing(self.side);

        let mut path = Vec::with_capacity(16);
        path.push(PathCommand::MoveTo(Point::new(x0 + radius, y0)));

        // Top edge, left to right.
        if facing == Edge::Top {
            self.push_notch(&mut path, Point::new(x0, y0), (1.0, 0.0), (0.0, -1.0));
        }
        path.push(PathCommand::LineTo(Point::new(x1 - radius, y0)));
        push_corner(&mut path, Point::new(x1 - radius, y0 + radius), radius, -FRAC_PI_2);

        // Right edge, top to bottom.
        if facing == Edge::Right {
            self.push_notch(&mut path, Point::new(x1, y0), (0.0, 1.0), (1.0, 0.0));
        }
        path.push(PathCommand::LineTo(Point::new(x1, y1 - radius)));
        push_corner(&mut path, Point::new(x1 - radius, y1 - radius), radius, 0.0);

        // Bottom edge, right to left.
        if facing == Edge::Bottom {
            self.push_notch(&mut path, Point::new(x1, y1), (-1.0, 0.0), (0.0, 1.0));
        }
        path.push(PathCommand::LineTo(Point::new(x0 + radius, y1)));
        push_corner(&mut path, Point::new(x0 + radius, y1 - radius), radius, FRAC_PI_2);

        // Left edge, bottom to top.
        if facing == Edge::Left {
            self.push_notch(&mut path, Point::new(x0, y1), (0.0, -1.0), (-1.0, 0.0));
        }
        path.push(PathCommand::LineTo(Point::new(x0, y0 + radius)));
        push_corner(&mut path, Point::new(x0 + radius, y0 + radius), radius, PI);

        path.push(PathCommand::Close);
        path
    }

    /// Append the pointer notch for an edge that starts at `start` and runs
    /// along `dir`, with `normal` pointing out of the bubble.
    fn push_notch(
        &self,
        path: &mut Vec<PathCommand>,
        start: Point,
        dir: (f64, f64),
        normal: (f64, f64),
    ) {
        let edge = self.edge_length();
        let offset = self.arrow_offset();
        // Right and bottom edges are walked backwards.
        let along = if dir.0 < 0.0 || dir.1 < 0.0 {
            edge - offset
        } else {
            offset
        };
        let half = self.arrow_size.width.max(0.0) / 2.0;
        let h = self.arrow_size.height.max(0.0);

        let at = |t: f64, out: f64| {
            Point::new(
                start.x + dir.0 * t + normal.0 * out,
                start.y + dir.1 * t + normal.1 * out,
            )
        };
        let base_in = at(along - half, 0.0);
        let apex = at(along, h);
        let base_out = at(along + half, 0.0);

        path.push(PathCommand::LineTo(base_in));
        let side_len = half.hypot(h);
        let apex_radius = self.apex_radius.min(side_len);
        if apex_radius > 0.0 && side_len > 0.0 {
            let t = apex_radius / side_len;
            let before = lerp(apex, base_in, t);
            let after = lerp(apex, base_out, t);
            path.push(PathCommand::LineTo(before));
            path.push(PathCommand::QuadTo {
                control: apex,
                to: after,
            });
        } else {
            path.push(PathCommand::LineTo(apex));
        }
        path.push(PathCommand::LineTo(base_out));
    }
}

fn push_corner(path: &mut Vec<PathCommand>, center: Point, radius: f64, start: f64) {
    if radius > 0.0 {
        path.push(PathCommand::Arc {
            center,
            radius,
            start,
            end: start + FRAC_PI_2,
        });
    }
}

fn lerp(from: Point, to: Point, t: f64) -> Point {
    Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t)
}
