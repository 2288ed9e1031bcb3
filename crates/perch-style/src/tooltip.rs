#![forbid(unsafe_code)]

//! The tooltip style contract.
//!
//! Exactly six options are recognized: font, background, foreground, corner
//! radius, border width and border color. All of them are rendering-only
//! except the corner radius, which bounds where the pointer may attach (see
//! [`TooltipStyle::arrow_guard`]).
//!
//! # Example
//!
//! ```
//! use perch_style::{Font, Rgba, TooltipStyle};
//!
//! let style = TooltipStyle::default()
//!     .background(Rgba::rgb(32, 32, 36))
//!     .corner_radius(12.0)
//!     .font(Font::Caption);
//!
//! // A 16pt-wide pointer keeps 12 + 8 points away from each corner.
//! assert_eq!(style.arrow_guard(16.0), 20.0);
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// Text style of the bubble label.
///
/// The label is measured by the host toolkit; the font only travels through
/// to the renderer.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Font {
    #[default]
    Body,
    Callout,
    Caption,
    Footnote,
    Headline,
    /// A named family at an explicit point size.
    Custom { family: String, size: f64 },
}

impl Font {
    /// Nominal point size at the default content size category.
    pub fn point_size(&self) -> f64 {
        match self {
            Self::Body | Self::Headline => 17.0,
            Self::Callout => 16.0,
            Self::Footnote => 13.0,
            Self::Caption => 12.0,
            Self::Custom { size, .. } => *size,
        }
    }
}

/// Visual configuration of a tooltip bubble.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TooltipStyle {
    pub font: Font,
    pub background: Rgba,
    /// Label color.
    pub foreground: Rgba,
    pub corner_radius: f64,
    pub border_width: f64,
    pub border_color: Rgba,
}

impl Default for TooltipStyle {
    fn default() -> Self {
        Self {
            font: Font::Body,
            background: Rgba::BLACK,
            foreground: Rgba::WHITE,
            corner_radius: 8.0,
            border_width: 2.0,
            border_color: Rgba::TRANSPARENT,
        }
    }
}

impl TooltipStyle {
    #[must_use]
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    #[must_use]
    pub fn background(mut self, color: Rgba) -> Self {
        self.background = color;
        self
    }

    #[must_use]
    pub fn foreground(mut self, color: Rgba) -> Self {
        self.foreground = color;
        self
    }

    #[must_use]
    pub fn corner_radius(mut self, radius: f64) -> Self {
        self.corner_radius = radius;
        self
    }

    #[must_use]
    pub fn border_width(mut self, width: f64) -> Self {
        self.border_width = width;
        self
    }

    #[must_use]
    pub fn border_color(mut self, color: Rgba) -> Self {
        self.border_color = color;
        self
    }

    /// Distance the pointer's center keeps from either end of the facing edge.
    ///
    /// `corner_radius + arrow_width / 2`: the pointer base never overlaps a
    /// rounded corner.
    #[inline]
    pub fn arrow_guard(&self, arrow_width: f64) -> f64 {
        self.corner_radius.max(0.0) + arrow_width.max(0.0) / 2.0
    }

    /// Whether a border should be stroked at all.
    pub fn has_border(&self) -> bool {
        self.border_width > 0.0 && !self.border_color.is_transparent()
    }

    /// Replace negative or non-finite metrics with zero.
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        if !(self.corner_radius.is_finite() && self.corner_radius >= 0.0) {
            tracing::warn!(
                target: "perch.style",
                corner_radius = self.corner_radius,
                "invalid corner radius, using 0"
            );
            self.corner_radius = 0.0;
        }
        if !(self.border_width.is_finite() && self.border_width >= 0.0) {
            tracing::warn!(
                target: "perch.style",
                border_width = self.border_width,
                "invalid border width, using 0"
            );
            self.border_width = 0.0;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    #[test]
    fn defaults_match_the_dark_bubble() {
        let style = TooltipStyle::default();
        assert_eq!(style.font, Font::Body);
        assert_eq!(style.background, Rgba::BLACK);
        assert_eq!(style.foreground, Rgba::WHITE);
        assert_eq!(style.corner_radius, 8.0);
        assert_eq!(style.border_width, 2.0);
        assert_eq!(style.border_color, Rgba::TRANSPARENT);
        assert!(!style.has_border());
    }

    #[test]
    fn arrow_guard_adds_half_the_arrow_width() {
        let style = TooltipStyle::default();
        assert_eq!(style.arrow_guard(16.0), 16.0);
        assert_eq!(style.corner_radius(0.0).arrow_guard(10.0), 5.0);
    }

    #[test]
    fn builder_sets_every_option() {
        let style = TooltipStyle::default()
            .font(Font::Custom {
                family: "Inter".into(),
                size: 14.0,
            })
            .background(Rgba::WHITE)
            .foreground(Rgba::BLACK)
            .corner_radius(4.0)
            .border_width(1.0)
            .border_color(Rgba::rgb(200, 200, 200));
        assert_eq!(style.font.point_size(), 14.0);
        assert!(style.has_border());
        assert_eq!(style.corner_radius, 4.0);
    }

    #[test]
    #[traced_test]
    fn sanitize_warns_on_negative_metrics() {
        let style = TooltipStyle::default()
            .corner_radius(-3.0)
            .border_width(f64::NAN)
            .sanitized();
        assert_eq!(style.corner_radius, 0.0);
        assert_eq!(style.border_width, 0.0);
        assert!(logs_contain("invalid corner radius"));
        assert!(logs_contain("invalid border width"));
    }

    #[test]
    #[traced_test]
    fn sanitize_is_silent_for_valid_styles() {
        let style = TooltipStyle::default().sanitized();
        assert_eq!(style, TooltipStyle::default());
        assert!(!logs_contain("invalid"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_style_fills_defaults() {
        let style: TooltipStyle =
            serde_json::from_str(r##"{"corner_radius": 12.0, "border_color": "#ffffff"}"##)
                .unwrap();
        assert_eq!(style.corner_radius, 12.0);
        assert_eq!(style.border_color, Rgba::WHITE);
        assert_eq!(style.background, Rgba::BLACK);
    }
}
