#![forbid(unsafe_code)]

//! Style vocabulary for Perch tooltips.
//!
//! # Role in Perch
//! The style layer is rendering-only configuration with one exception: the
//! bubble's corner radius keeps the pointer away from the rounded corners,
//! so [`TooltipStyle::arrow_guard`] feeds back into the outline geometry in
//! `perch-widgets`. Nothing here influences which side a tooltip lands on.
//!
//! # This crate provides
//! - [`Rgba`] colors with hex parsing.
//! - [`Font`] text-style selection (measurement happens elsewhere).
//! - [`TooltipStyle`], the six-option style contract.

/// Color type and hex parsing.
pub mod color;
/// Tooltip style contract.
pub mod tooltip;

pub use color::{ParseColorError, Rgba};
pub use tooltip::{Font, TooltipStyle};
