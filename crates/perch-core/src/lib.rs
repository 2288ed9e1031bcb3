#![forbid(unsafe_code)]

//! Core: geometry and motion primitives for Perch.
//!
//! # Role in Perch
//! `perch-core` is the shared vocabulary. The placement solver
//! (`perch-layout`) speaks in [`geometry::Rect`], [`geometry::Size`] and
//! [`geometry::Insets`]; the presentation glue (`perch-widgets`) drives its
//! appear/dismiss transition with [`animation::spring::Spring`].
//!
//! Nothing in this crate knows about tooltips, targets or activation.

pub mod animation;
pub mod geometry;

pub use geometry::{Insets, Point, Rect, Size};
