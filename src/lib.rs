//! # metroplot
//!
//! Pairwise significance testing and compact "metroplot" dominance diagrams.
//!
//! A metroplot sits next to a primary chart (bar plot, box plot) that shares the
//! same categorical axis. Each level that is significantly larger (or smaller)
//! than some other level gets a rail: a filled marker at its own position, open
//! markers at every level it dominates, and a line joining them.
//!
//! ## Core Features
//!
//! - **Pairwise comparisons**: Student's or Welch's t-test for every unordered pair of levels
//! - **Multiple Testing Correction**: Benjamini-Hochberg FDR across the whole family of pairs
//! - **Dominance rails**: rail construction independent of any drawing backend
//! - **Drawing surfaces**: a recording surface and an SVG surface behind one trait
//!
//! ## Quick Start
//!
//! Build an [`Observations`] table, call [`pairwise_t_tests`] to get a
//! [`ComparisonTable`], then pass it to [`render`] together with the positions of
//! the levels on the companion plot and a [`DrawingSurface`].
//!
//! ## Module Organization
//!
//! - **[`testing`]**: t-tests, multiple testing correction, comparison tables
//! - **[`plotting`]**: colors, render configuration, rails and drawing surfaces
//! - **[`data`]**: the in-memory observation table

pub mod data;
pub mod error;
pub mod plotting;
pub mod testing;

pub use data::Observations;
pub use error::MetroplotError;
pub use plotting::{
    Color, DrawingSurface, LevelAxis, Palette, RecordingSurface, RenderConfig, RenderOutcome,
    SvgSurface, element_order, render,
};
pub use testing::inference::{
    ComparisonOptions, PairwiseTests, pairwise_t_tests, pairwise_t_tests_with,
};
pub use testing::{ComparisonRecord, ComparisonTable, EffectDirection, TTestType};
