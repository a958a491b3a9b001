//! Dominance ("metroplot") rendering.
//!
//! [`rails`] decides which levels get a rail and where; [`render`](render::render)
//! draws those rails onto any [`DrawingSurface`](surface::DrawingSurface).

pub mod color;
pub mod config;
pub mod rails;
pub mod render;
pub mod surface;
pub mod svg;

pub use color::{Color, Palette};
pub use config::{LevelAxis, MarkerShape, RenderConfig};
pub use rails::{Rail, build_rails, element_order};
pub use render::{RenderOutcome, render};
pub use surface::{DrawCommand, DrawingSurface, LineStyle, MarkerStyle, RecordingSurface};
pub use svg::SvgSurface;
