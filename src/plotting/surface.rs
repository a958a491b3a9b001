//! The drawing capability the renderer needs, plus an in-memory implementation.
//!
//! A [`DrawingSurface`] is a 2-D canvas with a data coordinate system: it can
//! draw polylines and point markers, report and set the limits of both axes, and
//! hide its own axis decorations. Rails are always drawn unclipped, so
//! implementations must not clip primitives to the current limits.

use crate::plotting::color::Color;
use crate::plotting::config::MarkerShape;

/// Margin added on each side of the data extent when autoscaling.
pub const AUTOSCALE_MARGIN: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub width: f64,
}

impl LineStyle {
    pub fn solid(color: Color, width: f64) -> Self {
        Self { color, width }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerStyle {
    pub shape: MarkerShape,
    /// Marker diameter in points
    pub size: f64,
    pub face: Color,
    pub edge: Color,
    pub edge_width: f64,
}

pub trait DrawingSurface {
    /// Draw a straight polyline through `points`, in order.
    fn plot_line(&mut self, points: &[(f64, f64)], style: &LineStyle);

    fn plot_marker(&mut self, point: (f64, f64), style: &MarkerStyle);

    fn xlim(&self) -> (f64, f64);

    fn ylim(&self) -> (f64, f64);

    fn set_xlim(&mut self, lim: (f64, f64));

    fn set_ylim(&mut self, lim: (f64, f64));

    /// Hide ticks, spines and labels.
    fn axis_off(&mut self);
}

/// A primitive drawn on a [`RecordingSurface`], in draw order.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Line {
        points: Vec<(f64, f64)>,
        style: LineStyle,
    },
    Marker {
        point: (f64, f64),
        style: MarkerStyle,
    },
}

#[derive(Debug, Clone, Copy, Default)]
struct Extent {
    min: f64,
    max: f64,
    seen: bool,
}

impl Extent {
    fn include(&mut self, v: f64) {
        if !v.is_finite() {
            return;
        }
        if self.seen {
            self.min = self.min.min(v);
            self.max = self.max.max(v);
        } else {
            self.min = v;
            self.max = v;
            self.seen = true;
        }
    }

    fn autoscaled(&self) -> (f64, f64) {
        if !self.seen {
            return (0.0, 1.0);
        }
        let span = self.max - self.min;
        if span == 0.0 {
            return (self.min - 0.5, self.max + 0.5);
        }
        (
            self.min - AUTOSCALE_MARGIN * span,
            self.max + AUTOSCALE_MARGIN * span,
        )
    }
}

/// Records every primitive and autoscales its limits to the data drawn so far,
/// until a limit is set explicitly.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    commands: Vec<DrawCommand>,
    x_extent: Extent,
    y_extent: Extent,
    xlim: Option<(f64, f64)>,
    ylim: Option<(f64, f64)>,
    axis_visible: bool,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    pub fn new() -> Self {
        RecordingSurface {
            commands: Vec::new(),
            x_extent: Extent::default(),
            y_extent: Extent::default(),
            xlim: None,
            ylim: None,
            axis_visible: true,
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn markers(&self) -> impl Iterator<Item = (&(f64, f64), &MarkerStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Marker { point, style } => Some((point, style)),
            DrawCommand::Line { .. } => None,
        })
    }

    pub fn lines(&self) -> impl Iterator<Item = (&[(f64, f64)], &LineStyle)> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Line { points, style } => Some((points.as_slice(), style)),
            DrawCommand::Marker { .. } => None,
        })
    }

    pub fn axis_visible(&self) -> bool {
        self.axis_visible
    }

    fn include(&mut self, (x, y): (f64, f64)) {
        self.x_extent.include(x);
        self.y_extent.include(y);
    }
}

impl DrawingSurface for RecordingSurface {
    fn plot_line(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        for &p in points {
            self.include(p);
        }
        self.commands.push(DrawCommand::Line {
            points: points.to_vec(),
            style: style.clone(),
        });
    }

    fn plot_marker(&mut self, point: (f64, f64), style: &MarkerStyle) {
        self.include(point);
        self.commands.push(DrawCommand::Marker {
            point,
            style: style.clone(),
        });
    }

    fn xlim(&self) -> (f64, f64) {
        self.xlim.unwrap_or_else(|| self.x_extent.autoscaled())
    }

    fn ylim(&self) -> (f64, f64) {
        self.ylim.unwrap_or_else(|| self.y_extent.autoscaled())
    }

    fn set_xlim(&mut self, lim: (f64, f64)) {
        self.xlim = Some(lim);
    }

    fn set_ylim(&mut self, lim: (f64, f64)) {
        self.ylim = Some(lim);
    }

    fn axis_off(&mut self) {
        self.axis_visible = false;
    }
}
