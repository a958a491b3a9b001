use crate::error::MetroplotError;
use crate::plotting::color::{Color, Palette};
use crate::testing::EffectDirection;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which axis carries the levels.
///
/// With `Y` the rails are vertical (levels stacked top to bottom, e.g. beside a
/// horizontal box plot); with `X` the rails are horizontal (e.g. above a bar plot).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LevelAxis {
    X,
    #[default]
    Y,
}

impl LevelAxis {
    /// Order a `(element, level)` coordinate pair as `(x, y)`.
    pub fn to_xy(self, element: f64, level: f64) -> (f64, f64) {
        match self {
            LevelAxis::Y => (element, level),
            LevelAxis::X => (level, element),
        }
    }
}

impl FromStr for LevelAxis {
    type Err = MetroplotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "x" => Ok(LevelAxis::X),
            "y" => Ok(LevelAxis::Y),
            _ => Err(MetroplotError::InvalidLevelAxis(s.to_string())),
        }
    }
}

impl fmt::Display for LevelAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelAxis::X => write!(f, "x"),
            LevelAxis::Y => write!(f, "y"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerShape {
    #[default]
    Circle,
    Square,
    Diamond,
    Triangle,
}

/// Appearance and axis options for [`render`](crate::plotting::render::render).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub level_axis: LevelAxis,
    /// Effect direction that makes `level1` the dominating level. Flipping it
    /// swaps the roles of open and filled markers.
    pub dominating_effect_direction: EffectDirection,
    /// `None` draws every rail in black.
    pub palette: Option<Palette>,
    /// Limits of the level axis, normally copied from the companion plot.
    pub level_axis_lim: Option<(f64, f64)>,
    /// Requested limits of the element axis; widened if a rail would fall outside.
    pub element_axis_lim: Option<(f64, f64)>,
    /// Fill color of open (dominated) markers.
    pub open_dot_fill_color: Color,
    pub marker: MarkerShape,
    pub linewidth: f64,
    pub markeredgewidth: f64,
    pub markersize: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            level_axis: LevelAxis::Y,
            dominating_effect_direction: EffectDirection::Positive,
            palette: None,
            level_axis_lim: None,
            element_axis_lim: None,
            open_dot_fill_color: Color::WHITE,
            marker: MarkerShape::Circle,
            linewidth: 0.5,
            markeredgewidth: 0.5,
            markersize: 8.0,
        }
    }
}

impl RenderConfig {
    pub fn with_level_axis(mut self, level_axis: LevelAxis) -> Self {
        self.level_axis = level_axis;
        self
    }

    pub fn with_dominating_effect_direction(mut self, direction: EffectDirection) -> Self {
        self.dominating_effect_direction = direction;
        self
    }

    pub fn with_palette(mut self, palette: impl Into<Palette>) -> Self {
        self.palette = Some(palette.into());
        self
    }

    pub fn with_level_axis_lim(mut self, lim: (f64, f64)) -> Self {
        self.level_axis_lim = Some(lim);
        self
    }

    pub fn with_element_axis_lim(mut self, lim: (f64, f64)) -> Self {
        self.element_axis_lim = Some(lim);
        self
    }

    pub fn with_open_dot_fill_color(mut self, color: Color) -> Self {
        self.open_dot_fill_color = color;
        self
    }

    pub fn with_marker(mut self, marker: MarkerShape) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_linewidth(mut self, linewidth: f64) -> Self {
        self.linewidth = linewidth;
        self
    }

    pub fn with_markeredgewidth(mut self, markeredgewidth: f64) -> Self {
        self.markeredgewidth = markeredgewidth;
        self
    }

    pub fn with_markersize(mut self, markersize: f64) -> Self {
        self.markersize = markersize;
        self
    }

    pub fn validate(&self) -> Result<(), MetroplotError> {
        if self.dominating_effect_direction == EffectDirection::Tie {
            return Err(MetroplotError::InvalidDominanceDirection);
        }
        Ok(())
    }

    /// Color of the rail drawn for `level`.
    pub fn rail_color(&self, level: &str) -> Result<Color, MetroplotError> {
        match &self.palette {
            Some(palette) => palette.resolve(level),
            None => Ok(Color::BLACK),
        }
    }
}
