use std::fmt::Write as FmtWrite;

use crate::plotting::color::Color;
use crate::plotting::config::MarkerShape;
use crate::plotting::surface::{
    DrawCommand, DrawingSurface, LineStyle, MarkerStyle, RecordingSurface,
};

/// A [`DrawingSurface`] that serializes what was drawn to a standalone SVG.
///
/// Data coordinates are mapped onto a `width × height` viewport (in points, y up)
/// using the surface limits at the time [`finish_svg`](Self::finish_svg) is called.
#[derive(Debug, Clone)]
pub struct SvgSurface {
    pub width: f64,
    pub height: f64,
    inner: RecordingSurface,
}

impl SvgSurface {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            inner: RecordingSurface::new(),
        }
    }

    pub fn recording(&self) -> &RecordingSurface {
        &self.inner
    }

    fn to_px(&self, (x, y): (f64, f64)) -> (f64, f64) {
        let (x0, x1) = self.inner.xlim();
        let (y0, y1) = self.inner.ylim();
        let px = if x1 != x0 { (x - x0) / (x1 - x0) * self.width } else { self.width / 2.0 };
        let py = if y1 != y0 {
            self.height - (y - y0) / (y1 - y0) * self.height
        } else {
            self.height / 2.0
        };
        (px, py)
    }

    pub fn finish_svg(&self) -> anyhow::Result<String> {
        let mut out = String::with_capacity(4 * 1024);
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" overflow="visible">"#,
            w = self.width,
            h = self.height,
        )?;

        if self.inner.axis_visible() {
            writeln!(
                out,
                r##"<rect x="0" y="0" width="{}" height="{}" fill="none" stroke="#000000" stroke-width="0.80" />"##,
                self.width, self.height
            )?;
        }

        for command in self.inner.commands() {
            match command {
                DrawCommand::Line { points, style } => self.write_line(&mut out, points, style)?,
                DrawCommand::Marker { point, style } => {
                    self.write_marker(&mut out, *point, style)?
                }
            }
        }

        out.push_str("</svg>\n");
        Ok(out)
    }

    fn write_line(
        &self,
        out: &mut String,
        points: &[(f64, f64)],
        style: &LineStyle,
    ) -> std::fmt::Result {
        out.push_str(r#"<polyline points=""#);
        for (i, &p) in points.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            let (x, y) = self.to_px(p);
            write!(out, "{x:.2},{y:.2}")?;
        }
        writeln!(
            out,
            r#"" fill="none" stroke="{}" stroke-width="{:.2}" />"#,
            style.color.to_svg_fill(),
            style.width
        )
    }

    fn write_marker(
        &self,
        out: &mut String,
        point: (f64, f64),
        style: &MarkerStyle,
    ) -> std::fmt::Result {
        let (cx, cy) = self.to_px(point);
        let r = style.size / 2.0;
        match style.shape {
            MarkerShape::Circle => {
                write!(out, r#"<circle cx="{cx:.2}" cy="{cy:.2}" r="{r:.2}""#)?;
            }
            MarkerShape::Square => {
                write!(
                    out,
                    r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}""#,
                    cx - r,
                    cy - r,
                    2.0 * r,
                    2.0 * r
                )?;
            }
            MarkerShape::Diamond => {
                write_polygon(out, &[(cx, cy - r), (cx + r, cy), (cx, cy + r), (cx - r, cy)])?;
            }
            MarkerShape::Triangle => {
                write_polygon(out, &[(cx, cy - r), (cx + r, cy + r), (cx - r, cy + r)])?;
            }
        }
        write_paint(out, style.face, style.edge, style.edge_width)?;
        out.push_str(" />\n");
        Ok(())
    }
}

fn write_polygon(out: &mut String, points: &[(f64, f64)]) -> std::fmt::Result {
    out.push_str(r#"<polygon points=""#);
    for (i, (x, y)) in points.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        write!(out, "{x:.2},{y:.2}")?;
    }
    out.push('"');
    Ok(())
}

fn write_paint(out: &mut String, face: Color, edge: Color, edge_width: f64) -> std::fmt::Result {
    write!(
        out,
        r#" fill="{}" stroke="{}" stroke-width="{:.2}""#,
        face.to_svg_fill(),
        edge.to_svg_fill(),
        edge_width
    )
}

impl DrawingSurface for SvgSurface {
    fn plot_line(&mut self, points: &[(f64, f64)], style: &LineStyle) {
        self.inner.plot_line(points, style);
    }

    fn plot_marker(&mut self, point: (f64, f64), style: &MarkerStyle) {
        self.inner.plot_marker(point, style);
    }

    fn xlim(&self) -> (f64, f64) {
        self.inner.xlim()
    }

    fn ylim(&self) -> (f64, f64) {
        self.inner.ylim()
    }

    fn set_xlim(&mut self, lim: (f64, f64)) {
        self.inner.set_xlim(lim);
    }

    fn set_ylim(&mut self, lim: (f64, f64)) {
        self.inner.set_ylim(lim);
    }

    fn axis_off(&mut self) {
        self.inner.axis_off();
    }
}
