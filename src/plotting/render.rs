use crate::plotting::config::{LevelAxis, RenderConfig};
use crate::plotting::rails::{Rail, build_rails};
use crate::plotting::surface::{DrawingSurface, LineStyle, MarkerStyle};
use crate::testing::ComparisonTable;
use std::collections::HashMap;

/// What a call to [`render`] drew.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutcome {
    /// Rails in drawing order
    pub rails: Vec<Rail>,
    /// Element-axis limits actually applied, after any widening
    pub element_axis_lim: Option<(f64, f64)>,
}

/// Draw a metroplot of `comparisons` onto `surface`.
///
/// Each level in `element_order` that significantly dominates at least one other
/// located level gets a rail: a line through open markers at the dominated
/// levels and a filled marker at its own location. Rails are drawn in element
/// order, and within a rail the dominated markers come before the dominating one.
///
/// # Arguments
///
/// * `comparisons` - Pairwise comparison table, e.g. from `pairwise_t_tests`
/// * `level_to_location` - Position of each level on the shared categorical axis.
///   Levels missing here are never drawn.
/// * `element_order` - Candidate dominating levels in rail order; `None` entries are skipped
/// * `config` - Axis, color and marker options
/// * `surface` - Drawing target; its axis decorations are switched off
///
/// # Errors
///
/// Fails before drawing anything when the dominating direction is a tie, and
/// when the palette has no color for a dominating level.
pub fn render<S>(
    comparisons: &ComparisonTable,
    level_to_location: &HashMap<String, f64>,
    element_order: &[Option<&str>],
    config: &RenderConfig,
    surface: &mut S,
) -> anyhow::Result<RenderOutcome>
where
    S: DrawingSurface + ?Sized,
{
    config.validate()?;

    let rails = build_rails(
        comparisons,
        level_to_location,
        element_order,
        config.dominating_effect_direction,
    );

    // Resolve every color up front so a palette miss leaves the surface untouched
    let colors = rails
        .iter()
        .map(|rail| config.rail_color(&rail.level))
        .collect::<Result<Vec<_>, _>>()?;

    for (rail, color) in rails.iter().zip(colors) {
        let points = rail.points(config.level_axis);
        log::trace!("rail {} at {}: {} markers", rail.level, rail.element_coord, points.len());

        surface.plot_line(&points, &LineStyle::solid(color, config.linewidth));

        let (dominating_point, dominated_points) = match points.split_last() {
            Some(split) => split,
            None => continue,
        };
        let open = MarkerStyle {
            shape: config.marker,
            size: config.markersize,
            face: config.open_dot_fill_color,
            edge: color,
            edge_width: config.markeredgewidth,
        };
        for &point in dominated_points {
            surface.plot_marker(point, &open);
        }
        surface.plot_marker(
            *dominating_point,
            &MarkerStyle {
                face: color,
                ..open
            },
        );
    }

    if let Some(lim) = config.level_axis_lim {
        match config.level_axis {
            LevelAxis::Y => surface.set_ylim(lim),
            LevelAxis::X => surface.set_xlim(lim),
        }
    }

    let element_axis_lim = match config.element_axis_lim {
        Some(requested) => Some(apply_element_axis_lim(
            &mut *surface,
            config.level_axis,
            requested,
        )),
        None => None,
    };

    surface.axis_off();

    Ok(RenderOutcome {
        rails,
        element_axis_lim,
    })
}

/// Apply `requested` to the element axis, widened so that nothing already
/// drawn falls outside it. Returns the limits applied.
fn apply_element_axis_lim<S>(
    surface: &mut S,
    level_axis: LevelAxis,
    requested: (f64, f64),
) -> (f64, f64)
where
    S: DrawingSurface + ?Sized,
{
    let current = match level_axis {
        LevelAxis::Y => surface.xlim(),
        LevelAxis::X => surface.ylim(),
    };

    let widened = widen_to_cover(requested, current);
    match level_axis {
        LevelAxis::Y => surface.set_xlim(widened),
        LevelAxis::X => surface.set_ylim(widened),
    }
    widened
}

/// Widen `requested` to cover `extent`, warning for each end that moves.
pub fn widen_to_cover(requested: (f64, f64), extent: (f64, f64)) -> (f64, f64) {
    let (mut lo, mut hi) = requested;
    if extent.0 < lo {
        log::warn!(
            "element_axis_lim[0] too small ({} < {}); adjusting to avoid clipped elements",
            extent.0,
            lo
        );
        lo = extent.0;
    }
    if extent.1 > hi {
        log::warn!(
            "element_axis_lim[1] too small ({} > {}); adjusting to avoid clipped elements",
            extent.1,
            hi
        );
        hi = extent.1;
    }
    (lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetroplotError;
    use crate::plotting::color::{Color, Palette};
    use crate::plotting::rails::element_order;
    use crate::plotting::surface::{DrawCommand, RecordingSurface};
    use crate::testing::{ComparisonRecord, EffectDirection};
    use std::sync::Mutex;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct WarningCapture;

    impl log::Log for WarningCapture {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                if let Ok(mut warnings) = WARNINGS.lock() {
                    warnings.push(record.args().to_string());
                }
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: WarningCapture = WarningCapture;

    fn capture_warnings() {
        // Only the first call installs the logger; later calls are no-ops
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Warn);
    }

    fn warned(fragment: &str) -> bool {
        WARNINGS
            .lock()
            .map(|w| w.iter().any(|m| m.contains(fragment)))
            .unwrap_or(false)
    }

    fn a_beats_b() -> ComparisonTable {
        ComparisonTable::from_records(
            vec![
                ComparisonRecord::new("A", "B", EffectDirection::Positive, true),
                ComparisonRecord::new("A", "C", EffectDirection::Positive, false),
                ComparisonRecord::new("B", "C", EffectDirection::Negative, false),
            ],
            0.05,
        )
    }

    fn locations() -> HashMap<String, f64> {
        HashMap::from([
            ("A".to_string(), 0.0),
            ("B".to_string(), 1.0),
            ("C".to_string(), 2.0),
        ])
    }

    #[test]
    fn test_draw_sequence() {
        let mut surface = RecordingSurface::new();
        let config = RenderConfig::default().with_palette(Color::rgb(10, 20, 30));
        let outcome = render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A", "B", "C"]),
            &config,
            &mut surface,
        )
        .unwrap();
        assert_eq!(outcome.rails.len(), 1);

        let commands = surface.commands();
        assert_eq!(commands.len(), 3);
        match &commands[0] {
            DrawCommand::Line { points, style } => {
                assert_eq!(points, &vec![(0.0, 1.0), (0.0, 0.0)]);
                assert_eq!(style.width, 0.5);
                assert_eq!(style.color, Color::rgb(10, 20, 30));
            }
            other => panic!("expected a line first, got {:?}", other),
        }
        match &commands[1] {
            DrawCommand::Marker { point, style } => {
                assert_eq!(*point, (0.0, 1.0));
                assert_eq!(style.face, Color::WHITE);
                assert_eq!(style.edge, Color::rgb(10, 20, 30));
            }
            other => panic!("expected the open marker, got {:?}", other),
        }
        match &commands[2] {
            DrawCommand::Marker { point, style } => {
                assert_eq!(*point, (0.0, 0.0));
                assert_eq!(style.face, Color::rgb(10, 20, 30));
            }
            other => panic!("expected the filled marker, got {:?}", other),
        }
        assert!(!surface.axis_visible());
    }

    #[test]
    fn test_missing_palette_entry_draws_nothing() {
        let mut surface = RecordingSurface::new();
        let config = RenderConfig::default()
            .with_palette(Palette::per_level([("B", Color::BLACK)]));
        let err = render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A", "B", "C"]),
            &config,
            &mut surface,
        )
        .unwrap_err();
        assert_eq!(
            err.downcast_ref::<MetroplotError>(),
            Some(&MetroplotError::MissingColor("A".to_string()))
        );
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_tie_direction_rejected() {
        let mut surface = RecordingSurface::new();
        let config =
            RenderConfig::default().with_dominating_effect_direction(EffectDirection::Tie);
        let result = render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A"]),
            &config,
            &mut surface,
        );
        assert!(result.is_err());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn test_level_axis_lim_goes_to_level_axis() {
        let mut surface = RecordingSurface::new();
        let config = RenderConfig::default()
            .with_level_axis(LevelAxis::X)
            .with_level_axis_lim((-0.5, 2.5));
        render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A", "B", "C"]),
            &config,
            &mut surface,
        )
        .unwrap();
        assert_eq!(surface.xlim(), (-0.5, 2.5));
        // A single rail at element 0 autoscales to +-0.5
        assert_eq!(surface.ylim(), (-0.5, 0.5));
    }

    #[test]
    fn test_element_axis_lim_is_widened_not_mutated() {
        let mut surface = RecordingSurface::new();
        let requested = (0.0, 3.0);
        let config = RenderConfig::default().with_element_axis_lim(requested);
        let outcome = render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A", "B", "C"]),
            &config,
            &mut surface,
        )
        .unwrap();
        assert_eq!(outcome.element_axis_lim, Some((-0.5, 3.0)));
        assert_eq!(surface.xlim(), (-0.5, 3.0));
        assert_eq!(config.element_axis_lim, Some(requested));
    }

    #[test]
    fn test_element_axis_lim_kept_when_wide_enough() {
        let mut surface = RecordingSurface::new();
        let config = RenderConfig::default().with_element_axis_lim((-1.0, 4.0));
        let outcome = render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A", "B", "C"]),
            &config,
            &mut surface,
        )
        .unwrap();
        assert_eq!(outcome.element_axis_lim, Some((-1.0, 4.0)));
    }

    #[test]
    fn test_widen_to_cover() {
        assert_eq!(widen_to_cover((0.0, 1.0), (-0.1, 2.0)), (-0.1, 2.0));
        assert_eq!(widen_to_cover((-1.0, 5.0), (0.0, 2.0)), (-1.0, 5.0));
    }

    #[test]
    fn test_widening_logs_a_warning() {
        capture_warnings();
        assert_eq!(widen_to_cover((0.25, 1.0), (-0.125, 7.75)), (-0.125, 7.75));
        assert!(warned("element_axis_lim[0] too small (-0.125 < 0.25)"));
        assert!(warned("element_axis_lim[1] too small (7.75 > 1)"));

        assert_eq!(widen_to_cover((-3.375, 9.625), (0.0, 1.0)), (-3.375, 9.625));
        assert!(!warned("3.375"));
        assert!(!warned("9.625"));
    }

    #[test]
    fn test_element_axis_lim_widened_on_y_when_levels_on_x() {
        let mut surface = RecordingSurface::new();
        let config = RenderConfig::default()
            .with_level_axis(LevelAxis::X)
            .with_element_axis_lim((0.0, 3.0));
        let outcome = render(
            &a_beats_b(),
            &locations(),
            &element_order(&["A", "B", "C"]),
            &config,
            &mut surface,
        )
        .unwrap();
        // The single rail sits at y = 0, autoscaled to (-0.5, 0.5)
        assert_eq!(outcome.element_axis_lim, Some((-0.5, 3.0)));
        assert_eq!(surface.ylim(), (-0.5, 3.0));
        // Level axis is left to autoscale over locations 0 and 1
        let (x0, x1) = surface.xlim();
        assert!(x0 < 0.0 && x1 > 1.0);
    }

    #[test]
    fn test_nothing_significant_still_hides_axes() {
        let table = ComparisonTable::from_records(
            vec![ComparisonRecord::new("A", "B", EffectDirection::Positive, false)],
            0.05,
        );
        let mut surface = RecordingSurface::new();
        let outcome = render(
            &table,
            &locations(),
            &element_order(&["A", "B"]),
            &RenderConfig::default(),
            &mut surface,
        )
        .unwrap();
        assert!(outcome.rails.is_empty());
        assert!(surface.commands().is_empty());
        assert!(!surface.axis_visible());
    }
}
