//! Rail construction: which levels dominate which, and where each rail sits.

use crate::plotting::config::LevelAxis;
use crate::testing::{ComparisonRecord, ComparisonTable, EffectDirection};
use std::collections::{HashMap, HashSet};

/// One dominating level and everything it significantly dominates.
#[derive(Debug, Clone, PartialEq)]
pub struct Rail {
    pub level: String,
    /// Position along the element axis: 0, 1, 2, ... in emission order
    pub element_coord: f64,
    /// Dominated levels with their locations, in discovery order
    pub dominated: Vec<(String, f64)>,
    pub dominating_location: f64,
}

impl Rail {
    /// Marker positions as `(x, y)`: dominated levels first, the dominating level last.
    pub fn points(&self, level_axis: LevelAxis) -> Vec<(f64, f64)> {
        self.dominated
            .iter()
            .map(|(_, loc)| *loc)
            .chain(std::iter::once(self.dominating_location))
            .map(|loc| level_axis.to_xy(self.element_coord, loc))
            .collect()
    }
}

/// Wrap level names as an element order with no skip entries.
pub fn element_order<S: AsRef<str>>(levels: &[S]) -> Vec<Option<&str>> {
    levels.iter().map(|l| Some(l.as_ref())).collect()
}

/// Levels dominated by `level`, read in both polarities.
///
/// `D` is dominated by `L` when a row states `L vs D` with the dominating
/// direction, or `D vs L` with the reversed direction. Rows stating a tie
/// never match either way.
fn dominated_levels<'a>(
    rows: &[&'a ComparisonRecord],
    level: &str,
    level_to_location: &HashMap<String, f64>,
    dominating: EffectDirection,
) -> Vec<&'a str> {
    let forward = rows.iter().copied().filter(|r| {
        r.level1 == level
            && level_to_location.contains_key(&r.level2)
            && r.effect_direction == dominating
    });
    let reverse = rows.iter().copied().filter(|r| {
        r.level2 == level
            && level_to_location.contains_key(&r.level1)
            && r.effect_direction == dominating.reversed()
    });

    forward
        .map(|r| r.level2.as_str())
        .chain(reverse.map(|r| r.level1.as_str()))
        .collect()
}

/// Build the rails for `element_order`, skipping `None` entries and levels that
/// dominate nothing. Rail coordinates are dense: skipped levels consume none.
pub fn build_rails(
    comparisons: &ComparisonTable,
    level_to_location: &HashMap<String, f64>,
    element_order: &[Option<&str>],
    dominating: EffectDirection,
) -> Vec<Rail> {
    // A row naming at least one known level survives; a row naming an unknown
    // level can still never match below, since dominated levels must be known.
    let rows: Vec<&ComparisonRecord> = comparisons
        .iter()
        .filter(|r| {
            level_to_location.contains_key(&r.level1) || level_to_location.contains_key(&r.level2)
        })
        .filter(|r| r.is_sig)
        .collect();

    let mut rails = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for level in element_order.iter().flatten().copied() {
        if !seen.insert(level) {
            log::debug!("level {} repeated in element order; keeping its first rail", level);
            continue;
        }

        let dominated = dominated_levels(&rows, level, level_to_location, dominating);
        if dominated.is_empty() {
            continue;
        }

        let Some(&dominating_location) = level_to_location.get(level) else {
            log::debug!("level {} dominates others but has no location; no rail drawn", level);
            continue;
        };

        rails.push(Rail {
            level: level.to_string(),
            element_coord: rails.len() as f64,
            dominated: dominated
                .into_iter()
                .filter_map(|d| level_to_location.get(d).map(|&loc| (d.to_string(), loc)))
                .collect(),
            dominating_location,
        });
    }

    rails
}
