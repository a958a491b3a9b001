use crate::error::MetroplotError;
use ndarray::ArrayView1;
use std::collections::{HashMap, HashSet};

/// Distinct values in order of first appearance.
pub fn unique_in_order(values: &[String]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(values.len());
    values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

/// Split the dependent values by level, one vector per entry of `levels`.
pub fn partition_by_level(
    factor: &[String],
    dependent: ArrayView1<'_, f64>,
    levels: &[String],
) -> anyhow::Result<Vec<Vec<f64>>> {
    let index: HashMap<&str, usize> = levels
        .iter()
        .enumerate()
        .map(|(i, l)| (l.as_str(), i))
        .collect();

    let mut groups = vec![Vec::new(); levels.len()];
    for (value, &y) in factor.iter().zip(dependent.iter()) {
        if let Some(&idx) = index.get(value.as_str()) {
            groups[idx].push(y);
        }
    }

    if let Some(idx) = groups.iter().position(Vec::is_empty) {
        return Err(MetroplotError::EmptyLevel(levels[idx].clone()).into());
    }

    Ok(groups)
}

/// All index pairs `(i, j)` with `i < j`, in lexicographic order.
pub fn pair_indices(n: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for i in 0..n {
        for j in (i + 1)..n {
            pairs.push((i, j));
        }
    }
    pairs
}
