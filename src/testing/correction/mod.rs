//! Multiple testing correction across one family of pairwise comparisons.

use anyhow::{Result, anyhow};
use std::cmp::Ordering;

fn validate_p_values(p_values: &[f64]) -> Result<()> {
    if p_values.is_empty() {
        return Err(anyhow!("Empty p-value array"));
    }

    for (i, &p) in p_values.iter().enumerate() {
        if !(0.0..=1.0).contains(&p) {
            return Err(anyhow!("Invalid p-value at index {}: {}", i, p));
        }
    }

    Ok(())
}

/// Apply Benjamini-Hochberg (BH) procedure for controlling false discovery rate
///
/// The BH procedure controls the false discovery rate (FDR), which is the expected
/// proportion of false positives among all rejected null hypotheses.
///
/// # Arguments
/// * `p_values` - A slice of p-values to adjust
///
/// # Returns
/// * `Result<Vec<f64>>` - Vector of adjusted p-values, in input order
pub fn benjamini_hochberg_correction(p_values: &[f64]) -> Result<Vec<f64>> {
    validate_p_values(p_values)?;
    let n = p_values.len();

    // Stable sort keeps tied p-values in input order, so repeated calls agree exactly
    let mut indexed_p_values: Vec<(usize, f64)> =
        p_values.iter().enumerate().map(|(i, &p)| (i, p)).collect();
    indexed_p_values.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

    let mut adjusted_p_values = vec![0.0; n];
    let mut current_min: f64 = 1.0;

    // Process from largest to smallest p-value
    for i in (0..n).rev() {
        let (orig_idx, p_val) = indexed_p_values[i];
        let rank = i + 1;

        let adjustment = (p_val * n as f64 / rank as f64).min(1.0);
        current_min = adjustment.min(current_min);
        adjusted_p_values[orig_idx] = current_min;
    }

    Ok(adjusted_p_values)
}

/// Benjamini-Hochberg rejection decisions together with the adjusted p-values.
///
/// A hypothesis is rejected when its adjusted p-value is at most `alpha`. This is
/// the step-up rule: find the largest rank `k` with `p_(k) <= k / n * alpha` and
/// reject every hypothesis ranked at or below `k`.
///
/// # Arguments
/// * `p_values` - Raw p-values of the whole family
/// * `alpha` - False discovery rate to control, e.g. 0.05
pub fn fdr_bh(p_values: &[f64], alpha: f64) -> Result<(Vec<bool>, Vec<f64>)> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(anyhow!("Alpha must be between 0 and 1, got {}", alpha));
    }

    let adjusted = benjamini_hochberg_correction(p_values)?;
    let rejected = adjusted.iter().map(|&q| q <= alpha).collect();

    Ok((rejected, adjusted))
}
