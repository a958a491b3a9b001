use crate::data::Observations;
use crate::error::MetroplotError;
use crate::testing::utils::{pair_indices, partition_by_level, unique_in_order};
use crate::testing::{ComparisonRecord, ComparisonTable, EffectDirection, TTestType, correction};

pub mod parametric;

/// Default false discovery rate for the significance decisions.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Options for [`pairwise_t_tests_with`].
#[derive(Debug, Clone, Copy)]
pub struct ComparisonOptions {
    pub test_type: TTestType,
    pub alpha: f64,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        ComparisonOptions {
            test_type: TTestType::Student,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl ComparisonOptions {
    pub fn with_test_type(mut self, test_type: TTestType) -> Self {
        self.test_type = test_type;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }
}

pub trait PairwiseTests {
    /// Compare every unordered pair of levels of `factor` on `dependent`.
    fn pairwise_t_tests(
        &self,
        factor: &str,
        dependent: &str,
        options: &ComparisonOptions,
    ) -> anyhow::Result<ComparisonTable>;
}

impl PairwiseTests for Observations {
    fn pairwise_t_tests(
        &self,
        factor: &str,
        dependent: &str,
        options: &ComparisonOptions,
    ) -> anyhow::Result<ComparisonTable> {
        if !(options.alpha > 0.0 && options.alpha < 1.0) {
            return Err(MetroplotError::InvalidAlpha(options.alpha).into());
        }

        let factor_values = self.factor(factor)?;
        let dependent_values = self.numeric(dependent)?;

        if let Some(row) = dependent_values.iter().position(|v| !v.is_finite()) {
            return Err(MetroplotError::MissingValue {
                column: dependent.to_string(),
                row,
            }
            .into());
        }

        let levels = unique_in_order(factor_values);
        if levels.len() < 2 {
            return Err(MetroplotError::TooFewLevels {
                factor: factor.to_string(),
                found: levels.len(),
            }
            .into());
        }

        let groups = partition_by_level(factor_values, dependent_values, &levels)?;
        let pairs = pair_indices(levels.len());
        log::debug!(
            "comparing {} levels of {} on {} ({} pairs)",
            levels.len(),
            factor,
            dependent,
            pairs.len()
        );

        let mut records = Vec::with_capacity(pairs.len());
        for (i, j) in pairs {
            let (a, b) = (&groups[i], &groups[j]);
            if !parametric::has_enough_observations(a.len(), b.len(), options.test_type) {
                return Err(MetroplotError::InsufficientObservations {
                    level1: levels[i].clone(),
                    level2: levels[j].clone(),
                }
                .into());
            }

            let result = parametric::t_test(a, b, options.test_type)?;
            log::trace!(
                "{} vs {}: t={:.4}, p={:.4e}",
                levels[i],
                levels[j],
                result.statistic,
                result.p_value
            );

            records.push(ComparisonRecord {
                level1: levels[i].clone(),
                level2: levels[j].clone(),
                effect_direction: EffectDirection::from_statistic(result.statistic),
                statistic: result.statistic,
                p_value: result.p_value,
                is_sig: false,
                corrected_p_value: result.p_value,
            });
        }

        // One correction over the whole family
        let p_values: Vec<f64> = records.iter().map(|r| r.p_value).collect();
        let (rejected, adjusted) = correction::fdr_bh(&p_values, options.alpha)?;
        for ((record, is_sig), corrected) in records.iter_mut().zip(rejected).zip(adjusted) {
            record.is_sig = is_sig;
            record.corrected_p_value = corrected;
        }

        log::debug!(
            "{} of {} comparisons significant at FDR {}",
            records.iter().filter(|r| r.is_sig).count(),
            records.len(),
            options.alpha
        );

        Ok(ComparisonTable::from_records(records, options.alpha))
    }
}

/// Run a pooled-variance t-test between every pair of levels of `factor`,
/// correcting the p-values with Benjamini-Hochberg at a false discovery rate of 0.05.
///
/// # Arguments
///
/// * `data` - Observation table
/// * `factor` - Name of the categorical column defining the levels
/// * `dependent` - Name of the numeric column being compared
///
/// # Returns
///
/// One record per unordered pair of levels, levels taken in order of first appearance.
pub fn pairwise_t_tests(
    data: &Observations,
    factor: &str,
    dependent: &str,
) -> anyhow::Result<ComparisonTable> {
    data.pairwise_t_tests(factor, dependent, &ComparisonOptions::default())
}

/// Same as [`pairwise_t_tests`] with explicit test type and alpha.
pub fn pairwise_t_tests_with(
    data: &Observations,
    factor: &str,
    dependent: &str,
    options: &ComparisonOptions,
) -> anyhow::Result<ComparisonTable> {
    data.pairwise_t_tests(factor, dependent, options)
}
