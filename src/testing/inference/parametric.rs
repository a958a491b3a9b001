//! Parametric two-sample tests.
//!
//! Independent-samples t-tests, either with pooled variance (Student) or with
//! unequal variances (Welch). P-values are two-sided and come from the
//! Student's t distribution in `statrs`.

use crate::error::MetroplotError;
use crate::testing::{TTestType, TestResult};
use single_utilities::traits::FloatOps;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Whether two samples of the given sizes leave positive degrees of freedom.
pub fn has_enough_observations(n1: usize, n2: usize, test_type: TTestType) -> bool {
    match test_type {
        TTestType::Student => n1 >= 1 && n2 >= 1 && n1 + n2 > 2,
        TTestType::Welch => n1 >= 2 && n2 >= 2,
    }
}

/// Perform a t-test comparing two samples.
///
/// The statistic is positive when the mean of `x` exceeds the mean of `y`.
///
/// # Arguments
///
/// * `x` - First sample
/// * `y` - Second sample
/// * `test_type` - Type of t-test to perform
///
/// # Returns
///
/// `TestResult` with the t-statistic, p-value, degrees of freedom and standard error.
/// Fails when the samples are too small for the requested test.
pub fn t_test<T>(x: &[T], y: &[T], test_type: TTestType) -> anyhow::Result<TestResult<f64>>
where
    T: FloatOps,
{
    let x = to_f64_vec(x)?;
    let y = to_f64_vec(y)?;

    if !has_enough_observations(x.len(), y.len(), test_type) {
        return Err(anyhow::anyhow!(
            "Not enough observations for a t-test ({} and {})",
            x.len(),
            y.len()
        ));
    }

    let (mean1, var1) = mean_and_variance(&x);
    let (mean2, var2) = mean_and_variance(&y);

    t_test_from_moments(
        mean1,
        var1,
        x.len() as f64,
        mean2,
        var2,
        y.len() as f64,
        test_type,
    )
}

/// Perform a t-test using precomputed sums and sums of squares.
///
/// # Arguments
///
/// * `sum1`, `sum_sq1`, `n1` - Sum, sum of squares, and count for group 1
/// * `sum2`, `sum_sq2`, `n2` - Sum, sum of squares, and count for group 2
/// * `test_type` - Type of t-test to perform (Student's or Welch's)
pub fn t_test_from_sums(
    sum1: f64,
    sum_sq1: f64,
    n1: f64,
    sum2: f64,
    sum_sq2: f64,
    n2: f64,
    test_type: TTestType,
) -> anyhow::Result<TestResult<f64>> {
    if !has_enough_observations(n1 as usize, n2 as usize, test_type) {
        return Err(anyhow::anyhow!(
            "Not enough observations for a t-test ({} and {})",
            n1,
            n2
        ));
    }

    let mean1 = sum1 / n1;
    let mean2 = sum2 / n2;
    let var1 = sample_variance_from_sums(sum1, sum_sq1, n1);
    let var2 = sample_variance_from_sums(sum2, sum_sq2, n2);

    t_test_from_moments(mean1, var1, n1, mean2, var2, n2, test_type)
}

fn sample_variance_from_sums(sum: f64, sum_sq: f64, n: f64) -> f64 {
    if n < 2.0 {
        return 0.0;
    }
    ((sum_sq - sum * sum / n) / (n - 1.0)).max(0.0)
}

fn to_f64_vec<T>(values: &[T]) -> anyhow::Result<Vec<f64>>
where
    T: FloatOps,
{
    values
        .iter()
        .map(|v| {
            num_traits::ToPrimitive::to_f64(v)
                .ok_or_else(|| anyhow::anyhow!("Sample value cannot be represented as f64"))
        })
        .collect()
}

/// Mean and unbiased sample variance (zero for a single observation).
///
/// Running (Welford) update, so the mean of values near `f64::MAX` stays finite.
fn mean_and_variance(values: &[f64]) -> (f64, f64) {
    let mut mean = 0.0;
    let mut m2 = 0.0;
    for (k, &v) in values.iter().enumerate() {
        let delta = v - mean;
        mean += delta / (k + 1) as f64;
        m2 += delta * (v - mean);
    }
    if values.len() < 2 {
        return (mean, 0.0);
    }
    (mean, m2 / (values.len() - 1) as f64)
}

fn t_test_from_moments(
    mean1: f64,
    var1: f64,
    n1: f64,
    mean2: f64,
    var2: f64,
    n2: f64,
    test_type: TTestType,
) -> anyhow::Result<TestResult<f64>> {
    let mean_diff = mean1 - mean2;

    let (std_err, df) = match test_type {
        TTestType::Student => {
            // Student's t-test (pooled variance)
            let df = n1 + n2 - 2.0;
            let pooled_var = ((n1 - 1.0) * var1 + (n2 - 1.0) * var2) / df;
            ((pooled_var * (1.0 / n1 + 1.0 / n2)).sqrt(), df)
        }
        TTestType::Welch => {
            let term1 = var1 / n1;
            let term2 = var2 / n2;
            let combined_var = term1 + term2;

            // Welch-Satterthwaite equation for degrees of freedom
            let df = combined_var * combined_var
                / (term1 * term1 / (n1 - 1.0) + term2 * term2 / (n2 - 1.0));
            let df = if df.is_finite() { df } else { n1 + n2 - 2.0 };
            (combined_var.sqrt(), df)
        }
    };

    if !mean_diff.is_finite() || !std_err.is_finite() {
        return Err(MetroplotError::NonFiniteMoments { mean_diff, std_err }.into());
    }

    // Zero spread: identical means are a tie, anything else is an infinitely strong effect.
    let t_stat = if std_err > 0.0 {
        mean_diff / std_err
    } else if mean_diff == 0.0 {
        0.0
    } else {
        mean_diff.signum() * f64::INFINITY
    };

    Ok(TestResult::new(t_stat, two_sided_p_value(t_stat, df))
        .with_degrees_of_freedom(df)
        .with_standard_error(std_err))
}

fn two_sided_p_value(t_stat: f64, df: f64) -> f64 {
    // statrs panics on a NaN argument
    if t_stat.is_nan() || df.is_nan() {
        return 1.0;
    }
    if t_stat.is_infinite() {
        return 0.0;
    }
    if t_stat == 0.0 {
        return 1.0;
    }

    match StudentsT::new(0.0, 1.0, df) {
        Ok(t_dist) => (2.0 * t_dist.sf(t_stat.abs())).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_student_matches_reference() {
        // scipy.stats.ttest_ind([1, 2, 3, 4], [3, 4, 5, 6]) -> t=-2.1908902300206643, p=0.0709876543...
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [3.0, 4.0, 5.0, 6.0];
        let result = t_test(&x, &y, TTestType::Student).unwrap();
        assert_relative_eq!(result.statistic, -2.1908902300206643, epsilon = 1e-10);
        assert_relative_eq!(result.p_value, 0.0709876543209877, epsilon = 1e-7);
        assert_eq!(result.degrees_of_freedom, Some(6.0));
    }

    #[test]
    fn test_welch_unequal_sizes() {
        let x = [10.0, 11.0, 12.0];
        let y = [1.0, 2.0, 3.0, 4.0, 5.0];
        let result = t_test(&x, &y, TTestType::Welch).unwrap();
        assert!(result.statistic > 0.0);
        assert!(result.p_value < 0.01);
        let df = result.degrees_of_freedom.unwrap();
        assert!(df > 2.0 && df < 6.0);
    }

    #[test]
    fn test_statistic_sign_follows_first_sample() {
        let low = [1.0, 2.0, 3.0];
        let high = [7.0, 8.0, 9.0];
        let forward = t_test(&high, &low, TTestType::Student).unwrap();
        let backward = t_test(&low, &high, TTestType::Student).unwrap();
        assert!(forward.statistic > 0.0);
        assert_relative_eq!(forward.statistic, -backward.statistic, epsilon = 1e-12);
        assert_relative_eq!(forward.p_value, backward.p_value, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_variance_groups() {
        let same = t_test(&[5.0, 5.0], &[5.0, 5.0, 5.0], TTestType::Student).unwrap();
        assert_eq!(same.statistic, 0.0);
        assert_eq!(same.p_value, 1.0);

        let apart = t_test(&[1.0, 1.0], &[2.0, 2.0], TTestType::Student).unwrap();
        assert_eq!(apart.statistic, f64::NEG_INFINITY);
        assert_eq!(apart.p_value, 0.0);
    }

    #[test]
    fn test_insufficient_observations() {
        assert!(t_test(&[1.0], &[2.0], TTestType::Student).is_err());
        assert!(t_test(&[1.0], &[2.0, 3.0], TTestType::Welch).is_err());
        assert!(t_test::<f64>(&[], &[2.0, 3.0], TTestType::Student).is_err());
        // A singleton is fine under pooled variance as long as the other side has spread.
        assert!(t_test(&[1.0], &[2.0, 3.0], TTestType::Student).is_ok());
    }

    #[test]
    fn test_large_values_do_not_overflow_the_mean() {
        let big = [1.6e308, 1.6e308, 1.6e308];
        let result = t_test(&big, &big, TTestType::Student).unwrap();
        assert_eq!(result.statistic, 0.0);
        assert_eq!(result.p_value, 1.0);

        let (mean, var) = mean_and_variance(&[1.7e308, 1.7e308]);
        assert_eq!(mean, 1.7e308);
        assert_eq!(var, 0.0);
    }

    #[test]
    fn test_overflowing_moments_are_an_error() {
        // Spread of 0.5e308 squares past f64::MAX
        let err = t_test(&[1e308, 1.5e308], &[1.0, 2.0], TTestType::Student).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<MetroplotError>(),
            Some(MetroplotError::NonFiniteMoments { .. })
        ));

        // Mean difference itself overflows
        let err = t_test(&[1.7e308, 1.7e308], &[-1.7e308, -1.7e308], TTestType::Welch)
            .unwrap_err();
        assert!(err.downcast_ref::<MetroplotError>().is_some());

        let err = t_test_from_sums(f64::INFINITY, 1.0, 2.0, 1.0, 1.0, 2.0, TTestType::Student)
            .unwrap_err();
        assert!(err.downcast_ref::<MetroplotError>().is_some());
    }

    #[test]
    fn test_nan_statistic_gives_unit_p_value() {
        assert_eq!(two_sided_p_value(f64::NAN, 4.0), 1.0);
        assert_eq!(two_sided_p_value(2.0, f64::NAN), 1.0);
    }

    #[test]
    fn test_from_sums_agrees_with_samples() {
        let x: [f64; 3] = [1.0, 2.0, 3.0];
        let y: [f64; 3] = [7.0, 8.0, 9.0];
        let direct = t_test(&x, &y, TTestType::Student).unwrap();
        let from_sums = t_test_from_sums(
            x.iter().sum(),
            x.iter().map(|v| v * v).sum(),
            3.0,
            y.iter().sum(),
            y.iter().map(|v| v * v).sum(),
            3.0,
            TTestType::Student,
        )
        .unwrap();
        assert_relative_eq!(direct.statistic, from_sums.statistic, epsilon = 1e-9);
        assert_relative_eq!(direct.p_value, from_sums.p_value, epsilon = 1e-9);
    }
}
