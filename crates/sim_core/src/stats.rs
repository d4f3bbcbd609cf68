//! Descriptive statistics shared by the simulator and the aggregator.
//!
//! Conventions:
//! - Variance and standard deviation use the sample (n − 1) estimator. A
//!   single observation has zero variance rather than an undefined one.
//! - Percentiles use linear interpolation between closest ranks:
//!   `rank = q / 100 · (n − 1)`.
//! - Empty inputs return `None`; callers decide how to report them.

/// Arithmetic mean, or `None` for an empty slice.
///
/// # Examples
///
/// ```rust
/// use sim_core::stats::mean;
///
/// assert_eq!(mean(&[1.0, 2.0, 3.0]), Some(2.0));
/// assert_eq!(mean(&[]), None);
/// ```
#[inline]
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample variance with n − 1 denominator.
///
/// Returns `Some(0.0)` for a single observation and `None` for an empty
/// slice.
pub fn sample_variance(data: &[f64]) -> Option<f64> {
    let m = mean(data)?;
    if data.len() < 2 {
        return Some(0.0);
    }
    let sum_sq: f64 = data.iter().map(|x| (x - m) * (x - m)).sum();
    Some(sum_sq / (data.len() - 1) as f64)
}

/// Sample standard deviation (square root of [`sample_variance`]).
#[inline]
pub fn sample_std_dev(data: &[f64]) -> Option<f64> {
    sample_variance(data).map(f64::sqrt)
}

/// Sample covariance of two equally long series, n − 1 denominator.
///
/// Returns `None` if the series are empty or differ in length, and
/// `Some(0.0)` for a single pair.
pub fn sample_covariance(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() {
        return None;
    }
    let mx = mean(x)?;
    let my = mean(y)?;
    if x.len() < 2 {
        return Some(0.0);
    }
    let sum: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Some(sum / (x.len() - 1) as f64)
}

/// Percentile `q` (in percent, 0–100) of an ascending-sorted, non-empty
/// slice, with linear interpolation.
///
/// # Examples
///
/// ```rust
/// use sim_core::stats::percentile_sorted;
///
/// let data = [1.0, 2.0, 3.0, 4.0, 5.0];
/// assert_eq!(percentile_sorted(&data, 50.0), 3.0);
/// assert!((percentile_sorted(&data, 5.0) - 1.2).abs() < 1e-12);
/// ```
///
/// # Panics
///
/// Panics if `sorted` is empty.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = q / 100.0 * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Rounds to a fixed number of decimal places (half away from zero).
///
/// # Examples
///
/// ```rust
/// use sim_core::stats::round_to;
///
/// assert_eq!(round_to(101.23456, 2), 101.23);
/// assert_eq!(round_to(-0.125, 1), -0.1);
/// ```
#[inline]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
