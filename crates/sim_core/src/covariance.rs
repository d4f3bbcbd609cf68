//! Covariance matrices and Cholesky factors for correlated shocks.
//!
//! ## Mathematical Background
//!
//! Given `n` independent standard normals `Z = [Z1, ..., Zn]`, correlated
//! normals with covariance `Σ` are obtained as
//!
//! ```text
//! W = L * Z,    Σ = L * L^T
//! ```
//!
//! where `L` is the lower triangular Cholesky factor of `Σ`.
//!
//! Sample covariance matrices of historical returns are only guaranteed to be
//! positive *semi*-definite: two perfectly correlated assets, or more assets
//! than return observations, give a singular matrix. The factorisation here
//! therefore treats pivots within a relative tolerance of zero as exact zeros
//! and leaves the corresponding column of `L` empty, which still reproduces
//! `Σ = L * L^T`.
//!
//! ## Usage
//!
//! ```
//! use sim_core::covariance::CovarianceMatrix;
//!
//! let cov = CovarianceMatrix::new(vec![
//!     0.04, 0.01,
//!     0.01, 0.09,
//! ], 2).unwrap();
//!
//! let chol = cov.cholesky().unwrap();
//! let w = chol.transform(&[1.0, 0.0]);
//! assert!((w[0] - 0.2).abs() < 1e-12);
//! assert!((w[1] - 0.05).abs() < 1e-12);
//! ```

use crate::error::{Result, SimError};

/// Relative tolerance below which a Cholesky pivot is treated as zero.
pub const PIVOT_TOLERANCE: f64 = 1e-12;

/// Symmetric covariance matrix stored row-major.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CovarianceMatrix {
    /// Matrix elements in row-major order
    data: Vec<f64>,
    /// Matrix dimension (n x n)
    dim: usize,
}

impl CovarianceMatrix {
    /// Creates a covariance matrix from a flat row-major array.
    ///
    /// # Validation
    ///
    /// - Must have exactly `dim * dim` finite elements
    /// - Diagonal elements must be non-negative
    /// - Must be symmetric (within a relative tolerance)
    pub fn new(data: Vec<f64>, dim: usize) -> Result<Self> {
        let expected = dim * dim;
        if data.len() != expected {
            return Err(SimError::InvalidDimensions {
                expected,
                got: data.len(),
            });
        }

        for i in 0..dim {
            let diag = data[i * dim + i];
            if !diag.is_finite() || diag < 0.0 {
                return Err(SimError::NotPositiveSemiDefinite {
                    index: i,
                    pivot: diag,
                });
            }
        }

        for i in 0..dim {
            for j in (i + 1)..dim {
                let a = data[i * dim + j];
                let b = data[j * dim + i];
                let scale = a.abs().max(b.abs()).max(f64::MIN_POSITIVE);
                if !a.is_finite() || (a - b).abs() > 1e-10 * scale {
                    return Err(SimError::NotPositiveSemiDefinite { index: i, pivot: a });
                }
            }
        }

        Ok(Self { data, dim })
    }

    /// Builds the sample covariance matrix (n − 1 denominator) of column
    /// series of equal length.
    ///
    /// A single observation yields the zero matrix.
    pub fn from_series(series: &[Vec<f64>]) -> Result<Self> {
        let dim = series.len();
        let len = series.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = series.iter().find(|s| s.len() != len) {
            return Err(SimError::InvalidDimensions {
                expected: len,
                got: bad.len(),
            });
        }

        let mut data = vec![0.0; dim * dim];
        for i in 0..dim {
            for j in 0..=i {
                let cov = crate::stats::sample_covariance(&series[i], &series[j]).unwrap_or(0.0);
                data[i * dim + j] = cov;
                data[j * dim + i] = cov;
            }
        }

        Ok(Self { data, dim })
    }

    /// Returns the matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns element (i, j).
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.dim + j]
    }

    /// Returns the diagonal (per-asset variances).
    pub fn variances(&self) -> Vec<f64> {
        (0..self.dim).map(|i| self.get(i, i)).collect()
    }

    /// Returns the row-major elements.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Converts to the matching correlation matrix.
    ///
    /// Assets with zero variance get a unit diagonal and zero correlation
    /// with every other asset.
    pub fn to_correlation(&self) -> Self {
        let n = self.dim;
        let std: Vec<f64> = self.variances().into_iter().map(f64::sqrt).collect();
        let mut data = vec![0.0; n * n];

        for i in 0..n {
            for j in 0..n {
                data[i * n + j] = if i == j {
                    1.0
                } else if std[i] > 0.0 && std[j] > 0.0 {
                    (self.get(i, j) / (std[i] * std[j])).clamp(-1.0, 1.0)
                } else {
                    0.0
                };
            }
        }

        Self { data, dim: n }
    }

    /// Computes the lower triangular factor `L` with `Σ = L * L^T`.
    ///
    /// # Errors
    ///
    /// `SimError::NotPositiveSemiDefinite` if a pivot is negative beyond
    /// the [`PIVOT_TOLERANCE`] relative to the largest diagonal element.
    pub fn cholesky(&self) -> Result<CholeskyFactor> {
        let n = self.dim;
        let mut lower = vec![0.0; n * n];

        let max_diag = self.variances().into_iter().fold(0.0_f64, f64::max);
        let tol = PIVOT_TOLERANCE * max_diag.max(f64::MIN_POSITIVE);

        for j in 0..n {
            let mut sum = 0.0;
            for k in 0..j {
                let l_jk = lower[j * n + k];
                sum += l_jk * l_jk;
            }
            let pivot = self.get(j, j) - sum;

            if pivot < -tol {
                return Err(SimError::NotPositiveSemiDefinite { index: j, pivot });
            }
            if pivot <= tol {
                // Linearly dependent column: L[.., j] stays zero.
                continue;
            }

            let l_jj = pivot.sqrt();
            lower[j * n + j] = l_jj;

            for i in (j + 1)..n {
                let mut sum = 0.0;
                for k in 0..j {
                    sum += lower[i * n + k] * lower[j * n + k];
                }
                lower[i * n + j] = (self.get(i, j) - sum) / l_jj;
            }
        }

        Ok(CholeskyFactor { data: lower, dim: n })
    }
}

/// Lower triangular Cholesky factor of a covariance matrix.
///
/// Used to transform independent standard normals into correlated normals.
#[derive(Clone, Debug, PartialEq)]
pub struct CholeskyFactor {
    /// Lower triangular matrix elements (row-major)
    data: Vec<f64>,
    /// Matrix dimension
    dim: usize,
}

impl CholeskyFactor {
    /// Returns the matrix dimension.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Returns element (i, j); zero above the diagonal.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        if j > i {
            0.0
        } else {
            self.data[i * self.dim + j]
        }
    }

    /// Computes `W = L * Z` into a new vector.
    ///
    /// # Panics
    ///
    /// Panics if `z.len() < self.dim()`.
    pub fn transform(&self, z: &[f64]) -> Vec<f64> {
        let mut w = vec![0.0; self.dim];
        self.transform_into(z, &mut w);
        w
    }

    /// Computes `W = L * Z` into a caller-provided buffer.
    ///
    /// # Panics
    ///
    /// Panics if either slice is shorter than `self.dim()`.
    pub fn transform_into(&self, z: &[f64], out: &mut [f64]) {
        assert!(
            z.len() >= self.dim && out.len() >= self.dim,
            "Input length {} / output length {} less than matrix dimension {}",
            z.len(),
            out.len(),
            self.dim
        );

        let n = self.dim;
        for i in 0..n {
            let row = &self.data[i * n..i * n + i + 1];
            out[i] = row.iter().zip(z).map(|(l, z)| l * z).sum();
        }
    }

    /// Reconstructs `L * L^T`; used to verify the factorisation.
    pub fn reconstruct(&self) -> Vec<f64> {
        let n = self.dim;
        let mut out = vec![0.0; n * n];
        for i in 0..n {
            for j in 0..n {
                out[i * n + j] = (0..=i.min(j)).map(|k| self.get(i, k) * self.get(j, k)).sum();
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_dimension_mismatch() {
        let result = CovarianceMatrix::new(vec![1.0, 0.0, 0.0], 2);
        assert_eq!(
            result,
            Err(SimError::InvalidDimensions {
                expected: 4,
                got: 3
            })
        );
    }

    #[test]
    fn test_asymmetric_rejected() {
        let result = CovarianceMatrix::new(vec![1.0, 0.5, 0.2, 1.0], 2);
        assert!(matches!(
            result,
            Err(SimError::NotPositiveSemiDefinite { .. })
        ));
    }

    #[test]
    fn test_negative_variance_rejected() {
        let result = CovarianceMatrix::new(vec![-1.0], 1);
        assert!(matches!(
            result,
            Err(SimError::NotPositiveSemiDefinite { index: 0, .. })
        ));
    }

    #[test]
    fn test_from_series_sample_covariance() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 4.0, 6.0, 8.0];
        let cov = CovarianceMatrix::from_series(&[x, y]).unwrap();

        // var(x) = 5/3, cov(x, y) = 10/3, var(y) = 20/3
        assert_relative_eq!(cov.get(0, 0), 5.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(cov.get(0, 1), 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(cov.get(1, 0), 10.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(cov.get(1, 1), 20.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_from_series_single_observation_is_zero() {
        let cov = CovarianceMatrix::from_series(&[vec![0.1], vec![0.2]]).unwrap();
        assert!(cov.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_cholesky_reconstructs_matrix() {
        let data = vec![0.04, 0.006, 0.002, 0.006, 0.09, -0.01, 0.002, -0.01, 0.0225];
        let cov = CovarianceMatrix::new(data.clone(), 3).unwrap();
        let chol = cov.cholesky().unwrap();

        for (a, b) in chol.reconstruct().iter().zip(&data) {
            assert_relative_eq!(a, b, epsilon = 1e-14);
        }
        assert_eq!(chol.get(0, 2), 0.0);
    }

    #[test]
    fn test_cholesky_singular_matrix() {
        // Perfectly correlated assets: second column is 2x the first.
        let cov = CovarianceMatrix::from_series(&[
            vec![0.01, -0.02, 0.03],
            vec![0.02, -0.04, 0.06],
        ])
        .unwrap();
        let chol = cov.cholesky().unwrap();

        for (a, b) in chol.reconstruct().iter().zip(cov.as_slice()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
        assert_eq!(chol.get(1, 1), 0.0);
    }

    #[test]
    fn test_cholesky_indefinite_rejected() {
        let cov = CovarianceMatrix::new(vec![1.0, 2.0, 2.0, 1.0], 2).unwrap();
        assert!(matches!(
            cov.cholesky(),
            Err(SimError::NotPositiveSemiDefinite { index: 1, .. })
        ));
    }

    #[test]
    fn test_to_correlation() {
        let cov = CovarianceMatrix::new(vec![0.04, 0.012, 0.012, 0.09], 2).unwrap();
        let corr = cov.to_correlation();
        assert_relative_eq!(corr.get(0, 0), 1.0);
        assert_relative_eq!(corr.get(1, 1), 1.0);
        assert_relative_eq!(corr.get(0, 1), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_to_correlation_zero_variance_asset() {
        let cov = CovarianceMatrix::new(vec![0.0, 0.0, 0.0, 0.09], 2).unwrap();
        let corr = cov.to_correlation();
        assert_eq!(corr.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    #[should_panic(expected = "less than matrix dimension")]
    fn test_transform_short_input_panics() {
        let chol = CovarianceMatrix::new(vec![1.0, 0.0, 0.0, 1.0], 2)
            .unwrap()
            .cholesky()
            .unwrap();
        chol.transform(&[1.0]);
    }
}
