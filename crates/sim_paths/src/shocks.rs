//! Random shock generation.
//!
//! Shocks are stored in a dense `[period, trial, asset]` array:
//! `data[(period * n_trials + trial) * n_assets + asset]`.
//!
//! - One asset: independent standard normals.
//! - Several assets: multivariate normal with zero mean. The covariance is
//!   either the sample covariance of historical log-returns or its
//!   correlation matrix (see [`ShockModel`]). Draws are `L · z` with `L` the
//!   Cholesky factor and `z` independent standard normals.

use sim_core::covariance::CholeskyFactor;
use sim_core::returns::ReturnStatistics;
use sim_core::SimError;
use tracing::debug;

use crate::config::ShockModel;
use crate::rng::SimRng;

/// Dense `[period, trial, asset]` array of random shocks.
#[derive(Clone, Debug, PartialEq)]
pub struct ShockArray {
    data: Vec<f64>,
    n_periods: usize,
    n_trials: usize,
    n_assets: usize,
}

impl ShockArray {
    /// Returns the number of periods.
    #[inline]
    pub fn n_periods(&self) -> usize {
        self.n_periods
    }

    /// Returns the number of trials.
    #[inline]
    pub fn n_trials(&self) -> usize {
        self.n_trials
    }

    /// Returns the number of assets.
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Returns the shock for one (period, trial, asset) cell.
    #[inline]
    pub fn get(&self, period: usize, trial: usize, asset: usize) -> f64 {
        self.data[(period * self.n_trials + trial) * self.n_assets + asset]
    }

    /// Returns all shocks of one period, trial-major.
    #[inline]
    pub fn period(&self, period: usize) -> &[f64] {
        let width = self.n_trials * self.n_assets;
        &self.data[period * width..(period + 1) * width]
    }

    /// Returns the raw buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

/// How draws are shaped into shocks.
#[derive(Clone, Debug)]
enum Sampler {
    /// Independent standard normals (single asset).
    Independent,
    /// Correlated normals `L · z`.
    Correlated(CholeskyFactor),
}

/// Draws shock arrays for a fixed set of return statistics.
///
/// # Examples
///
/// ```rust
/// use sim_core::history::PriceHistory;
/// use sim_core::returns::ReturnStatistics;
/// use sim_paths::config::ShockModel;
/// use sim_paths::rng::SimRng;
/// use sim_paths::shocks::ShockGenerator;
///
/// let history = PriceHistory::single_asset("A", &[100.0, 101.0, 99.0]).unwrap();
/// let stats = ReturnStatistics::from_history(&history).unwrap();
/// let generator = ShockGenerator::new(&stats, ShockModel::default()).unwrap();
///
/// let mut rng = SimRng::from_seed(1);
/// let shocks = generator.generate(5, 100, &mut rng);
/// assert_eq!(shocks.as_slice().len(), 5 * 100);
/// ```
#[derive(Clone, Debug)]
pub struct ShockGenerator {
    sampler: Sampler,
    n_assets: usize,
}

impl ShockGenerator {
    /// Prepares a generator, factorising the covariance for multi-asset
    /// statistics.
    ///
    /// # Errors
    ///
    /// `SimError::NotPositiveSemiDefinite` if the covariance cannot be
    /// factorised.
    pub fn new(stats: &ReturnStatistics, model: ShockModel) -> Result<Self, SimError> {
        let n_assets = stats.n_assets();

        let sampler = if n_assets == 1 {
            Sampler::Independent
        } else {
            let matrix = match model {
                ShockModel::SampleCovariance => stats.covariance().clone(),
                ShockModel::Correlation => stats.covariance().to_correlation(),
            };
            Sampler::Correlated(matrix.cholesky()?)
        };

        debug!(
            n_assets,
            shock_model = %model,
            correlated = matches!(sampler, Sampler::Correlated(_)),
            "Shock generator prepared"
        );

        Ok(Self { sampler, n_assets })
    }

    /// Returns the number of assets shocks are drawn for.
    #[inline]
    pub fn n_assets(&self) -> usize {
        self.n_assets
    }

    /// Draws a full `[n_periods, n_trials, n_assets]` shock array.
    pub fn generate(&self, n_periods: usize, n_trials: usize, rng: &mut SimRng) -> ShockArray {
        let n_assets = self.n_assets;
        let mut data = vec![0.0; n_periods * n_trials * n_assets];

        match &self.sampler {
            Sampler::Independent => rng.fill_normal(&mut data),
            Sampler::Correlated(chol) => {
                let mut z = vec![0.0; n_assets];
                for cell in data.chunks_exact_mut(n_assets) {
                    rng.fill_normal(&mut z);
                    chol.transform_into(&z, cell);
                }
            }
        }

        ShockArray {
            data,
            n_periods,
            n_trials,
            n_assets,
        }
    }
}
