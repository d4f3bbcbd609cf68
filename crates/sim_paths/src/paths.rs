//! Simulated price paths.
//!
//! Prices follow a discrete geometric Brownian motion with a one-day step:
//!
//! ```text
//! price[t] = price[t-1] · exp(drift + volatility · shock[t])
//! ```
//!
//! # Memory Layout
//!
//! Paths are stored time-major: `data[(step * n_trials + trial) * n_assets + asset]`,
//! where step 0 holds the last observed historical price. A whole time-step is
//! therefore one contiguous slice, which lets the recurrence read step `t-1`
//! and write step `t` through disjoint borrows.
//!
//! The recurrence over time is inherently sequential. Within a step every
//! (trial, asset) cell is independent, so the update may run across trials in
//! parallel.

use rayon::prelude::*;

use crate::shocks::ShockArray;

/// Multiplicative one-step return `exp(drift + volatility · shock)`.
#[inline]
pub fn daily_return(drift: f64, volatility: f64, shock: f64) -> f64 {
    (drift + volatility * shock).exp()
}

/// Dense `[step, trial, asset]` array of simulated prices.
///
/// # Examples
///
/// ```rust
/// use sim_paths::paths::PricePaths;
///
/// let paths = PricePaths::new(&[105.0, 20.0], 3, 4);
/// assert_eq!(paths.get(0, 2, 0), 105.0);
/// assert_eq!(paths.get(0, 3, 1), 20.0);
/// assert_eq!(paths.n_steps(), 3);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PricePaths {
    data: Vec<f64>,
    n_steps: usize,
    n_trials: usize,
    n_assets: usize,
}

impl PricePaths {
    /// Allocates paths for `n_steps` steps and sets step 0 of every trial
    /// to `initial`.
    ///
    /// # Panics
    ///
    /// Panics if `n_steps` is zero.
    pub fn new(initial: &[f64], n_steps: usize, n_trials: usize) -> Self {
        assert!(n_steps > 0, "price paths need at least one step");

        let n_assets = initial.len();
        let width = n_trials * n_assets;
        let mut data = vec![0.0; n_steps * width];

        for cell in data[..width].chunks_exact_mut(n_assets.max(1)) {
            cell.copy_from_slice(initial);
        }

        Self {
            data,
            n_steps,
            n_trials,
            n_assets,
        }
    }

    /// Returns the number of time-steps (including step 0).
    #[inline]
    pub fn n_steps(&self) -> usize {
        self.n_steps
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

    /// Returns one price.
    #[inline]
    pub fn get(&self, step: usize, trial: usize, asset: usize) -> f64 {
        self.data[(step * self.n_trials + trial) * self.n_assets + asset]
    }

    /// Returns every price at one time-step, trial-major.
    #[inline]
    pub fn step(&self, step: usize) -> &[f64] {
        let width = self.n_trials * self.n_assets;
        &self.data[step * width..(step + 1) * width]
    }

    /// Returns the prices at the final time-step.
    #[inline]
    pub fn terminal(&self) -> &[f64] {
        self.step(self.n_steps - 1)
    }

    /// Returns the full buffer.
    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Evolves every path forward from step 0.
    ///
    /// For each `t` in `1..n_steps`,
    /// `price[t] = price[t-1] · exp(drift + volatility · shocks[t])`, with
    /// drift and volatility broadcast per asset. The shocks of period 0 are
    /// not used: step 0 is the observed price.
    ///
    /// # Panics
    ///
    /// Panics if the shock array or the parameter slices do not match the
    /// path dimensions.
    pub fn evolve(&mut self, drift: &[f64], volatility: &[f64], shocks: &ShockArray, parallel: bool) {
        assert_eq!(drift.len(), self.n_assets, "drift length");
        assert_eq!(volatility.len(), self.n_assets, "volatility length");
        assert!(
            shocks.n_periods() >= self.n_steps
                && shocks.n_trials() == self.n_trials
                && shocks.n_assets() == self.n_assets,
            "shock array shape does not match paths"
        );

        let n_assets = self.n_assets;
        let width = self.n_trials * n_assets;
        if width == 0 {
            return;
        }

        for t in 1..self.n_steps {
            let (head, tail) = self.data.split_at_mut(t * width);
            let prev = &head[(t - 1) * width..];
            let cur = &mut tail[..width];
            let z = shocks.period(t);

            let update = |((cur, prev), z): ((&mut [f64], &[f64]), &[f64])| {
                for a in 0..n_assets {
                    cur[a] = prev[a] * daily_return(drift[a], volatility[a], z[a]);
                }
            };

            if parallel {
                cur.par_chunks_mut(n_assets)
                    .zip(prev.par_chunks(n_assets))
                    .zip(z.par_chunks(n_assets))
                    .for_each(update);
            } else {
                cur.chunks_mut(n_assets)
                    .zip(prev.chunks(n_assets))
                    .zip(z.chunks(n_assets))
                    .for_each(update);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShockModel;
    use crate::rng::SimRng;
    use crate::shocks::ShockGenerator;
    use approx::assert_relative_eq;
    use sim_core::history::PriceHistory;
    use sim_core::returns::ReturnStatistics;

    fn shocks_for(history: &PriceHistory, n_steps: usize, n_trials: usize, seed: u64) -> ShockArray {
        let stats = ReturnStatistics::from_history(history).unwrap();
        ShockGenerator::new(&stats, ShockModel::SampleCovariance)
            .unwrap()
            .generate(n_steps, n_trials, &mut SimRng::from_seed(seed))
    }

    #[test]
    fn test_initial_step() {
        let paths = PricePaths::new(&[1.0, 2.0, 3.0], 2, 5);
        for trial in 0..5 {
            assert_eq!(paths.get(0, trial, 0), 1.0);
            assert_eq!(paths.get(0, trial, 1), 2.0);
            assert_eq!(paths.get(0, trial, 2), 3.0);
        }
        assert!(paths.step(1).iter().all(|&p| p == 0.0));
    }

    #[test]
    fn test_single_step_terminal_is_initial() {
        let history = PriceHistory::single_asset("A", &[100.0, 101.0, 103.0]).unwrap();
        let shocks = shocks_for(&history, 1, 10, 1);
        let mut paths = PricePaths::new(history.last_row(), 1, 10);
        paths.evolve(&[0.01], &[0.02], &shocks, false);
        assert!(paths.terminal().iter().all(|&p| p == 103.0));
    }

    #[test]
    fn test_recurrence_matches_manual_product() {
        let history = PriceHistory::single_asset("A", &[100.0, 102.0, 101.0, 105.0]).unwrap();
        let shocks = shocks_for(&history, 4, 3, 42);
        let drift = [0.001];
        let vol = [0.02];

        let mut paths = PricePaths::new(history.last_row(), 4, 3);
        paths.evolve(&drift, &vol, &shocks, false);

        for trial in 0..3 {
            let mut expected = 105.0;
            for t in 1..4 {
                expected *= daily_return(drift[0], vol[0], shocks.get(t, trial, 0));
                assert_relative_eq!(paths.get(t, trial, 0), expected, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let history = PriceHistory::from_rows(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![10.0, 20.0], vec![10.5, 19.0], vec![10.2, 19.7]],
        )
        .unwrap();
        let shocks = shocks_for(&history, 20, 500, 5);
        let drift = [0.0005, -0.0002];
        let vol = [0.015, 0.03];

        let mut seq = PricePaths::new(history.last_row(), 20, 500);
        let mut par = seq.clone();
        seq.evolve(&drift, &vol, &shocks, false);
        par.evolve(&drift, &vol, &shocks, true);

        assert_eq!(seq, par);
    }

    #[test]
    fn test_zero_volatility_is_deterministic_drift() {
        let history = PriceHistory::single_asset("A", &[50.0, 50.0]).unwrap();
        let shocks = shocks_for(&history, 11, 4, 8);
        let mut paths = PricePaths::new(&[50.0], 11, 4);
        paths.evolve(&[0.01], &[0.0], &shocks, false);

        for &p in paths.terminal() {
            assert_relative_eq!(p, 50.0 * (0.1_f64).exp(), epsilon = 1e-10);
        }
    }

    #[test]
    #[should_panic(expected = "shock array shape")]
    fn test_shape_mismatch_panics() {
        let history = PriceHistory::single_asset("A", &[1.0, 2.0]).unwrap();
        let shocks = shocks_for(&history, 2, 3, 1);
        let mut paths = PricePaths::new(&[2.0], 2, 4);
        paths.evolve(&[0.0], &[0.1], &shocks, false);
    }
}
