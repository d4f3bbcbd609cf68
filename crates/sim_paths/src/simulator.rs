//! Path simulator: historical prices in, final simulated prices out.
//!
//! # Algorithm
//!
//! 1. Log-returns and their statistics (drift, volatility, covariance)
//! 2. Random shocks, correlated across assets when there are several
//! 3. `price[0]` = last historical price for every trial
//! 4. `price[t] = price[t-1] · exp(drift + volatility · shock[t])`
//! 5. Final step rounded to two decimals

use sim_core::history::PriceHistory;
use sim_core::returns::ReturnStatistics;
use sim_core::stats::round_to;
use sim_core::SimError;
use tracing::debug;

use crate::config::SimulationConfig;
use crate::error::SimulationError;
use crate::paths::PricePaths;
use crate::result::TrialResultTable;
use crate::rng::SimRng;
use crate::shocks::ShockGenerator;

/// Decimal places kept in the trial result table.
pub const OUTPUT_DECIMALS: u32 = 2;

/// Geometric Brownian motion simulator for one worker.
///
/// # Examples
///
/// ```rust
/// use sim_core::history::PriceHistory;
/// use sim_paths::config::SimulationConfig;
/// use sim_paths::rng::SimRng;
/// use sim_paths::simulator::PathSimulator;
///
/// let history = PriceHistory::single_asset("ACME", &[100.0, 102.0, 101.0, 105.0]).unwrap();
/// let config = SimulationConfig::builder().n_periods(2).n_trials(1000).build().unwrap();
///
/// let simulator = PathSimulator::new(config);
/// let table = simulator.simulate(&history, &mut SimRng::from_entropy()).unwrap();
///
/// assert_eq!(table.n_trials(), 1000);
/// assert_eq!(table.assets(), &["ACME".to_string()]);
/// assert!(table.values().iter().all(|&p| p > 0.0));
/// ```
#[derive(Clone, Debug)]
pub struct PathSimulator {
    config: SimulationConfig,
}

impl PathSimulator {
    /// Creates a simulator for a validated configuration.
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulates full price paths.
    ///
    /// # Errors
    ///
    /// - `SimError::InsufficientHistory` for fewer than two rows
    /// - `SimError::NotPositiveSemiDefinite` if the covariance cannot be
    ///   factorised
    /// - `SimError::NumericalRange` if a final price underflows to zero or
    ///   overflows, which happens for extremely volatile histories over long
    ///   horizons
    /// - `ConfigError::PathTooLarge` if periods × trials × assets exceeds
    ///   [`MAX_PATH_CELLS`](crate::config::MAX_PATH_CELLS)
    pub fn simulate_paths(
        &self,
        history: &PriceHistory,
        rng: &mut SimRng,
    ) -> Result<PricePaths, SimulationError> {
        self.config.validate()?;

        let stats = ReturnStatistics::from_history(history)?;
        debug!(
            assets = ?stats.assets(),
            drift = ?stats.drift(),
            volatility = ?stats.volatility(),
            observations = stats.n_observations(),
            "Return statistics derived"
        );

        self.config.validate_cells(history.n_assets())?;

        let n_periods = self.config.n_periods();
        let n_trials = self.config.n_trials();

        let generator = ShockGenerator::new(&stats, self.config.shock_model())?;
        let shocks = generator.generate(n_periods, n_trials, rng);

        let mut paths = PricePaths::new(history.last_row(), n_periods, n_trials);
        paths.evolve(
            stats.drift(),
            stats.volatility(),
            &shocks,
            self.config.parallel(),
        );
        check_terminal_range(&paths, history.assets())?;

        Ok(paths)
    }

    /// Simulates and returns the rounded final prices of every trial.
    ///
    /// # Errors
    ///
    /// See [`simulate_paths`](Self::simulate_paths).
    pub fn simulate(
        &self,
        history: &PriceHistory,
        rng: &mut SimRng,
    ) -> Result<TrialResultTable, SimulationError> {
        let paths = self.simulate_paths(history, rng)?;

        let values = paths
            .terminal()
            .iter()
            .map(|&p| round_to(p, OUTPUT_DECIMALS))
            .collect();

        Ok(TrialResultTable::new(history.assets().to_vec(), values)?)
    }
}

/// Fails on the first final price that is zero, negative or not finite.
///
/// Zero and infinity are absorbing under the multiplicative recurrence, so
/// checking the last step covers the whole path.
fn check_terminal_range(paths: &PricePaths, assets: &[String]) -> Result<(), SimError> {
    let n_assets = paths.n_assets().max(1);
    match paths
        .terminal()
        .iter()
        .position(|&p| !(p.is_finite() && p > 0.0))
    {
        Some(idx) => Err(SimError::NumericalRange {
            asset: assets.get(idx % n_assets).cloned().unwrap_or_default(),
            trial: idx / n_assets,
            value: paths.terminal()[idx],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sim_core::SimError;

    fn config(n_periods: usize, n_trials: usize) -> SimulationConfig {
        SimulationConfig::builder()
            .n_periods(n_periods)
            .n_trials(n_trials)
            .build()
            .unwrap()
    }

    #[test]
    fn test_insufficient_history() {
        let history = PriceHistory::single_asset("A", &[100.0]).unwrap();
        let result = PathSimulator::new(config(5, 10)).simulate(&history, &mut SimRng::from_seed(1));
        assert_eq!(
            result,
            Err(SimulationError::Statistics(SimError::InsufficientHistory {
                rows: 1
            }))
        );
    }

    #[test]
    fn test_output_shape_multi_asset() {
        let history = PriceHistory::from_rows(
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
            vec![
                vec![10.0, 20.0, 30.0],
                vec![10.1, 19.8, 30.5],
                vec![10.3, 19.9, 30.1],
                vec![10.2, 20.4, 30.9],
            ],
        )
        .unwrap();
        let table = PathSimulator::new(config(10, 250))
            .simulate(&history, &mut SimRng::from_seed(4))
            .unwrap();

        assert_eq!(table.n_trials(), 250);
        assert_eq!(table.n_assets(), 3);
        assert_eq!(table.assets(), history.assets());
    }

    #[test]
    fn test_values_are_rounded() {
        let history = PriceHistory::single_asset("A", &[100.0, 102.0, 101.0, 105.0]).unwrap();
        let table = PathSimulator::new(config(5, 200))
            .simulate(&history, &mut SimRng::from_seed(12))
            .unwrap();

        for &v in table.values() {
            assert_eq!(round_to(v, 2), v);
        }
    }

    #[test]
    fn test_single_period_returns_last_price() {
        let history = PriceHistory::single_asset("A", &[100.0, 102.0, 101.0, 105.0]).unwrap();
        let table = PathSimulator::new(config(1, 50))
            .simulate(&history, &mut SimRng::from_seed(3))
            .unwrap();
        assert!(table.values().iter().all(|&v| v == 105.0));
    }

    #[test]
    fn test_underflowing_paths_are_rejected() {
        // Alternating x1000 moves: variance ~64 per step, drift ~ -32 per step.
        let history = PriceHistory::single_asset("A", &[1.0, 1000.0, 1.0, 1000.0, 1.0]).unwrap();
        let result = PathSimulator::new(config(300, 200)).simulate(&history, &mut SimRng::from_seed(1));

        match result {
            Err(SimulationError::Statistics(SimError::NumericalRange { asset, value, .. })) => {
                assert_eq!(asset, "A");
                assert!(!(value.is_finite() && value > 0.0));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_oversized_run_is_a_config_error() {
        let history = PriceHistory::from_rows(
            vec!["A".to_string(), "B".to_string()],
            vec![vec![10.0, 20.0], vec![10.5, 19.5]],
        )
        .unwrap();
        let result = PathSimulator::new(config(20_000, 10_000)).simulate(&history, &mut SimRng::from_seed(1));
        assert!(matches!(
            result,
            Err(SimulationError::Config(crate::error::ConfigError::PathTooLarge { .. }))
        ));
    }

    #[test]
    fn test_seeded_runs_match() {
        let history = PriceHistory::single_asset("A", &[100.0, 102.0, 101.0, 105.0]).unwrap();
        let sim = PathSimulator::new(config(3, 100));
        let a = sim.simulate(&history, &mut SimRng::from_seed(77)).unwrap();
        let b = sim.simulate(&history, &mut SimRng::from_seed(77)).unwrap();
        assert_eq!(a, b);
    }
}
