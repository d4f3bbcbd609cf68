//! Property tests for return statistics on arbitrary positive price tables.

use proptest::prelude::*;
use sim_core::history::PriceHistory;
use sim_core::returns::ReturnStatistics;

fn price_table() -> impl Strategy<Value = (usize, Vec<Vec<f64>>)> {
    (1usize..4, 2usize..40).prop_flat_map(|(n_assets, n_rows)| {
        let row = prop::collection::vec(0.01f64..10_000.0, n_assets);
        (Just(n_assets), prop::collection::vec(row, n_rows))
    })
}

proptest! {
    #[test]
    fn drift_and_volatility_are_finite((n_assets, rows) in price_table()) {
        let assets = (0..n_assets).map(|i| format!("ASSET{}", i)).collect();
        let history = PriceHistory::from_rows(assets, rows).unwrap();
        let stats = ReturnStatistics::from_history(&history).unwrap();

        prop_assert_eq!(stats.n_assets(), n_assets);
        for i in 0..n_assets {
            prop_assert!(stats.drift()[i].is_finite());
            prop_assert!(stats.volatility()[i].is_finite());
            prop_assert!(stats.volatility()[i] >= 0.0);
        }
        prop_assert!(stats.covariance().as_slice().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn covariance_is_factorisable((n_assets, rows) in price_table()) {
        let assets = (0..n_assets).map(|i| format!("ASSET{}", i)).collect();
        let history = PriceHistory::from_rows(assets, rows).unwrap();
        let stats = ReturnStatistics::from_history(&history).unwrap();

        prop_assert!(stats.covariance().cholesky().is_ok());
    }
}
