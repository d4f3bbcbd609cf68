//! Object keys of one simulation job.
//!
//! ```text
//! <job>/input/asset_prices.csv             historical prices
//! <job>/output/mc_sim_results_<idx>.csv    one trial table per worker
//! <job>/output/asset_price_distribution.txt aggregate report
//! ```

/// File name of the historical price table.
pub const INPUT_FILE: &str = "asset_prices.csv";

/// File name prefix of worker output tables.
pub const WORKER_OUTPUT_PREFIX: &str = "mc_sim_results_";

/// File name of the aggregate report.
pub const REPORT_FILE: &str = "asset_price_distribution.txt";

/// Extension of objects the aggregator collects.
pub const RESULT_EXTENSION: &str = "csv";

/// Key builder for a job's objects.
///
/// # Examples
///
/// ```rust
/// use adapter_store::JobLayout;
///
/// let layout = JobLayout::new("job-42");
/// assert_eq!(layout.input_key(), "job-42/input/asset_prices.csv");
/// assert_eq!(layout.worker_output_key(3), "job-42/output/mc_sim_results_3.csv");
/// assert_eq!(layout.report_key(), "job-42/output/asset_price_distribution.txt");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JobLayout {
    job: String,
}

impl JobLayout {
    /// Creates the layout for a job; trailing slashes are dropped.
    pub fn new(job: impl Into<String>) -> Self {
        let job = job.into();
        Self {
            job: job.trim_end_matches('/').to_string(),
        }
    }

    /// Returns the job identifier.
    pub fn job(&self) -> &str {
        &self.job
    }

    /// Key of the historical price table.
    pub fn input_key(&self) -> String {
        format!("{}/input/{}", self.job, INPUT_FILE)
    }

    /// Prefix under which all outputs are written, ending in `/`.
    pub fn output_prefix(&self) -> String {
        format!("{}/output/", self.job)
    }

    /// Key of one worker's trial table.
    pub fn worker_output_key(&self, worker: u32) -> String {
        format!("{}{}{}.csv", self.output_prefix(), WORKER_OUTPUT_PREFIX, worker)
    }

    /// Key of the aggregate report.
    pub fn report_key(&self) -> String {
        format!("{}{}", self.output_prefix(), REPORT_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_dropped() {
        let layout = JobLayout::new("nightly/");
        assert_eq!(layout.job(), "nightly");
        assert_eq!(layout.output_prefix(), "nightly/output/");
    }

    #[test]
    fn test_report_is_not_collected() {
        let layout = JobLayout::new("j");
        assert!(!layout.report_key().ends_with(RESULT_EXTENSION));
        assert!(layout.worker_output_key(0).ends_with(RESULT_EXTENSION));
    }
}
