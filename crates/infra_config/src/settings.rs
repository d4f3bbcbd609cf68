//! Layered job settings.
//!
//! Sources, lowest to highest precedence:
//! 1. built-in defaults
//! 2. optional TOML file
//! 3. batch-job variables (`N_PERIODS`, `N_SIMS`, `AWS_BUCKET`, `JOB_NAME`,
//!    `AWS_BATCH_JOB_ARRAY_INDEX`, `EXPECTED_WORKERS`)
//! 4. `MCSIM_`-prefixed variables named after the setting keys
//! 5. CLI overrides
//!
//! Loading never fails for absent required values; each command checks
//! what it needs through [`Settings::simulate`] or [`Settings::collect`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sim_paths::{ShockModel, SimulationConfig};

use crate::error::ConfigError;
use crate::level::{deserialize_log_level, LogLevel};

/// Default directory backing the local object store.
pub const DEFAULT_STORE_ROOT: &str = "./store";

/// Prefix of the namespaced environment variables.
pub const ENV_PREFIX: &str = "MCSIM";

/// One settings key with its batch-job variable and CLI flag.
struct KeySpec {
    key: &'static str,
    legacy: &'static str,
    upper: &'static str,
    flag: &'static str,
}

const N_PERIODS: KeySpec = KeySpec {
    key: "n_periods",
    legacy: "N_PERIODS",
    upper: "N_PERIODS",
    flag: "n-periods",
};
const N_TRIALS: KeySpec = KeySpec {
    key: "n_trials",
    legacy: "N_SIMS",
    upper: "N_TRIALS",
    flag: "n-trials",
};
const BUCKET: KeySpec = KeySpec {
    key: "bucket",
    legacy: "AWS_BUCKET",
    upper: "BUCKET",
    flag: "bucket",
};
const JOB: KeySpec = KeySpec {
    key: "job",
    legacy: "JOB_NAME",
    upper: "JOB",
    flag: "job",
};
const WORKER_INDEX: KeySpec = KeySpec {
    key: "worker_index",
    legacy: "AWS_BATCH_JOB_ARRAY_INDEX",
    upper: "WORKER_INDEX",
    flag: "worker-index",
};
const EXPECTED_WORKERS: KeySpec = KeySpec {
    key: "expected_workers",
    legacy: "EXPECTED_WORKERS",
    upper: "EXPECTED_WORKERS",
    flag: "expected-workers",
};

const LEGACY_KEYS: [&KeySpec; 6] = [
    &N_PERIODS,
    &N_TRIALS,
    &BUCKET,
    &JOB,
    &WORKER_INDEX,
    &EXPECTED_WORKERS,
];

impl KeySpec {
    fn missing(&self) -> ConfigError {
        ConfigError::Missing {
            key: self.key,
            env: self.legacy,
            upper: self.upper,
            flag: self.flag,
        }
    }
}

/// CLI overrides; `None` leaves lower layers untouched.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Number of simulated periods
    pub n_periods: Option<usize>,
    /// Trials per worker
    pub n_trials: Option<usize>,
    /// Bucket name
    pub bucket: Option<String>,
    /// Job identifier
    pub job: Option<String>,
    /// Worker index
    pub worker_index: Option<u32>,
    /// Number of worker tables the aggregator must find
    pub expected_workers: Option<usize>,
    /// Local store root
    pub store_root: Option<PathBuf>,
    /// Log level
    pub log_level: Option<LogLevel>,
    /// Trial-parallel recurrence
    pub parallel: Option<bool>,
    /// Shock model
    pub shock_model: Option<ShockModel>,
}

/// Where settings are read from.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    /// Optional TOML file; must exist when given
    pub file: Option<PathBuf>,
    /// Environment snapshot
    pub env: HashMap<String, String>,
    /// CLI overrides
    pub overrides: CliOverrides,
}

impl ConfigSources {
    /// Sources backed by the process environment.
    pub fn from_process_env(file: Option<PathBuf>, overrides: CliOverrides) -> Self {
        Self {
            file,
            env: std::env::vars().collect(),
            overrides,
        }
    }

    /// Batch-job variables renamed to the upper-case setting keys.
    fn legacy_env(&self) -> config::Map<String, String> {
        LEGACY_KEYS
            .iter()
            .filter_map(|spec| {
                self.env
                    .get(spec.legacy)
                    .map(|value| (spec.upper.to_string(), value.clone()))
            })
            .collect()
    }

    /// `MCSIM_`-prefixed variables, untouched.
    fn prefixed_env(&self) -> config::Map<String, String> {
        let prefix = format!("{}_", ENV_PREFIX);
        self.env
            .iter()
            .filter(|(k, _)| k.starts_with(&prefix))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

fn serialize_shock_model<S>(model: &ShockModel, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_str(model)
}

fn deserialize_shock_model<'de, D>(deserializer: D) -> Result<ShockModel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    ShockModel::from_str(&s).map_err(serde::de::Error::custom)
}

/// Merged settings before per-command validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Number of simulated periods (including the starting step)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_periods: Option<usize>,
    /// Trials per worker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_trials: Option<usize>,
    /// Bucket name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    /// Job identifier
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    /// Worker index
    #[serde(skip_serializing_if = "Option::is_none")]
    pub worker_index: Option<u32>,
    /// Number of worker tables the aggregator must find
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_workers: Option<usize>,
    /// Directory backing the local object store
    pub store_root: PathBuf,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Trial-parallel recurrence
    pub parallel: bool,
    /// Shock model
    #[serde(
        serialize_with = "serialize_shock_model",
        deserialize_with = "deserialize_shock_model"
    )]
    pub shock_model: ShockModel,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            n_periods: None,
            n_trials: None,
            bucket: None,
            job: None,
            worker_index: None,
            expected_workers: None,
            store_root: PathBuf::from(DEFAULT_STORE_ROOT),
            log_level: LogLevel::Info,
            parallel: false,
            shock_model: ShockModel::SampleCovariance,
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone, PartialEq)]
pub struct JobSettings {
    /// Bucket name
    pub bucket: String,
    /// Job identifier
    pub job: String,
    /// Directory backing the local object store
    pub store_root: PathBuf,
}

/// Validated settings of one simulation worker.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulateSettings {
    /// Storage location
    pub job: JobSettings,
    /// Worker index
    pub worker_index: u32,
    /// Validated simulation parameters
    pub simulation: SimulationConfig,
}

/// Validated settings of the aggregator.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectSettings {
    /// Storage location
    pub job: JobSettings,
    /// Number of worker tables required, if enforced
    pub expected_workers: Option<usize>,
}

fn required<T: Clone>(value: &Option<T>, spec: &KeySpec) -> Result<T, ConfigError> {
    value.clone().ok_or_else(|| spec.missing())
}

fn non_empty(value: String, spec: &KeySpec) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::invalid(spec.key, "must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn positive(value: usize, spec: &KeySpec) -> Result<usize, ConfigError> {
    if value == 0 {
        return Err(ConfigError::invalid(spec.key, "must be a positive integer"));
    }
    Ok(value)
}

impl Settings {
    /// Merges every source.
    ///
    /// # Errors
    ///
    /// `ConfigError::Source` if the file cannot be read or a value has the
    /// wrong type.
    pub fn load(sources: &ConfigSources) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = &sources.file {
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder
            .add_source(
                Environment::default()
                    .source(Some(sources.legacy_env()))
                    .ignore_empty(true),
            )
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .source(Some(sources.prefixed_env()))
                    .ignore_empty(true),
            );

        let o = &sources.overrides;
        builder = builder
            .set_override_option(N_PERIODS.key, o.n_periods.map(|v| v as u64))?
            .set_override_option(N_TRIALS.key, o.n_trials.map(|v| v as u64))?
            .set_override_option(BUCKET.key, o.bucket.clone())?
            .set_override_option(JOB.key, o.job.clone())?
            .set_override_option(WORKER_INDEX.key, o.worker_index.map(u64::from))?
            .set_override_option(EXPECTED_WORKERS.key, o.expected_workers.map(|v| v as u64))?
            .set_override_option(
                "store_root",
                o.store_root.as_ref().map(|p| p.to_string_lossy().into_owned()),
            )?
            .set_override_option("log_level", o.log_level.map(|l| l.to_string()))?
            .set_override_option("parallel", o.parallel)?
            .set_override_option("shock_model", o.shock_model.map(|m| m.to_string()))?;

        Ok(builder.build()?.try_deserialize()?)
    }

    /// Loads settings from a TOML file alone.
    ///
    /// # Errors
    ///
    /// See [`Settings::load`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::load(&ConfigSources {
            file: Some(path.to_path_buf()),
            ..ConfigSources::default()
        })
    }

    /// Validates the storage location.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` or `ConfigError::Invalid` for the bucket or
    /// job identifier.
    pub fn job(&self) -> Result<JobSettings, ConfigError> {
        Ok(JobSettings {
            bucket: non_empty(required(&self.bucket, &BUCKET)?, &BUCKET)?,
            job: non_empty(required(&self.job, &JOB)?, &JOB)?,
            store_root: self.store_root.clone(),
        })
    }

    /// Validates the settings a simulation worker needs.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` for absent values, `ConfigError::Invalid` for
    /// zero counts or empty names, `ConfigError::Simulation` for parameters
    /// the simulator rejects.
    pub fn simulate(&self) -> Result<SimulateSettings, ConfigError> {
        let n_periods = positive(required(&self.n_periods, &N_PERIODS)?, &N_PERIODS)?;
        let n_trials = positive(required(&self.n_trials, &N_TRIALS)?, &N_TRIALS)?;
        let job = self.job()?;
        let worker_index = required(&self.worker_index, &WORKER_INDEX)?;

        let simulation = SimulationConfig::builder()
            .n_periods(n_periods)
            .n_trials(n_trials)
            .shock_model(self.shock_model)
            .parallel(self.parallel)
            .build()?;

        Ok(SimulateSettings {
            job,
            worker_index,
            simulation,
        })
    }

    /// Validates the settings the aggregator needs.
    ///
    /// # Errors
    ///
    /// `ConfigError::Missing` or `ConfigError::Invalid` for the storage
    /// location, `ConfigError::Invalid` for a zero worker count.
    pub fn collect(&self) -> Result<CollectSettings, ConfigError> {
        let expected_workers = self
            .expected_workers
            .map(|n| positive(n, &EXPECTED_WORKERS))
            .transpose()?;
        Ok(CollectSettings {
            job: self.job()?,
            expected_workers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load_env(pairs: &[(&str, &str)]) -> Settings {
        Settings::load(&ConfigSources {
            env: env(pairs),
            ..ConfigSources::default()
        })
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let settings = load_env(&[]);
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.store_root, PathBuf::from("./store"));
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.shock_model, ShockModel::SampleCovariance);
    }

    #[test]
    fn test_batch_job_variables() {
        let settings = load_env(&[
            ("N_PERIODS", "30"),
            ("N_SIMS", "1000"),
            ("AWS_BUCKET", "results"),
            ("JOB_NAME", "nightly"),
            ("AWS_BATCH_JOB_ARRAY_INDEX", "4"),
            ("PATH", "/usr/bin"),
        ]);
        let sim = settings.simulate().unwrap();
        assert_eq!(sim.simulation.n_periods(), 30);
        assert_eq!(sim.simulation.n_trials(), 1000);
        assert_eq!(sim.worker_index, 4);
        assert_eq!(sim.job.bucket, "results");
        assert_eq!(sim.job.job, "nightly");
    }

    #[test]
    fn test_prefixed_variables_win_over_batch_variables() {
        let settings = load_env(&[
            ("N_SIMS", "1000"),
            ("MCSIM_N_TRIALS", "50"),
            ("MCSIM_SHOCK_MODEL", "correlation"),
            ("MCSIM_PARALLEL", "true"),
            ("MCSIM_LOG_LEVEL", "debug"),
        ]);
        assert_eq!(settings.n_trials, Some(50));
        assert_eq!(settings.shock_model, ShockModel::Correlation);
        assert!(settings.parallel);
        assert_eq!(settings.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_cli_overrides_win() {
        let settings = Settings::load(&ConfigSources {
            env: env(&[("N_PERIODS", "30"), ("MCSIM_N_PERIODS", "40")]),
            overrides: CliOverrides {
                n_periods: Some(50),
                store_root: Some(PathBuf::from("/tmp/store")),
                ..CliOverrides::default()
            },
            ..ConfigSources::default()
        })
        .unwrap();
        assert_eq!(settings.n_periods, Some(50));
        assert_eq!(settings.store_root, PathBuf::from("/tmp/store"));
    }

    #[test]
    fn test_empty_variables_are_ignored() {
        let settings = load_env(&[("N_PERIODS", ""), ("MCSIM_JOB", "")]);
        assert_eq!(settings.n_periods, None);
        assert_eq!(settings.job, None);
    }

    #[test]
    fn test_missing_simulation_settings() {
        let settings = load_env(&[("N_SIMS", "10"), ("AWS_BUCKET", "b"), ("JOB_NAME", "j")]);
        assert!(matches!(
            settings.simulate(),
            Err(ConfigError::Missing { key: "n_periods", .. })
        ));

        let settings = load_env(&[
            ("N_PERIODS", "10"),
            ("N_SIMS", "10"),
            ("AWS_BUCKET", "b"),
            ("JOB_NAME", "j"),
        ]);
        assert!(matches!(
            settings.simulate(),
            Err(ConfigError::Missing { key: "worker_index", env: "AWS_BATCH_JOB_ARRAY_INDEX", .. })
        ));
    }

    #[test]
    fn test_invalid_values() {
        let base = [
            ("N_SIMS", "10"),
            ("AWS_BUCKET", "b"),
            ("JOB_NAME", "j"),
            ("AWS_BATCH_JOB_ARRAY_INDEX", "0"),
        ];

        let mut zero = base.to_vec();
        zero.push(("N_PERIODS", "0"));
        assert!(matches!(
            load_env(&zero).simulate(),
            Err(ConfigError::Invalid { key: "n_periods", .. })
        ));

        let mut blank = base.to_vec();
        blank.push(("N_PERIODS", "5"));
        blank.push(("MCSIM_BUCKET", "   "));
        assert!(matches!(
            load_env(&blank).simulate(),
            Err(ConfigError::Invalid { key: "bucket", .. })
        ));

        let result = Settings::load(&ConfigSources {
            env: env(&[("N_PERIODS", "many")]),
            ..ConfigSources::default()
        });
        assert!(matches!(result, Err(ConfigError::Source(_))));
    }

    #[test]
    fn test_collect_settings() {
        let settings = load_env(&[("AWS_BUCKET", "b"), ("JOB_NAME", "j/")]);
        let collect = settings.collect().unwrap();
        assert_eq!(collect.expected_workers, None);
        assert_eq!(collect.job.job, "j/");

        let settings = load_env(&[("AWS_BUCKET", "b"), ("JOB_NAME", "j"), ("EXPECTED_WORKERS", "0")]);
        assert!(matches!(
            settings.collect(),
            Err(ConfigError::Invalid { key: "expected_workers", .. })
        ));

        let settings = load_env(&[("AWS_BUCKET", "b"), ("EXPECTED_WORKERS", "8")]);
        assert!(matches!(
            settings.collect(),
            Err(ConfigError::Missing { key: "job", .. })
        ));
    }

    #[test]
    fn test_unknown_shock_model_is_rejected() {
        let result = Settings::load(&ConfigSources {
            env: env(&[("MCSIM_SHOCK_MODEL", "copula")]),
            ..ConfigSources::default()
        });
        assert!(matches!(result, Err(ConfigError::Source(_))));
    }
}
