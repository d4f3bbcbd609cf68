//! Check command implementation
//!
//! Prints the effective settings and what each command would find.

use adapter_store::JobStorage;
use infra_config::Settings;
use tracing::info;

use super::open_storage;
use crate::Result;

/// Run the check command
pub fn run(settings: &Settings) -> Result<()> {
    let storage = settings.job().ok().map(|job| open_storage(&job));
    print!("{}", execute(settings, storage.as_ref())?);
    Ok(())
}

fn status<T, E: std::fmt::Display>(result: &std::result::Result<T, E>) -> String {
    match result {
        Ok(_) => "ok".to_string(),
        Err(e) => e.to_string(),
    }
}

/// Renders the check output.
pub fn execute(settings: &Settings, storage: Option<&JobStorage>) -> Result<String> {
    let mut out = String::from("# Effective settings\n");
    out.push_str(&toml::to_string_pretty(settings)?);

    out.push_str("\n# Commands\n");
    out.push_str(&format!("simulate: {}\n", status(&settings.simulate())));
    out.push_str(&format!("collect: {}\n", status(&settings.collect())));

    out.push_str("\n# Storage\n");
    match storage {
        Some(storage) => {
            out.push_str(&format!("backend: {}\n", storage.store().backend()));
            out.push_str(&format!(
                "input {}: {}\n",
                storage.layout().input_key(),
                status(&storage.load_price_history())
            ));
            match storage.list_trial_tables() {
                Ok(keys) => out.push_str(&format!("worker tables: {}\n", keys.len())),
                Err(e) => out.push_str(&format!("worker tables: {}\n", e)),
            }
        }
        None => out.push_str("unavailable: bucket and job are required\n"),
    }

    info!("Configuration check complete");
    Ok(out)
}
