//! Configuration module for geoproduct
//!
//! Settings come from a YAML file, then environment variables, then
//! command-line flags, each layer overriding the previous one.

mod cli;
mod settings;

pub use cli::Cli;
pub use settings::*;

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_VAR: &str = "GEOPRODUCT_SETTINGS_PATH";

/// Resolve settings for a run of the service
///
/// Runs before the tracing subscriber exists, so it does not log; the
/// chosen file is kept in [`Settings::source`] for the caller to report.
pub fn load(cli: &Cli) -> Result<Settings> {
    let mut settings = match settings_path(cli) {
        Some(path) => {
            let mut settings = Settings::from_file(&path)
                .with_context(|| format!("failed to load settings from {}", path.display()))?;
            settings.source = Some(path);
            settings
        }
        None => Settings::default(),
    };

    settings.merge_env();
    cli.apply(&mut settings);
    Ok(settings)
}

/// First settings file that exists, explicit locations first
fn settings_path(cli: &Cli) -> Option<PathBuf> {
    if let Some(ref path) = cli.config {
        return Some(path.clone());
    }
    if let Ok(path) = std::env::var(SETTINGS_PATH_VAR) {
        return Some(PathBuf::from(path));
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
        PathBuf::from("/etc/geoproduct/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("geoproduct/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}
