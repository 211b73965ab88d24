//! Optional `trellis.toml` configuration.
//!
//! ```toml
//! [plan]
//! repeat = 2
//! output = "json"
//! ```
//!
//! Command-line flags take precedence over every value here.

use std::path::Path;

use serde::Deserialize;

use crate::OutputFormat;

/// Looked up in the working directory when `--config` is not given.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "trellis.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TrellisConfig {
    #[serde(default)]
    pub plan: PlanSettings,
}

/// `[plan]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct PlanSettings {
    /// Loop repetition count used by `plan` and `check`.
    pub repeat: Option<usize>,
    pub output: Option<OutputFormat>,
}

/// Read and parse a config file from `path`.
pub(crate) fn read_config(path: &Path) -> Result<TrellisConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;

    toml::from_str(&content).map_err(|e| format!("could not parse '{}': {}", path.display(), e))
}

/// Load the explicit config file, else `./trellis.toml` if present, else defaults.
pub(crate) fn load_config(explicit: Option<&Path>) -> Result<TrellisConfig, String> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let default = Path::new(DEFAULT_CONFIG_FILE);
    if default.is_file() {
        tracing::debug!(path = %default.display(), "using configuration file");
        return read_config(default);
    }
    Ok(TrellisConfig::default())
}
