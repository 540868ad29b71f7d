//! Orchestrator configuration (`testrun.toml`).

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

/// Orchestrator configuration (TOML).
///
/// Intended to be edited by humans; missing fields and a missing file fall
/// back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    pub main: MainConfig,
    pub suite: SuiteConfig,
}

/// Selection defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MainConfig {
    /// Stored run-list used as the selection base. Absent is a valid state:
    /// the base then falls back to every top-level catalog entry.
    pub run_tests: Option<Vec<String>>,
}

/// Per-suite execution limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SuiteConfig {
    /// Wall-clock budget per suite in seconds.
    pub timeout_secs: u64,
    /// Truncate captured suite stdout/stderr beyond this many bytes.
    pub output_limit_bytes: usize,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 300,
            output_limit_bytes: 100_000,
        }
    }
}

impl RunConfig {
    pub fn validate(&self) -> Result<()> {
        if self.suite.timeout_secs == 0 {
            return Err(anyhow!("suite.timeout_secs must be > 0"));
        }
        if self.suite.output_limit_bytes == 0 {
            return Err(anyhow!("suite.output_limit_bytes must be > 0"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `RunConfig::default()`.
pub fn load_config(path: &Path) -> Result<RunConfig> {
    if !path.exists() {
        let config = RunConfig::default();
        config.validate()?;
        return Ok(config);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let config: RunConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    config.validate()?;
    Ok(config)
}
