//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the payroll
//! policy from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{ExtractionLabels, PayrollPolicy, PolicyFile};

/// Loads and provides access to the payroll policy.
///
/// # Directory Structure
///
/// ```text
/// config/standard/
/// ├── policy.yaml   # Overtime tiers and the Saturday premium window
/// └── labels.yaml   # Report captions, column headings, serial range
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/standard").unwrap();
/// println!("Regular hours per day: {}", loader.policy().overtime.regular_threshold_hours);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: PayrollPolicy,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing or is not valid YAML for
    /// its section.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let policy = Self::load_yaml::<PolicyFile>(&path.join("policy.yaml"))?;
        let labels = Self::load_yaml::<ExtractionLabels>(&path.join("labels.yaml"))?;

        debug!(path = %path.display(), "Loaded payroll policy");
        Ok(Self {
            policy: PayrollPolicy::new(policy, labels),
        })
    }

    /// Returns a loader holding the built-in policy.
    pub fn builtin() -> Self {
        Self {
            policy: PayrollPolicy::default(),
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded policy.
    pub fn policy(&self) -> &PayrollPolicy {
        &self.policy
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::builtin()
    }
}
