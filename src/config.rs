//! # Batch Configuration
//!
//! Scheduling settings loaded through the `config` crate. Environment
//! variables use the `TASKER_BATCH_` prefix (`TASKER_BATCH_MAX_CONCURRENCY`,
//! `TASKER_BATCH_GLIDE`) and override values from an optional config file.

use crate::constants::{defaults, env};
use crate::error::{Result, TaskerError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Scheduling settings shared by a batch and the group it runs on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum units running at once; `None` means unbounded
    pub max_concurrency: Option<usize>,
    /// `true` records failures without cancelling sibling tasks
    pub glide: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            glide: defaults::GLIDE,
        }
    }
}

impl BatchConfig {
    /// Read `TASKER_BATCH_MAX_CONCURRENCY` and `TASKER_BATCH_GLIDE`
    pub fn from_env() -> Result<Self> {
        Self::from_environment(Self::environment())
    }

    /// Layer a config file (TOML, YAML or JSON by extension) under the
    /// environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: Self = config::Config::builder()
            .add_source(config::File::from(path).required(true))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Build from an explicit environment source
    pub fn from_environment(environment: config::Environment) -> Result<Self> {
        let config: Self = config::Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(env::BATCH_PREFIX).try_parsing(true)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_concurrency == Some(0) {
            return Err(TaskerError::ConfigurationError(
                "max_concurrency must be at least 1 when set".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env_source(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        BatchConfig::environment().source(Some(source))
    }

    #[test]
    fn test_defaults() {
        let config = BatchConfig::default();
        assert_eq!(config.max_concurrency, None);
        assert!(!config.glide);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_environment_overrides() {
        let config = BatchConfig::from_environment(env_source(&[
            ("TASKER_BATCH_MAX_CONCURRENCY", "4"),
            ("TASKER_BATCH_GLIDE", "true"),
        ]))
        .unwrap();
        assert_eq!(config.max_concurrency, Some(4));
        assert!(config.glide);
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = BatchConfig::from_environment(env_source(&[])).unwrap();
        assert_eq!(config, BatchConfig::default());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let err = BatchConfig::from_environment(env_source(&[(
            "TASKER_BATCH_MAX_CONCURRENCY",
            "0",
        )]))
        .unwrap_err();
        assert!(matches!(err, TaskerError::ConfigurationError(_)));
    }

    #[test]
    fn test_invalid_value_is_configuration_error() {
        let err = BatchConfig::from_environment(env_source(&[(
            "TASKER_BATCH_MAX_CONCURRENCY",
            "lots",
        )]))
        .unwrap_err();
        assert!(matches!(err, TaskerError::ConfigurationError(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "max_concurrency = 3\nglide = true").unwrap();

        let config = BatchConfig::load(file.path()).unwrap();
        assert_eq!(config.max_concurrency, Some(3));
        assert!(config.glide);
    }
}
