//! Configuration for scoped timers and the demonstration binary
//!
//! Values come from built-in defaults, an optional TOML file and
//! `PERFTOOLS_*` environment variables, in increasing order of precedence.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ENV_VERBOSE: &str = "PERFTOOLS_VERBOSE";
pub const ENV_DEMO_LABEL: &str = "PERFTOOLS_DEMO_LABEL";
pub const ENV_DEMO_SECONDS: &str = "PERFTOOLS_DEMO_SECONDS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("sleep duration must be finite, non-negative and fit in a Duration, got {0}")]
    InvalidSleep(f64),

    #[error("demo label must not be empty")]
    EmptyLabel,

    #[error("failed to access config file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[cfg(feature = "toml-config")]
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),

    #[cfg(feature = "toml-config")]
    #[error("failed to serialize config")]
    Serialize(#[from] toml::ser::Error),

    #[error("TOML support not enabled. Enable the 'toml-config' feature.")]
    TomlUnsupported,
}

/// Timer behaviour shared by every measurement session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// Print start/end markers and the cost summary
    pub verbose: bool,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self { verbose: true }
    }
}

impl TimerConfig {
    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        config.apply_lookup(&lookup);
        config
    }

    fn apply_lookup(&mut self, lookup: &impl Fn(&str) -> Option<String>) {
        if let Some(verbose) = lookup(ENV_VERBOSE).as_deref().and_then(parse_flag) {
            self.verbose = verbose;
        }
    }
}

/// Settings for the standalone demonstration run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Label of the demo timer
    pub label: String,

    /// How long the measured block pauses, in seconds
    pub sleep_secs: f64,

    /// Timer settings
    pub timer: TimerConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            label: "sleep".to_string(),
            sleep_secs: 2.0,
            timer: TimerConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().merge_with_lookup(lookup)
    }

    /// Load configuration from TOML file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not valid TOML for this
    /// struct.
    #[cfg(feature = "toml-config")]
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DemoConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from TOML file (stub when toml feature is disabled)
    ///
    /// # Errors
    ///
    /// Always returns [`ConfigError::TomlUnsupported`].
    #[cfg(not(feature = "toml-config"))]
    pub fn from_file(_path: &Path) -> Result<Self, ConfigError> {
        Err(ConfigError::TomlUnsupported)
    }

    /// Save configuration to TOML file
    ///
    /// # Errors
    ///
    /// Fails when serialization or the write fails.
    #[cfg(feature = "toml-config")]
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save configuration to TOML file (stub when toml feature is disabled)
    ///
    /// # Errors
    ///
    /// Always returns [`ConfigError::TomlUnsupported`].
    #[cfg(not(feature = "toml-config"))]
    pub fn save_to_file(&self, _path: &Path) -> Result<(), ConfigError> {
        Err(ConfigError::TomlUnsupported)
    }

    /// Merge with environment variables (env vars take precedence)
    pub fn merge_with_env(self) -> Self {
        self.merge_with_lookup(env_lookup)
    }

    pub fn merge_with_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(label) = lookup(ENV_DEMO_LABEL) {
            self.label = label;
        }

        if let Some(secs) = lookup(ENV_DEMO_SECONDS).and_then(|s| s.trim().parse::<f64>().ok()) {
            self.sleep_secs = secs;
        }

        self.timer.apply_lookup(&lookup);
        self
    }

    /// Reject settings the demo cannot run with
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLabel`] for an empty label and
    /// [`ConfigError::InvalidSleep`] when the sleep is negative, not finite,
    /// or too large for a [`Duration`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label.is_empty() {
            return Err(ConfigError::EmptyLabel);
        }
        self.sleep_duration()?;
        Ok(())
    }

    /// The sleep as a [`Duration`]
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSleep`] when `sleep_secs` is negative,
    /// not finite, or exceeds [`Duration::MAX`].
    pub fn sleep_duration(&self) -> Result<Duration, ConfigError> {
        Duration::try_from_secs_f64(self.sleep_secs)
            .map_err(|_| ConfigError::InvalidSleep(self.sleep_secs))
    }
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Parse a boolean switch as commonly written in environment variables
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DemoConfig::default();
        assert_eq!(config.label, "sleep");
        assert_eq!(config.sleep_secs, 2.0);
        assert!(config.timer.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("1"), Some(true));
        assert_eq!(parse_flag(" On "), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("no"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_env_overrides() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            (ENV_DEMO_LABEL, "fetch"),
            (ENV_DEMO_SECONDS, "0.25"),
            (ENV_VERBOSE, "off"),
        ]));
        assert_eq!(config.label, "fetch");
        assert_eq!(config.sleep_secs, 0.25);
        assert!(!config.timer.verbose);
    }

    #[test]
    fn test_unparseable_env_values_are_ignored() {
        let config = DemoConfig::from_lookup(lookup_from(&[
            (ENV_DEMO_SECONDS, "soon"),
            (ENV_VERBOSE, "loud"),
        ]));
        assert_eq!(config, DemoConfig::default());
    }

    #[test]
    fn test_timer_config_from_lookup() {
        let config = TimerConfig::from_lookup(lookup_from(&[(ENV_VERBOSE, "0")]));
        assert!(!config.verbose);
        assert!(TimerConfig::from_lookup(|_| None).verbose);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let base = DemoConfig {
            label: "build".to_string(),
            sleep_secs: 0.5,
            timer: TimerConfig { verbose: false },
        };
        let merged = base
            .clone()
            .merge_with_lookup(lookup_from(&[(ENV_DEMO_SECONDS, "1.5")]));
        assert_eq!(merged.label, "build");
        assert_eq!(merged.sleep_secs, 1.5);
        assert!(!merged.timer.verbose);
    }

    #[test]
    fn test_validate_rejects_bad_sleep() {
        let mut config = DemoConfig::default();
        config.sleep_secs = -1.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSleep(_))));

        config.sleep_secs = f64::NAN;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSleep(_))));

        config.sleep_secs = f64::INFINITY;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSleep(_))));

        config.sleep_secs = 0.0;
        config.label.clear();
        assert!(matches!(config.validate(), Err(ConfigError::EmptyLabel)));
    }

    #[test]
    fn test_validate_rejects_sleep_beyond_duration_range() {
        let config = DemoConfig {
            sleep_secs: 1e20,
            ..DemoConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidSleep(secs)) if secs == 1e20));
        assert!(config.sleep_duration().is_err());
    }

    #[test]
    fn test_sleep_duration() {
        let config = DemoConfig {
            sleep_secs: 0.25,
            ..DemoConfig::default()
        };
        assert_eq!(config.sleep_duration().unwrap(), Duration::from_millis(250));
    }

    #[cfg(not(feature = "toml-config"))]
    #[test]
    fn test_file_support_disabled() {
        let result = DemoConfig::from_file(Path::new("perftools.toml"));
        assert!(matches!(result, Err(ConfigError::TomlUnsupported)));
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("perftools.toml");

        let config = DemoConfig {
            label: "compile".to_string(),
            sleep_secs: 0.1,
            timer: TimerConfig { verbose: false },
        };
        config.save_to_file(&path).unwrap();

        assert_eq!(DemoConfig::from_file(&path).unwrap(), config);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "label = \"index\"\n").unwrap();

        let config = DemoConfig::from_file(&path).unwrap();
        assert_eq!(config.label, "index");
        assert_eq!(config.sleep_secs, 2.0);
        assert!(config.timer.verbose);
    }

    #[cfg(feature = "toml-config")]
    #[test]
    fn test_missing_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        match DemoConfig::from_file(&path) {
            Err(ConfigError::Io { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
