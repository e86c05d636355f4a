//! Start and stop timeouts.
//!
//! [`LifecycleConfig`] bounds how long a [`Supervisor`](crate::Supervisor)
//! waits for each pass. It can be built in code or read from TOML:
//!
//! ```toml
//! start_timeout_secs = 30
//! stop_timeout_secs = 10
//! ```
//!
//! Missing keys keep their defaults.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Default budget for the start pass.
pub const DEFAULT_START_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Default budget for the stop pass.
pub const DEFAULT_STOP_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors raised while loading a [`LifecycleConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path that was read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML or has unexpected keys.
    #[error("invalid lifecycle config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A timeout was set to zero.
    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Timeouts applied to the start and stop passes.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use stagehand_runtime::LifecycleConfig;
///
/// let config = LifecycleConfig::default().with_stop_timeout(Duration::from_secs(10));
/// assert_eq!(config.start_timeout(), Duration::from_secs(300));
/// assert_eq!(config.stop_timeout(), Duration::from_secs(10));
///
/// let parsed = LifecycleConfig::from_toml_str("start_timeout_secs = 30").unwrap();
/// assert_eq!(parsed.start_timeout(), Duration::from_secs(30));
/// assert_eq!(parsed.stop_timeout(), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifecycleConfig {
    #[serde(rename = "start_timeout_secs", deserialize_with = "duration_secs")]
    start_timeout: Duration,
    #[serde(rename = "stop_timeout_secs", deserialize_with = "duration_secs")]
    stop_timeout: Duration,
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            start_timeout: DEFAULT_START_TIMEOUT,
            stop_timeout: DEFAULT_STOP_TIMEOUT,
        }
    }
}

fn duration_secs<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl LifecycleConfig {
    /// Sets the start pass budget.
    #[must_use]
    pub fn with_start_timeout(mut self, timeout: Duration) -> Self {
        self.start_timeout = timeout;
        self
    }

    /// Sets the stop pass budget.
    #[must_use]
    pub fn with_stop_timeout(mut self, timeout: Duration) -> Self {
        self.stop_timeout = timeout;
        self
    }

    /// Returns the start pass budget.
    #[must_use]
    pub fn start_timeout(&self) -> Duration {
        self.start_timeout
    }

    /// Returns the stop pass budget.
    #[must_use]
    pub fn stop_timeout(&self) -> Duration {
        self.stop_timeout
    }

    /// Parses a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys and
    /// [`ConfigError::ZeroTimeout`] if either timeout is zero.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
    /// errors of [`from_toml_str`](Self::from_toml_str).
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let input = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&input)
    }

    /// Checks that both timeouts are non-zero.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("start_timeout_secs"));
        }
        if self.stop_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout("stop_timeout_secs"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = LifecycleConfig::default();
        assert_eq!(config.start_timeout(), Duration::from_secs(300));
        assert_eq!(config.stop_timeout(), Duration::from_secs(60));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_document_keeps_defaults() {
        let config = LifecycleConfig::from_toml_str("").unwrap();
        assert_eq!(config, LifecycleConfig::default());
    }

    #[test]
    fn parses_both_keys() {
        let config =
            LifecycleConfig::from_toml_str("start_timeout_secs = 15\nstop_timeout_secs = 5\n")
                .unwrap();
        assert_eq!(config.start_timeout(), Duration::from_secs(15));
        assert_eq!(config.stop_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn rejects_zero_timeouts() {
        let err = LifecycleConfig::from_toml_str("stop_timeout_secs = 0").unwrap_err();
        assert!(matches!(err, ConfigError::ZeroTimeout("stop_timeout_secs")));
        assert_eq!(err.to_string(), "stop_timeout_secs must be greater than zero");
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = LifecycleConfig::from_toml_str("shutdown_timeout_secs = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_negative_values() {
        let err = LifecycleConfig::from_toml_str("start_timeout_secs = -1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lifecycle.toml");
        std::fs::write(&path, "start_timeout_secs = 42\n").unwrap();

        let config = LifecycleConfig::from_file(&path).unwrap();
        assert_eq!(config.start_timeout(), Duration::from_secs(42));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = LifecycleConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("absent.toml"));
    }
}
