//! Engine configuration.
//!
//! # Examples
//!
//! ```
//! use fleetscope::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert!(!config.reject_overlapping_tiers);
//!
//! let strict = EngineConfig::strict();
//! assert!(strict.reject_overlapping_tiers);
//! ```

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default template for the notification appended on every deployment save.
pub const DEFAULT_NOTIFICATION_TEMPLATE: &str =
    "Deployment [{{ deployment }}] modified by user [{{ user }}]";

/// Tunable behaviour of the engine services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Additional attempts after a failed repository metadata call.
    pub metadata_retry_attempts: u8,
    /// Reject schedules whose tiers overlap for a common set of computers.
    pub reject_overlapping_tiers: bool,
    /// Prefix deployment names with the user's preferred domain name.
    pub prefix_deployment_names: bool,
    /// `minijinja` template rendering deployment change notifications.
    ///
    /// The template receives `deployment` and `user`.
    pub notification_template: String,
    /// Maximum number of rows returned by a saved query.
    pub max_query_rows: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            metadata_retry_attempts: 2,
            reject_overlapping_tiers: false,
            prefix_deployment_names: true,
            notification_template: DEFAULT_NOTIFICATION_TEMPLATE.to_owned(),
            max_query_rows: 10_000,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration that validates schedules at write time and
    /// never retries metadata generation.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            metadata_retry_attempts: 0,
            reject_overlapping_tiers: true,
            ..Self::default()
        }
    }

    /// Parses a JSON document; absent keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::InvalidTemplate`] when the notification template does
    /// not compile.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise
    /// the errors of [`EngineConfig::from_json_str`].
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let file_name = path
            .file_name()
            .ok_or_else(|| ConfigError::Io(std::io::Error::other("path must include a file name")))?;
        let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
        let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
        let raw = dir.read_to_string(file_name)?;
        Self::from_json_str(&raw)
    }

    /// Checks that the notification template compiles.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidTemplate`] with the compiler message.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut environment = Environment::new();
        environment
            .add_template("notification", &self.notification_template)
            .map_err(|err| ConfigError::InvalidTemplate(err.to_string()))
    }
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration document is not valid JSON for [`EngineConfig`].
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The notification template does not compile.
    #[error("invalid notification template: {0}")]
    InvalidTemplate(String),
}

#[cfg(test)]
mod tests {
    use super::{ConfigError, EngineConfig};
    use camino::Utf8PathBuf;
    use rstest::rstest;

    #[rstest]
    fn partial_json_keeps_defaults() {
        let config = EngineConfig::from_json_str(r#"{"reject_overlapping_tiers": true}"#)
            .expect("configuration should parse");
        assert!(config.reject_overlapping_tiers);
        assert_eq!(config.metadata_retry_attempts, 2);
        assert!(config.prefix_deployment_names);
    }

    #[rstest]
    fn malformed_template_is_rejected() {
        let result = EngineConfig::from_json_str(r#"{"notification_template": "{{ deployment"}"#);
        assert!(matches!(result, Err(ConfigError::InvalidTemplate(_))));
    }

    #[rstest]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().expect("temporary directory");
        let path = dir.path().join("fleetscope.json");
        std::fs::write(&path, r#"{"max_query_rows": 25}"#).expect("write configuration");
        let utf8_path = Utf8PathBuf::from_path_buf(path).expect("utf-8 path");

        let config = EngineConfig::load(&utf8_path).expect("configuration should load");

        assert_eq!(config.max_query_rows, 25);
    }
}
