//! Configuration module for docreg.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.
//!
//! The `quota` section has no defaults: the admission window and limit must be
//! stated explicitly.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, Quota, WindowUnit};

/// Registration endpoint used when the configuration does not name one.
pub const DEFAULT_ENDPOINT: &str = "https://ismp.crpt.ru/api/v3/lk/documents/create";

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for docreg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    pub quota: QuotaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Registration API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Absolute URL that documents are POSTed to.
    pub endpoint: String,
    /// Seconds before an outstanding HTTP request is abandoned.
    pub request_timeout_secs: u64,
}

/// Admission window settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaConfig {
    /// Unit the window length is expressed in.
    pub unit: WindowUnit,
    /// Number of units in one window.
    pub count: u32,
    /// Submissions admitted per window.
    pub max_admissions: u32,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
    /// Emit log lines as JSON objects instead of human-readable text.
    pub json: bool,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/docreg/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("docreg")
            .join("config.yaml")
    }

    /// Builds the admission [`Quota`] described by the `quota` section.
    pub fn quota(&self) -> Result<Quota, DomainError> {
        Quota::per_unit(self.quota.unit, self.quota.count, self.quota.max_admissions)
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"quota.max_admissions"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- api ---
        if !(self.api.endpoint.starts_with("http://") || self.api.endpoint.starts_with("https://"))
        {
            errors.push(ValidationError {
                field: "api.endpoint".into(),
                message: format!(
                    "must be an http:// or https:// URL, got '{}'",
                    self.api.endpoint
                ),
            });
        }
        if self.api.request_timeout_secs == 0 {
            errors.push(ValidationError {
                field: "api.request_timeout_secs".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- quota ---
        if self.quota.count == 0 {
            errors.push(ValidationError {
                field: "quota.count".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.quota.max_admissions == 0 {
            errors.push(ValidationError {
                field: "quota.max_admissions".into(),
                message: "must be greater than 0".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// The quota is required up front; every other section starts from its
/// defaults.
///
/// # Example
///
/// ```rust
/// use docreg_core::config::{ConfigBuilder, QuotaConfig};
/// use docreg_core::domain::WindowUnit;
///
/// let config = ConfigBuilder::new(QuotaConfig {
///     unit: WindowUnit::Minutes,
///     count: 1,
///     max_admissions: 5,
/// })
/// .api_endpoint("http://localhost:8080/create")
/// .logging_level("debug")
/// .build();
/// assert!(config.validate().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with the given quota and default values elsewhere.
    pub fn new(quota: QuotaConfig) -> Self {
        Self {
            config: Config {
                api: ApiConfig::default(),
                quota,
                logging: LoggingConfig::default(),
            },
        }
    }

    // --- api ---

    pub fn api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.api.endpoint = endpoint.into();
        self
    }

    pub fn api_request_timeout_secs(mut self, seconds: u64) -> Self {
        self.config.api.request_timeout_secs = seconds;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    pub fn logging_json(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use super::*;

    fn per_minute(max_admissions: u32) -> QuotaConfig {
        QuotaConfig {
            unit: WindowUnit::Minutes,
            count: 1,
            max_admissions,
        }
    }

    fn write_yaml(yaml: &str) -> tempfile::NamedTempFile {
        let mut tmp = tempfile::NamedTempFile::new().expect("create temp file");
        tmp.write_all(yaml.as_bytes()).unwrap();
        tmp.flush().unwrap();
        tmp
    }

    // -- Defaults --

    #[test]
    fn builder_starts_from_defaults() {
        let cfg = ConfigBuilder::new(per_minute(5)).build();
        assert_eq!(cfg.api.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(cfg.api.request_timeout_secs, 30);
        assert_eq!(cfg.logging.level, "info");
        assert!(!cfg.logging.json);
        assert_eq!(cfg.quota, per_minute(5));
        assert!(cfg.validate().is_empty());
    }

    // -- Loading --

    #[test]
    fn load_from_yaml_file() {
        let tmp = write_yaml(
            r#"
api:
  endpoint: http://127.0.0.1:9000/create
  request_timeout_secs: 5
quota:
  unit: seconds
  count: 10
  max_admissions: 3
logging:
  level: debug
  json: true
"#,
        );

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.api.endpoint, "http://127.0.0.1:9000/create");
        assert_eq!(cfg.api.request_timeout_secs, 5);
        assert_eq!(cfg.quota.unit, WindowUnit::Seconds);
        assert_eq!(cfg.quota.count, 10);
        assert_eq!(cfg.quota.max_admissions, 3);
        assert_eq!(cfg.logging.level, "debug");
        assert!(cfg.logging.json);

        let quota = cfg.quota().unwrap();
        assert_eq!(quota.window(), Duration::from_secs(10));
        assert_eq!(quota.max_admissions(), 3);
    }

    #[test]
    fn load_fills_optional_sections_with_defaults() {
        let tmp = write_yaml(
            r#"
quota:
  unit: minutes
  count: 1
  max_admissions: 5
"#,
        );

        let cfg = Config::load(tmp.path()).expect("load config");
        assert_eq!(cfg.api, ApiConfig::default());
        assert_eq!(cfg.logging, LoggingConfig::default());
    }

    #[test]
    fn load_requires_quota_section() {
        let tmp = write_yaml("api:\n  endpoint: http://localhost/create\n");
        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn load_requires_every_quota_field() {
        let tmp = write_yaml("quota:\n  unit: minutes\n  count: 1\n");
        assert!(Config::load(tmp.path()).is_err());
    }

    #[test]
    fn load_returns_error_on_missing_file() {
        assert!(Config::load(Path::new("/nonexistent/config.yaml")).is_err());
    }

    // -- Validation --

    #[test]
    fn validate_catches_zero_quota_values() {
        let cfg = ConfigBuilder::new(QuotaConfig {
            unit: WindowUnit::Seconds,
            count: 0,
            max_admissions: 0,
        })
        .build();
        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"quota.count".to_string()));
        assert!(fields.contains(&"quota.max_admissions".to_string()));
        assert!(cfg.quota().is_err());
    }

    #[test]
    fn validate_catches_bad_endpoint_and_timeout() {
        let cfg = ConfigBuilder::new(per_minute(5))
            .api_endpoint("ftp://example.com/create")
            .api_request_timeout_secs(0)
            .build();
        let fields: Vec<_> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["api.endpoint", "api.request_timeout_secs"]);
    }

    #[test]
    fn validate_catches_invalid_log_level() {
        let cfg = ConfigBuilder::new(per_minute(5))
            .logging_level("verbose")
            .build();
        let errors = cfg.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "logging.level");
    }

    #[test]
    fn validate_accepts_all_valid_log_levels() {
        for level in VALID_LOG_LEVELS {
            let cfg = ConfigBuilder::new(per_minute(5)).logging_level(*level).build();
            assert!(cfg.validate().is_empty(), "level {level} should be valid");
        }
    }

    // -- Builder --

    #[test]
    fn builder_build_validated_fails_for_invalid_config() {
        let result = ConfigBuilder::new(per_minute(0)).build_validated();
        let errors = result.unwrap_err();
        assert_eq!(errors[0].field, "quota.max_admissions");
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = ConfigBuilder::new(per_minute(2))
            .api_endpoint("https://example.test/create")
            .api_request_timeout_secs(3)
            .logging_json(true)
            .build_validated()
            .expect("valid config");
        assert_eq!(cfg.api.endpoint, "https://example.test/create");
        assert_eq!(cfg.api.request_timeout_secs, 3);
        assert!(cfg.logging.json);
    }

    #[test]
    fn default_path_ends_with_config_yaml() {
        let path = Config::default_path();
        assert!(path.ends_with("docreg/config.yaml"));
    }

    #[test]
    fn validation_error_display() {
        let err = ValidationError {
            field: "quota.count".into(),
            message: "must be greater than 0".into(),
        };
        assert_eq!(err.to_string(), "quota.count: must be greater than 0");
    }
}
