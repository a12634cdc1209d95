//! Configuration management for scode.
//!
//! Parses `scode.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! `youtube.embed_url` supports environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override maximum input length (0 disables the limit).
    pub max_input_len: Option<usize>,
    /// Override regex backtracking budget.
    pub backtrack_limit: Option<usize>,
    /// Override whether the youtube shortcode is registered.
    pub youtube_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "scode.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Shortcode engine limits.
    pub engine: EngineConfig,
    /// YouTube shortcode configuration.
    pub youtube: YoutubeConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Shortcode engine limits.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Documents longer than this many bytes are left unexpanded (0 = no limit).
    pub max_input_len: usize,
    /// Regex backtracking budget per scan step.
    pub backtrack_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_input_len: 1024 * 1024,
            backtrack_limit: 1_000_000,
        }
    }
}

impl EngineConfig {
    /// Maximum input length, `None` when unlimited.
    #[must_use]
    pub fn max_input_len(&self) -> Option<usize> {
        (self.max_input_len > 0).then_some(self.max_input_len)
    }
}

/// YouTube shortcode configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct YoutubeConfig {
    /// Whether the `youtube` shortcode is registered.
    pub enabled: bool,
    /// Default player width.
    pub width: u32,
    /// Default player height.
    pub height: u32,
    /// URL prefix the video id is appended to.
    pub embed_url: String,
}

impl Default for YoutubeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: 480,
            height: 390,
            embed_url: "http://www.youtube.com/embed/".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`youtube.embed_url`").
        field: String,
        /// Error message (e.g., "${`EMBED_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a numeric field to be greater than zero.
fn require_positive(value: u64, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `scode.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading, allowing CLI arguments to take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let discovered = || {
            std::env::current_dir()
                .ok()
                .and_then(|cwd| Self::discover_config(&cwd))
        };

        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(found) = discovered() {
            Self::load_from_file(&found)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(max_input_len) = settings.max_input_len {
            self.engine.max_input_len = max_input_len;
        }
        if let Some(backtrack_limit) = settings.backtrack_limit {
            self.engine.backtrack_limit = backtrack_limit;
        }
        if let Some(enabled) = settings.youtube_enabled {
            self.youtube.enabled = enabled;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive(self.engine.backtrack_limit as u64, "engine.backtrack_limit")?;

        require_positive(self.youtube.width.into(), "youtube.width")?;
        require_positive(self.youtube.height.into(), "youtube.height")?;
        require_non_empty(&self.youtube.embed_url, "youtube.embed_url")?;
        require_http_url(&self.youtube.embed_url, "youtube.embed_url")?;

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.youtube.embed_url = expand::expand_env(&self.youtube.embed_url, "youtube.embed_url")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.max_input_len, 1024 * 1024);
        assert_eq!(config.engine.max_input_len(), Some(1024 * 1024));
        assert_eq!(config.engine.backtrack_limit, 1_000_000);
        assert!(config.youtube.enabled);
        assert_eq!(config.youtube.width, 480);
        assert_eq!(config.youtube.height, 390);
        assert_eq!(config.youtube.embed_url, "http://www.youtube.com/embed/");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.engine.backtrack_limit, 1_000_000);
        assert!(config.youtube.enabled);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[engine]
max_input_len = 0
backtrack_limit = 5000

[youtube]
enabled = false
width = 640
height = 360
embed_url = "https://www.youtube-nocookie.com/embed/"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.engine.max_input_len(), None);
        assert_eq!(config.engine.backtrack_limit, 5000);
        assert!(!config.youtube.enabled);
        assert_eq!(config.youtube.width, 640);
        assert_eq!(config.youtube.height, 360);
        assert_eq!(
            config.youtube.embed_url,
            "https://www.youtube-nocookie.com/embed/"
        );
    }

    #[test]
    fn test_partial_section_keeps_defaults() {
        let toml = r"
[youtube]
width = 800
";
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.youtube.width, 800);
        assert_eq!(config.youtube.height, 390);
    }

    #[test]
    fn test_parse_error() {
        let result: Result<Config, _> = toml::from_str("[engine]\nbacktrack_limit = \"many\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default();
        let overrides = CliSettings {
            max_input_len: Some(10),
            youtube_enabled: Some(false),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.engine.max_input_len(), Some(10));
        assert_eq!(config.engine.backtrack_limit, 1_000_000); // Unchanged
        assert!(!config.youtube.enabled);
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default();
        config.apply_cli_settings(&CliSettings::default());
        assert_eq!(config.engine.max_input_len(), Some(1024 * 1024));
        assert!(config.youtube.enabled);
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_backtrack_limit_zero() {
        let mut config = Config::default();
        config.engine.backtrack_limit = 0;
        assert_validation_error(&config, &["engine.backtrack_limit", "greater than 0"]);
    }

    #[test]
    fn test_validate_youtube_dimensions() {
        let mut config = Config::default();
        config.youtube.height = 0;
        assert_validation_error(&config, &["youtube.height"]);
    }

    #[test]
    fn test_validate_embed_url_empty() {
        let mut config = Config::default();
        config.youtube.embed_url = String::new();
        assert_validation_error(&config, &["youtube.embed_url", "cannot be empty"]);
    }

    #[test]
    fn test_validate_embed_url_invalid_scheme() {
        let mut config = Config::default();
        config.youtube.embed_url = "ftp://videos/".to_owned();
        assert_validation_error(&config, &["youtube.embed_url", "http://"]);
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[youtube]\nwidth = 320\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.youtube.width, 320);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[youtube]\nembed_url = \"youtube.com\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("youtube.embed_url"));
    }

    #[test]
    fn test_load_expands_env_vars() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("SCODE_TEST_EMBED_URL", "https://embed.test/");
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[youtube]\nembed_url = \"${SCODE_TEST_EMBED_URL}\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();
        assert_eq!(config.youtube.embed_url, "https://embed.test/");

        unsafe {
            std::env::remove_var("SCODE_TEST_EMBED_URL");
        }
    }

    #[test]
    fn test_cli_settings_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let settings = CliSettings {
            backtrack_limit: Some(0),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("guides");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILENAME));
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("site");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        let found = Config::discover_config(&nested).unwrap();
        assert_eq!(found, nested.join(CONFIG_FILENAME));
    }
}
