// ScanBoard - platform/config.rs
//
// Platform directory resolution and config.toml loading with startup
// validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Resolved platform paths for ScanBoard configuration and data.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/scanboard/ or %APPDATA%\ScanBoard\config\)
    pub config_dir: PathBuf,

    /// Data directory; holds the persisted credential.
    pub data_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            let data_dir = proj_dirs.data_dir().to_path_buf();

            tracing::debug!(
                config = %config_dir.display(),
                data = %data_dir.display(),
                "Platform paths resolved"
            );

            Self {
                config_dir,
                data_dir,
            }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self::rooted_at(PathBuf::from("."))
        }
    }

    /// Keep config and data together under one directory (`--config-dir`).
    pub fn rooted_at(dir: PathBuf) -> Self {
        Self {
            config_dir: dir.clone(),
            data_dir: dir,
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored so a newer config file still loads
/// with an older binary.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    pub server: ServerSection,
    pub polling: PollingSection,
    pub ui: UiSection,
    pub logging: LoggingSection,
}

/// `[server]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ServerSection {
    /// Backend root, e.g. "http://localhost:8000".
    pub base_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,
}

/// `[polling]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct PollingSection {
    pub list_interval_ms: Option<u64>,
    pub detail_interval_ms: Option<u64>,
    /// Stop refreshing a scan once it is completed or failed.
    pub stop_on_terminal: Option<bool>,
}

/// `[ui]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct UiSection {
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
    /// Body font size in points.
    pub font_size: Option<f32>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
    /// Log file path (empty = stderr only).
    pub file: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce warnings and fall back to defaults.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // -- Server --
    pub base_url: String,
    pub request_timeout: Duration,

    // -- Polling --
    pub list_interval: Duration,
    pub detail_interval: Duration,
    /// Stop refreshing a scan once it is completed or failed.
    pub stop_on_terminal: bool,

    // -- UI --
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Body font size in points.
    pub font_size: f32,

    // -- Logging --
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: constants::DEFAULT_API_URL.to_string(),
            request_timeout: Duration::from_secs(constants::DEFAULT_REQUEST_TIMEOUT_SECS),
            list_interval: Duration::from_millis(constants::LIST_POLL_INTERVAL_MS),
            detail_interval: Duration::from_millis(constants::DETAIL_POLL_INTERVAL_MS),
            stop_on_terminal: false,
            dark_mode: true,
            font_size: constants::DEFAULT_FONT_SIZE,
            log_level: None,
            log_file: None,
        }
    }
}

/// Path of config.toml inside `config_dir`.
pub fn config_path(config_dir: &Path) -> PathBuf {
    config_dir.join(constants::CONFIG_FILE_NAME)
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns the validated config and every non-fatal problem found.
/// A missing file yields defaults with no warnings (first run). An unreadable
/// or unparseable file yields defaults plus one warning; the application
/// still starts.
pub fn load_config(config_dir: &Path) -> (AppConfig, Vec<ConfigError>) {
    let path = config_path(config_dir);

    if !path.exists() {
        tracing::debug!(path = %path.display(), "No config.toml found; using defaults");
        return (AppConfig::default(), Vec::new());
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(source) => return (AppConfig::default(), vec![ConfigError::Io { path, source }]),
    };

    match toml::from_str::<RawConfig>(&content) {
        Ok(raw) => {
            tracing::info!(path = %path.display(), "Loaded config.toml");
            validate(raw)
        }
        Err(source) => (
            AppConfig::default(),
            vec![ConfigError::TomlParse { path, source }],
        ),
    }
}

/// Apply each present field that passes validation, accumulating all errors.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<ConfigError>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    let mut out_of_range = |field: &str, value: String, expected: String| {
        warnings.push(ConfigError::ValueOutOfRange {
            field: field.to_string(),
            value,
            expected,
        });
    };

    // -- Server --
    if let Some(url) = raw.server.base_url {
        let trimmed = url.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            config.base_url = trimmed.trim_end_matches('/').to_string();
        } else {
            out_of_range(
                "server.base_url",
                url.clone(),
                "an http:// or https:// URL".to_string(),
            );
        }
    }

    if let Some(secs) = raw.server.timeout_secs {
        if (constants::MIN_REQUEST_TIMEOUT_SECS..=constants::MAX_REQUEST_TIMEOUT_SECS)
            .contains(&secs)
        {
            config.request_timeout = Duration::from_secs(secs);
        } else {
            out_of_range(
                "server.timeout_secs",
                secs.to_string(),
                format!(
                    "{}-{}",
                    constants::MIN_REQUEST_TIMEOUT_SECS,
                    constants::MAX_REQUEST_TIMEOUT_SECS
                ),
            );
        }
    }

    // -- Polling --
    let interval_range = constants::MIN_POLL_INTERVAL_MS..=constants::MAX_POLL_INTERVAL_MS;
    let interval_expected = format!(
        "{}-{} ms",
        constants::MIN_POLL_INTERVAL_MS,
        constants::MAX_POLL_INTERVAL_MS
    );

    if let Some(ms) = raw.polling.list_interval_ms {
        if interval_range.contains(&ms) {
            config.list_interval = Duration::from_millis(ms);
        } else {
            out_of_range(
                "polling.list_interval_ms",
                ms.to_string(),
                interval_expected.clone(),
            );
        }
    }

    if let Some(ms) = raw.polling.detail_interval_ms {
        if interval_range.contains(&ms) {
            config.detail_interval = Duration::from_millis(ms);
        } else {
            out_of_range(
                "polling.detail_interval_ms",
                ms.to_string(),
                interval_expected,
            );
        }
    }

    if let Some(stop) = raw.polling.stop_on_terminal {
        config.stop_on_terminal = stop;
    }

    // -- UI --
    if let Some(ref theme) = raw.ui.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            _ => out_of_range("ui.theme", theme.clone(), "\"dark\" or \"light\"".to_string()),
        }
    }

    if let Some(size) = raw.ui.font_size {
        if (constants::MIN_FONT_SIZE..=constants::MAX_FONT_SIZE).contains(&size) {
            config.font_size = size;
        } else {
            out_of_range(
                "ui.font_size",
                size.to_string(),
                format!("{}-{}", constants::MIN_FONT_SIZE, constants::MAX_FONT_SIZE),
            );
        }
    }

    // -- Logging --
    if let Some(ref level) = raw.logging.level {
        let valid = ["error", "warn", "info", "debug", "trace"];
        if valid.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            out_of_range(
                "logging.level",
                level.clone(),
                "error, warn, info, debug, trace".to_string(),
            );
        }
    }

    if let Some(file) = raw.logging.file {
        if !file.is_empty() {
            config.log_file = Some(file);
        }
    }

    (config, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, body: &str) {
        std::fs::write(config_path(dir.path()), body).unwrap();
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert_eq!(config.base_url, constants::DEFAULT_API_URL);
        assert_eq!(config.list_interval, Duration::from_millis(3_000));
        assert_eq!(config.detail_interval, Duration::from_millis(2_000));
        assert!(!config.stop_on_terminal);
    }

    #[test]
    fn test_valid_values_are_applied() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [server]
            base_url = "https://scans.example.org/"
            timeout_secs = 10

            [polling]
            list_interval_ms = 5000
            stop_on_terminal = true

            [ui]
            theme = "Light"

            [logging]
            level = "DEBUG"
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.base_url, "https://scans.example.org");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.list_interval, Duration::from_millis(5_000));
        assert_eq!(config.detail_interval, Duration::from_millis(2_000));
        assert!(config.stop_on_terminal);
        assert!(!config.dark_mode);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn test_out_of_range_values_fall_back_with_warnings() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir,
            r#"
            [server]
            base_url = "localhost:8000"
            [polling]
            detail_interval_ms = 10
            [ui]
            font_size = 99.0
            "#,
        );
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 3);
        assert!(warnings
            .iter()
            .all(|w| matches!(w, ConfigError::ValueOutOfRange { .. })));
        assert_eq!(config.base_url, constants::DEFAULT_API_URL);
        assert_eq!(config.detail_interval, Duration::from_millis(2_000));
        assert_eq!(config.font_size, constants::DEFAULT_FONT_SIZE);
    }

    #[test]
    fn test_unparseable_file_gives_defaults_and_one_warning() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[server\nbase_url = ");
        let (config, warnings) = load_config(dir.path());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], ConfigError::TomlParse { .. }));
        assert_eq!(config.base_url, constants::DEFAULT_API_URL);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(&dir, "[future]\nshiny = true\n[ui]\ntheme = \"dark\"\n");
        let (config, warnings) = load_config(dir.path());
        assert!(warnings.is_empty());
        assert!(config.dark_mode);
    }
}
