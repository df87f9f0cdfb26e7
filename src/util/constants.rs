// ScanBoard - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

use std::time::Duration;

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "ScanBoard";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "ScanBoard";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Server
// =============================================================================

/// Backend used when neither config.toml nor the CLI names one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Per-request timeout applied by the HTTP client (seconds).
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Bounds for `[server] timeout_secs`.
pub const MIN_REQUEST_TIMEOUT_SECS: u64 = 1;
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// User-Agent sent with every request.
pub const USER_AGENT: &str = concat!("ScanBoard/", env!("CARGO_PKG_VERSION"));

// =============================================================================
// Polling
// =============================================================================

/// How often the dashboard re-fetches the scan list (ms).
pub const LIST_POLL_INTERVAL_MS: u64 = 3_000;

/// How often the detail view re-fetches the open scan (ms).
pub const DETAIL_POLL_INTERVAL_MS: u64 = 2_000;

/// Bounds for user-configured poll intervals (ms).
pub const MIN_POLL_INTERVAL_MS: u64 = 250;
pub const MAX_POLL_INTERVAL_MS: u64 = 60_000;

/// How often a sleeping poller wakes to check its cancel and refresh flags.
pub const POLL_CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(50);

/// Maximum number of poller messages applied per UI frame.
pub const MAX_POLL_MESSAGES_PER_FRAME: usize = 64;

// =============================================================================
// Result rendering
// =============================================================================

/// Shown on an overview card whose tool has not produced output yet.
pub const PENDING_PLACEHOLDER: &str = "Pending";

/// Shown in a tool tab whose blob is absent or empty.
pub const NO_RESULTS_PLACEHOLDER: &str = "No results yet...";

/// Shown in place of the detail view when the backend returns 404.
pub const SCAN_NOT_FOUND_MESSAGE: &str = "Scan not found";

/// Shown on the login form after registration succeeded but auto-login did not.
pub const REGISTERED_LOGIN_MANUALLY: &str = "Registration successful! Please login manually.";

// =============================================================================
// UI defaults
// =============================================================================

/// Default UI body font size in points.
pub const DEFAULT_FONT_SIZE: f32 = 14.5;

/// Minimum user-configurable UI font size (points).
pub const MIN_FONT_SIZE: f32 = 10.0;

/// Maximum user-configurable UI font size (points).
pub const MAX_FONT_SIZE: f32 = 24.0;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Maximum length of a response body quoted in an error message.
pub const MAX_ERROR_BODY_PREVIEW: usize = 200;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Persisted bearer credential file name (stored in the platform data directory).
pub const CREDENTIAL_FILE_NAME: &str = "credential";
