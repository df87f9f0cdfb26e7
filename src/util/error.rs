// ScanBoard - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// No string-based error propagation. All errors preserve the causal
// chain for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all ScanBoard operations.
/// Errors are categorised by the subsystem that produced them.
#[derive(Debug)]
pub enum ScanBoardError {
    /// A backend call failed.
    Api(ApiError),

    /// Credential persistence failed.
    Session(SessionError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for ScanBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "API error: {e}"),
            Self::Session(e) => write!(f, "Session error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for ScanBoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Session(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// API errors
// ---------------------------------------------------------------------------

/// Errors returned by the scan service boundary.
///
/// The variants follow how the UI reacts, not the raw HTTP status:
/// `Auth` clears the session, `Validation` is shown inline on a form,
/// `NotFound` renders an empty state, and `Network` is swallowed by pollers.
#[derive(Debug)]
pub enum ApiError {
    /// Bad credentials or an expired/rejected bearer token (HTTP 401).
    Auth { detail: String },

    /// Input rejected by the client or the backend (HTTP 400/409/422).
    Validation { detail: String },

    /// The requested resource does not exist (HTTP 404).
    NotFound { resource: String },

    /// Transport-level failure: connection refused, DNS, timeout, TLS.
    Network {
        endpoint: String,
        source: reqwest::Error,
    },

    /// Any other non-success status.
    Http { status: u16, detail: String },

    /// A success response whose body could not be decoded.
    Decode {
        endpoint: String,
        source: reqwest::Error,
    },
}

impl ApiError {
    /// Returns true when the error means the session credential is no longer valid.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth { .. })
    }

    /// Message suitable for an inline form error.
    ///
    /// Backend-supplied `detail` text is shown verbatim; transport errors are
    /// collapsed to a short generic sentence.
    pub fn user_message(&self) -> String {
        match self {
            Self::Auth { detail } | Self::Validation { detail } | Self::Http { detail, .. }
                if !detail.is_empty() =>
            {
                detail.clone()
            }
            Self::Auth { .. } => "Invalid credentials".to_string(),
            Self::NotFound { resource } => format!("{resource} not found"),
            Self::Network { .. } => "Cannot reach the scan service".to_string(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth { detail } => write!(f, "authentication rejected: {detail}"),
            Self::Validation { detail } => write!(f, "validation failed: {detail}"),
            Self::NotFound { resource } => write!(f, "{resource} not found"),
            Self::Network { endpoint, source } => {
                write!(f, "request to '{endpoint}' failed: {source}")
            }
            Self::Http { status, detail } => write!(f, "HTTP {status}: {detail}"),
            Self::Decode { endpoint, source } => {
                write!(f, "cannot decode response from '{endpoint}': {source}")
            }
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Network { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ApiError> for ScanBoardError {
    fn from(e: ApiError) -> Self {
        Self::Api(e)
    }
}

/// Convenience alias for backend calls.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

// ---------------------------------------------------------------------------
// Session errors
// ---------------------------------------------------------------------------

/// Errors related to persisting the bearer credential.
#[derive(Debug)]
pub enum SessionError {
    /// The credential directory could not be created.
    CreateDir { path: PathBuf, source: io::Error },

    /// Writing or renaming the credential file failed.
    Write { path: PathBuf, source: io::Error },

    /// Removing the credential file failed.
    Remove { path: PathBuf, source: io::Error },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CreateDir { path, source } => write!(
                f,
                "cannot create credential directory '{}': {source}",
                path.display()
            ),
            Self::Write { path, source } => {
                write!(f, "cannot write credential '{}': {source}", path.display())
            }
            Self::Remove { path, source } => {
                write!(f, "cannot remove credential '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Write { source, .. } => Some(source),
            Self::Remove { source, .. } => Some(source),
        }
    }
}

impl From<SessionError> for ScanBoardError {
    fn from(e: SessionError) -> Self {
        Self::Session(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// A config value is out of the allowed range.
    ValueOutOfRange {
        field: String,
        value: String,
        expected: String,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::ValueOutOfRange {
                field,
                value,
                expected,
            } => write!(
                f,
                "Config '{field}' = '{value}' is out of range. Expected: {expected}"
            ),
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ConfigError> for ScanBoardError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Convenience type alias for ScanBoard results.
pub type Result<T> = std::result::Result<T, ScanBoardError>;
