// ScanBoard - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These are read-only cached copies of backend resources. The backend owns
// them; every poll replaces the local copy wholesale.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Opaque backend identifier.
///
/// The backend currently emits integers, but the client never does arithmetic
/// on ids, so both JSON numbers and strings are accepted and kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ScanId(String);

impl ScanId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ScanId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Int(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Int(n) => Self(n.to_string()),
            Raw::Text(s) => Self(s),
        })
    }
}

/// User ids share the same opaque representation.
pub type UserId = ScanId;

// =============================================================================
// Session identity
// =============================================================================

/// Opaque bearer token issued by `POST /api/token`.
///
/// `Debug` is redacted so the token never reaches a log line.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token text for the `Authorization` header.
    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// The authenticated account as returned by `GET /api/me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
}

/// A logged-in session: the credential plus, once resolved, the user it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub credential: Credential,
    pub user: Option<User>,
}

/// Fields submitted to `POST /api/register`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Registration {
    pub email: String,
    pub username: String,
    pub password: String,
}

// =============================================================================
// Scans
// =============================================================================

/// Lifecycle of a scan: pending → running → {completed | failed}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScanStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
    /// Any status string this client does not know about.
    #[serde(other)]
    Unknown,
}

impl ScanStatus {
    /// Short label for badges.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown => "unknown",
        }
    }

    /// True once the backend will not change the scan any further.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// One row of `GET /api/scans`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanSummary {
    pub id: ScanId,
    pub domain: String,
    pub status: ScanStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub current_step: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl ScanSummary {
    /// Progress as a 0.0–1.0 fraction, clamped.
    pub fn progress_fraction(&self) -> f32 {
        f32::from(self.progress.min(100)) / 100.0
    }
}

/// Full scan record from `GET /api/scans/{id}`: the summary plus per-tool output.
///
/// Tool fields stay `None` until the backend has something to report.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScanDetail {
    #[serde(flatten)]
    pub summary: ScanSummary,
    #[serde(default)]
    pub subfinder_results: Option<String>,
    #[serde(default)]
    pub httpx_results: Option<String>,
    #[serde(default)]
    pub nuclei_results: Option<String>,
    #[serde(default)]
    pub katana_results: Option<String>,
    #[serde(default)]
    pub xss_results: Option<String>,
    #[serde(default)]
    pub dalfox_results: Option<String>,
}

// =============================================================================
// Timestamp decoding
// =============================================================================

/// Accept RFC 3339 timestamps as well as the naive ISO-8601 form the backend
/// emits for timezone-unaware columns (interpreted as UTC).
fn deserialize_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("unrecognised timestamp '{raw}'"))
    })
}

/// Parse a backend timestamp string. Returns `None` for unrecognised formats.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
