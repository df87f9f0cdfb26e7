// ScanBoard - app/scans.rs
//
// Scan-specific wiring on top of the generic poller: the dashboard list loop,
// the detail loop, and the submission flow's input normalisation.

use crate::api::ScanApi;
use crate::app::poller::{PollSchedule, Poller, StopWhen};
use crate::core::model::{Credential, ScanDetail, ScanId, ScanSummary};
use crate::util::constants::{DETAIL_POLL_INTERVAL_MS, LIST_POLL_INTERVAL_MS};
use crate::util::error::{ApiError, ApiResult};
use std::sync::Arc;
use std::time::Duration;

/// Poll loop for `GET /api/scans`.
pub type ListPoller = Poller<Vec<ScanSummary>>;

/// Poll loop for `GET /api/scans/{id}`.
pub type DetailPoller = Poller<ScanDetail>;

/// Poll timing, resolved from config.
#[derive(Debug, Clone, Copy)]
pub struct PollSettings {
    pub list_interval: Duration,
    pub detail_interval: Duration,
    /// Stop the detail loop once a scan is completed or failed.
    pub stop_on_terminal: bool,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            list_interval: Duration::from_millis(LIST_POLL_INTERVAL_MS),
            detail_interval: Duration::from_millis(DETAIL_POLL_INTERVAL_MS),
            stop_on_terminal: false,
        }
    }
}

/// Start (or restart) the list loop for `credential`.
pub fn watch_list(
    poller: &mut ListPoller,
    api: Arc<dyn ScanApi>,
    credential: Credential,
    interval: Duration,
) {
    poller.start(PollSchedule::every(interval), None, move || {
        api.list_scans(&credential)
    });
}

/// Start (or restart) the detail loop for scan `id`.
///
/// By default the loop keeps polling after the scan reaches a terminal
/// status; `stop_on_terminal` opts into stopping.
pub fn watch_detail(
    poller: &mut DetailPoller,
    api: Arc<dyn ScanApi>,
    credential: Credential,
    id: ScanId,
    settings: &PollSettings,
) {
    let stop_when: Option<StopWhen<ScanDetail>> = if settings.stop_on_terminal {
        Some(|d: &ScanDetail| d.summary.status.is_terminal())
    } else {
        None
    };
    poller.start(
        PollSchedule::every(settings.detail_interval),
        stop_when,
        move || api.scan_detail(&credential, &id),
    );
}

/// Trim the domain field; blank input is a validation error.
pub fn normalise_domain(input: &str) -> ApiResult<String> {
    let domain = input.trim();
    if domain.is_empty() {
        return Err(ApiError::Validation {
            detail: "Domain is required".to_string(),
        });
    }
    Ok(domain.to_string())
}

/// Create a scan for `input`. Blank input is rejected before any request.
pub fn submit_scan(
    api: &dyn ScanApi,
    credential: &Credential,
    input: &str,
) -> ApiResult<ScanSummary> {
    let domain = normalise_domain(input)?;
    let created = api.create_scan(credential, &domain)?;
    tracing::info!(id = %created.id, domain = %created.domain, "Scan created");
    Ok(created)
}
