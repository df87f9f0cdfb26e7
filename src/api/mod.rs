// ScanBoard - api/mod.rs
//
// Boundary with the external scan service.
// Dependencies: core (models), util (errors).
// Must NOT depend on: app, ui.
//
// Every authenticated call takes the credential explicitly; the client holds
// no ambient session state.

pub mod client;

use crate::core::model::{Credential, Registration, ScanDetail, ScanId, ScanSummary, User};
use crate::util::error::ApiResult;

/// Operations the dashboard needs from the scan service.
///
/// Implementations must be callable from background poller threads.
pub trait ScanApi: Send + Sync {
    /// `POST /api/register`.
    fn register(&self, registration: &Registration) -> ApiResult<User>;

    /// `POST /api/token` (form-encoded). `identifier` is the account email.
    fn request_token(&self, identifier: &str, secret: &str) -> ApiResult<Credential>;

    /// `GET /api/me`.
    fn current_user(&self, credential: &Credential) -> ApiResult<User>;

    /// `GET /api/scans`.
    fn list_scans(&self, credential: &Credential) -> ApiResult<Vec<ScanSummary>>;

    /// `POST /api/scans`. `domain` must already be normalised.
    fn create_scan(&self, credential: &Credential, domain: &str) -> ApiResult<ScanSummary>;

    /// `GET /api/scans/{id}`.
    fn scan_detail(&self, credential: &Credential, id: &ScanId) -> ApiResult<ScanDetail>;
}
