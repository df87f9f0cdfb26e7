// ScanBoard - app/testing.rs
//
// In-memory `ScanApi` used by unit tests. Behaves like the real backend for
// accounts and tokens; scan responses are scripted per test.

use crate::api::ScanApi;
use crate::core::model::{
    parse_timestamp, Credential, Registration, ScanDetail, ScanId, ScanStatus, ScanSummary, User,
    UserId,
};
use crate::util::error::{ApiError, ApiResult};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Mutex};

/// A scripted response for `scan_detail`.
#[derive(Debug, Clone)]
pub enum DetailReply {
    Found(ScanDetail),
    NotFound,
    /// Server-side failure the poller should treat as transient.
    Unavailable,
}

#[derive(Default)]
struct Inner {
    accounts: Vec<(String, String, User)>,
    tokens: HashMap<String, usize>,
    issued: usize,
    list_script: VecDeque<Vec<ScanSummary>>,
    last_list: Vec<ScanSummary>,
    detail_script: VecDeque<DetailReply>,
    last_detail: Option<DetailReply>,
    created_domains: Vec<String>,
    next_scan_id: u64,
}

/// Fake backend.
#[derive(Default)]
pub struct FakeApi {
    inner: Mutex<Inner>,
    requests: AtomicUsize,
    detail_hold: Mutex<Option<(mpsc::Sender<()>, mpsc::Receiver<()>)>>,
}

impl FakeApi {
    /// Backend with one registered account.
    pub fn with_account(email: &str, password: &str, username: &str) -> Self {
        let api = Self::default();
        api.add_account(email, password, username);
        api
    }

    fn add_account(&self, email: &str, password: &str, username: &str) -> User {
        let mut inner = self.inner.lock().unwrap();
        let user = User {
            id: UserId::new((inner.accounts.len() + 1).to_string()),
            username: username.to_string(),
            email: email.to_string(),
        };
        inner
            .accounts
            .push((email.to_string(), password.to_string(), user.clone()));
        user
    }

    /// Issue a valid token for the first account without going through the API.
    pub fn issue_token(&self) -> Credential {
        let mut inner = self.inner.lock().unwrap();
        inner.issued += 1;
        let token = format!("token-{}", inner.issued);
        inner.tokens.insert(token.clone(), 0);
        Credential::new(token)
    }

    /// Invalidate every issued token; subsequent authenticated calls return 401.
    pub fn revoke_all(&self) {
        self.inner.lock().unwrap().tokens.clear();
    }

    /// Total number of API calls received.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Queue a list snapshot. Once the queue drains, the last snapshot repeats.
    pub fn push_list(&self, scans: Vec<ScanSummary>) {
        self.inner.lock().unwrap().list_script.push_back(scans);
    }

    /// Queue a detail reply. Once the queue drains, the last reply repeats.
    pub fn push_detail(&self, reply: DetailReply) {
        self.inner.lock().unwrap().detail_script.push_back(reply);
    }

    /// Id assigned to the next created scan.
    pub fn set_next_scan_id(&self, id: u64) {
        self.inner.lock().unwrap().next_scan_id = id;
    }

    /// Domains received by `create_scan`, in order.
    pub fn created_domains(&self) -> Vec<String> {
        self.inner.lock().unwrap().created_domains.clone()
    }

    /// Make the next `scan_detail` call block until released.
    ///
    /// Returns `(entered, release)`: `entered` fires once the call is in
    /// flight, sending on `release` lets it complete.
    pub fn hold_next_detail(&self) -> (mpsc::Receiver<()>, mpsc::Sender<()>) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        *self.detail_hold.lock().unwrap() = Some((entered_tx, release_rx));
        (entered_rx, release_tx)
    }

    fn count(&self) {
        self.requests.fetch_add(1, Ordering::SeqCst);
    }

    fn authorise(&self, credential: &Credential) -> ApiResult<User> {
        let inner = self.inner.lock().unwrap();
        inner
            .tokens
            .get(credential.token())
            .and_then(|&idx| inner.accounts.get(idx))
            .map(|(_, _, user)| user.clone())
            .ok_or_else(|| ApiError::Auth {
                detail: "Could not validate credentials".to_string(),
            })
    }
}

impl ScanApi for FakeApi {
    fn register(&self, registration: &Registration) -> ApiResult<User> {
        self.count();
        let exists = self
            .inner
            .lock()
            .unwrap()
            .accounts
            .iter()
            .any(|(email, _, _)| email == &registration.email);
        if exists {
            return Err(ApiError::Validation {
                detail: "Email already registered".to_string(),
            });
        }
        Ok(self.add_account(
            &registration.email,
            &registration.password,
            &registration.username,
        ))
    }

    fn request_token(&self, identifier: &str, secret: &str) -> ApiResult<Credential> {
        self.count();
        let mut inner = self.inner.lock().unwrap();
        let idx = inner
            .accounts
            .iter()
            .position(|(email, password, _)| email == identifier && password == secret)
            .ok_or_else(|| ApiError::Auth {
                detail: "Incorrect email or password".to_string(),
            })?;
        inner.issued += 1;
        let token = format!("token-{}", inner.issued);
        inner.tokens.insert(token.clone(), idx);
        Ok(Credential::new(token))
    }

    fn current_user(&self, credential: &Credential) -> ApiResult<User> {
        self.count();
        self.authorise(credential)
    }

    fn list_scans(&self, credential: &Credential) -> ApiResult<Vec<ScanSummary>> {
        self.count();
        self.authorise(credential)?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(next) = inner.list_script.pop_front() {
            inner.last_list = next;
        }
        Ok(inner.last_list.clone())
    }

    fn create_scan(&self, credential: &Credential, domain: &str) -> ApiResult<ScanSummary> {
        self.count();
        self.authorise(credential)?;
        let mut inner = self.inner.lock().unwrap();
        inner.created_domains.push(domain.to_string());
        inner.next_scan_id += 1;
        let id = inner.next_scan_id - 1;
        Ok(summary(&id.to_string(), domain, ScanStatus::Pending, 0))
    }

    fn scan_detail(&self, credential: &Credential, id: &ScanId) -> ApiResult<ScanDetail> {
        self.count();
        let hold = self.detail_hold.lock().unwrap().take();
        if let Some((entered, release)) = hold {
            let _ = entered.send(());
            let _ = release.recv();
        }
        self.authorise(credential)?;
        let mut inner = self.inner.lock().unwrap();
        if let Some(next) = inner.detail_script.pop_front() {
            inner.last_detail = Some(next);
        }
        match inner.last_detail.clone() {
            Some(DetailReply::Found(detail)) => Ok(detail),
            Some(DetailReply::Unavailable) => Err(ApiError::Http {
                status: 503,
                detail: "Service Unavailable".to_string(),
            }),
            Some(DetailReply::NotFound) | None => Err(ApiError::NotFound {
                resource: format!("Scan {id}"),
            }),
        }
    }
}

/// Build a scan summary with fixed timestamps.
pub fn summary(id: &str, domain: &str, status: ScanStatus, progress: u8) -> ScanSummary {
    let ts = parse_timestamp("2025-01-01T00:00:00").unwrap();
    ScanSummary {
        id: ScanId::new(id),
        domain: domain.to_string(),
        status,
        progress,
        current_step: None,
        created_at: ts,
        updated_at: ts,
    }
}

/// Build a scan detail with no tool output.
pub fn detail(id: &str, domain: &str, status: ScanStatus, progress: u8) -> ScanDetail {
    ScanDetail {
        summary: summary(id, domain, status, progress),
        subfinder_results: None,
        httpx_results: None,
        nuclei_results: None,
        katana_results: None,
        xss_results: None,
        dalfox_results: None,
    }
}
