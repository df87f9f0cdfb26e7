// ScanBoard - app/controller.rs
//
// Application controller: owns the session, the view state, and the
// background workers, and ties each poller's lifetime to its view.
//
// Lifecycle rules:
//   - Entering Dashboard starts the list poller; leaving stops it.
//   - Entering ScanDetail(id) starts the detail poller for `id`; leaving, or
//     switching to another id, stops it first.
//   - Protected views without a session resolve to Login.
//   - A 401 from any authenticated call ends the session and shows Login.
//
// The controller is UI-toolkit agnostic; `gui.rs` calls `tick` once per
// frame, renders `state`, then hands any recorded intent to `handle`.

use crate::api::ScanApi;
use crate::app::poller::PollEvent;
use crate::app::scans::{self, DetailPoller, ListPoller, PollSettings};
use crate::app::session::{self, RegisterOutcome, SessionStore};
use crate::app::state::{AppState, DetailState, UiAction, View};
use crate::app::tasks::Task;
use crate::core::model::{Registration, ScanSummary, Session};
use crate::core::results::ResultTab;
use crate::util::constants::{MAX_POLL_MESSAGES_PER_FRAME, REGISTERED_LOGIN_MANUALLY};
use crate::util::error::ApiResult;
use std::sync::Arc;

/// Shown on the login form when the backend rejects the stored credential.
const SESSION_EXPIRED: &str = "Session expired. Please log in again.";

pub struct AppController {
    pub state: AppState,
    session: SessionStore,
    api: Arc<dyn ScanApi>,
    settings: PollSettings,
    list_poller: ListPoller,
    detail_poller: DetailPoller,
    restore_task: Task<ApiResult<Session>>,
    login_task: Task<ApiResult<Session>>,
    register_task: Task<ApiResult<RegisterOutcome>>,
    submit_task: Task<ApiResult<ScanSummary>>,
    list_refresh: Task<ApiResult<Vec<ScanSummary>>>,
}

impl AppController {
    /// Create the controller and begin restoring any persisted session.
    pub fn new(
        api: Arc<dyn ScanApi>,
        session: SessionStore,
        settings: PollSettings,
        debug_mode: bool,
    ) -> Self {
        let mut controller = Self {
            state: AppState::new(debug_mode),
            session,
            api,
            settings,
            list_poller: ListPoller::new("scan-list"),
            detail_poller: DetailPoller::new("scan-detail"),
            restore_task: Task::new("restore-session"),
            login_task: Task::new("login"),
            register_task: Task::new("register"),
            submit_task: Task::new("create-scan"),
            list_refresh: Task::new("list-refresh"),
        };
        controller.begin_restore();
        controller
    }

    /// Session store (read-only; mutations go through the controller).
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// True while any background work is outstanding, so the UI should keep
    /// repainting to pick up results.
    pub fn is_busy(&self) -> bool {
        self.list_poller.is_active()
            || self.detail_poller.is_active()
            || self.restore_task.is_running()
            || self.login_task.is_running()
            || self.register_task.is_running()
            || self.submit_task.is_running()
            || self.list_refresh.is_running()
    }

    fn begin_restore(&mut self) {
        match self.session.persisted_credential() {
            Some(credential) => {
                let api = Arc::clone(&self.api);
                self.restore_task
                    .spawn(move || session::resolve(api.as_ref(), credential));
                self.state.view = View::Loading;
                self.state.status_message = "Restoring session...".to_string();
            }
            None => self.state.view = View::Login,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Switch views, stopping the poller of the view being left and starting
    /// the poller of the view being entered.
    pub fn navigate(&mut self, target: View) {
        let target = if target.is_protected() && !self.session.is_authenticated() {
            View::Login
        } else {
            target
        };
        if target == self.state.view {
            return;
        }

        match self.state.view {
            View::Dashboard => self.list_poller.stop(),
            View::ScanDetail(_) => self.detail_poller.stop(),
            _ => {}
        }

        if let Some(credential) = self.session.credential().cloned() {
            match &target {
                View::Dashboard => {
                    // The poller's first fetch supersedes any pending side refresh.
                    self.list_refresh.cancel();
                    scans::watch_list(
                        &mut self.list_poller,
                        Arc::clone(&self.api),
                        credential,
                        self.settings.list_interval,
                    );
                }
                View::ScanDetail(id) => {
                    self.state.detail = DetailState::Loading;
                    self.state.selected_tab = ResultTab::Overview;
                    scans::watch_detail(
                        &mut self.detail_poller,
                        Arc::clone(&self.api),
                        credential,
                        id.clone(),
                        &self.settings,
                    );
                }
                _ => {}
            }
        }

        tracing::debug!(from = ?self.state.view, to = ?target, "Navigate");
        self.state.view = target;
    }

    // =========================================================================
    // User intents
    // =========================================================================

    /// Carry out an intent recorded by a panel.
    pub fn handle(&mut self, action: UiAction) {
        match action {
            UiAction::SubmitLogin => self.submit_login(),
            UiAction::SubmitRegister => self.submit_register(),
            UiAction::SubmitScan => self.submit_scan(),
            UiAction::OpenScan(id) => self.navigate(View::ScanDetail(id)),
            UiAction::Refresh => match self.state.view {
                View::Dashboard => self.list_poller.refresh_now(),
                View::ScanDetail(_) => self.detail_poller.refresh_now(),
                _ => {}
            },
            UiAction::Navigate(view) => self.navigate(view),
            UiAction::Logout => self.logout(),
        }
    }

    fn submit_login(&mut self) {
        if self.login_task.is_running() {
            return;
        }
        let form = &mut self.state.login;
        form.error = None;
        form.notice = None;
        form.busy = true;

        let api = Arc::clone(&self.api);
        let email = form.email.clone();
        let password = form.password.clone();
        self.login_task
            .spawn(move || session::authenticate(api.as_ref(), &email, &password));
    }

    fn submit_register(&mut self) {
        if self.register_task.is_running() {
            return;
        }
        let form = &mut self.state.register;
        form.error = None;
        form.busy = true;

        let api = Arc::clone(&self.api);
        let registration = Registration {
            email: form.email.clone(),
            username: form.username.clone(),
            password: form.password.clone(),
        };
        self.register_task
            .spawn(move || session::register_and_login(api.as_ref(), &registration));
    }

    fn submit_scan(&mut self) {
        if self.submit_task.is_running() {
            return;
        }
        self.state.scan_form.error = None;

        let domain = match scans::normalise_domain(&self.state.scan_form.domain) {
            Ok(d) => d,
            Err(e) => {
                self.state.scan_form.error = Some(e.user_message());
                return;
            }
        };
        let Some(credential) = self.session.credential().cloned() else {
            self.expire_session();
            return;
        };

        self.state.scan_form.busy = true;
        let api = Arc::clone(&self.api);
        self.submit_task
            .spawn(move || scans::submit_scan(api.as_ref(), &credential, &domain));
    }

    /// End the session at the user's request.
    pub fn logout(&mut self) {
        self.end_session();
        self.state.status_message = "Logged out.".to_string();
    }

    /// End the session because the backend rejected the credential.
    fn expire_session(&mut self) {
        self.end_session();
        self.state.login.error = Some(SESSION_EXPIRED.to_string());
        self.state.status_message = SESSION_EXPIRED.to_string();
    }

    fn end_session(&mut self) {
        self.list_poller.stop();
        self.detail_poller.stop();
        self.submit_task.cancel();
        self.list_refresh.cancel();
        self.session.logout();
        self.state.clear_session_data();
        self.navigate(View::Login);
    }

    fn enter_session(&mut self, session: Session) {
        if let Some(user) = &session.user {
            self.state.status_message = format!("Logged in as {}.", user.username);
        }
        self.session.establish(session);
        self.navigate(View::Dashboard);
    }

    // =========================================================================
    // Per-frame update
    // =========================================================================

    /// Apply every finished task result and pending poll event.
    ///
    /// Returns `true` if anything changed.
    pub fn tick(&mut self) -> bool {
        let mut changed = false;

        if let Some(result) = self.restore_task.poll() {
            changed = true;
            match result {
                Ok(session) => self.enter_session(session),
                Err(e) => {
                    tracing::info!(error = %e, "Stored session could not be restored");
                    self.session.logout();
                    self.state.status_message = "Ready.".to_string();
                    self.navigate(View::Login);
                }
            }
        }

        if let Some(result) = self.login_task.poll() {
            changed = true;
            self.state.login.busy = false;
            match result {
                Ok(session) => {
                    self.state.login.password.clear();
                    self.enter_session(session);
                }
                Err(e) => self.state.login.error = Some(e.user_message()),
            }
        }

        if let Some(result) = self.register_task.poll() {
            changed = true;
            self.state.register.busy = false;
            match result {
                Ok(RegisterOutcome::LoggedIn(session)) => {
                    self.state.register = Default::default();
                    self.enter_session(session);
                }
                Ok(RegisterOutcome::RegisteredOnly) => {
                    self.state.login.email = std::mem::take(&mut self.state.register.email);
                    self.state.register = Default::default();
                    self.state.login.notice = Some(REGISTERED_LOGIN_MANUALLY.to_string());
                    self.navigate(View::Login);
                }
                Err(e) => self.state.register.error = Some(e.user_message()),
            }
        }

        if let Some(result) = self.submit_task.poll() {
            changed = true;
            self.state.scan_form.busy = false;
            match result {
                Ok(created) => {
                    self.state.scan_form.domain.clear();
                    self.spawn_list_refresh();
                    self.navigate(View::ScanDetail(created.id));
                }
                Err(e) if e.is_auth() => self.expire_session(),
                Err(e) => self.state.scan_form.error = Some(e.user_message()),
            }
        }

        if let Some(result) = self.list_refresh.poll() {
            changed = true;
            match result {
                Ok(list) => self.apply_list(list),
                Err(e) if e.is_auth() => self.expire_session(),
                Err(e) => tracing::warn!(error = %e, "Scan list refresh failed"),
            }
        }

        for event in self.list_poller.poll_events(MAX_POLL_MESSAGES_PER_FRAME) {
            changed = true;
            match event {
                PollEvent::Updated(list) => self.apply_list(list),
                PollEvent::Unauthorized => {
                    self.expire_session();
                    break;
                }
                PollEvent::NotFound | PollEvent::Finished => {}
            }
        }

        for event in self.detail_poller.poll_events(MAX_POLL_MESSAGES_PER_FRAME) {
            changed = true;
            match event {
                PollEvent::Updated(detail) => {
                    self.state.detail = DetailState::Loaded(Box::new(detail));
                }
                PollEvent::NotFound => {
                    // Keep the last good snapshot if one was shown.
                    if !matches!(self.state.detail, DetailState::Loaded(_)) {
                        self.state.detail = DetailState::NotFound;
                    }
                }
                PollEvent::Unauthorized => {
                    self.expire_session();
                    break;
                }
                PollEvent::Finished => {
                    self.state.status_message = "Scan finished.".to_string();
                }
            }
        }

        changed
    }

    fn apply_list(&mut self, list: Vec<ScanSummary>) {
        self.state.scans = list;
        self.state.scans_loaded = true;
        self.state.status_message = format!(
            "{} scan(s) \u{00b7} updated {}",
            self.state.scans.len(),
            chrono::Local::now().format("%H:%M:%S")
        );
    }

    /// Fire-and-forget list fetch after a scan is created.
    fn spawn_list_refresh(&mut self) {
        let Some(credential) = self.session.credential().cloned() else {
            return;
        };
        let api = Arc::clone(&self.api);
        self.list_refresh.spawn(move || api.list_scans(&credential));
    }

    /// Inline error for the form on the current view, if any.
    pub fn form_error(&self) -> Option<&str> {
        match self.state.view {
            View::Login => self.state.login.error.as_deref(),
            View::Register => self.state.register.error.as_deref(),
            View::Dashboard => self.state.scan_form.error.as_deref(),
            _ => None,
        }
    }
}

impl Drop for AppController {
    fn drop(&mut self) {
        self.list_poller.stop();
        self.detail_poller.stop();
    }
}
