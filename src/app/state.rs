// ScanBoard - app/state.rs
//
// View state: which view is showing, the cached server snapshots each view
// renders, form inputs, and the status line.
// Owned by the controller; panels read it and record user intents in
// `pending_action` for the controller to carry out after rendering.

use crate::core::model::{ScanDetail, ScanId, ScanSummary};
use crate::core::results::ResultTab;

/// The views of the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    /// Persisted session is being resolved.
    Loading,
    Login,
    Register,
    Dashboard,
    ScanDetail(ScanId),
}

impl View {
    /// Views that require a session.
    pub fn is_protected(&self) -> bool {
        matches!(self, View::Dashboard | View::ScanDetail(_))
    }
}

/// What the detail view shows.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DetailState {
    /// Waiting for the first response.
    #[default]
    Loading,
    Loaded(Box<ScanDetail>),
    NotFound,
}

impl DetailState {
    pub fn scan(&self) -> Option<&ScanDetail> {
        match self {
            DetailState::Loaded(d) => Some(d),
            _ => None,
        }
    }
}

/// Login form inputs.
#[derive(Debug, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    /// Inline error from the last attempt.
    pub error: Option<String>,
    /// Informational message (e.g. after registration).
    pub notice: Option<String>,
    pub busy: bool,
}

/// Registration form inputs.
#[derive(Debug, Default)]
pub struct RegisterForm {
    pub email: String,
    pub username: String,
    pub password: String,
    pub error: Option<String>,
    pub busy: bool,
}

/// New-scan form on the dashboard.
#[derive(Debug, Default)]
pub struct ScanForm {
    pub domain: String,
    pub error: Option<String>,
    pub busy: bool,
}

/// User intents recorded by panels during rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    SubmitLogin,
    SubmitRegister,
    SubmitScan,
    OpenScan(ScanId),
    /// Fetch the current view's data now instead of waiting for the next tick.
    Refresh,
    Navigate(View),
    Logout,
}

/// Top-level view state.
#[derive(Debug)]
pub struct AppState {
    /// View currently shown.
    pub view: View,

    /// Last scan list received; replaced wholesale on every poll.
    pub scans: Vec<ScanSummary>,

    /// True once the list has been received at least once this session.
    pub scans_loaded: bool,

    /// Detail view content for the open scan.
    pub detail: DetailState,

    /// Selected result tab in the detail view.
    pub selected_tab: ResultTab,

    pub login: LoginForm,
    pub register: RegisterForm,
    pub scan_form: ScanForm,

    /// Status message for the status bar.
    pub status_message: String,

    /// Non-fatal warnings (config problems) shown in the status bar tooltip.
    pub warnings: Vec<String>,

    /// Intent recorded by the last rendered frame.
    pub pending_action: Option<UiAction>,

    /// Whether to show the About window.
    pub show_about: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,
}

impl AppState {
    pub fn new(debug_mode: bool) -> Self {
        Self {
            view: View::Loading,
            scans: Vec::new(),
            scans_loaded: false,
            detail: DetailState::Loading,
            selected_tab: ResultTab::Overview,
            login: LoginForm::default(),
            register: RegisterForm::default(),
            scan_form: ScanForm::default(),
            status_message: "Ready.".to_string(),
            warnings: Vec::new(),
            pending_action: None,
            show_about: false,
            debug_mode,
        }
    }

    /// Record an intent; the first one in a frame wins.
    pub fn request(&mut self, action: UiAction) {
        if self.pending_action.is_none() {
            self.pending_action = Some(action);
        }
    }

    /// Drop everything tied to the previous session.
    pub fn clear_session_data(&mut self) {
        self.scans.clear();
        self.scans_loaded = false;
        self.detail = DetailState::Loading;
        self.selected_tab = ResultTab::Overview;
        self.scan_form = ScanForm::default();
        self.login.password.clear();
        self.register.password.clear();
    }
}
