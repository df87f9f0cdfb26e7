// ScanBoard - app/session.rs
//
// Session store: the bearer credential, the user it resolves to, and the
// persisted copy of the credential that survives restarts.
//
// Design principles:
// - The credential is saved atomically (write→temp, rename→final) so a crash
//   during save never leaves a half-written token behind.
// - Read errors on the persisted credential are treated as "no session"; the
//   user simply sees the login form.
// - Logout and credential rejection clear memory and disk together.
// - The session is passed explicitly to every API call; nothing here touches
//   shared request headers.

use crate::api::ScanApi;
use crate::core::model::{Credential, Registration, Session, User};
use crate::util::constants::CREDENTIAL_FILE_NAME;
use crate::util::error::{ApiError, ApiResult, SessionError};
use std::path::{Path, PathBuf};

// =============================================================================
// Credential persistence
// =============================================================================

/// Resolve the credential file path from the platform data directory.
pub fn credential_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CREDENTIAL_FILE_NAME)
}

/// Save the token to `path` atomically (write temp → rename).
///
/// On Unix the file is created readable by the owner only.
pub fn save_credential(credential: &Credential, path: &Path) -> Result<(), SessionError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| SessionError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, credential.token().as_bytes()).map_err(|e| SessionError::Write {
        path: tmp.clone(),
        source: e,
    })?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) = std::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600)) {
            tracing::debug!(path = %tmp.display(), error = %e, "Cannot restrict credential permissions");
        }
    }

    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        SessionError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })?;

    tracing::debug!(path = %path.display(), "Credential saved");
    Ok(())
}

/// Load the persisted token. Returns `None` when absent, unreadable, or blank.
pub fn load_credential(path: &Path) -> Option<Credential> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::debug!(path = %path.display(), error = %e, "Cannot read credential file");
            }
        })
        .ok()?;

    let token = content.trim();
    if token.is_empty() {
        tracing::warn!(path = %path.display(), "Credential file is empty; ignoring");
        return None;
    }
    Some(Credential::new(token))
}

/// Remove the persisted token. A missing file is not an error.
pub fn remove_credential(path: &Path) -> Result<(), SessionError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(SessionError::Remove {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

// =============================================================================
// Network flows (thread-safe, no store access)
// =============================================================================

/// Exchange email + password for a credential and resolve the user behind it.
pub fn authenticate(api: &dyn ScanApi, identifier: &str, secret: &str) -> ApiResult<Session> {
    require_present(&[("Email", identifier), ("Password", secret)])?;
    let credential = api.request_token(identifier, secret)?;
    let user = api.current_user(&credential)?;
    tracing::info!(user = %user.username, "Logged in");
    Ok(Session {
        credential,
        user: Some(user),
    })
}

/// Create an account. Blank fields are rejected before any request is sent.
pub fn register(api: &dyn ScanApi, registration: &Registration) -> ApiResult<User> {
    require_present(&[
        ("Email", &registration.email),
        ("Username", &registration.username),
        ("Password", &registration.password),
    ])?;
    let user = api.register(registration)?;
    tracing::info!(user = %user.username, "Account registered");
    Ok(user)
}

/// Outcome of register-then-login.
#[derive(Debug)]
pub enum RegisterOutcome {
    /// Account created and logged in.
    LoggedIn(Session),
    /// Account created but the follow-up login failed.
    RegisteredOnly,
}

/// Register, then log in with the same credentials.
pub fn register_and_login(
    api: &dyn ScanApi,
    registration: &Registration,
) -> ApiResult<RegisterOutcome> {
    register(api, registration)?;
    match authenticate(api, &registration.email, &registration.password) {
        Ok(session) => Ok(RegisterOutcome::LoggedIn(session)),
        Err(e) => {
            tracing::warn!(error = %e, "Auto-login after registration failed");
            Ok(RegisterOutcome::RegisteredOnly)
        }
    }
}

/// Resolve a persisted credential into a session.
pub fn resolve(api: &dyn ScanApi, credential: Credential) -> ApiResult<Session> {
    let user = api.current_user(&credential)?;
    Ok(Session {
        credential,
        user: Some(user),
    })
}

fn require_present(fields: &[(&str, &str)]) -> ApiResult<()> {
    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((name, _)) => Err(ApiError::Validation {
            detail: format!("{name} is required"),
        }),
        None => Ok(()),
    }
}

// =============================================================================
// SessionStore
// =============================================================================

/// Owns the current session and its persisted credential.
///
/// Lives on the UI thread. Background tasks run the network flows above and
/// hand their result back to `establish`.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: Option<Session>,
}

impl SessionStore {
    /// Create an empty store backed by the credential file at `path`.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            current: None,
        }
    }

    /// The credential persisted by a previous run, if any.
    pub fn persisted_credential(&self) -> Option<Credential> {
        load_credential(&self.path)
    }

    /// Current session, if logged in.
    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Current credential, if logged in.
    pub fn credential(&self) -> Option<&Credential> {
        self.current.as_ref().map(|s| &s.credential)
    }

    /// Current user, if resolved.
    pub fn user(&self) -> Option<&User> {
        self.current.as_ref().and_then(|s| s.user.as_ref())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Adopt `session` and persist its credential.
    ///
    /// A persistence failure is logged; the in-memory session still applies,
    /// it just will not survive a restart.
    pub fn establish(&mut self, session: Session) -> &Session {
        if let Err(e) = save_credential(&session.credential, &self.path) {
            tracing::warn!(error = %e, "Credential not persisted");
        }
        self.current.insert(session)
    }

    /// Log in synchronously: authenticate, then establish.
    pub fn login(
        &mut self,
        api: &dyn ScanApi,
        identifier: &str,
        secret: &str,
    ) -> ApiResult<&Session> {
        let session = authenticate(api, identifier, secret)?;
        Ok(self.establish(session))
    }

    /// Restore a session from the persisted credential.
    ///
    /// Any failure to resolve the user clears the credential; returns the
    /// restored session or `None`.
    pub fn restore(&mut self, api: &dyn ScanApi) -> Option<&Session> {
        let credential = self.persisted_credential()?;
        match resolve(api, credential) {
            Ok(session) => {
                self.current = Some(session);
                self.current.as_ref()
            }
            Err(e) => {
                tracing::info!(error = %e, "Persisted credential rejected; clearing");
                self.logout();
                None
            }
        }
    }

    /// Clear the in-memory session and the persisted credential.
    pub fn logout(&mut self) {
        self.current = None;
        if let Err(e) = remove_credential(&self.path) {
            tracing::warn!(error = %e, "Cannot remove persisted credential");
        }
        tracing::info!("Session cleared");
    }
}

// =============================================================================
// Unit tests
// =============================================================================
