//! Authentication module - session lifecycle
//!
//! ```text
//!              login()                 success == "true" && err == 0
//! Anonymous ───────────▶ LoggingIn ─────────────────────────────────▶ Authenticated
//!     ▲                      │ rejected / failed                           │
//!     └──────────────────────┴──────────────────── logout() ───────────────┘
//! ```
//!
//! A rejected or failed login while already authenticated returns to
//! `Authenticated` with the previous credentials.
//!
//! The session token is only a local "logged in" marker; data calls reuse the
//! user's credentials. Nothing here returns an error to the caller: failures
//! are recorded as `login_error` / `login_message` for the front end to show.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::{Credentials, User};
use crate::services::api::ApiClient;
use crate::storage::{keys, KeyValueStore, SecureStore};

/// Message for a login attempted with blank fields
pub const MISSING_FIELDS_MSG: &str = "Please enter both user code and password";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    Anonymous,
    LoggingIn,
    Authenticated,
}

/// Where the front end should go next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Dashboard,
    Login,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    Authenticated(User),
    /// The server answered but refused the login (or the input was blank)
    Rejected { message: String },
    /// The call itself failed
    Failed { message: String },
}

#[derive(Debug)]
struct SessionState {
    phase: SessionPhase,
    user: Option<User>,
    credentials: Option<Credentials>,
    login_error: Option<String>,
    login_message: Option<String>,
    pending_navigation: Option<Route>,
    initialized: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: SessionPhase::Anonymous,
            user: None,
            credentials: None,
            login_error: None,
            login_message: None,
            pending_navigation: None,
            initialized: false,
        }
    }
}

pub struct SessionManager {
    api: Arc<ApiClient>,
    kv: Arc<dyn KeyValueStore>,
    secure: Arc<dyn SecureStore>,
    state: RwLock<SessionState>,
}

impl SessionManager {
    pub fn new(
        api: Arc<ApiClient>,
        kv: Arc<dyn KeyValueStore>,
        secure: Arc<dyn SecureStore>,
    ) -> Self {
        Self {
            api,
            kv,
            secure,
            state: RwLock::new(SessionState::default()),
        }
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Rebuild the session from persisted state. Returns whether a user is
    /// now authenticated.
    ///
    /// A token without a readable user record is treated as corrupt and
    /// cleared.
    pub async fn restore(&self) -> bool {
        let token = match self.secure.get_token().await {
            Ok(token) => token,
            Err(e) => {
                log::error!("[session] Failed to read session token: {}", e);
                None
            }
        };

        if token.is_none() {
            log::debug!("[session] No session token, starting anonymous");
            let mut state = self.state.write().await;
            state.phase = SessionPhase::Anonymous;
            state.initialized = true;
            return false;
        }

        match self.load_user().await {
            Some(user) => {
                log::info!("[session] Restored session for {}", user.user_name);
                let mut state = self.state.write().await;
                state.credentials = Some(user.credentials());
                state.user = Some(user);
                state.phase = SessionPhase::Authenticated;
                state.initialized = true;
                true
            }
            None => {
                log::warn!("[session] Token present without user record, clearing session");
                self.clear_persisted().await;
                let mut state = self.state.write().await;
                *state = SessionState {
                    initialized: true,
                    ..SessionState::default()
                };
                false
            }
        }
    }

    /// Attempt a login. The submitted credentials are kept even if the
    /// attempt fails, so the form can be re-submitted.
    pub async fn login(&self, credentials: Credentials) -> LoginOutcome {
        if credentials.user_code.trim().is_empty() || credentials.password.is_empty() {
            let mut state = self.state.write().await;
            state.login_error = None;
            state.login_message = Some(MISSING_FIELDS_MSG.to_string());
            return LoginOutcome::Rejected {
                message: MISSING_FIELDS_MSG.to_string(),
            };
        }

        let previous = {
            let mut state = self.state.write().await;
            state.phase = SessionPhase::LoggingIn;
            state.login_error = None;
            state.login_message = None;
            state.credentials.replace(credentials.clone())
        };

        let response = match self.api.login(&credentials).await {
            Ok(response) => response,
            Err(e) => {
                log::error!("[session] Login request failed: {}", e);
                return self.fail(e.to_string(), previous).await;
            }
        };

        if !response.is_authenticated() {
            log::info!(
                "[session] Login refused for {} (success={}, err={:?})",
                credentials.user_code,
                response.success,
                response.err
            );
            let mut state = self.state.write().await;
            Self::settle_unsuccessful(&mut state, previous);
            state.login_message = Some(response.msg.clone());
            return LoginOutcome::Rejected {
                message: response.msg,
            };
        }

        if let Err(e) = self.secure.set_token(&response.token).await {
            log::error!("[session] Failed to store session token: {}", e);
            return self.fail(e.to_string(), previous).await;
        }

        let user = User::from_login(&response, &credentials);
        self.persist_user(&user).await;

        log::info!("[session] Logged in as {}", user.user_name);
        let mut state = self.state.write().await;
        state.phase = SessionPhase::Authenticated;
        state.user = Some(user.clone());
        state.login_error = None;
        state.login_message = None;
        state.pending_navigation = Some(Route::Dashboard);
        state.initialized = true;

        LoginOutcome::Authenticated(user)
    }

    /// End the session. Persisted token and user record are removed
    /// regardless of storage errors.
    pub async fn logout(&self) {
        if let Err(e) = self.secure.remove_token().await {
            log::error!("[session] Failed to remove session token: {}", e);
        }
        if let Err(e) = self.kv.remove_item(keys::AUTH_USER).await {
            log::error!("[session] Failed to remove user record: {}", e);
        }

        let mut state = self.state.write().await;
        state.phase = SessionPhase::Anonymous;
        state.user = None;
        state.credentials = None;
        state.pending_navigation = Some(Route::Login);
        log::info!("[session] Logged out");
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.read().await.phase == SessionPhase::Authenticated
    }

    pub async fn current_user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Credentials to pass to data calls
    pub async fn credentials(&self) -> Option<Credentials> {
        self.state.read().await.credentials.clone()
    }

    pub async fn login_error(&self) -> Option<String> {
        self.state.read().await.login_error.clone()
    }

    pub async fn login_message(&self) -> Option<String> {
        self.state.read().await.login_message.clone()
    }

    pub async fn pending_navigation(&self) -> Option<Route> {
        self.state.read().await.pending_navigation
    }

    pub async fn clear_pending_navigation(&self) {
        self.state.write().await.pending_navigation = None;
    }

    pub async fn phase(&self) -> SessionPhase {
        self.state.read().await.phase
    }

    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    async fn fail(&self, message: String, previous: Option<Credentials>) -> LoginOutcome {
        let mut state = self.state.write().await;
        Self::settle_unsuccessful(&mut state, previous);
        state.login_error = Some(message.clone());
        LoginOutcome::Failed { message }
    }

    /// An unsuccessful attempt never ends an existing session: the signed-in
    /// user keeps their credentials and the persisted token stays valid.
    /// Without a session the submitted credentials stay for the retry.
    fn settle_unsuccessful(state: &mut SessionState, previous: Option<Credentials>) {
        if state.user.is_some() {
            state.phase = SessionPhase::Authenticated;
            state.credentials = previous;
        } else {
            state.phase = SessionPhase::Anonymous;
        }
    }

    async fn load_user(&self) -> Option<User> {
        let raw = match self.kv.get_item(keys::AUTH_USER).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::error!("[session] Failed to read user record: {}", e);
                return None;
            }
        };

        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("[session] Stored user record is unreadable: {}", e);
                None
            }
        }
    }

    async fn persist_user(&self, user: &User) {
        let json = match serde_json::to_string(user) {
            Ok(json) => json,
            Err(e) => {
                log::error!("[session] Failed to encode user record: {}", e);
                return;
            }
        };
        if let Err(e) = self.kv.set_item(keys::AUTH_USER, &json).await {
            log::error!("[session] Failed to persist user record: {}", e);
        }
    }

    async fn clear_persisted(&self) {
        if let Err(e) = self.secure.remove_token().await {
            log::error!("[session] Failed to remove session token: {}", e);
        }
        if let Err(e) = self.kv.remove_item(keys::AUTH_USER).await {
            log::error!("[session] Failed to remove user record: {}", e);
        }
    }
}
