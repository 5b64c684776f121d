//! Session store.
//!
//! Owns the credential and the cached user identity. All writes to either go
//! through here; the gateway only reads the credential.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use filehost_api_client::{ApiClient, ClientError, LoginRequest, UniformError};

use crate::credential::Credential;
use crate::navigation::{Navigator, Route};
use crate::notify::Notifier;

/// Error types that mean the stored credential is no longer usable.
pub const SESSION_INVALID_ERRORS: [&str; 2] = ["EXPIRED_TOKEN", "TOKEN_VALIDATION_FAILURE"];

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful!";
pub const LOGIN_SUCCESS_DURATION_MS: u64 = 1_000;
pub const LOGOUT_MESSAGE: &str = "Logged out successfully";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again!";
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    LoggedOut,
    RestoringSession,
    Authenticated,
}

pub struct SessionStore {
    api: ApiClient,
    credential: Rc<Credential>,
    user: RefCell<Option<SessionUser>>,
    /// `initialize_session` calls awaiting `/auth/me`.
    restoring: Cell<u32>,
    notifier: Notifier,
    navigator: Rc<dyn Navigator>,
}

impl SessionStore {
    pub fn new(
        api: ApiClient,
        credential: Rc<Credential>,
        notifier: Notifier,
        navigator: Rc<dyn Navigator>,
    ) -> Self {
        Self {
            api,
            credential,
            user: RefCell::new(None),
            restoring: Cell::new(0),
            notifier,
            navigator,
        }
    }

    /// Exchange credentials for a token. Failures are returned as-is and
    /// are not shown to the user.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ClientError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;

        self.credential.set(&response.token);
        *self.user.borrow_mut() = Some(SessionUser { user_id: response.user_id });
        log::info!("Logged in as user {}", response.user_id);

        self.notifier.success_for(LOGIN_SUCCESS_MESSAGE, LOGIN_SUCCESS_DURATION_MS);
        self.navigator.navigate(Route::Home);
        Ok(())
    }

    /// Drop the session locally. No network call.
    pub fn logout(&self) {
        self.clear_session();
        self.notifier.info(LOGOUT_MESSAGE);
        self.navigator.navigate(Route::Login);
    }

    /// Resolve the user behind a restored credential.
    pub async fn initialize_session(&self) {
        if self.user.borrow().is_some() {
            return;
        }
        if !self.credential.is_present() {
            return;
        }

        self.restoring.set(self.restoring.get() + 1);
        let result = self.api.me().await;
        self.restoring.set(self.restoring.get().saturating_sub(1));

        match result {
            Ok(me) => {
                // A logout may have landed while the request was in flight.
                if self.credential.is_present() {
                    *self.user.borrow_mut() = Some(SessionUser { user_id: me.user_id });
                    log::info!("Session restored for user {}", me.user_id);
                } else {
                    log::debug!(
                        "Credential cleared during session restore; ignoring user {}",
                        me.user_id
                    );
                }
            }
            Err(ClientError::Api(e)) if is_session_invalid(&e) => {
                log::info!("Session invalidated: {}", e);
                self.notifier.error(SESSION_EXPIRED_MESSAGE);
                self.clear_session();
                self.navigator.navigate(Route::Login);
            }
            Err(ClientError::Api(e)) => {
                log::warn!("Session restore failed: {}", e);
                self.notifier.error(transient_message(&e));
            }
            Err(ClientError::Unexpected(msg)) => {
                log::error!("Unexpected error during session initialization: {}", msg);
                self.notifier.error(UNEXPECTED_ERROR_MESSAGE);
            }
        }
    }

    /// True whenever a credential is held, whether or not the user is known.
    pub fn is_authenticated(&self) -> bool {
        self.credential.is_present()
    }

    pub fn user(&self) -> Option<SessionUser> {
        *self.user.borrow()
    }

    pub fn token(&self) -> Option<String> {
        self.credential.get()
    }

    pub fn phase(&self) -> SessionPhase {
        if self.restoring.get() > 0 {
            SessionPhase::RestoringSession
        } else if self.credential.is_present() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::LoggedOut
        }
    }

    fn clear_session(&self) {
        self.credential.clear();
        *self.user.borrow_mut() = None;
    }
}

fn is_session_invalid(error: &UniformError) -> bool {
    SESSION_INVALID_ERRORS.iter().any(|t| error.is(t))
}

fn transient_message(error: &UniformError) -> String {
    let error_type = match error.error_type.as_str() {
        "" => "Unknown error",
        t => t,
    };
    let message = match error.error_message.as_str() {
        "" => "Please try again.",
        m => m,
    };
    format!("An error occurred: {}: {}", error_type, message)
}
