//! Token-based session management.
//!
//! `AuthSession` owns the in-memory session (current user, loading flag)
//! and keeps it in step with the durable token store: validation on
//! startup, persistence on login, erasure on logout or failed validation.

// Allow dead code: the optional remote-logout path is not key-bound
#![allow(dead_code)]

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::TokenStore;
use crate::models::{Credentials, User};

/// Where the session is in its lifecycle.
///
/// `Validating` only occurs during startup, while a stored token is being
/// checked against `/auth/me`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Unauthenticated,
    Validating,
    Authenticated,
}

pub struct AuthSession {
    api: ApiClient,
    store: Arc<dyn TokenStore>,
    user: Option<User>,
    phase: AuthPhase,
    loading: bool,
}

impl AuthSession {
    /// Create an empty session. Nothing is read from the store until
    /// `initialize` runs.
    pub fn new(api: ApiClient, store: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            store,
            user: None,
            phase: AuthPhase::Unauthenticated,
            loading: false,
        }
    }

    /// Startup transition: if the store holds a token, validate it against
    /// the server. A valid token resolves the user; any failure erases the
    /// token so reloads don't retry a dead session.
    pub async fn initialize(&mut self) {
        if self.store.token().is_none() {
            debug!("No stored token, starting unauthenticated");
            return;
        }

        self.phase = AuthPhase::Validating;
        match self.api.current_user().await {
            Ok(user) => {
                info!(user = %user.email, "Stored token validated");
                self.user = Some(user);
                self.phase = AuthPhase::Authenticated;
            }
            Err(e) => {
                warn!(error = %e, "Stored token failed validation, clearing it");
                if let Err(e) = self.store.clear_token() {
                    warn!(error = %e, "Failed to clear stored token");
                }
                self.user = None;
                self.phase = AuthPhase::Unauthenticated;
            }
        }
    }

    /// Log in with the given credentials. On success the token is
    /// persisted and the user is held in memory; on failure neither is
    /// touched and the error goes back to the caller to surface.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<User, ApiError> {
        self.loading = true;
        let result = self.api.login(credentials).await;
        self.loading = false;

        let response = result?;
        if let Err(e) = self.store.set_token(&response.token) {
            warn!(error = %e, "Failed to persist token");
        }
        self.user = Some(response.user.clone());
        self.phase = AuthPhase::Authenticated;
        info!(user = %response.user.email, "Login successful");
        Ok(response.user)
    }

    /// Local, unconditional logout: erase the stored token and drop the
    /// in-memory user. Safe to call when already logged out.
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear_token() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.user = None;
        self.phase = AuthPhase::Unauthenticated;
    }

    /// Logout with a best-effort server notification. The remote call uses
    /// the still-stored token and its failure never blocks the local
    /// transition.
    pub async fn logout_remote(&mut self) {
        if let Err(e) = self.api.notify_logout().await {
            debug!(error = %e, "Logout notification failed");
        }
        self.logout();
    }

    /// Derived, never stored: authenticated means a user was resolved in
    /// this process lifetime. A token sitting in storage is not enough.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn phase(&self) -> AuthPhase {
        self.phase
    }

    /// True while a login call is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }
}
