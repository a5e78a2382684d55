//! Application state management for the Snaproom client.
//!
//! `App` holds the auth session, the current page, and the login form
//! buffers. The presentational layer renders from this state and pushes
//! key events back into it.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::api::{ApiClient, ApiError};
use crate::auth::{AuthSession, FileTokenStore, TokenStore};
use crate::config::Config;
use crate::models::Credentials;

/// Maximum length for email input.
/// 64 characters covers the local part plus common domains.
const MAX_EMAIL_LENGTH: usize = 64;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// The page being shown, the terminal stand-in for the `/` and `/login`
/// routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Login,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

pub struct App {
    // Core services
    pub config: Config,
    pub session: AuthSession,

    // UI state
    pub state: AppState,
    pub page: Page,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
}

impl App {
    /// Create a new application instance with the durable token store.
    pub fn new(config: Config) -> Result<Self> {
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(Config::data_dir()?));
        let api = ApiClient::new(&config.api_base_url, Arc::clone(&store));
        let session = AuthSession::new(api, store);
        Ok(Self::from_parts(config, session))
    }

    fn from_parts(config: Config, session: AuthSession) -> Self {
        Self {
            config,
            session,
            state: AppState::Normal,
            page: Page::Home,
            login_email: String::new(),
            login_password: String::new(),
            login_focus: LoginFocus::Email,
            login_error: None,
        }
    }

    /// Build an app around an existing session, for tests that inject a
    /// mock server and an in-memory token store.
    #[cfg(test)]
    pub fn with_session(config: Config, session: AuthSession) -> Self {
        Self::from_parts(config, session)
    }

    /// Startup: validate any stored token before the first frame.
    pub async fn initialize(&mut self) {
        self.session.initialize().await;
    }

    /// Navigate to the login page
    pub fn start_login(&mut self) {
        self.page = Page::Login;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Leave the login page without submitting. Entered text is kept.
    pub fn cancel_login(&mut self) {
        self.page = Page::Home;
        self.login_error = None;
    }

    /// Submit the login form. On success navigates home; on failure sets
    /// a form-level error and leaves the entered fields intact.
    pub async fn attempt_login(&mut self) {
        if self.login_email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;
        let credentials = Credentials {
            email: self.login_email.clone(),
            password: self.login_password.clone(),
        };

        match self.session.login(&credentials).await {
            Ok(user) => {
                info!(user = %user.email, "Logged in");
                self.login_password.clear();
                self.page = Page::Home;
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.login_error = Some(Self::login_error_message(&e));
            }
        }
    }

    /// Log out locally and return to the home page.
    pub fn logout(&mut self) {
        self.session.logout();
        self.page = Page::Home;
        info!("Logged out");
    }

    fn login_error_message(e: &ApiError) -> String {
        match e {
            ApiError::Http { status: 401 | 403, .. } => "Invalid email or password".to_string(),
            ApiError::Network(_) => {
                "Unable to connect to server. Check your internet connection.".to_string()
            }
            ApiError::Http { status, .. } => format!("Login failed (HTTP {})", status),
        }
    }

    pub fn can_add_email_char(&self) -> bool {
        self.login_email.chars().count() < MAX_EMAIL_LENGTH
    }

    pub fn can_add_password_char(&self) -> bool {
        self.login_password.chars().count() < MAX_PASSWORD_LENGTH
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn app_against(server: &MockServer, store: Arc<MemoryTokenStore>) -> App {
        let config = Config {
            api_base_url: server.uri(),
        };
        let api = ApiClient::new(&server.uri(), Arc::clone(&store) as Arc<dyn TokenStore>);
        let session = AuthSession::new(api, store);
        App::with_session(config, session)
    }

    #[tokio::test]
    async fn test_empty_form_is_rejected_without_a_request() {
        let server = MockServer::start().await;
        let mut app = app_against(&server, Arc::new(MemoryTokenStore::new())).await;

        app.attempt_login().await;
        assert_eq!(
            app.login_error.as_deref(),
            Some("Email and password required")
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_login_returns_home_and_clears_password() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {"id": "1", "name": "A", "email": "a@b.com"},
                "token": "tok123"
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_against(&server, Arc::clone(&store)).await;
        app.start_login();
        app.login_email = "a@b.com".to_string();
        app.login_password = "x".to_string();

        app.attempt_login().await;
        assert_eq!(app.page, Page::Home);
        assert!(app.login_error.is_none());
        assert!(app.login_password.is_empty());
        assert!(app.session.is_authenticated());
        assert_eq!(store.token(), Some("tok123".to_string()));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_entered_fields() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let mut app = app_against(&server, Arc::new(MemoryTokenStore::new())).await;
        app.start_login();
        app.login_email = "a@b.com".to_string();
        app.login_password = "wrong".to_string();

        app.attempt_login().await;
        assert_eq!(app.page, Page::Login);
        assert_eq!(app.login_error.as_deref(), Some("Invalid email or password"));
        assert_eq!(app.login_email, "a@b.com");
        assert_eq!(app.login_password, "wrong");
        assert!(!app.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_network_failure_gets_a_connectivity_message() {
        let store = Arc::new(MemoryTokenStore::new());
        let api = ApiClient::new("http://127.0.0.1:1", Arc::clone(&store) as Arc<dyn TokenStore>);
        let session = AuthSession::new(api, store);
        let mut app = App::with_session(
            Config {
                api_base_url: "http://127.0.0.1:1".to_string(),
            },
            session,
        );
        app.login_email = "a@b.com".to_string();
        app.login_password = "x".to_string();

        app.attempt_login().await;
        assert_eq!(
            app.login_error.as_deref(),
            Some("Unable to connect to server. Check your internet connection.")
        );
    }

    #[tokio::test]
    async fn test_logout_returns_to_unauthenticated_home() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "user": {"id": "1", "name": "A", "email": "a@b.com"},
                "token": "tok123"
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemoryTokenStore::new());
        let mut app = app_against(&server, Arc::clone(&store)).await;
        app.login_email = "a@b.com".to_string();
        app.login_password = "x".to_string();
        app.attempt_login().await;

        app.logout();
        assert_eq!(app.page, Page::Home);
        assert!(!app.session.is_authenticated());
        assert_eq!(store.token(), None);
    }

    #[tokio::test]
    async fn test_input_caps_count_chars_not_bytes() {
        let server = MockServer::start().await;
        let mut app = app_against(&server, Arc::new(MemoryTokenStore::new())).await;

        // 63 two-byte chars is still under the 64-char email cap
        app.login_email = "é".repeat(63);
        assert!(app.can_add_email_char());
        app.login_email.push('é');
        assert!(!app.can_add_email_char());

        app.login_password = "ö".repeat(127);
        assert!(app.can_add_password_char());
        app.login_password.push('ö');
        assert!(!app.can_add_password_char());
    }

    #[tokio::test]
    async fn test_start_login_focuses_password_when_email_prefilled() {
        let server = MockServer::start().await;
        let mut app = app_against(&server, Arc::new(MemoryTokenStore::new())).await;

        app.start_login();
        assert_eq!(app.login_focus, LoginFocus::Email);

        app.login_email = "a@b.com".to_string();
        app.start_login();
        assert_eq!(app.login_focus, LoginFocus::Password);
    }
}
