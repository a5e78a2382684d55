//! API client for communicating with the Snaproom REST API.
//!
//! Every call re-reads the bearer token from the token store, so a login
//! or logout on the session takes effect on the next request without the
//! client being told.

// Allow dead code: the user endpoints are part of the API surface
#![allow(dead_code)]

use std::sync::Arc;

use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use crate::auth::TokenStore;
use crate::models::{Credentials, LoginResponse, User, UserUpdate};

use super::ApiError;

/// API client for the Snaproom service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl ApiClient {
    /// Create a new API client against the given base URL. The trailing
    /// slash, if any, is dropped so paths can always start with one.
    pub fn new(base_url: &str, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            store,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_headers(&self) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = self.store.token() {
            if let Ok(value) = header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(header::AUTHORIZATION, value);
            }
        }
        headers
    }

    /// Check if response is successful, returning an error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(&url)
            .headers(self.auth_headers())
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let url = self.url(path);
        debug!(url = %url, "PUT");
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers())
            .json(body)
            .send()
            .await?;
        let response = Self::check_response(response).await?;
        Ok(response.json().await?)
    }

    /// POST for endpoints where the response body carries nothing we need.
    pub async fn post_no_content(&self, path: &str) -> Result<(), ApiError> {
        let url = self.url(path);
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers())
            .send()
            .await?;
        Self::check_response(response).await?;
        Ok(())
    }

    // ===== Endpoints =====

    /// Exchange credentials for a user and bearer token
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        self.post("/auth/login", credentials).await
    }

    /// Fetch the user the current token belongs to
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    /// Tell the server the session is over. Best-effort; callers must not
    /// depend on it succeeding.
    pub async fn notify_logout(&self) -> Result<(), ApiError> {
        self.post_no_content("/auth/logout").await
    }

    /// Fetch a user record by id
    pub async fn fetch_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.get(&format!("/users/{}", user_id)).await
    }

    /// Update a user record, returning the server's updated copy
    pub async fn update_user(&self, user_id: &str, update: &UserUpdate) -> Result<User, ApiError> {
        self.put(&format!("/users/{}", user_id), update).await
    }
}
