//! Auth service HTTP client
//!
//! Both calls forward the browser's cookie header unchanged. Any failure
//! (no cookie, transport error, non-2xx, unexpected body) is treated as
//! "no session": the console fails closed.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE, ORIGIN};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::session::SessionPayload;

/// Session cookie set by the auth service
pub const SESSION_COOKIE: &str = "better-auth.session_token";

/// Prefix used for the cookie on secure origins
const SECURE_PREFIX: &str = "__Secure-";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// True if the `Cookie` header carries the auth session cookie.
pub fn has_session_cookie(cookie_header: &str) -> bool {
    cookie_header.split(';').any(|pair| {
        let name = pair.split('=').next().unwrap_or_default().trim();
        name.strip_prefix(SECURE_PREFIX).unwrap_or(name) == SESSION_COOKIE
    })
}

/// Source of sessions and tokens for the console
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Session for the browser that sent `cookie_header`, `None` if there is
    /// none or it could not be verified.
    async fn get_session(&self, cookie_header: Option<&str>) -> Option<SessionPayload>;

    /// JWT for calling other services on the user's behalf.
    async fn get_token(&self, cookie_header: Option<&str>) -> Option<String>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    http: reqwest::Client,
    config: AuthConfig,
}

impl AuthClient {
    pub fn new(config: AuthConfig) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().timeout(DEFAULT_TIMEOUT).build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// `GET /api/auth/get-session`. Returns `Ok(None)` when the body lacks
    /// either the user or the session.
    pub async fn try_fetch_session(
        &self,
        cookie_header: &str,
    ) -> Result<Option<SessionPayload>, AuthError> {
        let response = self
            .http
            .get(self.config.session_endpoint())
            .header(COOKIE, cookie_header)
            .header(ORIGIN, &self.config.origin)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let payload: Option<SessionPayload> = response.json().await?;
        Ok(payload.filter(|p| p.user.is_some() && p.session.is_some()))
    }

    /// `GET /api/auth/token`
    pub async fn try_fetch_token(&self, cookie_header: &str) -> Result<String, AuthError> {
        let response = self
            .http
            .get(self.config.token_endpoint())
            .header(COOKIE, cookie_header)
            .header(ORIGIN, &self.config.origin)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::Status(status.as_u16()));
        }

        let body: TokenResponse = response.json().await?;
        body.token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingField("token"))
    }
}

#[async_trait]
impl SessionProvider for AuthClient {
    async fn get_session(&self, cookie_header: Option<&str>) -> Option<SessionPayload> {
        let cookie_header = cookie_header.filter(|c| has_session_cookie(c))?;
        match self.try_fetch_session(cookie_header).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!("Session lookup failed: {}", e);
                None
            }
        }
    }

    async fn get_token(&self, cookie_header: Option<&str>) -> Option<String> {
        let cookie_header = cookie_header.filter(|c| has_session_cookie(c))?;
        match self.try_fetch_token(cookie_header).await {
            Ok(token) => Some(token),
            Err(e) => {
                tracing::warn!("Token exchange failed: {}", e);
                None
            }
        }
    }
}
