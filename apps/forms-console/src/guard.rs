//! Per-handler admin guards
//!
//! [`AdminSession`] protects pages: it reuses the session the gate already
//! verified, and otherwise checks on its own and answers with the same
//! redirects. [`ApiAdmin`] protects the JSON API, which the gate skips, and
//! answers with 401/403 bodies instead of redirects.

use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts, response::Response};
use console_auth::{AccessDecision, Session};

use crate::error::ApiError;
use crate::gate::{authorize, refusal, VerifiedSession};
use crate::state::AppState;

/// Verified admin session for a page handler
pub struct AdminSession(pub Session);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AdminSession {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        if let Some(VerifiedSession(session)) = parts.extensions.get::<VerifiedSession>() {
            return Ok(AdminSession(session.clone()));
        }

        match authorize(state, &parts.headers).await {
            AccessDecision::AuthenticatedAdmin(session) => Ok(AdminSession(session)),
            refused => Err(refusal(state, refused.gate_outcome(), &parts.headers, &parts.uri)),
        }
    }
}

/// Verified admin session for an API handler
pub struct ApiAdmin(pub Session);

impl ApiAdmin {
    /// Name recorded on versions this admin creates
    pub fn display_name(&self) -> &str {
        let user = &self.0.user;
        [&user.name, &user.email, &user.id]
            .into_iter()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for ApiAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        match authorize(state, &parts.headers).await {
            AccessDecision::AuthenticatedAdmin(session) => Ok(ApiAdmin(session)),
            AccessDecision::NotAuthenticated => Err(ApiError::Unauthorized),
            refused => {
                let reason = refused.error().unwrap_or_default().to_string();
                tracing::debug!("API access refused: {}", reason);
                Err(ApiError::Forbidden(reason))
            }
        }
    }
}
