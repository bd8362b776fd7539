//! Request gate
//!
//! Runs in front of every page. Public paths pass straight through; every
//! other request needs an admin session or gets redirected to the auth app
//! login (not authenticated) or to `/forbidden` (authenticated, not allowed).

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Uri},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use console_auth::{evaluate_access, AccessDecision, GateOutcome, Session};

use crate::request::{cookie_header, external_url};
use crate::state::AppState;

pub const FORBIDDEN_PATH: &str = "/forbidden";

const PUBLIC_PATHS: [&str; 5] = [
    "/health",
    FORBIDDEN_PATH,
    "/logout",
    "/favicon.ico",
    "/site.webmanifest",
];

const PUBLIC_PREFIXES: [&str; 3] = ["/api/", "/static/", "/assets/"];

const IMAGE_EXTENSIONS: [&str; 6] = ["svg", "png", "jpg", "jpeg", "gif", "webp"];

/// Session already verified by the gate for this request
#[derive(Debug, Clone)]
pub struct VerifiedSession(pub Session);

/// Paths the gate never checks
pub fn is_public_path(path: &str) -> bool {
    if path == "/api" || PUBLIC_PATHS.contains(&path) {
        return true;
    }
    if PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }
    path.rsplit_once('.').map_or(false, |(_, ext)| {
        IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
    })
}

/// Fetch the caller's session and apply the access policy.
pub async fn authorize(state: &AppState, headers: &HeaderMap) -> AccessDecision {
    let payload = state.auth.get_session(cookie_header(headers)).await;
    evaluate_access(payload)
}

/// Redirect for a refused request
pub fn refusal(state: &AppState, outcome: GateOutcome, headers: &HeaderMap, uri: &Uri) -> Response {
    match outcome {
        GateOutcome::Login => {
            let return_to = external_url(headers, uri, &state.config.public_url);
            Redirect::temporary(&state.config.login_url(&return_to)).into_response()
        }
        GateOutcome::Forbidden | GateOutcome::Proceed => {
            Redirect::temporary(FORBIDDEN_PATH).into_response()
        }
    }
}

pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let decision = authorize(&state, request.headers()).await;
    match decision {
        AccessDecision::AuthenticatedAdmin(session) => {
            request.extensions_mut().insert(VerifiedSession(session));
            next.run(request).await
        }
        refused => {
            tracing::debug!(
                "Gate refused {}: {}",
                request.uri().path(),
                refused.error().unwrap_or_default()
            );
            refusal(&state, refused.gate_outcome(), request.headers(), request.uri())
        }
    }
}
