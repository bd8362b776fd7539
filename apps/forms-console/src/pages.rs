//! Page handlers
//!
//! The dashboard and preview pages return the bootstrap payload the
//! frontend renders from, including a hydrated session store snapshot.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, Redirect},
    Json,
};
use console_auth::{Session, SessionState, SessionStore};
use forms_core::{current_version, preview::initial_values, FormQuery, Language};

use crate::error::ApiError;
use crate::guard::AdminSession;
use crate::models::{DashboardBootstrap, FormSummary, PreviewBootstrap, PreviewField};
use crate::preferences::{resolve_language, resolve_theme};
use crate::state::AppState;

fn session_snapshot(session: Session) -> SessionState {
    let store = SessionStore::new();
    store.hydrate(Some(session));
    store.snapshot()
}

pub async fn dashboard(
    AdminSession(session): AdminSession,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<FormQuery>,
) -> Json<DashboardBootstrap> {
    let language = resolve_language(&headers);
    let forms = state
        .store
        .read()
        .search(&query)
        .into_iter()
        .map(|form| FormSummary::new(form, language))
        .collect();

    Json(DashboardBootstrap {
        session: session_snapshot(session),
        environment: state.config.environment(),
        language,
        theme: resolve_theme(&headers),
        forms,
    })
}

/// Preview a form at its current version. Read-only: the shared selection
/// is left as it is.
pub async fn preview(
    AdminSession(session): AdminSession,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<PreviewBootstrap>, ApiError> {
    let language = resolve_language(&headers);
    let store = state.store.read();
    let form = store
        .form(&form_id)
        .ok_or_else(|| ApiError::FormNotFound(form_id.clone()))?;
    let version =
        current_version(form).ok_or_else(|| ApiError::VersionNotFound(form_id.clone()))?;

    let bootstrap = PreviewBootstrap {
        session: session_snapshot(session),
        language,
        form_id: form.id.clone(),
        title: form.name_text().resolve(language).to_string(),
        description: form.description_text().resolve(language).to_string(),
        version: version.version,
        fields: version
            .fields
            .iter()
            .map(|f| PreviewField::new(f, language))
            .collect(),
        input_schema: version.schema.input.clone(),
        output_schema: version.schema.output.clone(),
        values: initial_values(&version.fields, Some(&version.schema.input)),
    };
    Ok(Json(bootstrap))
}

pub async fn logout(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&state.config.logout_url())
}

/// Shown to signed-in users without admin access. The message is the same
/// for every refusal reason.
pub async fn forbidden(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Html<String> {
    let (title, message, back, sign_out) = match resolve_language(&headers) {
        Language::Es => (
            "Acceso Denegado",
            "No tienes permisos para acceder a la consola de administración. \
             Si crees que deberías tener acceso, contacta al administrador del sistema.",
            "Volver al inicio",
            "Cerrar sesión",
        ),
        Language::En => (
            "Access Denied",
            "You do not have permission to access the admin console. \
             If you believe you should have access, contact your system administrator.",
            "Back to home",
            "Sign out",
        ),
    };

    Html(format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
  <main>
    <h1>{title}</h1>
    <p>{message}</p>
    <a href="{home}">{back}</a>
    <a href="/logout">{sign_out}</a>
  </main>
</body>
</html>
"#,
        home = state.config.app_url,
    ))
}

/// Unknown page. Only reached by admins; the gate runs first.
pub async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}
