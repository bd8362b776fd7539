//! JSON API handlers
//!
//! Every handler takes [`ApiAdmin`], so the auth check happens before the
//! store lock is taken. Store lookup misses become 404s here; the store
//! itself never fails.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse},
    Json,
};
use forms_core::{
    current_fields, current_schema,
    preview::{apply_input_schema, generate_output, initial_values},
    FieldUpdate, Form, FormQuery, FormStore, FormUpdate, FormVersion, StoreError,
};

use crate::error::ApiError;
use crate::guard::ApiAdmin;
use crate::models::*;
use crate::preferences::{self, LANGUAGE_COOKIE, THEME_COOKIE};
use crate::request::cookie_header;
use crate::state::AppState;

/// Health check endpoint
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "forms-console",
        environment: state.config.environment(),
    })
}

fn form_or_404<'a>(store: &'a FormStore, form_id: &str) -> Result<&'a Form, ApiError> {
    store
        .form(form_id)
        .ok_or_else(|| ApiError::FormNotFound(form_id.to_string()))
}

fn require_editing(store: &FormStore) -> Result<(), ApiError> {
    if store.is_editing() {
        Ok(())
    } else {
        Err(ApiError::NotEditing)
    }
}

// ============================================================
// Forms
// ============================================================

pub async fn list_forms(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Query(query): Query<FormQuery>,
) -> Json<FormListResponse> {
    let store = state.store.read();
    let forms: Vec<Form> = store.search(&query).into_iter().cloned().collect();
    Json(FormListResponse {
        count: forms.len(),
        forms,
    })
}

pub async fn create_form(
    admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateFormRequest>,
) -> Result<(StatusCode, Json<Form>), ApiError> {
    if req.name.trim().is_empty() {
        return Err(ApiError::InvalidRequest("Form name is required".to_string()));
    }

    let mut store = state.store.write();
    store.set_actor(admin.display_name());
    let form_id = store.create_form(&req.name, &req.description);
    let form = form_or_404(&store, &form_id)?.clone();
    Ok((StatusCode::CREATED, Json(form)))
}

pub async fn get_form(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<Form>, ApiError> {
    let store = state.store.read();
    Ok(Json(form_or_404(&store, &form_id)?.clone()))
}

pub async fn update_form(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(updates): Json<FormUpdate>,
) -> Result<Json<Form>, ApiError> {
    let mut store = state.store.write();
    store
        .update_form(&form_id, updates)
        .or_else(|| StoreError::FormNotFound(form_id.clone()))?;
    Ok(Json(form_or_404(&store, &form_id)?.clone()))
}

pub async fn delete_form(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut store = state.store.write();
    store
        .delete_form(&form_id)
        .or_else(|| StoreError::FormNotFound(form_id.clone()))?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================
// Selection
// ============================================================

pub async fn get_selection(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
) -> Json<SelectionResponse> {
    Json(SelectionResponse::from_store(&state.store.read()))
}

pub async fn select_form(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectFormRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let mut store = state.store.write();
    let form_id = req.form_id;
    store
        .set_selected_form(form_id.as_deref())
        .or_else(|| StoreError::FormNotFound(form_id.clone().unwrap_or_default()))?;
    Ok(Json(SelectionResponse::from_store(&store)))
}

pub async fn select_version(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectVersionRequest>,
) -> Result<Json<SelectionResponse>, ApiError> {
    let mut store = state.store.write();
    store
        .set_selected_version(&req.version_id)
        .or_else(|| StoreError::VersionNotFound(req.version_id.clone()))?;
    Ok(Json(SelectionResponse::from_store(&store)))
}

// ============================================================
// Editing session
// ============================================================

pub async fn start_editing(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(req): Json<StartEditingRequest>,
) -> Result<Json<EditingResponse>, ApiError> {
    let mut store = state.store.write();
    form_or_404(&store, &form_id)?;

    let version_id = req.version_id;
    store
        .start_editing(&form_id, version_id.as_deref())
        .or_else(|| StoreError::VersionNotFound(version_id.clone().unwrap_or_default()))?;
    Ok(Json(EditingResponse::from_store(&store)))
}

pub async fn get_editing(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
) -> Json<EditingResponse> {
    Json(EditingResponse::from_store(&state.store.read()))
}

pub async fn cancel_editing(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
) -> Json<EditingResponse> {
    let mut store = state.store.write();
    store.cancel_editing();
    Json(EditingResponse::from_store(&store))
}

pub async fn replace_fields(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReplaceFieldsRequest>,
) -> Result<Json<EditingResponse>, ApiError> {
    let mut store = state.store.write();
    require_editing(&store)?;
    store.update_editing_fields(req.fields);
    Ok(Json(EditingResponse::from_store(&store)))
}

pub async fn add_field(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddFieldRequest>,
) -> Result<(StatusCode, Json<EditingResponse>), ApiError> {
    let mut store = state.store.write();
    require_editing(&store)?;
    store.add_field(req.into_field());
    Ok((StatusCode::CREATED, Json(EditingResponse::from_store(&store))))
}

pub async fn update_field(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(field_id): Path<String>,
    Json(updates): Json<FieldUpdate>,
) -> Result<Json<EditingResponse>, ApiError> {
    let mut store = state.store.write();
    require_editing(&store)?;
    store
        .update_field(&field_id, updates)
        .or_else(|| StoreError::FieldNotFound(field_id.clone()))?;
    Ok(Json(EditingResponse::from_store(&store)))
}

pub async fn delete_field(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(field_id): Path<String>,
) -> Result<Json<EditingResponse>, ApiError> {
    let mut store = state.store.write();
    require_editing(&store)?;
    store
        .delete_field(&field_id)
        .or_else(|| StoreError::FieldNotFound(field_id.clone()))?;
    Ok(Json(EditingResponse::from_store(&store)))
}

pub async fn reorder_fields(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<EditingResponse>, ApiError> {
    let mut store = state.store.write();
    require_editing(&store)?;
    let len = store.editing_fields().len();
    store
        .reorder_fields(req.from, req.to)
        .or_else(|| StoreError::IndexOutOfRange {
            from: req.from,
            to: req.to,
            len,
        })?;
    Ok(Json(EditingResponse::from_store(&store)))
}

// ============================================================
// Versions
// ============================================================

pub async fn list_versions(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
) -> Result<Json<Vec<FormVersion>>, ApiError> {
    let store = state.store.read();
    Ok(Json(form_or_404(&store, &form_id)?.versions.clone()))
}

pub async fn save_version(
    admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(req): Json<SaveVersionRequest>,
) -> Result<(StatusCode, Json<FormVersion>), ApiError> {
    let mut store = state.store.write();
    form_or_404(&store, &form_id)?;

    let fields = match req.fields {
        Some(fields) => fields,
        None => {
            require_editing(&store)?;
            store.editing_fields().to_vec()
        }
    };

    store.set_actor(admin.display_name());
    store
        .save_form_version(&form_id, &fields, &req.changelog)
        .or_else(|| StoreError::FormNotFound(form_id.clone()))?;

    let version = store
        .selected_version()
        .cloned()
        .ok_or_else(|| ApiError::VersionNotFound(form_id.clone()))?;
    Ok((StatusCode::CREATED, Json(version)))
}

// ============================================================
// Preview
// ============================================================

pub async fn preview_prefill(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(req): Json<PrefillRequest>,
) -> Result<Json<PrefillResponse>, ApiError> {
    let store = state.store.read();
    let form = form_or_404(&store, &form_id)?;
    let fields = current_fields(form);

    let values = match req.values {
        Some(values) => values,
        None => initial_values(fields, current_schema(form).map(|s| &s.input)),
    };
    let values = apply_input_schema(&values, fields, &req.input)?;
    Ok(Json(PrefillResponse { values }))
}

pub async fn preview_output(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    Path(form_id): Path<String>,
    Json(req): Json<OutputRequest>,
) -> Result<Json<OutputResponse>, ApiError> {
    let store = state.store.read();
    let form = form_or_404(&store, &form_id)?;
    let output = generate_output(current_fields(form), &req.values);
    Ok(Json(OutputResponse { output }))
}

// ============================================================
// Token and preferences
// ============================================================

/// Exchange the session cookie for a JWT.
pub async fn get_token(
    _admin: ApiAdmin,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, ApiError> {
    let token = state
        .auth
        .get_token(cookie_header(&headers))
        .await
        .ok_or(ApiError::Unauthorized)?;
    Ok(Json(TokenResponse { token }))
}

pub async fn update_preferences(
    _admin: ApiAdmin,
    headers: HeaderMap,
    Json(req): Json<PreferencesRequest>,
) -> impl IntoResponse {
    let mut cookies = Vec::new();
    if let Some(language) = req.language {
        cookies.push((
            SET_COOKIE,
            preferences::set_cookie(&headers, LANGUAGE_COOKIE, language.as_str()),
        ));
    }
    if let Some(theme) = req.theme {
        cookies.push((
            SET_COOKIE,
            preferences::set_cookie(&headers, THEME_COOKIE, theme.as_str()),
        ));
    }

    let body = PreferencesResponse {
        language: req
            .language
            .unwrap_or_else(|| preferences::resolve_language(&headers)),
        theme: req.theme.or_else(|| preferences::resolve_theme(&headers)),
    };
    (AppendHeaders(cookies), Json(body))
}

pub async fn clear_preferences(_admin: ApiAdmin, headers: HeaderMap) -> impl IntoResponse {
    let cookies = [
        (SET_COOKIE, preferences::delete_cookie(&headers, LANGUAGE_COOKIE)),
        (SET_COOKIE, preferences::delete_cookie(&headers, THEME_COOKIE)),
    ];
    (StatusCode::NO_CONTENT, AppendHeaders(cookies))
}
