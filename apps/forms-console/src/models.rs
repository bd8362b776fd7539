//! Request and response bodies for the forms console

use chrono::{DateTime, Utc};
use console_auth::{Environment, SessionState};
use forms_core::{
    preview::FieldValues, FieldProperties, FieldType, FieldValidation, Form, FormField,
    FormStatus, FormStore, FormVersion, Language,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::preferences::Theme;

// ============================================================
// Forms
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFormRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct FormListResponse {
    pub forms: Vec<Form>,
    pub count: usize,
}

/// Forms list row, text already resolved for the page language
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub status: FormStatus,
    pub current_version: u32,
    pub field_count: usize,
    pub tags: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

impl FormSummary {
    pub fn new(form: &Form, language: Language) -> Self {
        Self {
            id: form.id.clone(),
            name: form.name_text().resolve(language).to_string(),
            description: form.description_text().resolve(language).to_string(),
            status: form.status,
            current_version: form.current_version,
            field_count: forms_core::current_fields(form).len(),
            tags: form.tags.clone(),
            updated_at: form.updated_at,
        }
    }
}

// ============================================================
// Selection and editing
// ============================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectFormRequest {
    pub form_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectVersionRequest {
    pub version_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionResponse {
    pub selected_form: Option<Form>,
    pub selected_version: Option<FormVersion>,
    pub is_editing: bool,
}

impl SelectionResponse {
    pub fn from_store(store: &FormStore) -> Self {
        Self {
            selected_form: store.selected_form().cloned(),
            selected_version: store.selected_version().cloned(),
            is_editing: store.is_editing(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartEditingRequest {
    #[serde(default)]
    pub version_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditingResponse {
    pub is_editing: bool,
    pub form_id: Option<String>,
    pub version_id: Option<String>,
    pub fields: Vec<FormField>,
}

impl EditingResponse {
    pub fn from_store(store: &FormStore) -> Self {
        Self {
            is_editing: store.is_editing(),
            form_id: store.selected_form().map(|f| f.id.clone()),
            version_id: store.selected_version().map(|v| v.id.clone()),
            fields: store.editing_fields().to_vec(),
        }
    }
}

/// New field for the editing buffer; the id is generated when omitted.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddFieldRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default)]
    pub label_es: Option<String>,
    #[serde(default)]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub placeholder_es: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub validation: Option<FieldValidation>,
    #[serde(default)]
    pub properties: Option<FieldProperties>,
}

impl AddFieldRequest {
    pub fn into_field(self) -> FormField {
        let mut field = FormField::new(self.field_type, self.label);
        if let Some(id) = self.id.filter(|id| !id.trim().is_empty()) {
            field.id = id;
        }
        field.label_es = self.label_es;
        field.placeholder = self.placeholder;
        field.placeholder_es = self.placeholder_es;
        field.required = self.required;
        field.options = self.options;
        field.validation = self.validation;
        field.properties = self.properties;
        field
    }
}

#[derive(Debug, Deserialize)]
pub struct ReplaceFieldsRequest {
    pub fields: Vec<FormField>,
}

#[derive(Debug, Deserialize)]
pub struct ReorderRequest {
    pub from: usize,
    pub to: usize,
}

/// Save a new version. Without `fields` the editing buffer is committed.
#[derive(Debug, Default, Deserialize)]
pub struct SaveVersionRequest {
    #[serde(default)]
    pub fields: Option<Vec<FormField>>,
    #[serde(default)]
    pub changelog: String,
}

// ============================================================
// Preview
// ============================================================

#[derive(Debug, Deserialize)]
pub struct PrefillRequest {
    #[serde(default)]
    pub values: Option<FieldValues>,
    /// JSON text as typed by the user
    pub input: String,
}

#[derive(Debug, Serialize)]
pub struct PrefillResponse {
    pub values: FieldValues,
}

#[derive(Debug, Deserialize)]
pub struct OutputRequest {
    pub values: FieldValues,
}

#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub output: Map<String, Value>,
}

// ============================================================
// Session, token and preferences
// ============================================================

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreferencesRequest {
    #[serde(default)]
    pub language: Option<Language>,
    #[serde(default)]
    pub theme: Option<Theme>,
}

#[derive(Debug, Serialize)]
pub struct PreferencesResponse {
    pub language: Language,
    pub theme: Option<Theme>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub environment: Environment,
}

// ============================================================
// Page bootstraps
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBootstrap {
    pub session: SessionState,
    pub environment: Environment,
    pub language: Language,
    pub theme: Option<Theme>,
    pub forms: Vec<FormSummary>,
}

/// Field as rendered on the preview page
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub schema_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl PreviewField {
    pub fn new(field: &FormField, language: Language) -> Self {
        Self {
            id: field.id.clone(),
            field_type: field.field_type,
            label: field.label_text().resolve(language).to_string(),
            placeholder: field
                .placeholder_text()
                .map(|p| p.resolve(language).to_string()),
            required: field.required,
            schema_key: field.schema_key(),
            options: field.options.clone().filter(|_| field.field_type.is_choice()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewBootstrap {
    pub session: SessionState,
    pub language: Language,
    pub form_id: String,
    pub title: String,
    pub description: String,
    pub version: u32,
    pub fields: Vec<PreviewField>,
    pub input_schema: Map<String, Value>,
    pub output_schema: Map<String, Value>,
    pub values: FieldValues,
}
