//! Form domain model
//!
//! A [`Form`] owns an append-only list of immutable [`FormVersion`]s. Each
//! version snapshots its [`FormField`]s together with the [`FormSchema`]
//! derived from them at save time.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::localized::LocalizedText;

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").unwrap();
}

/// Changelog recorded on the first version of every new form
pub const INITIAL_CHANGELOG: &str = "Initial form creation";

// ============================================================
// Fields
// ============================================================

/// Supported form field types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Name,
    Phone,
    Email,
    Text,
    Textarea,
    Address,
    File,
    Checkbox,
    Radio,
    CheckboxGroup,
    Dropdown,
    Date,
    Datetime,
    Time,
    Number,
    Url,
    Password,
    Rating,
}

impl FieldType {
    pub const ALL: [FieldType; 18] = [
        FieldType::Name,
        FieldType::Phone,
        FieldType::Email,
        FieldType::Text,
        FieldType::Textarea,
        FieldType::Address,
        FieldType::File,
        FieldType::Checkbox,
        FieldType::Radio,
        FieldType::CheckboxGroup,
        FieldType::Dropdown,
        FieldType::Date,
        FieldType::Datetime,
        FieldType::Time,
        FieldType::Number,
        FieldType::Url,
        FieldType::Password,
        FieldType::Rating,
    ];

    /// Field types whose value is picked from `options`
    pub fn is_choice(&self) -> bool {
        matches!(
            self,
            FieldType::Radio | FieldType::CheckboxGroup | FieldType::Dropdown
        )
    }

    /// Type hint used in the submission schema
    pub fn output_hint(&self) -> &'static str {
        match self {
            FieldType::CheckboxGroup => "array",
            _ => "string",
        }
    }
}

/// Numeric and string constraints on a field value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldValidation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// Type-specific extras
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProperties {
    /// Rows for textarea
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_rating: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow_half: Option<bool>,
    /// Strength meter for password fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_strength: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_types: Option<Vec<String>>,
    /// Upload limit in MB
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_file_size: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_autocomplete: Option<bool>,
    /// ISO date lower bound for date/datetime fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_max: Option<String>,
}

/// One input definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_es: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder_es: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<FieldProperties>,
}

impl FormField {
    /// Create a field with a fresh id and no optional attributes
    pub fn new(field_type: FieldType, label: impl Into<String>) -> Self {
        Self {
            id: format!("f{}", Uuid::new_v4().simple()),
            field_type,
            label: label.into(),
            label_es: None,
            placeholder: None,
            placeholder_es: None,
            required: false,
            options: None,
            validation: None,
            properties: None,
        }
    }

    pub fn label_text(&self) -> LocalizedText<'_> {
        LocalizedText::new(&self.label, self.label_es.as_deref())
    }

    /// `None` when the field has no English placeholder at all
    pub fn placeholder_text(&self) -> Option<LocalizedText<'_>> {
        self.placeholder
            .as_deref()
            .map(|p| LocalizedText::new(p, self.placeholder_es.as_deref()))
    }

    /// Key under which this field appears in pre-fill and output data
    pub fn schema_key(&self) -> String {
        schema_key(&self.label)
    }
}

// ============================================================
// Versions and schema
// ============================================================

/// Pre-fill (`input`) and submission (`output`) shape for the workflow engine
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    #[serde(default)]
    pub input: Map<String, Value>,
    #[serde(default)]
    pub output: Map<String, Value>,
}

/// Immutable snapshot of a form's fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormVersion {
    pub id: String,
    pub version: u32,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<String>,
    #[serde(default)]
    pub fields: Vec<FormField>,
    #[serde(default)]
    pub schema: FormSchema,
}

impl FormVersion {
    /// Version 1 of a freshly created form
    pub fn initial(created_by: &str) -> Self {
        Self {
            id: format!("v{}-1", Uuid::new_v4().simple()),
            version: 1,
            created_at: Utc::now(),
            created_by: created_by.to_string(),
            changelog: Some(INITIAL_CHANGELOG.to_string()),
            fields: Vec::new(),
            schema: FormSchema::default(),
        }
    }
}

// ============================================================
// Forms
// ============================================================

/// Publication status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormStatus::Draft => write!(f, "draft"),
            FormStatus::Published => write!(f, "published"),
            FormStatus::Archived => write!(f, "archived"),
        }
    }
}

/// Aggregate root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_es: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_es: Option<String>,
    #[serde(default)]
    pub status: FormStatus,
    pub current_version: u32,
    pub versions: Vec<FormVersion>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Form {
    /// New draft form with a single empty version
    pub fn new(name: impl Into<String>, description: impl Into<String>, created_by: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            name_es: None,
            description: description.into(),
            description_es: None,
            status: FormStatus::Draft,
            current_version: 1,
            versions: vec![FormVersion::initial(created_by)],
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
        }
    }

    pub fn name_text(&self) -> LocalizedText<'_> {
        LocalizedText::new(&self.name, self.name_es.as_deref())
    }

    pub fn description_text(&self) -> LocalizedText<'_> {
        LocalizedText::new(&self.description, self.description_es.as_deref())
    }

    pub fn version_by_id(&self, version_id: &str) -> Option<&FormVersion> {
        self.versions.iter().find(|v| v.id == version_id)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// ============================================================
// Derivation helpers
// ============================================================

/// The version whose number equals `current_version`, if any.
pub fn current_version(form: &Form) -> Option<&FormVersion> {
    form.versions
        .iter()
        .find(|v| v.version == form.current_version)
}

/// Fields of the current version, empty when the current version is missing.
pub fn current_fields(form: &Form) -> &[FormField] {
    current_version(form)
        .map(|v| v.fields.as_slice())
        .unwrap_or(&[])
}

pub fn current_schema(form: &Form) -> Option<&FormSchema> {
    current_version(form).map(|v| &v.schema)
}

/// Slug used as the data key for a field label: lowercased, whitespace runs
/// collapsed to `_`.
pub fn schema_key(label: &str) -> String {
    WHITESPACE_RUN
        .replace_all(&label.to_lowercase(), "_")
        .into_owned()
}

/// Submission schema for `fields`, keyed by [`schema_key`] in field order.
pub fn output_schema(fields: &[FormField]) -> Map<String, Value> {
    fields
        .iter()
        .map(|f| {
            (
                f.schema_key(),
                Value::String(f.field_type.output_hint().to_string()),
            )
        })
        .collect()
}
