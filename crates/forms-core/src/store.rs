//! In-memory form store
//!
//! Holds every form plus the console's selection and editing state. Each
//! method is one atomic transition; none of them fail. A lookup miss is a
//! no-op reported through [`Mutation`], which callers are free to ignore.
//!
//! Editing lifecycle:
//!
//! ```text
//! idle --start_editing--> editing --(add|update|delete|reorder|replace)*--> editing
//! editing --cancel_editing--> idle          (buffer discarded)
//! editing --save_form_version--> idle       (buffer committed as a new version)
//! ```

use serde::Deserialize;
use uuid::Uuid;

use crate::error::StoreError;
use crate::form::{
    current_version, output_schema, FieldProperties, FieldType, FieldValidation, Form, FormField,
    FormSchema, FormStatus, FormVersion,
};

/// Display name recorded on versions when no actor has been set
pub const DEFAULT_ACTOR: &str = "Current User";

/// Result of a store mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Applied,
    /// The form, version or field id did not match anything
    NotFound,
    /// A reorder index fell outside the editing buffer
    OutOfRange,
}

impl Mutation {
    pub fn is_applied(&self) -> bool {
        matches!(self, Mutation::Applied)
    }

    /// Turn a miss into an error built by `err`.
    pub fn or_else(self, err: impl FnOnce() -> StoreError) -> Result<(), StoreError> {
        match self {
            Mutation::Applied => Ok(()),
            Mutation::NotFound | Mutation::OutOfRange => Err(err()),
        }
    }
}

/// Partial update of a form's metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormUpdate {
    pub name: Option<String>,
    pub name_es: Option<String>,
    pub description: Option<String>,
    pub description_es: Option<String>,
    pub status: Option<FormStatus>,
    pub tags: Option<Vec<String>>,
}

/// Partial update of a field in the editing buffer
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    #[serde(rename = "type")]
    pub field_type: Option<FieldType>,
    pub label: Option<String>,
    pub label_es: Option<String>,
    pub placeholder: Option<String>,
    pub placeholder_es: Option<String>,
    pub required: Option<bool>,
    pub options: Option<Vec<String>>,
    pub validation: Option<FieldValidation>,
    pub properties: Option<FieldProperties>,
}

/// Forms list filter
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FormQuery {
    /// Case-insensitive match against name or description
    #[serde(default, alias = "q")]
    pub search: Option<String>,
    #[serde(default)]
    pub status: Option<FormStatus>,
}

impl FormQuery {
    fn matches(&self, form: &Form) -> bool {
        let text_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                form.name.to_lowercase().contains(&needle)
                    || form.description.to_lowercase().contains(&needle)
            }
        };
        let status_ok = self.status.map_or(true, |s| form.status == s);
        text_ok && status_ok
    }
}

#[derive(Debug, Clone)]
pub struct FormStore {
    /// Newest first
    forms: Vec<Form>,
    selected_form: Option<String>,
    /// Version id within the selected form
    selected_version: Option<String>,
    is_editing: bool,
    editing_fields: Vec<FormField>,
    actor: String,
}

impl Default for FormStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FormStore {
    pub fn new() -> Self {
        Self::with_forms(Vec::new())
    }

    /// Store seeded with `forms`, in the given order.
    pub fn with_forms(forms: Vec<Form>) -> Self {
        Self {
            forms,
            selected_form: None,
            selected_version: None,
            is_editing: false,
            editing_fields: Vec::new(),
            actor: DEFAULT_ACTOR.to_string(),
        }
    }

    /// Drop all forms and editing state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ============================================================
    // Reads
    // ============================================================

    pub fn forms(&self) -> &[Form] {
        &self.forms
    }

    pub fn form(&self, form_id: &str) -> Option<&Form> {
        self.forms.iter().find(|f| f.id == form_id)
    }

    pub fn search(&self, query: &FormQuery) -> Vec<&Form> {
        self.forms.iter().filter(|f| query.matches(f)).collect()
    }

    pub fn selected_form(&self) -> Option<&Form> {
        self.selected_form.as_deref().and_then(|id| self.form(id))
    }

    pub fn selected_version(&self) -> Option<&FormVersion> {
        let version_id = self.selected_version.as_deref()?;
        self.selected_form()?.version_by_id(version_id)
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    pub fn editing_fields(&self) -> &[FormField] {
        &self.editing_fields
    }

    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Name recorded as `created_by` on versions created from now on.
    pub fn set_actor(&mut self, name: impl Into<String>) {
        self.actor = name.into();
    }

    fn form_mut(&mut self, form_id: &str) -> Option<&mut Form> {
        self.forms.iter_mut().find(|f| f.id == form_id)
    }

    // ============================================================
    // Selection
    // ============================================================

    /// Select a form and its current version.
    ///
    /// `None` clears the selection. An unknown id leaves the previous
    /// selection in place.
    pub fn set_selected_form(&mut self, form_id: Option<&str>) -> Mutation {
        let Some(form_id) = form_id else {
            self.selected_form = None;
            self.selected_version = None;
            return Mutation::Applied;
        };

        let Some(form) = self.form(form_id) else {
            tracing::debug!("Select ignored, unknown form {}", form_id);
            return Mutation::NotFound;
        };

        let version_id = current_version(form).map(|v| v.id.clone());
        self.selected_form = Some(form.id.clone());
        self.selected_version = version_id;
        Mutation::Applied
    }

    /// Browse a version of the selected form without changing its current version.
    pub fn set_selected_version(&mut self, version_id: &str) -> Mutation {
        let Some(form) = self.selected_form() else {
            return Mutation::NotFound;
        };
        if form.version_by_id(version_id).is_none() {
            return Mutation::NotFound;
        }
        self.selected_version = Some(version_id.to_string());
        Mutation::Applied
    }

    // ============================================================
    // Form CRUD
    // ============================================================

    /// Create a draft form and put it at the front of the list. Returns its id.
    pub fn create_form(&mut self, name: &str, description: &str) -> String {
        let form = Form::new(name, description, &self.actor);
        let id = form.id.clone();
        tracing::info!("Created form {} ({})", id, name);
        self.forms.insert(0, form);
        id
    }

    pub fn update_form(&mut self, form_id: &str, updates: FormUpdate) -> Mutation {
        let Some(form) = self.form_mut(form_id) else {
            return Mutation::NotFound;
        };

        if let Some(name) = updates.name {
            form.name = name;
        }
        if let Some(name_es) = updates.name_es {
            form.name_es = non_empty(name_es);
        }
        if let Some(description) = updates.description {
            form.description = description;
        }
        if let Some(description_es) = updates.description_es {
            form.description_es = non_empty(description_es);
        }
        if let Some(status) = updates.status {
            form.status = status;
        }
        if let Some(tags) = updates.tags {
            form.tags = tags;
        }
        form.touch();
        Mutation::Applied
    }

    /// Remove a form. The selection is cleared whether or not the deleted
    /// form was the selected one.
    pub fn delete_form(&mut self, form_id: &str) -> Mutation {
        let before = self.forms.len();
        self.forms.retain(|f| f.id != form_id);
        self.selected_form = None;
        self.selected_version = None;

        if self.forms.len() == before {
            Mutation::NotFound
        } else {
            tracing::info!("Deleted form {}", form_id);
            Mutation::Applied
        }
    }

    // ============================================================
    // Editing session
    // ============================================================

    /// Open an editing session on `version_id`, or on the form's current
    /// version when `None`. Nothing happens if either lookup misses.
    pub fn start_editing(&mut self, form_id: &str, version_id: Option<&str>) -> Mutation {
        let Some(form) = self.form(form_id) else {
            return Mutation::NotFound;
        };
        let version = match version_id {
            Some(id) => form.version_by_id(id),
            None => current_version(form),
        };
        let Some(version) = version else {
            return Mutation::NotFound;
        };

        // The buffer owns its own copy; the version stays untouched.
        let buffer = version.fields.to_vec();
        let form_id = form.id.clone();
        let version_id = version.id.clone();

        tracing::debug!("Editing form {} at version {}", form_id, version_id);
        self.is_editing = true;
        self.selected_form = Some(form_id);
        self.selected_version = Some(version_id);
        self.editing_fields = buffer;
        Mutation::Applied
    }

    /// Discard the buffer. Selection is kept.
    pub fn cancel_editing(&mut self) {
        self.is_editing = false;
        self.editing_fields.clear();
    }

    /// Replace the whole buffer.
    pub fn update_editing_fields(&mut self, fields: Vec<FormField>) {
        self.editing_fields = fields;
    }

    /// Append a field. Id uniqueness is the caller's job.
    pub fn add_field(&mut self, field: FormField) {
        self.editing_fields.push(field);
    }

    pub fn update_field(&mut self, field_id: &str, updates: FieldUpdate) -> Mutation {
        let Some(field) = self.editing_fields.iter_mut().find(|f| f.id == field_id) else {
            return Mutation::NotFound;
        };

        if let Some(field_type) = updates.field_type {
            field.field_type = field_type;
        }
        if let Some(label) = updates.label {
            field.label = label;
        }
        if let Some(label_es) = updates.label_es {
            field.label_es = non_empty(label_es);
        }
        if let Some(placeholder) = updates.placeholder {
            field.placeholder = non_empty(placeholder);
        }
        if let Some(placeholder_es) = updates.placeholder_es {
            field.placeholder_es = non_empty(placeholder_es);
        }
        if let Some(required) = updates.required {
            field.required = required;
        }
        if let Some(options) = updates.options {
            field.options = Some(options);
        }
        if let Some(validation) = updates.validation {
            field.validation = Some(validation);
        }
        if let Some(properties) = updates.properties {
            field.properties = Some(properties);
        }
        Mutation::Applied
    }

    pub fn delete_field(&mut self, field_id: &str) -> Mutation {
        let before = self.editing_fields.len();
        self.editing_fields.retain(|f| f.id != field_id);
        if self.editing_fields.len() == before {
            Mutation::NotFound
        } else {
            Mutation::Applied
        }
    }

    /// Move the field at `from` to position `to`, shifting the fields in
    /// between. Both indices must address the current buffer; otherwise the
    /// buffer is left as is.
    pub fn reorder_fields(&mut self, from: usize, to: usize) -> Mutation {
        let len = self.editing_fields.len();
        if from >= len || to >= len {
            tracing::debug!("Reorder {} -> {} rejected, buffer has {} fields", from, to, len);
            return Mutation::OutOfRange;
        }
        if from != to {
            let field = self.editing_fields.remove(from);
            self.editing_fields.insert(to, field);
        }
        Mutation::Applied
    }

    // ============================================================
    // Versioning
    // ============================================================

    /// Commit `fields` as the next version of a form and close the editing
    /// session.
    ///
    /// The new version gets its own copy of `fields`; later changes to the
    /// caller's slice or to the buffer never reach it. A blank changelog
    /// becomes `"Version {n}"`.
    pub fn save_form_version(&mut self, form_id: &str, fields: &[FormField], changelog: &str) -> Mutation {
        let actor = self.actor.clone();
        let Some(form) = self.form_mut(form_id) else {
            return Mutation::NotFound;
        };

        let number = form.current_version + 1;
        let changelog = match changelog.trim() {
            "" => format!("Version {}", number),
            _ => changelog.to_string(),
        };
        let version = FormVersion {
            id: format!("v{}-{}", Uuid::new_v4().simple(), number),
            version: number,
            created_at: chrono::Utc::now(),
            created_by: actor,
            changelog: Some(changelog),
            fields: fields.to_vec(),
            schema: FormSchema {
                input: serde_json::Map::new(),
                output: output_schema(fields),
            },
        };
        let version_id = version.id.clone();

        form.versions.push(version);
        form.current_version = number;
        form.touch();
        tracing::info!("Saved form {} version {} ({} fields)", form_id, number, fields.len());

        self.is_editing = false;
        self.editing_fields.clear();
        self.selected_form = Some(form_id.to_string());
        self.selected_version = Some(version_id);
        Mutation::Applied
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
