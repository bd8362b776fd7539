//! Preview data derivation
//!
//! The preview page keeps the values being typed keyed by field id, and
//! exchanges data with the workflow engine keyed by [`schema_key`] of the
//! field label.

use serde_json::{json, Map, Value};

use crate::error::PreviewError;
use crate::form::{schema_key, FieldType, FormField};

/// Values keyed by field id
pub type FieldValues = Map<String, Value>;

/// Empty value for a field of type `field_type`.
pub fn default_value(field_type: FieldType) -> Value {
    match field_type {
        FieldType::CheckboxGroup => json!([]),
        FieldType::Checkbox => json!(false),
        FieldType::Address => json!({
            "street": "",
            "street2": "",
            "city": "",
            "state": "",
            "zip": "",
            "country": "",
        }),
        _ => json!(""),
    }
}

/// Starting values for the preview, pre-filled from `input` where a key
/// matches a field's schema key.
pub fn initial_values(fields: &[FormField], input: Option<&Map<String, Value>>) -> FieldValues {
    fields
        .iter()
        .map(|field| {
            let value = input
                .and_then(|data| data.get(&field.schema_key()))
                .cloned()
                .unwrap_or_else(|| default_value(field.field_type));
            (field.id.clone(), value)
        })
        .collect()
}

/// Overlay user-typed pre-fill JSON onto `values`.
///
/// Only keys that match a field's schema key are taken; the rest of the
/// object is ignored. On error `values` is returned untouched to the caller
/// (nothing is modified in place).
pub fn apply_input_schema(
    values: &FieldValues,
    fields: &[FormField],
    raw: &str,
) -> Result<FieldValues, PreviewError> {
    let parsed: Value = serde_json::from_str(raw)?;
    let Value::Object(input) = parsed else {
        return Err(PreviewError::NotAnObject);
    };

    let mut prefilled = values.clone();
    for field in fields {
        if let Some(value) = input.get(&schema_key(&field.label)) {
            prefilled.insert(field.id.clone(), value.clone());
        }
    }
    Ok(prefilled)
}

/// Submission payload: schema key -> value, in field order.
///
/// Values are passed through as submitted; fields with no value get their
/// type default.
pub fn generate_output(fields: &[FormField], values: &FieldValues) -> Map<String, Value> {
    fields
        .iter()
        .map(|field| {
            let value = values
                .get(&field.id)
                .cloned()
                .unwrap_or_else(|| default_value(field.field_type));
            (field.schema_key(), value)
        })
        .collect()
}
