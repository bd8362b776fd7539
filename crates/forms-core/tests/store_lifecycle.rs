//! Store lifecycle tests
//!
//! Drives the form store through whole create/edit/save sessions the way
//! the console does, then checks the invariants on versions and selection.

use forms_core::{
    current_fields, current_version, FieldType, Form, FormField, FormStore, Mutation,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn field(id: &str, label: &str) -> FormField {
    FormField {
        id: id.to_string(),
        ..FormField::new(FieldType::Text, label)
    }
}

fn ids(fields: &[FormField]) -> Vec<String> {
    fields.iter().map(|f| f.id.clone()).collect()
}

// ============================================================
// Creation
// ============================================================

#[test]
fn create_form_on_empty_store() {
    let mut store = FormStore::new();
    let id = store.create_form("Contact", "desc");

    assert_eq!(store.forms().len(), 1);
    let form = store.form(&id).unwrap();
    assert_eq!(form.current_version, 1);
    assert_eq!(form.versions.len(), 1);
    assert_eq!(form.versions[0].version, 1);
    assert!(form.versions[0].fields.is_empty());
}

#[test]
fn latest_created_form_comes_first() {
    let mut store = FormStore::new();
    store.create_form("Contact", "desc");
    let latest = store.create_form("Contact", "desc");

    assert_eq!(store.forms().len(), 2);
    assert_eq!(store.forms()[0].id, latest);
}

// ============================================================
// Versioning
// ============================================================

#[test]
fn saved_version_does_not_alias_caller_fields() {
    let mut store = FormStore::new();
    let form_id = store.create_form("Contact", "desc");

    let mut fields = vec![field("a", "Email"), field("b", "Phone")];
    assert!(store
        .save_form_version(&form_id, &fields, "changelog")
        .is_applied());

    fields[0].label = "Changed".to_string();
    fields.push(field("c", "Extra"));

    let form = store.form(&form_id).unwrap();
    assert_eq!(form.versions.len(), 2);
    assert_eq!(form.versions[1].version, 2);
    assert_eq!(form.current_version, 2);
    assert_eq!(form.versions[1].changelog.as_deref(), Some("changelog"));

    let saved = current_fields(form);
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].label, "Email");
    assert!(form.versions[0].fields.is_empty());
}

#[test]
fn editing_buffer_does_not_alias_version() {
    let mut store = FormStore::new();
    let form_id = store.create_form("Contact", "desc");
    store.save_form_version(&form_id, &[field("a", "Email")], "v2");

    store.start_editing(&form_id, None);
    store.add_field(field("b", "Name"));
    store.delete_field("a");
    store.cancel_editing();

    let form = store.form(&form_id).unwrap();
    assert_eq!(ids(current_fields(form)), vec!["a".to_string()]);
}

#[test]
fn edit_historical_version_then_save() {
    let mut store = FormStore::new();
    let form_id = store.create_form("Contact", "desc");
    store.save_form_version(&form_id, &[field("a", "Email")], "v2");
    store.save_form_version(&form_id, &[field("b", "Name")], "v3");

    let v2 = store.form(&form_id).unwrap().versions[1].id.clone();
    store.start_editing(&form_id, Some(&v2));
    assert_eq!(ids(store.editing_fields()), vec!["a".to_string()]);

    store.add_field(field("c", "City"));
    let buffer = store.editing_fields().to_vec();
    store.save_form_version(&form_id, &buffer, "");

    let form = store.form(&form_id).unwrap();
    assert_eq!(form.current_version, 4);
    let current = current_version(form).unwrap();
    assert_eq!(current.changelog.as_deref(), Some("Version 4"));
    assert_eq!(ids(&current.fields), vec!["a".to_string(), "c".to_string()]);

    let numbers: Vec<u32> = form.versions.iter().map(|v| v.version).collect();
    assert_eq!(numbers, vec![1, 2, 3, 4]);
}

#[test]
fn current_fields_empty_when_version_missing() {
    let mut form = Form::new("Broken", "", "seed");
    form.current_version = 9;

    assert!(current_fields(&form).is_empty());
    assert!(current_version(&form).is_none());

    let mut store = FormStore::with_forms(vec![form.clone()]);
    assert_eq!(store.start_editing(&form.id, None), Mutation::NotFound);
    assert!(!store.is_editing());
}

// ============================================================
// Editing buffer
// ============================================================

#[test]
fn delete_then_add_with_reused_id() {
    let mut store = FormStore::new();
    let form_id = store.create_form("Contact", "desc");
    store.start_editing(&form_id, None);
    store.add_field(field("a", "Old"));
    store.add_field(field("b", "Other"));

    store.delete_field("a");
    store.add_field(field("a", "New"));

    let matching: Vec<&FormField> = store
        .editing_fields()
        .iter()
        .filter(|f| f.id == "a")
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].label, "New");
}

#[test]
fn reorder_moves_first_to_last() {
    let mut store = FormStore::new();
    let form_id = store.create_form("Contact", "desc");
    store.start_editing(&form_id, None);
    for id in ["A", "B", "C"] {
        store.add_field(field(id, id));
    }

    store.reorder_fields(0, 2);
    assert_eq!(ids(store.editing_fields()), vec!["B", "C", "A"]);

    store.reorder_fields(1, 1);
    assert_eq!(ids(store.editing_fields()), vec!["B", "C", "A"]);
}

// ============================================================
// Selection
// ============================================================

#[test]
fn reselecting_form_resets_browsed_version() {
    let mut store = FormStore::new();
    let form_id = store.create_form("Contact", "desc");
    store.save_form_version(&form_id, &[field("a", "Email")], "v2");
    let first_version = store.form(&form_id).unwrap().versions[0].id.clone();

    store.set_selected_form(Some(&form_id));
    assert_eq!(store.set_selected_version(&first_version), Mutation::Applied);
    assert_eq!(store.selected_version().unwrap().version, 1);

    store.set_selected_form(Some(&form_id));
    assert_eq!(store.selected_version().unwrap().version, 2);
}

#[test]
fn selected_version_always_belongs_to_selected_form() {
    let mut store = FormStore::new();
    let first = store.create_form("First", "");
    let second = store.create_form("Second", "");
    let foreign = store.form(&first).unwrap().versions[0].id.clone();

    store.set_selected_form(Some(&second));
    assert_eq!(store.set_selected_version(&foreign), Mutation::NotFound);

    let selected = store.selected_form().unwrap();
    let version = store.selected_version().unwrap();
    assert!(selected.version_by_id(&version.id).is_some());
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn reorder_is_a_permutation(len in 1usize..12, from in 0usize..16, to in 0usize..16) {
        let mut store = FormStore::new();
        let form_id = store.create_form("Contact", "");
        store.start_editing(&form_id, None);
        for i in 0..len {
            store.add_field(field(&format!("f{}", i), "Field"));
        }
        let before = ids(store.editing_fields());

        let result = store.reorder_fields(from, to);
        let after = ids(store.editing_fields());

        if from < len && to < len {
            prop_assert_eq!(result, Mutation::Applied);
            prop_assert_eq!(&after[to], &before[from]);
            let mut sorted_before = before.clone();
            let mut sorted_after = after.clone();
            sorted_before.sort();
            sorted_after.sort();
            prop_assert_eq!(sorted_before, sorted_after);
        } else {
            prop_assert_eq!(result, Mutation::OutOfRange);
            prop_assert_eq!(after, before);
        }
    }

    #[test]
    fn version_numbers_strictly_increase(saves in 1usize..8) {
        let mut store = FormStore::new();
        let form_id = store.create_form("Contact", "");
        for i in 0..saves {
            store.save_form_version(&form_id, &[field(&format!("f{}", i), "Field")], "");
        }

        let form = store.form(&form_id).unwrap();
        prop_assert_eq!(form.current_version as usize, saves + 1);
        prop_assert!(form.versions.windows(2).all(|w| w[0].version < w[1].version));
        prop_assert!(current_version(form).is_some());
    }
}
