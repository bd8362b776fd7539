//! Form builder core
//!
//! Domain model and in-memory editing store for the forms console:
//!
//! - [`form`]: forms, immutable versions, fields and the schema derived from them
//! - [`store`]: the mutation engine (selection, CRUD, editing buffer, versioning)
//! - [`preview`]: pre-fill and submission output derivation for the preview page
//! - [`phone`]: phone number formatting used by phone fields
//! - [`localized`]: English/Spanish text with fallback

pub mod error;
pub mod form;
pub mod localized;
pub mod phone;
pub mod preview;
pub mod store;

pub use error::{PreviewError, StoreError};
pub use form::{
    current_fields, current_schema, current_version, output_schema, schema_key, FieldProperties,
    FieldType, FieldValidation, Form, FormField, FormSchema, FormStatus, FormVersion,
};
pub use localized::{Language, LocalizedText};
pub use store::{FieldUpdate, FormQuery, FormStore, FormUpdate, Mutation};
