//! The grammar of schema documents, expressed as a definitions document and
//! checked by the unmodified engine. Nothing here is special-cased: the
//! meta-schema is ordinary data, and it describes itself.

use once_cell::sync::Lazy;

use crate::check::validate;
use crate::env::TypeEnv;
use crate::error::ShapeError;
use crate::schema::Schema;
use crate::value::Value;

const META_SCHEMA_JSON: &str = include_str!("meta_schema.json");

/// Definitions describing the shape of valid schema documents.
pub static META_ENV: Lazy<TypeEnv> = Lazy::new(|| {
    let doc: Value = serde_json::from_str(META_SCHEMA_JSON)
        .expect("embedded meta-schema is valid JSON");
    TypeEnv::parse(&doc).expect("embedded meta-schema is a valid definitions document")
});

static DEFINITION: Lazy<Schema> = Lazy::new(|| Schema::Named("definition".to_string()));
static DOCUMENT: Lazy<Schema> = Lazy::new(|| Schema::Named("schema".to_string()));

/// Check a single schema definition against the meta-schema.
pub fn check_definition(definition: &Value) -> Result<(), ShapeError> {
    validate(definition, &DEFINITION, &META_ENV)
}

/// Check a whole definitions document (a dictionary of named definitions)
/// against the meta-schema.
pub fn check_definitions_document(document: &Value) -> Result<(), ShapeError> {
    validate(document, &DOCUMENT, &META_ENV)
}

// ------------------------------- Tests ------------------------------------ //
