//! Structural shape checking for JSON-like values.
//!
//! A shape is written in a small combinator language, either as a bare type
//! name (`"integer"`) or as a name paired with parameters
//! (`["array", {"contents": "string"}]`), and checked against a [`Value`]
//! by a recursive matcher. Custom type names resolve through a caller
//! supplied [`TypeEnv`]. The grammar of shape documents is itself a shape
//! (see [`meta`]), checked by the same engine.
//!
//! ```
//! use json_conform::{validate, Schema, TypeEnv, Value};
//!
//! let schema = Schema::parse(&Value::from(serde_json::json!(
//!     ["object", {"members": {
//!         "id": "integer",
//!         "tags": ["array", {"contents": "string"}]
//!     }}]
//! )))?;
//! let value = Value::from(serde_json::json!({"id": 7, "tags": ["a", "b"]}));
//! validate(&value, &schema, &TypeEnv::new())?;
//! # Ok::<(), json_conform::ShapeError>(())
//! ```
//!
//! Checking allocates no persistent state: every call walks the schema
//! fresh, so independent checks can run in parallel against one environment.

pub mod check;
pub mod env;
pub mod error;
pub mod meta;
pub mod schema;
pub mod value;

pub use check::validate;
pub use env::TypeEnv;
pub use error::{DefinitionError, Failure, Path, Reason, ShapeError};
pub use schema::{Pattern, Schema};
pub use value::{Num, Value};
