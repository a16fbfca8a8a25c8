//! Custom type environment: named definitions and their resolution.

use indexmap::IndexMap;

use crate::error::{DefinitionError, ShapeError};
use crate::schema::{self, Schema};
use crate::value::Value;

/// Mapping from custom type names to schemas, immutable for the duration of
/// one check call. Built-in names always win over entries here, so a custom
/// definition can never shadow a built-in type.
#[derive(Debug, Clone, Default)]
pub struct TypeEnv {
    defs: IndexMap<String, Schema>,
}

impl TypeEnv {
    pub fn new() -> Self {
        TypeEnv::default()
    }

    /// Parse a definitions document: an object mapping custom type names to
    /// schema definitions. Redefining a built-in name is a definition error.
    pub fn parse(doc: &Value) -> Result<Self, ShapeError> {
        let map = match doc {
            Value::Object(map) => map,
            other => {
                return Err(DefinitionError::Malformed(format!(
                    "a definitions document must be an object, found {}",
                    other.kind()
                ))
                .into());
            }
        };
        let mut defs = IndexMap::new();
        for (name, def) in map {
            if schema::is_builtin(name) {
                return Err(DefinitionError::Malformed(format!(
                    "cannot redefine built-in type {name:?}"
                ))
                .into());
            }
            defs.insert(name.clone(), schema::parse_def(def)?);
        }
        Ok(TypeEnv { defs })
    }

    /// Add one definition. Built-in names always take precedence during
    /// resolution, so defining one here has no effect.
    pub fn define(&mut self, name: impl Into<String>, schema: Schema) {
        self.defs.insert(name.into(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.defs.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    /// Resolve a type name to a concrete schema, following name-to-name
    /// aliases. Built-in names are terminal; a name that is neither built-in
    /// nor defined is an error, as is a pure alias cycle.
    pub(crate) fn resolve(&self, name: &str) -> Result<Schema, DefinitionError> {
        let mut seen: Vec<String> = Vec::new();
        let mut current = name.to_string();
        loop {
            if let Some(atom) = Schema::builtin_atom(&current) {
                return Ok(atom);
            }
            if schema::is_builtin(&current) {
                return Err(DefinitionError::Malformed(format!(
                    "built-in type {current:?} requires parameters"
                )));
            }
            if seen.contains(&current) {
                return Err(DefinitionError::AliasCycle(current));
            }
            match self.defs.get(&current) {
                None => return Err(DefinitionError::UnknownType(current)),
                Some(Schema::Named(next)) => {
                    let next = next.clone();
                    seen.push(current);
                    current = next;
                }
                Some(other) => return Ok(other.clone()),
            }
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn env(doc: serde_json::Value) -> TypeEnv {
        TypeEnv::parse(&Value::from(doc)).unwrap()
    }

    #[test]
    fn resolution_is_transitive() {
        let env = env(json!({"foo": "bar", "bar": ["integer", {"min": -1, "max": 2}]}));
        let resolved = env.resolve("foo").unwrap();
        assert!(matches!(
            resolved,
            Schema::Integer { min: Some(-1), max: Some(2) }
        ));
    }

    #[test]
    fn builtin_names_are_terminal() {
        let env = TypeEnv::new();
        assert!(matches!(env.resolve("string"), Ok(Schema::String { .. })));
    }

    #[test]
    fn unknown_names_are_definition_errors() {
        let env = env(json!({"foo": "integer"}));
        let err = env.resolve("bar").unwrap_err();
        assert!(matches!(err, DefinitionError::UnknownType(name) if name == "bar"));
    }

    #[test]
    fn pure_alias_cycles_are_detected() {
        let env = env(json!({"a": "b", "b": "a"}));
        assert!(matches!(env.resolve("a"), Err(DefinitionError::AliasCycle(_))));
        // a self-alias is the smallest cycle
        let env = env_self();
        assert!(matches!(env.resolve("x"), Err(DefinitionError::AliasCycle(_))));
    }

    fn env_self() -> TypeEnv {
        TypeEnv::parse(&Value::from(json!({"x": "x"}))).unwrap()
    }

    #[test]
    fn documents_cannot_redefine_builtins() {
        let doc = Value::from(json!({"string": "integer"}));
        assert!(TypeEnv::parse(&doc).is_err());
    }

    #[test]
    fn documents_must_be_objects() {
        assert!(TypeEnv::parse(&Value::from(json!(["not", "an", "object"]))).is_err());
    }
}
