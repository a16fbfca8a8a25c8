//! Error model: definition errors (the schema itself is broken) versus
//! validation failures (the value does not conform), with a structural path
//! pointing at the offending sub-value.

use std::fmt;

use thiserror::Error;

use crate::value::{Num, Value};

/// Anything the checker can report.
///
/// The two kinds are deliberately distinct: a [`DefinitionError`] means the
/// schema author made a mistake; a [`Failure`] means the value under check
/// does not conform to a well-formed schema.
#[derive(Error, Debug)]
pub enum ShapeError {
    #[error("invalid schema: {0}")]
    Definition(#[from] DefinitionError),

    #[error("{0}")]
    Validation(#[from] Failure),
}

impl ShapeError {
    pub fn is_definition(&self) -> bool {
        matches!(self, ShapeError::Definition(_))
    }
}

/// The schema document itself is malformed.
#[derive(Error, Debug)]
pub enum DefinitionError {
    #[error("unknown type {0:?}")]
    UnknownType(String),

    #[error("type alias cycle at {0:?}")]
    AliasCycle(String),

    #[error("invalid pattern {pattern:?}: {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },

    #[error("{0}")]
    Malformed(String),
}

/// A value failed to conform: where, and why.
#[derive(Error, Debug)]
#[error("{path}: {reason}")]
pub struct Failure {
    pub path: Path,
    pub reason: Reason,
}

/// Why a single sub-check failed.
#[derive(Error, Debug)]
pub enum Reason {
    #[error("expected {expected}, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected the literal {expected}, found {found}")]
    LiteralMismatch { expected: Value, found: Value },

    #[error("{found} is not one of the permitted values")]
    NotInEnum { found: Value },

    #[error("{found} is below the minimum {min}")]
    BelowMinimum { found: Num, min: Num },

    #[error("{found} is above the maximum {max}")]
    AboveMaximum { found: Num, max: Num },

    #[error("{found:?} does not match /{pattern}/")]
    PatternMismatch { found: String, pattern: String },

    #[error("key {key:?} does not match /{pattern}/")]
    KeyMismatch { key: String, pattern: String },

    #[error("unexpected member {name:?}")]
    UnexpectedMember { name: String },

    #[error("expected between {min} and {max} elements, found {len}")]
    TupleArity { len: usize, min: usize, max: usize },

    #[error("array length check failed: {0}")]
    ArrayLength(Box<Reason>),

    #[error("no alternative matched")]
    NoChoice,

    #[error("value matches a rejected shape (reject[{index}])")]
    Rejected { index: usize },
}

/// Structural location of a failure, extended with an object key or array
/// index at each recursive step. Renders as `$.member[3]["odd key"]`.
#[derive(Debug, Clone, Default)]
pub struct Path(Vec<Step>);

#[derive(Debug, Clone)]
enum Step {
    Key(String),
    Index(usize),
}

impl Path {
    pub fn root() -> Self {
        Path::default()
    }

    pub fn key(&self, name: &str) -> Self {
        let mut steps = self.0.clone();
        steps.push(Step::Key(name.to_string()));
        Path(steps)
    }

    pub fn index(&self, i: usize) -> Self {
        let mut steps = self.0.clone();
        steps.push(Step::Index(i));
        Path(steps)
    }
}

fn is_plain_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for step in &self.0 {
            match step {
                Step::Key(k) if is_plain_key(k) => write!(f, ".{k}")?,
                Step::Key(k) => write!(f, "[{k:?}]")?,
                Step::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_keys_and_indices() {
        let path = Path::root().key("items").index(3).key("foo-bar.baz");
        assert_eq!(path.to_string(), r#"$.items[3]["foo-bar.baz"]"#);
    }

    #[test]
    fn root_path_is_dollar() {
        assert_eq!(Path::root().to_string(), "$");
    }

    #[test]
    fn failure_display_carries_path_and_reason() {
        let failure = Failure {
            path: Path::root().key("a"),
            reason: Reason::WrongKind {
                expected: "string",
                found: "integer",
            },
        };
        assert_eq!(failure.to_string(), "$.a: expected string, found integer");
    }

    #[test]
    fn definition_and_validation_kinds_are_distinguishable() {
        let def = ShapeError::from(DefinitionError::UnknownType("bar".to_string()));
        let val = ShapeError::from(Failure {
            path: Path::root(),
            reason: Reason::NoChoice,
        });
        assert!(def.is_definition());
        assert!(!val.is_definition());
        assert!(def.to_string().contains("unknown type \"bar\""));
    }

    #[test]
    fn bound_failures_render_the_numbers() {
        let reason = Reason::BelowMinimum {
            found: Num::Float(8999.9),
            min: Num::Int(9000),
        };
        assert_eq!(reason.to_string(), "8999.9 is below the minimum 9000");
    }
}
