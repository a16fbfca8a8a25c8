//! The matcher: one rule per combinator, recursing with the same environment
//! and a growing path.
//!
//! Containers validate their own shape first, then cardinality, then recurse
//! per element/member. The first failing sub-check aborts the whole check.
//! Validation failures are local to a sub-check and can be absorbed by
//! `either`/`optional`/`reject`; definition errors always propagate.

use crate::env::TypeEnv;
use crate::error::{Failure, Path, Reason, ShapeError};
use crate::schema::Schema;
use crate::value::{Num, Value};

/// Check `value` against `schema`, resolving custom type names through `env`.
///
/// Success carries no information; failure describes the first mismatch
/// (expected shape, offending value kind, structural path).
pub fn validate(value: &Value, schema: &Schema, env: &TypeEnv) -> Result<(), ShapeError> {
    check(value, schema, env, &Path::root())
}

fn fail(path: &Path, reason: Reason) -> Result<(), ShapeError> {
    Err(ShapeError::Validation(Failure {
        path: path.clone(),
        reason,
    }))
}

fn wrong_kind(path: &Path, expected: &'static str, found: &Value) -> Result<(), ShapeError> {
    fail(
        path,
        Reason::WrongKind {
            expected,
            found: found.kind(),
        },
    )
}

fn check(value: &Value, schema: &Schema, env: &TypeEnv, path: &Path) -> Result<(), ShapeError> {
    match schema {
        Schema::Anything => Ok(()),

        Schema::Literal(expected) => {
            if value == expected {
                Ok(())
            } else {
                fail(
                    path,
                    Reason::LiteralMismatch {
                        expected: expected.clone(),
                        found: value.clone(),
                    },
                )
            }
        }

        Schema::String { matches } => {
            let s = match value {
                Value::String(s) => s,
                other => return wrong_kind(path, "string", other),
            };
            if let Some(pattern) = matches {
                if !pattern.matches(s) {
                    return fail(
                        path,
                        Reason::PatternMismatch {
                            found: s.clone(),
                            pattern: pattern.source().to_string(),
                        },
                    );
                }
            }
            Ok(())
        }

        Schema::Number { min, max } => {
            let n = match value {
                Value::Number(n) => *n,
                other => return wrong_kind(path, "number", other),
            };
            check_bounds(path, n, *min, *max)
        }

        Schema::Integer { min, max } => {
            let i = match value {
                Value::Number(Num::Int(i)) => *i,
                other => return wrong_kind(path, "integer", other),
            };
            check_bounds(
                path,
                Num::Int(i),
                (*min).map(Num::Int),
                (*max).map(Num::Int),
            )
        }

        Schema::Boolean => match value {
            Value::Boolean(_) => Ok(()),
            other => wrong_kind(path, "boolean", other),
        },

        Schema::Null => match value {
            Value::Null => Ok(()),
            other => wrong_kind(path, "null", other),
        },

        Schema::Undefined => match value {
            Value::Absent => Ok(()),
            other => wrong_kind(path, "nothing", other),
        },

        Schema::Array { contents, length } => {
            let items = match value {
                Value::Array(items) => items,
                other => return wrong_kind(path, "array", other),
            };
            if let Some(length) = length {
                let count = Value::Number(Num::Int(items.len() as i64));
                match check(&count, length, env, path) {
                    Ok(()) => {}
                    Err(ShapeError::Validation(failure)) => {
                        return fail(path, Reason::ArrayLength(Box::new(failure.reason)));
                    }
                    Err(other) => return Err(other),
                }
            }
            if let Some(contents) = contents {
                for (i, item) in items.iter().enumerate() {
                    check(item, contents, env, &path.index(i))?;
                }
            }
            Ok(())
        }

        Schema::Tuple { elements } => {
            let items = match value {
                Value::Array(items) => items,
                other => return wrong_kind(path, "array", other),
            };
            let max = elements.len();
            let optional_tail = elements
                .iter()
                .rev()
                .take_while(|e| matches!(e, Schema::Optional(_)))
                .count();
            let min = max - optional_tail;
            if items.len() < min || items.len() > max {
                return fail(
                    path,
                    Reason::TupleArity {
                        len: items.len(),
                        min,
                        max,
                    },
                );
            }
            for (i, (item, element)) in items.iter().zip(elements.iter()).enumerate() {
                check(item, element, env, &path.index(i))?;
            }
            Ok(())
        }

        Schema::Object {
            members,
            allow_extra,
            allow_missing,
        } => {
            let map = match value {
                Value::Object(map) => map,
                other => return wrong_kind(path, "object", other),
            };
            let Some(members) = members else {
                return Ok(());
            };
            if !allow_extra {
                for name in map.keys() {
                    if !members.contains_key(name) {
                        return fail(path, Reason::UnexpectedMember { name: name.clone() });
                    }
                }
            }
            for (name, member) in members {
                match map.get(name) {
                    Some(v) => check(v, member, env, &path.key(name))?,
                    // a missing key is checked as the absent sentinel, which
                    // only `undefined` and `optional` member schemas accept
                    None if !allow_missing => {
                        check(&Value::Absent, member, env, &path.key(name))?;
                    }
                    None => {}
                }
            }
            Ok(())
        }

        Schema::Dictionary { keys, contents } => {
            let map = match value {
                Value::Object(map) => map,
                other => return wrong_kind(path, "object", other),
            };
            for (key, v) in map {
                if let Some(pattern) = keys {
                    if !pattern.matches(key) {
                        return fail(
                            path,
                            Reason::KeyMismatch {
                                key: key.clone(),
                                pattern: pattern.source().to_string(),
                            },
                        );
                    }
                }
                if let Some(contents) = contents {
                    check(v, contents, env, &path.key(key))?;
                }
            }
            Ok(())
        }

        Schema::Enum { values } => {
            if values.iter().any(|permitted| value == permitted) {
                Ok(())
            } else {
                fail(
                    path,
                    Reason::NotInEnum {
                        found: value.clone(),
                    },
                )
            }
        }

        Schema::Either { choices } => {
            for choice in choices {
                match check(value, choice, env, path) {
                    Ok(()) => return Ok(()),
                    Err(ShapeError::Validation(_)) => {}
                    Err(definition) => return Err(definition),
                }
            }
            fail(path, Reason::NoChoice)
        }

        Schema::Restrict { require, reject } => {
            for required in require {
                check(value, required, env, path)?;
            }
            for (index, rejected) in reject.iter().enumerate() {
                match check(value, rejected, env, path) {
                    Ok(()) => return fail(path, Reason::Rejected { index }),
                    Err(ShapeError::Validation(_)) => {}
                    Err(definition) => return Err(definition),
                }
            }
            Ok(())
        }

        Schema::Optional(inner) => {
            if value.is_absent() {
                return Ok(());
            }
            check(value, inner, env, path)
        }

        Schema::Named(name) => {
            let resolved = env.resolve(name)?;
            check(value, &resolved, env, path)
        }
    }
}

fn check_bounds(path: &Path, n: Num, min: Option<Num>, max: Option<Num>) -> Result<(), ShapeError> {
    if let Some(min) = min {
        if n.as_f64() < min.as_f64() {
            return fail(path, Reason::BelowMinimum { found: n, min });
        }
    }
    if let Some(max) = max {
        if n.as_f64() > max.as_f64() {
            return fail(path, Reason::AboveMaximum { found: n, max });
        }
    }
    Ok(())
}

// ------------------------------- Tests ------------------------------------ //
