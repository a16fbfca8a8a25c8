//! The shape grammar: a closed sum type with one variant per combinator, plus
//! the parser for the authored document form.
//!
//! A schema document is either a bare type-name string, a one-element array
//! `["name"]` (same meaning as the bare name), or a two-element array
//! `["name", parameters]`. Parameters are checked strictly here so that a
//! malformed schema surfaces as a definition error before any value is
//! inspected; regexes compile at parse time for the same reason.

use indexmap::IndexMap;

use crate::error::{DefinitionError, ShapeError};
use crate::value::{Num, Value};

/// All built-in type names, parameterized or not.
pub const BUILTIN_TYPES: &[&str] = &[
    "string",
    "number",
    "integer",
    "boolean",
    "null",
    "undefined",
    "array",
    "object",
    "anything",
    "literal",
    "optional",
    "enum",
    "tuple",
    "dictionary",
    "either",
    "restrict",
];

pub fn is_builtin(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name)
}

/// A shape a value can be checked against.
#[derive(Debug, Clone)]
pub enum Schema {
    Anything,
    Boolean,
    Null,
    Undefined,
    Literal(Value),
    Optional(Box<Schema>),
    String {
        matches: Option<Pattern>,
    },
    Number {
        min: Option<Num>,
        max: Option<Num>,
    },
    Integer {
        min: Option<i64>,
        max: Option<i64>,
    },
    Array {
        contents: Option<Box<Schema>>,
        length: Option<Box<Schema>>,
    },
    Object {
        members: Option<IndexMap<String, Schema>>,
        allow_extra: bool,
        allow_missing: bool,
    },
    Dictionary {
        keys: Option<Pattern>,
        contents: Option<Box<Schema>>,
    },
    Enum {
        values: Vec<Value>,
    },
    Tuple {
        elements: Vec<Schema>,
    },
    Either {
        choices: Vec<Schema>,
    },
    Restrict {
        require: Vec<Schema>,
        reject: Vec<Schema>,
    },
    /// Reference to a custom type, resolved through the environment.
    Named(String),
}

/// A regex that must cover the whole subject string.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    re: regex::Regex,
}

impl Pattern {
    /// Compile `source`, anchored so the whole string has to match.
    pub fn compile(source: &str) -> Result<Self, DefinitionError> {
        let re = regex::Regex::new(&format!("^(?:{source})$")).map_err(|e| {
            DefinitionError::BadPattern {
                pattern: source.to_string(),
                source: e,
            }
        })?;
        Ok(Pattern {
            source: source.to_string(),
            re,
        })
    }

    pub fn matches(&self, subject: &str) -> bool {
        self.re.is_match(subject)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Schema {
    /// Parse a schema from its document form.
    pub fn parse(doc: &Value) -> Result<Schema, ShapeError> {
        Ok(parse_def(doc)?)
    }

    /// The parameterless form of a built-in type name, if the type has one.
    /// `literal`, `optional`, `enum`, `tuple` and `either` have none; their
    /// parameters are mandatory.
    pub(crate) fn builtin_atom(name: &str) -> Option<Schema> {
        match name {
            "anything" => Some(Schema::Anything),
            "boolean" => Some(Schema::Boolean),
            "null" => Some(Schema::Null),
            "undefined" => Some(Schema::Undefined),
            "string" => Some(Schema::String { matches: None }),
            "number" => Some(Schema::Number { min: None, max: None }),
            "integer" => Some(Schema::Integer { min: None, max: None }),
            "array" => Some(Schema::Array {
                contents: None,
                length: None,
            }),
            "object" => Some(Schema::Object {
                members: None,
                allow_extra: false,
                allow_missing: false,
            }),
            "dictionary" => Some(Schema::Dictionary {
                keys: None,
                contents: None,
            }),
            "restrict" => Some(Schema::Restrict {
                require: Vec::new(),
                reject: Vec::new(),
            }),
            _ => None,
        }
    }
}

pub(crate) fn parse_def(doc: &Value) -> Result<Schema, DefinitionError> {
    match doc {
        Value::String(name) => parse_atom(name),
        Value::Array(items) => match items.as_slice() {
            [atom] => match atom {
                Value::String(name) => parse_atom(name),
                other => Err(DefinitionError::Malformed(format!(
                    "a one-element schema must hold a type name, found {}",
                    other.kind()
                ))),
            },
            [head, params] => match head {
                Value::String(name) => parse_params(name, params),
                other => Err(DefinitionError::Malformed(format!(
                    "a schema pair must start with a type name, found {}",
                    other.kind()
                ))),
            },
            _ => Err(DefinitionError::Malformed(format!(
                "a schema array must have one or two elements, found {}",
                items.len()
            ))),
        },
        other => Err(DefinitionError::Malformed(format!(
            "a schema must be a type name or [name, parameters], found {}",
            other.kind()
        ))),
    }
}

fn parse_atom(name: &str) -> Result<Schema, DefinitionError> {
    if let Some(atom) = Schema::builtin_atom(name) {
        return Ok(atom);
    }
    if is_builtin(name) {
        return Err(DefinitionError::Malformed(format!(
            "built-in type {name:?} requires parameters"
        )));
    }
    Ok(Schema::Named(name.to_string()))
}

fn parse_params(name: &str, params: &Value) -> Result<Schema, DefinitionError> {
    match name {
        // the parameter is an arbitrary value / another schema, not an object
        "literal" => Ok(Schema::Literal(params.clone())),
        "optional" => Ok(Schema::Optional(Box::new(parse_def(params)?))),

        "anything" | "boolean" | "null" | "undefined" => {
            let map = param_map(name, params)?;
            if !map.is_empty() {
                return Err(DefinitionError::Malformed(format!(
                    "{name:?} takes no parameters"
                )));
            }
            parse_atom(name)
        }

        "string" => {
            let mut matches = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "matches" => matches = Some(Pattern::compile(expect_string(name, key, v)?)?),
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::String { matches })
        }

        "number" => {
            let mut min = None;
            let mut max = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "min" => min = Some(expect_number(name, key, v)?),
                    "max" => max = Some(expect_number(name, key, v)?),
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::Number { min, max })
        }

        "integer" => {
            let mut min = None;
            let mut max = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "min" => min = Some(expect_integer(name, key, v)?),
                    "max" => max = Some(expect_integer(name, key, v)?),
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::Integer { min, max })
        }

        "array" => {
            let mut contents = None;
            let mut length = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "contents" => contents = Some(Box::new(parse_def(v)?)),
                    "length" => length = Some(Box::new(parse_def(v)?)),
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::Array { contents, length })
        }

        "object" => {
            let mut members = None;
            let mut allow_extra = false;
            let mut allow_missing = false;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "members" => {
                        let mut parsed = IndexMap::new();
                        for (member, def) in expect_object(name, key, v)? {
                            parsed.insert(member.clone(), parse_def(def)?);
                        }
                        members = Some(parsed);
                    }
                    "allow_extra" => allow_extra = expect_bool(name, key, v)?,
                    "allow_missing" => allow_missing = expect_bool(name, key, v)?,
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::Object {
                members,
                allow_extra,
                allow_missing,
            })
        }

        "dictionary" => {
            let mut keys = None;
            let mut contents = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "keys" => keys = Some(Pattern::compile(expect_string(name, key, v)?)?),
                    "contents" => contents = Some(Box::new(parse_def(v)?)),
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::Dictionary { keys, contents })
        }

        "enum" => {
            let mut values = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "values" => values = Some(expect_array(name, key, v)?.to_vec()),
                    _ => return Err(unknown_param(name, key)),
                }
            }
            let values = values.ok_or_else(|| missing_param(name, "values"))?;
            Ok(Schema::Enum { values })
        }

        "tuple" => {
            let mut elements = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "elements" => {
                        elements = Some(
                            expect_array(name, key, v)?
                                .iter()
                                .map(parse_def)
                                .collect::<Result<Vec<_>, _>>()?,
                        );
                    }
                    _ => return Err(unknown_param(name, key)),
                }
            }
            let elements = elements.ok_or_else(|| missing_param(name, "elements"))?;
            // optional elements must form a suffix
            let interior_optional = elements
                .iter()
                .rev()
                .skip_while(|e| matches!(e, Schema::Optional(_)))
                .any(|e| matches!(e, Schema::Optional(_)));
            if interior_optional {
                return Err(DefinitionError::Malformed(
                    "optional tuple elements must be trailing".to_string(),
                ));
            }
            Ok(Schema::Tuple { elements })
        }

        "either" => {
            let mut choices = None;
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "choices" => {
                        choices = Some(
                            expect_array(name, key, v)?
                                .iter()
                                .map(parse_def)
                                .collect::<Result<Vec<_>, _>>()?,
                        );
                    }
                    _ => return Err(unknown_param(name, key)),
                }
            }
            let choices = choices.ok_or_else(|| missing_param(name, "choices"))?;
            Ok(Schema::Either { choices })
        }

        "restrict" => {
            let mut require = Vec::new();
            let mut reject = Vec::new();
            for (key, v) in param_map(name, params)? {
                match key.as_str() {
                    "require" => {
                        require = expect_array(name, key, v)?
                            .iter()
                            .map(parse_def)
                            .collect::<Result<Vec<_>, _>>()?;
                    }
                    "reject" => {
                        reject = expect_array(name, key, v)?
                            .iter()
                            .map(parse_def)
                            .collect::<Result<Vec<_>, _>>()?;
                    }
                    _ => return Err(unknown_param(name, key)),
                }
            }
            Ok(Schema::Restrict { require, reject })
        }

        _ => Err(DefinitionError::Malformed(format!(
            "custom type {name:?} does not take parameters"
        ))),
    }
}

// --------------------------- Parameter helpers ---------------------------- //

fn param_map<'a>(
    name: &str,
    params: &'a Value,
) -> Result<&'a IndexMap<String, Value>, DefinitionError> {
    match params {
        Value::Object(map) => Ok(map),
        other => Err(DefinitionError::Malformed(format!(
            "{name:?} parameters must be an object, found {}",
            other.kind()
        ))),
    }
}

fn unknown_param(name: &str, param: &str) -> DefinitionError {
    DefinitionError::Malformed(format!("unknown parameter {param:?} for {name:?}"))
}

fn missing_param(name: &str, param: &str) -> DefinitionError {
    DefinitionError::Malformed(format!("{name:?} requires a {param:?} parameter"))
}

fn wrong_param(name: &str, param: &str, expected: &str, found: &Value) -> DefinitionError {
    DefinitionError::Malformed(format!(
        "parameter {param:?} for {name:?} must be {expected}, found {}",
        found.kind()
    ))
}

fn expect_string<'a>(name: &str, param: &str, v: &'a Value) -> Result<&'a str, DefinitionError> {
    match v {
        Value::String(s) => Ok(s),
        other => Err(wrong_param(name, param, "a string", other)),
    }
}

fn expect_bool(name: &str, param: &str, v: &Value) -> Result<bool, DefinitionError> {
    match v {
        Value::Boolean(b) => Ok(*b),
        other => Err(wrong_param(name, param, "a boolean", other)),
    }
}

fn expect_number(name: &str, param: &str, v: &Value) -> Result<Num, DefinitionError> {
    match v {
        Value::Number(n) => Ok(*n),
        other => Err(wrong_param(name, param, "a number", other)),
    }
}

fn expect_integer(name: &str, param: &str, v: &Value) -> Result<i64, DefinitionError> {
    match v {
        Value::Number(Num::Int(i)) => Ok(*i),
        other => Err(wrong_param(name, param, "an integer", other)),
    }
}

fn expect_array<'a>(name: &str, param: &str, v: &'a Value) -> Result<&'a [Value], DefinitionError> {
    match v {
        Value::Array(items) => Ok(items),
        other => Err(wrong_param(name, param, "an array", other)),
    }
}

fn expect_object<'a>(
    name: &str,
    param: &str,
    v: &'a Value,
) -> Result<&'a IndexMap<String, Value>, DefinitionError> {
    match v {
        Value::Object(map) => Ok(map),
        other => Err(wrong_param(name, param, "an object", other)),
    }
}

// ------------------------------- Tests ------------------------------------ //
