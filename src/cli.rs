//! Minimal CLI: check documents against a shape, or shape documents against
//! the meta-schema. All validation lives in the library; this layer only
//! loads files and reports.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use json_conform::{meta, validate, Schema, TypeEnv, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// check JSON documents against a shape written in the combinator language
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// check documents against a schema document
    Check(CheckTarget),
    /// check schema documents against the embedded meta-schema
    CheckSchema(CheckSchemaTarget),
}

#[derive(Args, Debug)]
struct CheckTarget {
    /// schema document (JSON)
    #[arg(short, long)]
    schema: PathBuf,

    /// named type definitions document (JSON object of definitions)
    #[arg(short, long)]
    types: Option<PathBuf>,

    /// one or more inputs; literal paths or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(Args, Debug)]
struct CheckSchemaTarget {
    /// treat each input as a single definition rather than a definitions
    /// document
    #[arg(long)]
    single: bool,

    /// one or more inputs; literal paths or quoted glob patterns
    #[arg(num_args = 1.., required = true)]
    input: Vec<String>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Check(target) => target.run(),
            Command::CheckSchema(target) => target.run(),
        }
    }
}

impl CheckTarget {
    fn run(&self) -> Result<()> {
        let schema_doc = read_json(&self.schema)?;
        let schema = Schema::parse(&schema_doc)
            .with_context(|| format!("in schema document {}", self.schema.display()))?;
        let env = match &self.types {
            Some(path) => TypeEnv::parse(&read_json(path)?)
                .with_context(|| format!("in definitions document {}", path.display()))?,
            None => TypeEnv::new(),
        };
        report(&self.input, |value| validate(value, &schema, &env))
    }
}

impl CheckSchemaTarget {
    fn run(&self) -> Result<()> {
        if self.single {
            report(&self.input, meta::check_definition)
        } else {
            report(&self.input, meta::check_definitions_document)
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// Run `check` over every resolved input, print per-file results, and fail
/// if any document does not conform.
fn report<F>(patterns: &[String], check: F) -> Result<()>
where
    F: Fn(&Value) -> Result<(), json_conform::ShapeError>,
{
    let inputs = resolve_file_path_patterns(patterns)?;
    let mut failed = 0usize;
    for input in &inputs {
        let value = read_json(input)?;
        match check(&value) {
            Ok(()) => println!("{} {}", "ok".green(), input.display()),
            Err(err) => {
                failed += 1;
                println!("{} {}: {err}", "FAIL".red().bold(), input.display());
            }
        }
    }
    if failed > 0 {
        bail!("{failed} of {} documents do not conform", inputs.len());
    }
    Ok(())
}

/// Read a JSON file into a `Value`, keeping the JSON path in parse errors.
fn read_json(path: &std::path::Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let de = &mut serde_json::Deserializer::from_str(&source);
    let value = serde_path_to_error::deserialize(de)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(value)
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                // an explicit glob that matches nothing is an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}
