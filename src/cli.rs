//! Minimal CLI: decode → (schema | check)
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use picoschema::{PicoError, Schema};
use rayon::prelude::*;
use serde_json::{Value, json};

use crate::logging::{LogFormat, LoggingConfig};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// translate picoschema (YAML or JSON) into JSON Schema
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,

    /// more diagnostics on stderr (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// diagnostics layout
    #[arg(long, global = true, value_enum, env = "PICOSCHEMA_LOG_FORMAT", default_value = "compact")]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// convert and print the JSON Schema
    Schema(SchemaOut),
    /// convert and report which documents fail
    Check(CheckOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// JSON Pointer to select a subnode in each document (e.g. /input/schema)
    #[arg(long)]
    json_pointer: Option<String>,

    /// JQ pre-process filter for each document; each output is converted separately
    #[arg(long)]
    jq_expr: Option<String>,

    /// One or more inputs. May be literal paths or quoted glob patterns.
    /// `.json` files are read as JSON, everything else as YAML.
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// sort `required` lists for stable comparison instead of keeping authored order
    #[arg(long)]
    canonical: bool,

    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(clap::Parser, Debug)]
struct CheckOut {
    #[command(flatten)]
    input_settings: InputSettings,
}

/// One decoded document, labelled with where it came from.
#[derive(Debug, Clone)]
struct Document {
    source: String,
    value: Value,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Document>> {
        let source_paths = resolve_file_path_patterns(&self.input)?;
        let mut documents = Vec::new();
        for source_path in source_paths {
            let source = source_path.to_string_lossy().to_string();
            let value = decode_file(&source_path)?;
            let value = match self.json_pointer.as_deref() {
                None => value,
                Some(pointer) => value
                    .pointer(pointer)
                    .cloned()
                    .with_context(|| format!("JSON pointer {pointer:?} matched nothing in {source}"))?,
            };
            match self.jq_expr.as_deref() {
                None => documents.push(Document { source, value }),
                Some(jq_expr) => {
                    let outputs = crate::jq_exec::run_jaq(jq_expr, &value)
                        .with_context(|| format!("failed to apply jq expression to {source}"))?;
                    let many = outputs.len() > 1;
                    for (i, value) in outputs.into_iter().enumerate() {
                        let source = if many { format!("{source}#{i}") } else { source.clone() };
                        documents.push(Document { source, value });
                    }
                }
            }
        }
        tracing::info!(documents = documents.len(), "loaded input documents");
        Ok(documents)
    }
}

fn decode_file(path: &Path) -> Result<Value> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let value = if is_json {
        serde_json::from_str(&source)
            .with_context(|| format!("failed to parse JSON source file {}", path.display()))?
    } else {
        serde_yaml::from_str(&source)
            .with_context(|| format!("failed to parse YAML source file {}", path.display()))?
    };
    Ok(value)
}

/// Each call is independent, so documents convert in parallel.
fn convert_all(documents: &[Document]) -> Vec<(&Document, Result<Option<Schema>, PicoError>)> {
    documents
        .par_iter()
        .map(|doc| (doc, picoschema::to_schema(&doc.value)))
        .collect()
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig::from_verbosity(self.verbose, self.log_format)
    }

    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                // debug path
                if target.no_op {
                    eprintln!("{self:#?}");
                    return Ok(());
                }
                let documents = target.input_settings.load_documents()?;
                let output = render_schemas(&documents, target.canonical)?;
                let output = serde_json::to_string_pretty(&output)?;
                match target.out.as_ref() {
                    Some(out) => {
                        if let Some(parent) = out.parent() {
                            std::fs::create_dir_all(parent)?;
                        }
                        std::fs::write(out, &output)
                            .with_context(|| format!("failed to write {}", out.display()))?;
                        tracing::info!(out = %out.display(), "wrote schema");
                    }
                    None => println!("{output}"),
                }
                Ok(())
            }
            Command::Check(target) => {
                let documents = target.input_settings.load_documents()?;
                let mut failures = 0usize;
                for (doc, result) in convert_all(&documents) {
                    match result {
                        Ok(_) => println!("{} {}", "✔".green(), doc.source),
                        Err(error) => {
                            failures += 1;
                            println!("{} {}: {error}", "✘".red(), doc.source.bold());
                        }
                    }
                }
                if failures > 0 {
                    bail!("{failures} of {} documents failed to convert", documents.len());
                }
                Ok(())
            }
        }
    }
}

/// One document → its schema; several → `[{source, schema}, ...]`.
fn render_schemas(documents: &[Document], canonical: bool) -> Result<Value> {
    let mut rendered = Vec::with_capacity(documents.len());
    for (doc, result) in convert_all(documents) {
        let schema = result.with_context(|| format!("failed to convert {}", doc.source))?;
        let value = match (schema, canonical) {
            (None, _) => Value::Null,
            (Some(schema), true) => picoschema::to_canonical_value(&schema)?,
            (Some(schema), false) => serde_json::to_value(&schema)?,
        };
        rendered.push((doc, value));
    }
    if let [(_, only)] = rendered.as_slice() {
        return Ok(only.clone());
    }
    Ok(Value::Array(
        rendered
            .into_iter()
            .map(|(doc, schema)| json!({ "source": doc.source, "schema": schema }))
            .collect(),
    ))
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{' ))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern).with_context(|| format!("invalid glob pattern {pattern}"))? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn settings(input: Vec<String>) -> InputSettings {
        InputSettings { json_pointer: None, jq_expr: None, input }
    }

    #[test]
    fn yaml_and_json_inputs_keep_key_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yaml"), "zeta: string\nalpha?: integer\n").unwrap();
        fs::write(dir.path().join("b.json"), r#"{"type": "string", "minLength": 1}"#).unwrap();

        let pattern = dir.path().join("*").to_string_lossy().to_string();
        let docs = settings(vec![pattern]).load_documents().unwrap();
        assert_eq!(docs.len(), 2);

        let keys: Vec<&String> = docs[0].value.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "alpha?"]);

        let rendered = render_schemas(&docs, false).unwrap();
        assert_eq!(rendered[0]["schema"]["required"], json!(["zeta"]));
        assert_eq!(rendered[1]["schema"], json!({"type": "string", "minLength": 1}));
    }

    #[test]
    fn json_pointer_selects_subnode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.yaml");
        fs::write(&path, "model: any\ninput:\n  schema:\n    b: string\n    a: string\n").unwrap();

        let mut input = settings(vec![path.to_string_lossy().to_string()]);
        input.json_pointer = Some("/input/schema".into());
        let docs = input.load_documents().unwrap();
        let rendered = render_schemas(&docs, true).unwrap();
        assert_eq!(rendered["required"], json!(["a", "b"]));

        input.json_pointer = Some("/output/schema".into());
        assert!(input.load_documents().is_err());
    }

    #[test]
    fn jq_fan_out_labels_documents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("many.json");
        fs::write(&path, r#"{"schemas": ["string", null]}"#).unwrap();

        let mut input = settings(vec![path.to_string_lossy().to_string()]);
        input.jq_expr = Some(".schemas[]".into());
        let docs = input.load_documents().unwrap();
        assert!(docs[1].source.ends_with("many.json#1"));

        let rendered = render_schemas(&docs, false).unwrap();
        assert_eq!(rendered[0]["schema"], json!({"type": "string"}));
        assert_eq!(rendered[1]["schema"], Value::Null);
    }

    #[test]
    fn conversion_errors_name_the_source() {
        let docs = vec![Document { source: "bad.yaml".into(), value: json!({"x": 42}) }];
        let err = render_schemas(&docs, false).unwrap_err();
        assert!(format!("{err:#}").contains("failed to convert bad.yaml"));
    }

    #[test]
    fn empty_glob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = dir.path().join("*.yaml").to_string_lossy().to_string();
        assert!(resolve_file_path_patterns([pattern]).is_err());
    }
}
