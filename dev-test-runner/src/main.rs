//! Golden-case runner: `cargo run -p dev-test-runner [FIXTURE_DIR] [NAME_REGEX]`.
//!
//! Each fixture file is a YAML list of cases:
//!
//! ```yaml
//! - name: optional field
//!   input: {name: string, age?: integer}
//!   expect: {type: object, ...}      # compared canonically
//! - name: bad scalar
//!   input: strng
//!   error: 'unsupported scalar type'  # regex over the error message
//! ```
//! A case with neither `expect` nor `error` expects no schema at all.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use colored::Colorize;
use once_cell::sync::Lazy;
use picoschema::Schema;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

static FIXTURE_FILE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w-]+\.ya?ml$").unwrap());

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Case {
    name: String,
    #[serde(default)]
    input: Value,
    expect: Option<Schema>,
    error: Option<String>,
}

enum Outcome {
    Pass,
    Fail(String),
}

fn run_case(case: &Case) -> Outcome {
    let actual = picoschema::to_schema(&case.input);
    match (&case.error, &case.expect, actual) {
        (Some(pattern), _, Err(err)) => {
            let message = err.to_string();
            match Regex::new(pattern) {
                Ok(rx) if rx.is_match(&message) => Outcome::Pass,
                Ok(_) => Outcome::Fail(format!("error {message:?} does not match /{pattern}/")),
                Err(bad) => Outcome::Fail(format!("bad error pattern: {bad}")),
            }
        }
        (Some(pattern), _, Ok(schema)) => Outcome::Fail(format!("expected error /{pattern}/, got {schema:?}")),
        (None, _, Err(err)) => Outcome::Fail(format!("unexpected error: {err}")),
        (None, None, Ok(None)) => Outcome::Pass,
        (None, None, Ok(Some(schema))) => Outcome::Fail(format!("expected no schema, got {schema:?}")),
        (None, Some(_), Ok(None)) => Outcome::Fail("expected a schema, got none".into()),
        (None, Some(expected), Ok(Some(schema))) => {
            let (want, got) = match (picoschema::to_canonical_value(expected), picoschema::to_canonical_value(&schema)) {
                (Ok(want), Ok(got)) => (want, got),
                (Err(e), _) | (_, Err(e)) => return Outcome::Fail(format!("canonicalization failed: {e}")),
            };
            if want == got {
                Outcome::Pass
            } else {
                Outcome::Fail(format!("\n  want: {want}\n  got:  {got}"))
            }
        }
    }
}

fn fixture_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| FIXTURE_FILE.is_match(n))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn main() -> ExitCode {
    let mut args = std::env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures"));
    let filter = match args.next().map(|p| Regex::new(&p)).transpose() {
        Ok(filter) => filter,
        Err(err) => {
            eprintln!("bad name filter: {err}");
            return ExitCode::FAILURE;
        }
    };

    let files = match fixture_files(&dir) {
        Ok(files) => files,
        Err(err) => {
            eprintln!("cannot read {}: {err}", dir.display());
            return ExitCode::FAILURE;
        }
    };

    let (mut passed, mut failed) = (0usize, 0usize);
    for file in files {
        let label = file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        let cases = std::fs::read_to_string(&file)
            .map_err(|e| e.to_string())
            .and_then(|src| picoschema::path_de::from_yaml_str_with_path::<Vec<Case>>(&src).map_err(|e| e.to_string()));
        let cases = match cases {
            Ok(cases) => cases,
            Err(err) => {
                eprintln!("{} {label}: {err}", "✘".red());
                failed += 1;
                continue;
            }
        };
        for case in cases.iter().filter(|c| filter.as_ref().is_none_or(|rx| rx.is_match(&c.name))) {
            match run_case(case) {
                Outcome::Pass => {
                    passed += 1;
                    eprintln!("{} {label} › {}", "✔".green(), case.name);
                }
                Outcome::Fail(why) => {
                    failed += 1;
                    eprintln!("{} {label} › {}: {why}", "✘".red(), case.name.bold());
                }
            }
        }
    }

    eprintln!("\n{passed} passed, {failed} failed");
    if failed == 0 { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
