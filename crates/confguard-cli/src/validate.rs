//! # Validate Subcommand
//!
//! Validates one or more configuration documents against a schema and the
//! semantic rule tables, printing every problem found.
//!
//! ```bash
//! confguard validate --schema site.schema.json site.json
//! confguard --config confguard.yaml validate --format json site.yaml other.json
//! ```
//!
//! Exit codes: `0` every document is valid, `1` at least one problem was
//! found, `2` at least one document could not be checked at all.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use confguard_core::{parse_document, DocumentFormat, Report, ValidationResult};
use confguard_rules::RuleSet;
use confguard_schema::SchemaValidator;

use crate::settings::{OutputFormat, Settings};

/// Exit code when every document is valid.
pub const EXIT_VALID: u8 = 0;
/// Exit code when at least one problem was found.
pub const EXIT_PROBLEMS: u8 = 1;
/// Exit code when at least one document could not be checked.
pub const EXIT_ERROR: u8 = 2;

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema file. Defaults to `schema` from the settings file.
    #[arg(long)]
    pub schema: Option<PathBuf>,

    /// Documents to validate. `.yaml`/`.yml` files are read as YAML,
    /// everything else as JSON with comments.
    #[arg(required = true)]
    pub documents: Vec<PathBuf>,

    /// Output format. Defaults to `format` from the settings file, then text.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Skip the semantic rules; check schema conformance only.
    #[arg(long, conflicts_with = "no_schema")]
    pub no_rules: bool,

    /// Skip the schema; check the semantic rules only.
    #[arg(long)]
    pub no_schema: bool,
}

/// Validate one document with an already-compiled schema and a rule set.
///
/// Both layers run on the same parsed document; schema problems come first
/// in the report.
pub fn check_document(
    validator: Option<&SchemaValidator>,
    rules: &RuleSet,
    document_bytes: &[u8],
    format: DocumentFormat,
) -> Result<Report> {
    let document = parse_document(document_bytes, format).context("malformed document")?;

    let schema = validator
        .map(|v| v.validate_value(&document))
        .unwrap_or_default();
    let semantic = rules
        .check(&document)
        .context("document cannot be checked against the rule tables")?;

    Ok(Report::new(schema, semantic))
}

/// Validate document bytes against schema bytes and a rule set.
///
/// This is the single call a configuration loader needs: the document is
/// acceptable exactly when this returns `Ok(report)` with
/// `report.is_valid()`.
pub fn validate_config(
    schema_bytes: &[u8],
    document_bytes: &[u8],
    format: DocumentFormat,
    rules: &RuleSet,
) -> Result<Report> {
    let validator = SchemaValidator::compile(schema_bytes).context("invalid schema")?;
    check_document(Some(&validator), rules, document_bytes, format)
}

#[derive(Serialize)]
struct DocumentOutcome<'a> {
    document: &'a str,
    valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "ValidationResult::is_empty")]
    problems: &'a ValidationResult,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    semantic: &'a [String],
}

/// Execute the validate subcommand, writing results to stdout.
pub fn run_validate(args: &ValidateArgs, settings: &Settings) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_validate_to(args, settings, &mut out)
}

/// Execute the validate subcommand, writing results to `out`.
pub fn run_validate_to<W: Write>(
    args: &ValidateArgs,
    settings: &Settings,
    out: &mut W,
) -> Result<u8> {
    let format = args.format.or(settings.format).unwrap_or_default();

    let validator = if args.no_schema {
        None
    } else {
        let schema_path = args
            .schema
            .as_deref()
            .or(settings.schema.as_deref())
            .context("no schema given: pass --schema, set `schema` in the settings file, or use --no-schema")?;
        Some(load_schema(schema_path)?)
    };

    let rules = if args.no_rules {
        RuleSet::default()
    } else {
        settings.rule_set()
    };

    let mut exit = EXIT_VALID;
    for path in &args.documents {
        let name = path.display().to_string();
        let outcome = std::fs::read(path)
            .with_context(|| format!("failed to read {name}"))
            .and_then(|bytes| {
                check_document(
                    validator.as_ref(),
                    &rules,
                    &bytes,
                    DocumentFormat::from_path(path),
                )
            });

        match outcome {
            Ok(report) => {
                if !report.is_valid() {
                    exit = exit.max(EXIT_PROBLEMS);
                }
                tracing::info!(document = %name, problems = report.problem_count(), "checked");
                write_report(out, format, &name, &report)?;
            }
            Err(e) => {
                exit = EXIT_ERROR;
                tracing::debug!(document = %name, error = %e, "document could not be checked");
                write_error(out, format, &name, &e)?;
            }
        }
    }

    Ok(exit)
}

fn load_schema(path: &Path) -> Result<SchemaValidator> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read schema: {}", path.display()))?;
    SchemaValidator::compile(&bytes)
        .with_context(|| format!("invalid schema: {}", path.display()))
}

fn write_report<W: Write>(
    out: &mut W,
    format: OutputFormat,
    name: &str,
    report: &Report,
) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if report.is_valid() {
                writeln!(out, "{name}: ok")?;
            }
            for message in report.messages() {
                writeln!(out, "{name}: {message}")?;
            }
        }
        OutputFormat::Json => {
            let outcome = DocumentOutcome {
                document: name,
                valid: report.is_valid(),
                error: None,
                problems: &report.schema,
                semantic: &report.semantic,
            };
            writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
        }
    }
    Ok(())
}

fn write_error<W: Write>(
    out: &mut W,
    format: OutputFormat,
    name: &str,
    error: &anyhow::Error,
) -> Result<()> {
    match format {
        OutputFormat::Text => writeln!(out, "{name}: error: {error:#}")?,
        OutputFormat::Json => {
            let empty = ValidationResult::default();
            let outcome = DocumentOutcome {
                document: name,
                valid: false,
                error: Some(format!("{error:#}")),
                problems: &empty,
                semantic: &[],
            };
            writeln!(out, "{}", serde_json::to_string(&outcome)?)?;
        }
    }
    Ok(())
}
