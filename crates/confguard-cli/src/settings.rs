//! # Settings File
//!
//! Optional YAML file, passed with the global `--config` flag, holding
//! defaults for the CLI:
//!
//! ```yaml
//! schema: schemas/site.schema.json   # relative to this file
//! format: json                       # text | json
//! rules:                             # replaces the built-in rule tables
//!   tagged_unions: [...]
//!   alternatives: [...]
//! ```
//!
//! Command-line flags always take precedence over values from this file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;

use confguard_rules::RuleSet;

/// How results are written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One human-readable line per problem.
    #[default]
    Text,
    /// One JSON object per document.
    Json,
}

/// Values loaded from the settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Default schema path.
    #[serde(default)]
    pub schema: Option<PathBuf>,
    /// Default output format.
    #[serde(default)]
    pub format: Option<OutputFormat>,
    /// Rule tables replacing [`RuleSet::builtin`].
    #[serde(default)]
    pub rules: Option<RuleSet>,
}

impl Settings {
    /// Load and check a settings file.
    ///
    /// A relative `schema` path is resolved against the directory holding
    /// the settings file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file: {}", path.display()))?;
        let mut settings: Settings = serde_yaml::from_str(&content)
            .with_context(|| format!("invalid settings file: {}", path.display()))?;

        if let Some(rules) = &settings.rules {
            rules
                .ensure_well_formed()
                .with_context(|| format!("invalid rules in {}", path.display()))?;
        }

        if let Some(schema) = settings.schema.take() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            settings.schema = Some(if schema.is_absolute() {
                schema
            } else {
                base.join(schema)
            });
        }

        tracing::debug!(
            path = %path.display(),
            custom_rules = settings.rules.is_some(),
            "loaded settings"
        );
        Ok(settings)
    }

    /// Load `path` if given, otherwise return empty settings.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// The rule tables in effect.
    pub fn rule_set(&self) -> RuleSet {
        self.rules.clone().unwrap_or_else(RuleSet::builtin)
    }
}
