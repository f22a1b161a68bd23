//! # Rules Subcommand
//!
//! Prints the semantic rule tables in effect: the built-in tables, or the
//! tables from the settings file when it defines `rules`.

use std::io::Write;

use anyhow::Result;
use clap::Args;

use confguard_rules::RuleSet;

use crate::settings::{OutputFormat, Settings};
use crate::validate::EXIT_VALID;

/// Arguments for the rules subcommand.
#[derive(Args, Debug)]
pub struct RulesArgs {
    /// Output format. Defaults to `format` from the settings file, then text.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Execute the rules subcommand, writing to stdout.
pub fn run_rules(args: &RulesArgs, settings: &Settings) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_rules_to(args, settings, &mut out)
}

/// Execute the rules subcommand, writing to `out`.
pub fn run_rules_to<W: Write>(args: &RulesArgs, settings: &Settings, out: &mut W) -> Result<u8> {
    let rules = settings.rule_set();
    match args.format.or(settings.format).unwrap_or_default() {
        OutputFormat::Text => write_text(out, &rules)?,
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&rules)?)?,
    }
    Ok(EXIT_VALID)
}

fn write_text<W: Write>(out: &mut W, rules: &RuleSet) -> Result<()> {
    writeln!(out, "Tagged unions:")?;
    if rules.tagged_unions.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for rule in &rules.tagged_unions {
        writeln!(out, "  {} (discriminator \"{}\")", rule.field, rule.discriminator)?;
        for variant in &rule.variants {
            if variant.required.is_empty() {
                writeln!(out, "    {}", variant.tag)?;
            } else {
                writeln!(out, "    {}: {}", variant.tag, variant.required.join(", "))?;
            }
        }
    }

    writeln!(out, "Alternative requirements:")?;
    if rules.alternatives.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for rule in &rules.alternatives {
        writeln!(out, "  {} ({})", rule.field, rule.label)?;
        writeln!(out, "    exactly one of: {}", rule.primary.join(", "))?;
        if !rule.qualifiers.is_empty() {
            writeln!(out, "    may accompany: {}", rule.qualifiers.join(", "))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(format: Option<OutputFormat>, settings: &Settings) -> String {
        let mut out = Vec::new();
        let code = run_rules_to(&RulesArgs { format }, settings, &mut out).unwrap();
        assert_eq!(code, EXIT_VALID);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn text_lists_builtin_tables() {
        let text = render(None, &Settings::default());
        assert!(text.contains("  auth.providers (discriminator \"type\")\n"));
        assert!(text.contains("    builtin\n"));
        assert!(text.contains("    openidconnect: issuer, clientID, clientSecret\n"));
        assert!(text.contains("  bitbucketServer (Bitbucket Server)\n"));
        assert!(text.contains("    exactly one of: password, token\n"));
        assert!(text.contains("    may accompany: username\n"));
    }

    #[test]
    fn json_round_trips_to_ruleset() {
        let json = render(Some(OutputFormat::Json), &Settings::default());
        let rules: RuleSet = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, RuleSet::builtin());
    }

    #[test]
    fn empty_tables_are_marked() {
        let settings = Settings {
            rules: Some(RuleSet::default()),
            ..Settings::default()
        };
        let text = render(None, &settings);
        assert_eq!(text, "Tagged unions:\n  (none)\nAlternative requirements:\n  (none)\n");
    }
}
