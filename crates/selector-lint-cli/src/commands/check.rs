//! Check command implementation.

use anyhow::{Context, Result};
use selector_lint_core::{Analyzer, Config, RuleBox};
use selector_lint_rules::{rule_by_name_or_code, rules_from_config};
use selector_lint_ts::CSharpExtractor;
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Runs the check command.
pub fn run(
    path: &Path,
    format: OutputFormat,
    rules_filter: Option<String>,
    exclude: Vec<String>,
    source: &ConfigSource,
) -> Result<()> {
    let config = load_config(source)?;
    let fail_on = config.fail_on();

    let rules = match rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&config, &names)
        }
        None => rules_from_config(&config),
    };

    let mut builder = Analyzer::builder()
        .root(path)
        .config(config)
        .extractor(CSharpExtractor::new())
        .excludes(exclude);
    for rule in rules {
        builder = builder.rule_box(rule);
    }

    let analyzer = builder.build().context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, format, analyzer.root())?;

    if result.has_violations_at(fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    match source {
        ConfigSource::Default => Ok(Config::default()),
        other => {
            // Invariant: non-Default variants always have a path
            let p = other.path().context("resolved config has no path")?;
            if source.is_global() {
                tracing::info!("Using global config: {}", p.display());
            }
            Config::from_file(p).with_context(|| format!("Failed to load config: {}", p.display()))
        }
    }
}

/// Keeps the configured rules named (by name or code) in `names`.
fn filter_rules(config: &Config, names: &[&str]) -> Vec<RuleBox> {
    let mut wanted = Vec::new();
    for name in names {
        match rule_by_name_or_code(name) {
            Some(rule) => wanted.push(rule.name()),
            None => tracing::warn!("Unknown rule: {}", name),
        }
    }

    rules_from_config(config)
        .into_iter()
        .filter(|rule| wanted.contains(&rule.name()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn filter_by_name_and_code() {
        let config = Config::default();
        let rules = filter_rules(&config, &["TH1001B", "unknown"]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name(), "incorrect-link-and-ignore");

        let rules = filter_rules(&config, &["incorrect-ignore-expression", "TH1002"]);
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn filtered_rules_keep_config_options() {
        let config =
            Config::parse("[rules.incorrect-ignore-expression]\nmax_chain_depth = 2\n").unwrap();
        let rules = filter_rules(&config, &["TH1002"]);
        assert_eq!(rules[0].max_chain_depth(), 2);
    }

    #[test]
    fn default_source_uses_default_config() {
        let config = load_config(&ConfigSource::Default).unwrap();
        assert!(config.rules.is_empty());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let source = ConfigSource::Explicit(PathBuf::from("/nonexistent/selector-lint.toml"));
        assert!(load_config(&source).is_err());
    }
}
