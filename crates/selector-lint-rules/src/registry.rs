//! Rule registry: the built-in rule set and config-driven construction.

use crate::{IncorrectIgnoreExpression, IncorrectLinkAndIgnore};
use selector_lint_core::{Config, RuleBox};
use tracing::debug;

/// Option key for the maximum selector chain depth.
pub const MAX_CHAIN_DEPTH: &str = "max_chain_depth";

/// Returns all built-in rules with default settings.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(IncorrectLinkAndIgnore::new()),
        Box::new(IncorrectIgnoreExpression::new()),
    ]
}

/// Returns all built-in rules with options from `config` applied.
///
/// Enablement and severity overrides are left to the analyzer.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let depth = |name: &str| {
        let depth = config
            .rules
            .get(name)
            .and_then(|c| c.get_usize(MAX_CHAIN_DEPTH));
        if let Some(d) = depth {
            debug!("{name}: {MAX_CHAIN_DEPTH} = {d}");
        }
        depth
    };

    let mut link = IncorrectLinkAndIgnore::new();
    if let Some(d) = depth(crate::incorrect_link_and_ignore::NAME) {
        link = link.max_chain_depth(d);
    }
    let mut ignore = IncorrectIgnoreExpression::new();
    if let Some(d) = depth(crate::incorrect_ignore_expression::NAME) {
        ignore = ignore.max_chain_depth(d);
    }

    vec![Box::new(link), Box::new(ignore)]
}

/// Finds a built-in rule by name, root code, or diagnostic code.
#[must_use]
pub fn rule_by_name_or_code(key: &str) -> Option<RuleBox> {
    all_rules().into_iter().find(|rule| {
        rule.name() == key
            || rule.code().eq_ignore_ascii_case(key)
            || rule
                .diagnostics()
                .iter()
                .any(|d| d.code.eq_ignore_ascii_case(key))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rules_are_unique() {
        let rules = all_rules();
        assert_eq!(rules.len(), 2);
        assert_ne!(rules[0].name(), rules[1].name());
    }

    #[test]
    fn lookup_by_name_and_codes() {
        assert_eq!(
            rule_by_name_or_code("incorrect-ignore-expression").map(|r| r.code()),
            Some("TH1002")
        );
        assert_eq!(
            rule_by_name_or_code("th1001b").map(|r| r.name()),
            Some("incorrect-link-and-ignore")
        );
        assert_eq!(
            rule_by_name_or_code("TH1001").map(|r| r.name()),
            Some("incorrect-link-and-ignore")
        );
        assert!(rule_by_name_or_code("TH9999").is_none());
    }

    #[test]
    fn config_sets_chain_depth() {
        let config = Config::parse(
            "[rules.incorrect-ignore-expression]\nmax_chain_depth = 3\n",
        )
        .unwrap();
        let rules = rules_from_config(&config);
        let ignore = rules
            .iter()
            .find(|r| r.name() == "incorrect-ignore-expression")
            .unwrap();
        let link = rules
            .iter()
            .find(|r| r.name() == "incorrect-link-and-ignore")
            .unwrap();
        assert_eq!(ignore.max_chain_depth(), 3);
        assert_eq!(link.max_chain_depth(), 1);
    }
}
