//! # selector-lint-rules
//!
//! Built-in rules for selector-lint.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | TH1001 | `incorrect-link-and-ignore` | `LinkAndIgnore` selectors must be member paths (reports `TH1001A` and `TH1001B`) |
//! | TH1002 | `incorrect-ignore-expression` | `Ignore` selectors must be member paths |
//!
//! ## Usage
//!
//! ```ignore
//! use selector_lint_core::Analyzer;
//! use selector_lint_rules::{IncorrectIgnoreExpression, IncorrectLinkAndIgnore};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(IncorrectLinkAndIgnore::new())
//!     .rule(IncorrectIgnoreExpression::new().max_chain_depth(2))
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// The `incorrect-ignore-expression` rule.
pub mod incorrect_ignore_expression;
/// The `incorrect-link-and-ignore` rule.
pub mod incorrect_link_and_ignore;
mod registry;

pub use incorrect_ignore_expression::IncorrectIgnoreExpression;
pub use incorrect_link_and_ignore::IncorrectLinkAndIgnore;
pub use registry::{all_rules, rule_by_name_or_code, rules_from_config, MAX_CHAIN_DEPTH};

/// Re-export core types for convenience.
pub use selector_lint_core::{Rule, Severity, Violation};
