//! Rule to reject `Ignore` selectors that are not plain member paths.
//!
//! # Rationale
//!
//! `Ignore` records the member its selector points at. A selector that calls
//! a method, applies an operator, or walks through intermediate members has
//! no single member to record, so the configuration would fail at run time.
//!
//! # Configuration
//!
//! - `max_chain_depth`: Maximum member accesses in the selector (default: 1)
//!
//! # Examples
//!
//! ```text
//! map.Ignore(l => l.Link);          // ok
//! map.Ignore(l => (Base)l.Link);    // ok
//! map.Ignore(l => Id(l.Link));      // TH1002
//! map.Ignore(l => l.Inner.Outer);   // TH1002
//! ```

use selector_lint_core::watch::IGNORE;
use selector_lint_core::{DiagnosticDescriptor, Rule, Severity, DEFAULT_MAX_CHAIN_DEPTH};

/// Rule code for incorrect-ignore-expression.
pub const CODE: &str = "TH1002";

/// Rule name for incorrect-ignore-expression.
pub const NAME: &str = "incorrect-ignore-expression";

const DIAGNOSTICS: &[DiagnosticDescriptor] =
    &[DiagnosticDescriptor::new(CODE, "as an ignore path")];

/// Reports `Ignore` calls whose selector is not a member path.
#[derive(Debug, Clone)]
pub struct IncorrectIgnoreExpression {
    /// Custom severity.
    pub severity: Severity,
    /// Maximum member accesses accepted in a selector.
    pub max_chain_depth: usize,
}

impl Default for IncorrectIgnoreExpression {
    fn default() -> Self {
        Self::new()
    }
}

impl IncorrectIgnoreExpression {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Error,
            max_chain_depth: DEFAULT_MAX_CHAIN_DEPTH,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets the maximum chain depth.
    #[must_use]
    pub fn max_chain_depth(mut self, depth: usize) -> Self {
        self.max_chain_depth = depth;
        self
    }
}

impl Rule for IncorrectIgnoreExpression {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Ignore selectors must be a member access on the lambda parameter"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn method(&self) -> &'static str {
        IGNORE
    }

    fn diagnostics(&self) -> &'static [DiagnosticDescriptor] {
        DIAGNOSTICS
    }

    fn max_chain_depth(&self) -> usize {
        self.max_chain_depth
    }
}
