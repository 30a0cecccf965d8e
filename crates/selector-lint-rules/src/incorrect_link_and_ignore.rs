//! Rule to reject `LinkAndIgnore` selectors that are not plain member paths.
//!
//! # Rationale
//!
//! `LinkAndIgnore` uses its selector twice: as the target the relation is
//! linked to, and as the member that is then ignored. An invalid selector
//! breaks both uses, so each invalid call raises two diagnostics at the same
//! location: `TH1001A` for the link target and `TH1001B` for the ignore path.
//!
//! # Configuration
//!
//! - `max_chain_depth`: Maximum member accesses in the selector (default: 1)
//!
//! # Examples
//!
//! ```text
//! map.LinkAndIgnore("wow", l => l.Link);          // ok
//! map.LinkAndIgnore("wow", l => Id(l.Link));      // TH1001A, TH1001B
//! map.LinkAndIgnore(selector: l => l.A + 1,
//!                   relation: "wow");             // TH1001A, TH1001B
//! ```

use selector_lint_core::watch::LINK_AND_IGNORE;
use selector_lint_core::{DiagnosticDescriptor, Rule, Severity, DEFAULT_MAX_CHAIN_DEPTH};

/// Root code shared by both diagnostics of this rule.
pub const CODE: &str = "TH1001";

/// Code for the link-target half of the pair.
pub const LINK_CODE: &str = "TH1001A";

/// Code for the ignore-path half of the pair.
pub const IGNORE_CODE: &str = "TH1001B";

/// Rule name for incorrect-link-and-ignore.
pub const NAME: &str = "incorrect-link-and-ignore";

const DIAGNOSTICS: &[DiagnosticDescriptor] = &[
    DiagnosticDescriptor::new(LINK_CODE, "as a link target"),
    DiagnosticDescriptor::new(IGNORE_CODE, "as an ignore path"),
];

/// Reports `LinkAndIgnore` calls whose selector is not a member path.
#[derive(Debug, Clone)]
pub struct IncorrectLinkAndIgnore {
    /// Custom severity.
    pub severity: Severity,
    /// Maximum member accesses accepted in a selector.
    pub max_chain_depth: usize,
}

impl Default for IncorrectLinkAndIgnore {
    fn default() -> Self {
        Self::new()
    }
}

impl IncorrectLinkAndIgnore {
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

impl Rule for IncorrectLinkAndIgnore {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "LinkAndIgnore selectors must be a member access on the lambda parameter"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn method(&self) -> &'static str {
        LINK_AND_IGNORE
    }

    fn diagnostics(&self) -> &'static [DiagnosticDescriptor] {
        DIAGNOSTICS
    }

    fn max_chain_depth(&self) -> usize {
        self.max_chain_depth
    }
}
