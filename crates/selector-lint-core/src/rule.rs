//! Rule trait for defining selector rules.

use tracing::debug;

use crate::classifier::{classify, Classification, DEFAULT_MAX_CHAIN_DEPTH};
use crate::context::FileContext;
use crate::emitter::{emit, DiagnosticDescriptor};
use crate::locator::locate_selector;
use crate::matcher::match_call;
use crate::syntax::CallExpression;
use crate::types::{Severity, Violation};

/// A rule guarding the selector argument of one watched method.
///
/// Implementors describe which method they watch and which diagnostics an
/// invalid selector raises; the default [`Rule::check_call`] runs the
/// match, locate, classify, emit pipeline.
///
/// # Example
///
/// ```ignore
/// use selector_lint_core::{DiagnosticDescriptor, Rule};
///
/// pub struct NoComplexIgnore;
///
/// impl Rule for NoComplexIgnore {
///     fn name(&self) -> &'static str { "no-complex-ignore" }
///     fn code(&self) -> &'static str { "TH9000" }
///     fn method(&self) -> &'static str { "Ignore" }
///     fn diagnostics(&self) -> &'static [DiagnosticDescriptor] {
///         const D: &[DiagnosticDescriptor] =
///             &[DiagnosticDescriptor::new("TH9000", "as an ignore path")];
///         D
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "incorrect-ignore-expression").
    fn name(&self) -> &'static str;

    /// Returns the root diagnostic identifier (e.g., "TH1002").
    ///
    /// Every code in [`Rule::diagnostics`] starts with it.
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Name of the watched method whose selector this rule inspects.
    fn method(&self) -> &'static str;

    /// Diagnostics raised, in order, for each invalid selector.
    fn diagnostics(&self) -> &'static [DiagnosticDescriptor];

    /// Maximum member accesses accepted in a selector chain.
    fn max_chain_depth(&self) -> usize {
        DEFAULT_MAX_CHAIN_DEPTH
    }

    /// Checks a single call expression and returns any violations found.
    fn check_call(&self, ctx: &FileContext<'_>, call: &CallExpression) -> Vec<Violation> {
        if call.callee != self.method() {
            return Vec::new();
        }
        let Some(descriptor) = match_call(ctx.methods, call) else {
            return Vec::new();
        };
        let Some(selector) = locate_selector(&descriptor) else {
            return Vec::new();
        };

        match classify(selector, self.max_chain_depth()) {
            Classification::Invalid(invalid) => {
                debug!(
                    "{}: {} selector rejected ({})",
                    self.name(),
                    call.callee,
                    invalid.reason
                );
                emit(
                    ctx,
                    self.name(),
                    self.default_severity(),
                    self.diagnostics(),
                    call,
                    &invalid,
                )
            }
            Classification::SimpleChain(_) | Classification::CastChain { .. } => Vec::new(),
        }
    }

    /// Checks every call of a file, in order.
    fn check(&self, ctx: &FileContext<'_>, calls: &[CallExpression]) -> Vec<Violation> {
        calls
            .iter()
            .flat_map(|call| self.check_call(ctx, call))
            .collect()
    }
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
