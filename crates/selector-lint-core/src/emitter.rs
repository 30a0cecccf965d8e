//! Turns rejected selectors into violations.

use std::fmt::Write;

use crate::classifier::{InvalidReason, InvalidSelector};
use crate::context::FileContext;
use crate::syntax::CallExpression;
use crate::types::{Label, Severity, Suggestion, Violation};

/// One diagnostic a rule raises for every invalid selector.
///
/// Compound methods list several descriptors; they are emitted in order, all
/// pointing at the same offending expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticDescriptor {
    /// Stable identifier, e.g. `TH1002`.
    pub code: &'static str,
    /// What the selector cannot be used for, e.g. `as an ignore path`.
    pub concern: &'static str,
}

impl DiagnosticDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub const fn new(code: &'static str, concern: &'static str) -> Self {
        Self { code, concern }
    }
}

/// Builds one violation per descriptor for `invalid`.
#[must_use]
pub fn emit(
    ctx: &FileContext<'_>,
    rule: &str,
    severity: Severity,
    descriptors: &[DiagnosticDescriptor],
    call: &CallExpression,
    invalid: &InvalidSelector<'_>,
) -> Vec<Violation> {
    let location = ctx.location(invalid.offending.span);
    let snippet = ctx.snippet(invalid.offending.span);
    let suggestion = suggestion_for(&invalid.reason);

    descriptors
        .iter()
        .map(|descriptor| {
            let mut message = format!(
                "{} selector cannot be used {} because {}",
                call.callee, descriptor.concern, invalid.reason
            );
            if !snippet.is_empty() {
                let _ = write!(message, " (`{snippet}`)");
            }

            let mut violation =
                Violation::new(descriptor.code, rule, severity, location.clone(), message)
                    .with_suggestion(Suggestion::new(suggestion.clone()));
            if call.span.length > 0 {
                violation = violation.with_label(Label::new(
                    ctx.location(call.span),
                    format!("in this call to {}", call.callee),
                ));
            }
            violation
        })
        .collect()
}

fn suggestion_for(reason: &InvalidReason) -> String {
    match reason {
        InvalidReason::ParameterCount(_) => {
            "Pass a lambda with exactly one parameter, e.g. `x => x.Property`".to_string()
        }
        InvalidReason::ChainTooDeep { max, .. } => format!(
            "Select at most {max} member(s) of the lambda parameter, e.g. `x => x.Property`"
        ),
        InvalidReason::MisplacedCast => {
            "Move the cast outside the member access, e.g. `x => (T)x.Property`".to_string()
        }
        _ => "Use a lambda that only reads a member of its parameter, e.g. `x => x.Property`"
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Expr, Span};
    use std::path::Path;

    const LINK: DiagnosticDescriptor = DiagnosticDescriptor::new("TH1001A", "as a link target");
    const IGNORE: DiagnosticDescriptor = DiagnosticDescriptor::new("TH1001B", "as an ignore path");

    #[test]
    fn emits_one_violation_per_descriptor_in_order() {
        let content = "map.LinkAndIgnore(\"wow\", l => Id(l.Link));";
        let ctx = FileContext::new(Path::new("/p/Map.cs"), content, Path::new("/p"));
        let offending = Expr::call("Id", vec![]).with_span(Span::new(30, 10, 1, 31));
        let call = CallExpression::extension("LinkAndIgnore").with_span(Span::new(0, 41, 1, 1));
        let invalid = InvalidSelector {
            reason: InvalidReason::Call,
            offending: &offending,
        };

        let violations = emit(
            &ctx,
            "incorrect-link-and-ignore",
            Severity::Error,
            &[LINK, IGNORE],
            &call,
            &invalid,
        );

        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].code, "TH1001A");
        assert_eq!(violations[1].code, "TH1001B");
        assert_eq!(violations[0].location, violations[1].location);
        assert_eq!(violations[0].location.offset, 30);
        assert!(violations[0].message.contains("as a link target"));
        assert!(violations[0].message.contains("`Id(l.Link)`"));
        assert_eq!(violations[1].labels[0].message, "in this call to LinkAndIgnore");
    }

    #[test]
    fn no_label_without_call_span() {
        let ctx = FileContext::new(Path::new("Map.cs"), "", Path::new("."));
        let offending = Expr::ident("l");
        let call = CallExpression::extension("Ignore");
        let invalid = InvalidSelector {
            reason: InvalidReason::ChainTooDeep { depth: 2, max: 1 },
            offending: &offending,
        };
        let violations = emit(
            &ctx,
            "incorrect-ignore-expression",
            Severity::Warning,
            &[IGNORE],
            &call,
            &invalid,
        );
        assert_eq!(violations.len(), 1);
        assert!(violations[0].labels.is_empty());
        assert_eq!(violations[0].severity, Severity::Warning);
        assert!(violations[0]
            .suggestion
            .as_ref()
            .is_some_and(|s| s.message.contains("at most 1")));
    }
}
