//! Locates the selector lambda among a matched call's arguments.

use tracing::trace;

use crate::matcher::CallDescriptor;
use crate::syntax::{Expr, Lambda};

/// The lambda literal supplied for the selector parameter.
#[derive(Debug, Clone, Copy)]
pub struct SelectorArgument<'a> {
    /// The argument expression (possibly parenthesized).
    pub expr: &'a Expr,
    /// The lambda itself.
    pub lambda: &'a Lambda,
}

/// Extracts the selector lambda from `descriptor`.
///
/// Returns `None` when the selector is not a lambda literal, e.g. a variable
/// or method group; such calls are out of reach of syntactic inspection.
#[must_use]
pub fn locate_selector<'a>(descriptor: &CallDescriptor<'a>) -> Option<SelectorArgument<'a>> {
    let parameter = descriptor.method.selector_parameter.as_str();
    let argument = descriptor.argument(parameter)?;
    let Some(lambda) = argument.value.as_lambda() else {
        trace!(
            "{}: {parameter} is a {}, not a lambda",
            descriptor.call.callee,
            argument.value.unparenthesized().kind.describe()
        );
        return None;
    };
    Some(SelectorArgument {
        expr: &argument.value,
        lambda,
    })
}
