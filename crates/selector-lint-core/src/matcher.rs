//! Call matching: recognizes watched configuration methods and binds their
//! arguments to declared parameters.

use tracing::trace;

use crate::syntax::{Argument, CallExpression, CallForm};
use crate::watch::{MethodTable, WatchedMethod};

/// A call matched against a watched method, with arguments bound by name.
#[derive(Debug, Clone)]
pub struct CallDescriptor<'a> {
    /// The matched method definition.
    pub method: &'a WatchedMethod,
    /// The original call.
    pub call: &'a CallExpression,
    /// Declared parameter name to bound argument, in declaration order.
    pub bindings: Vec<(&'a str, &'a Argument)>,
}

impl<'a> CallDescriptor<'a> {
    /// Returns the argument bound to `parameter`.
    #[must_use]
    pub fn argument(&self, parameter: &str) -> Option<&'a Argument> {
        self.bindings
            .iter()
            .find(|(name, _)| *name == parameter)
            .map(|(_, arg)| *arg)
    }
}

/// Matches `call` against `table`.
///
/// Returns `None` when the call does not invoke a watched method in a legal
/// form, or its arguments cannot be bound to the declared parameters.
#[must_use]
pub fn match_call<'a>(
    table: &'a MethodTable,
    call: &'a CallExpression,
) -> Option<CallDescriptor<'a>> {
    table
        .candidates(&call.callee)
        .find_map(|method| match_method(method, call))
}

fn match_method<'a>(
    method: &'a WatchedMethod,
    call: &'a CallExpression,
) -> Option<CallDescriptor<'a>> {
    if let Some(declaring_type) = &call.declaring_type {
        if !method.is_declared_by(declaring_type) {
            trace!(
                "{}: declared on {declaring_type}, expected {}",
                call.callee,
                method.declaring_type
            );
            return None;
        }
    }

    let slots: Vec<&str> = match call.form {
        CallForm::Ordinary if method.ordinary => std::iter::once(&method.receiver_parameter)
            .chain(&method.parameters)
            .map(String::as_str)
            .collect(),
        CallForm::Extension if method.extension => {
            method.parameters.iter().map(String::as_str).collect()
        }
        form => {
            trace!("{}: {form} form not allowed", call.callee);
            return None;
        }
    };

    if call.arguments.len() != slots.len() {
        trace!(
            "{}: {} arguments, expected {}",
            call.callee,
            call.arguments.len(),
            slots.len()
        );
        return None;
    }

    let bound = bind_arguments(&slots, &call.arguments)?;
    let bindings = slots.into_iter().zip(bound).collect();

    Some(CallDescriptor {
        method,
        call,
        bindings,
    })
}

/// Binds each argument to a slot: named arguments by name, the rest by
/// position. Returns the argument for every slot, in slot order.
fn bind_arguments<'a>(slots: &[&str], arguments: &'a [Argument]) -> Option<Vec<&'a Argument>> {
    let mut bound: Vec<Option<&Argument>> = vec![None; slots.len()];

    for arg in arguments {
        let index = match &arg.name {
            Some(name) => slots.iter().position(|slot| slot == name)?,
            None => arg.position,
        };
        let slot = bound.get_mut(index)?;
        if slot.is_some() {
            return None;
        }
        *slot = Some(arg);
    }

    bound.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Expr;
    use crate::watch::{IGNORE, LINK_AND_IGNORE};

    fn selector() -> Expr {
        Expr::lambda("l", Expr::ident("l").member("Link"))
    }

    #[test]
    fn matches_extension_form() {
        let call = CallExpression::extension(IGNORE).arg(selector());
        let desc = match_call(MethodTable::standard(), &call).unwrap();
        assert_eq!(desc.method.name, IGNORE);
        assert_eq!(desc.argument("selector").unwrap().position, 0);
    }

    #[test]
    fn matches_ordinary_form_with_receiver() {
        let call = CallExpression::ordinary("TransformationMapExtensions", LINK_AND_IGNORE)
            .arg(Expr::ident("transformationMap"))
            .arg(Expr::string("\"wow\""))
            .arg(selector());
        let desc = match_call(MethodTable::standard(), &call).unwrap();
        assert_eq!(desc.argument("transformationMap").unwrap().position, 0);
        assert_eq!(desc.argument("relation").unwrap().position, 1);
        assert_eq!(desc.argument("selector").unwrap().position, 2);
    }

    #[test]
    fn binds_swapped_named_arguments() {
        let call = CallExpression::extension(LINK_AND_IGNORE)
            .named_arg("selector", selector())
            .named_arg("relation", Expr::string("\"wow\""));
        let desc = match_call(MethodTable::standard(), &call).unwrap();
        assert_eq!(desc.argument("selector").unwrap().position, 0);
        assert_eq!(desc.argument("relation").unwrap().position, 1);
        assert_eq!(desc.bindings[0].0, "relation");
    }

    #[test]
    fn binds_mixed_positional_and_named() {
        let call = CallExpression::ordinary("TransformationMapExtensions", LINK_AND_IGNORE)
            .arg(Expr::ident("transformationMap"))
            .named_arg("selector", selector())
            .named_arg("relation", Expr::string("\"wow\""));
        let desc = match_call(MethodTable::standard(), &call).unwrap();
        assert_eq!(desc.argument("selector").unwrap().position, 1);
    }

    #[test]
    fn rejects_wrong_arity() {
        let call = CallExpression::extension(LINK_AND_IGNORE).arg(selector());
        assert!(match_call(MethodTable::standard(), &call).is_none());

        let call = CallExpression::ordinary("TransformationMapExtensions", IGNORE).arg(selector());
        assert!(match_call(MethodTable::standard(), &call).is_none());
    }

    #[test]
    fn rejects_other_declaring_type() {
        let call = CallExpression::ordinary("Enumerable", IGNORE)
            .arg(Expr::ident("items"))
            .arg(selector());
        assert!(match_call(MethodTable::standard(), &call).is_none());
    }

    #[test]
    fn rejects_unknown_name() {
        let call = CallExpression::extension(LINK_AND_IGNORE)
            .named_arg("rel", Expr::string("\"wow\""))
            .named_arg("selector", selector());
        assert!(match_call(MethodTable::standard(), &call).is_none());
    }

    #[test]
    fn rejects_double_binding() {
        let call = CallExpression::extension(LINK_AND_IGNORE)
            .arg(Expr::string("\"wow\""))
            .named_arg("relation", Expr::string("\"again\""));
        assert!(match_call(MethodTable::standard(), &call).is_none());
    }

    #[test]
    fn rejects_disallowed_form() {
        let table = MethodTable::new(vec![
            WatchedMethod::new(IGNORE, &["selector"]).forms(true, false)
        ]);
        let call = CallExpression::extension(IGNORE).arg(selector());
        assert!(match_call(&table, &call).is_none());
    }

    #[test]
    fn unqualified_ordinary_call_matches() {
        let mut call = CallExpression::ordinary("", IGNORE)
            .arg(Expr::ident("map"))
            .arg(selector());
        call.declaring_type = None;
        assert!(match_call(MethodTable::standard(), &call).is_some());
    }
}
