//! Selector body classification.
//!
//! A selector is usable only if its body can be rebuilt as a member path
//! without evaluating anything. The classifier walks the body from the
//! outside in:
//!
//! ```text
//! Start --cast--> InCast --member--> InChain --member--> InChain
//!   |                |                  |
//!   +----member------+                  +--parameter--> Accepted
//!
//! any other node, from any state -----------------------> Rejected
//! ```
//!
//! Parentheses are transparent. At most one cast is accepted, and only
//! around the whole chain.

use crate::locator::SelectorArgument;
use crate::syntax::{Expr, ExprKind};

/// Default maximum number of member accesses in a selector chain.
pub const DEFAULT_MAX_CHAIN_DEPTH: usize = 1;

/// A member path rooted at the lambda parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberPath {
    /// The lambda parameter the path starts from.
    pub parameter: String,
    /// Accessed members, from the parameter outward.
    pub members: Vec<String>,
}

impl MemberPath {
    /// Number of member accesses.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.members.len()
    }
}

impl std::fmt::Display for MemberPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.parameter)?;
        for member in &self.members {
            write!(f, ".{member}")?;
        }
        Ok(())
    }
}

/// Why a selector was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidReason {
    /// The lambda does not take exactly one parameter.
    ParameterCount(usize),
    /// A method or function call.
    Call,
    /// A unary or binary operator.
    Operator,
    /// A conditional expression.
    Conditional,
    /// An indexer.
    ElementAccess,
    /// A cast anywhere but around the whole chain.
    MisplacedCast,
    /// The chain ends somewhere other than the lambda parameter.
    NotRootedAtParameter,
    /// The chain is longer than allowed.
    ChainTooDeep {
        /// Actual number of member accesses.
        depth: usize,
        /// Configured maximum.
        max: usize,
    },
    /// The lambda has a statement body.
    Block,
    /// Any other syntax.
    Unsupported(String),
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ParameterCount(n) => write!(f, "the lambda takes {n} parameters instead of one"),
            Self::Call => write!(f, "it contains a method call"),
            Self::Operator => write!(f, "it contains an operator"),
            Self::Conditional => write!(f, "it contains a conditional expression"),
            Self::ElementAccess => write!(f, "it contains an indexer"),
            Self::MisplacedCast => {
                write!(f, "a cast is only allowed around the whole member access")
            }
            Self::NotRootedAtParameter => {
                write!(f, "the member access does not start at the lambda parameter")
            }
            Self::ChainTooDeep { depth, max } => write!(
                f,
                "it accesses {depth} members in a row, at most {max} allowed"
            ),
            Self::Block => write!(f, "the lambda has a statement body"),
            Self::Unsupported(kind) => write!(f, "it contains an unsupported {kind}"),
        }
    }
}

/// A rejected selector.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSelector<'a> {
    /// Why it was rejected.
    pub reason: InvalidReason,
    /// The sub-expression that broke the pattern.
    pub offending: &'a Expr,
}

/// Result of classifying a selector body.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification<'a> {
    /// Member accesses rooted at the parameter.
    SimpleChain(MemberPath),
    /// A single cast around a simple chain.
    CastChain {
        /// Target type of the cast.
        cast_type: String,
        /// The wrapped chain.
        path: MemberPath,
    },
    /// Anything else.
    Invalid(InvalidSelector<'a>),
}

impl Classification<'_> {
    /// Returns true for [`Classification::SimpleChain`] and [`Classification::CastChain`].
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid(_))
    }
}

fn invalid(reason: InvalidReason, offending: &Expr) -> Classification<'_> {
    Classification::Invalid(InvalidSelector { reason, offending })
}

/// Classifies the body of `selector`.
///
/// `max_chain_depth` bounds the number of member accesses; zero accesses
/// (the parameter itself) is always accepted.
#[must_use]
pub fn classify(selector: SelectorArgument<'_>, max_chain_depth: usize) -> Classification<'_> {
    let lambda = selector.lambda;
    let [parameter] = lambda.parameters.as_slice() else {
        return invalid(
            InvalidReason::ParameterCount(lambda.parameters.len()),
            selector.expr,
        );
    };

    let mut current = lambda.body.unparenthesized();

    let cast_type = match &current.kind {
        ExprKind::Cast { target, operand } => {
            current = operand.unparenthesized();
            Some(target.clone())
        }
        _ => None,
    };

    let chain = current;
    let mut members = Vec::new();
    loop {
        match &current.kind {
            ExprKind::MemberAccess { receiver, member } => {
                members.push(member.clone());
                current = receiver.unparenthesized();
            }
            ExprKind::Identifier(name) if name == parameter => break,
            ExprKind::Identifier(_) | ExprKind::Literal(_) => {
                return invalid(InvalidReason::NotRootedAtParameter, current);
            }
            ExprKind::Cast { .. } => return invalid(InvalidReason::MisplacedCast, current),
            ExprKind::Call { .. } => return invalid(InvalidReason::Call, current),
            ExprKind::Binary { .. } | ExprKind::Unary { .. } => {
                return invalid(InvalidReason::Operator, current);
            }
            ExprKind::Conditional => return invalid(InvalidReason::Conditional, current),
            ExprKind::ElementAccess { .. } => {
                return invalid(InvalidReason::ElementAccess, current);
            }
            ExprKind::Block => return invalid(InvalidReason::Block, current),
            ExprKind::Lambda(_) | ExprKind::Other(_) | ExprKind::Parenthesized(_) => {
                return invalid(
                    InvalidReason::Unsupported(current.kind.describe().to_string()),
                    current,
                );
            }
        }
    }
    members.reverse();

    if members.len() > max_chain_depth {
        return invalid(
            InvalidReason::ChainTooDeep {
                depth: members.len(),
                max: max_chain_depth,
            },
            chain,
        );
    }

    let path = MemberPath {
        parameter: parameter.clone(),
        members,
    };
    match cast_type {
        Some(cast_type) => Classification::CastChain { cast_type, path },
        None => Classification::SimpleChain(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{Expr, Span};

    fn classify_expr(expr: &Expr, max: usize) -> Classification<'_> {
        let lambda = expr.as_lambda().unwrap();
        classify(SelectorArgument { expr, lambda }, max)
    }

    fn reason(c: &Classification<'_>) -> InvalidReason {
        match c {
            Classification::Invalid(inv) => inv.reason.clone(),
            other => panic!("expected invalid, got {other:?}"),
        }
    }

    fn link() -> Expr {
        Expr::ident("l").member("Link")
    }

    #[test]
    fn simple_member_access() {
        let expr = Expr::lambda("l", link());
        let c = classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH);
        assert_eq!(
            c,
            Classification::SimpleChain(MemberPath {
                parameter: "l".into(),
                members: vec!["Link".into()],
            })
        );
    }

    #[test]
    fn parameter_itself_is_a_chain() {
        let expr = Expr::lambda("l", Expr::ident("l"));
        match classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH) {
            Classification::SimpleChain(path) => assert_eq!(path.depth(), 0),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cast_around_chain() {
        let expr = Expr::lambda("l", link().cast("Uri"));
        match classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH) {
            Classification::CastChain { cast_type, path } => {
                assert_eq!(cast_type, "Uri");
                assert_eq!(path.to_string(), "l.Link");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn parentheses_are_transparent() {
        let expr = Expr::lambda("l", Expr::ident("l").paren().member("Link").paren());
        assert!(classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH).is_valid());
    }

    #[test]
    fn call_wrapping_chain_is_invalid() {
        let call_span = Span::new(30, 11, 3, 7);
        let expr = Expr::lambda("l", Expr::call("Id", vec![link()]).with_span(call_span));
        let c = classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH);
        match c {
            Classification::Invalid(inv) => {
                assert_eq!(inv.reason, InvalidReason::Call);
                assert_eq!(inv.offending.span, call_span);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn nested_chain_exceeds_default_depth() {
        let expr = Expr::lambda("l", Expr::ident("l").member("Inner").member("Outer"));
        assert_eq!(
            reason(&classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH)),
            InvalidReason::ChainTooDeep { depth: 2, max: 1 }
        );
    }

    #[test]
    fn nested_chain_accepted_with_higher_depth() {
        let expr = Expr::lambda("l", Expr::ident("l").member("Inner").member("Outer"));
        match classify_expr(&expr, 2) {
            Classification::SimpleChain(path) => {
                assert_eq!(path.members, vec!["Inner", "Outer"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn multi_parameter_lambda_is_invalid() {
        let expr = Expr::lambda_with(vec!["a".into(), "b".into()], Expr::ident("a"));
        assert_eq!(
            reason(&classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH)),
            InvalidReason::ParameterCount(2)
        );
    }

    #[test]
    fn chain_rooted_elsewhere_is_invalid() {
        let expr = Expr::lambda("l", Expr::ident("other").member("Link"));
        assert_eq!(
            reason(&classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH)),
            InvalidReason::NotRootedAtParameter
        );
    }

    #[test]
    fn double_cast_is_invalid() {
        let expr = Expr::lambda("l", link().cast("Uri").cast("object"));
        assert_eq!(
            reason(&classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH)),
            InvalidReason::MisplacedCast
        );
    }

    #[test]
    fn cast_inside_chain_is_invalid() {
        let expr = Expr::lambda("l", Expr::ident("l").cast("Linker").paren().member("Link"));
        assert_eq!(
            reason(&classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH)),
            InvalidReason::MisplacedCast
        );
    }

    #[test]
    fn operator_is_invalid() {
        let body = Expr::new(ExprKind::Binary {
            operator: "??".into(),
            left: Box::new(link()),
            right: Box::new(Expr::ident("fallback")),
        });
        let expr = Expr::lambda("l", body);
        assert_eq!(
            reason(&classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH)),
            InvalidReason::Operator
        );
    }

    #[test]
    fn indexer_and_block_are_invalid() {
        let indexer = Expr::new(ExprKind::ElementAccess {
            receiver: Box::new(Expr::ident("l").member("Links")),
        });
        let expr = Expr::lambda("l", indexer);
        assert_eq!(
            reason(&classify_expr(&expr, 5)),
            InvalidReason::ElementAccess
        );

        let expr = Expr::lambda("l", Expr::new(ExprKind::Block));
        assert_eq!(reason(&classify_expr(&expr, 5)), InvalidReason::Block);
    }

    #[test]
    fn classification_is_repeatable() {
        let expr = Expr::lambda("l", Expr::call("Id", vec![link()]));
        let first = classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH);
        let second = classify_expr(&expr, DEFAULT_MAX_CHAIN_DEPTH);
        assert_eq!(first, second);
    }
}
