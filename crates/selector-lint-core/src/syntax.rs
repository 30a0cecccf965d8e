//! Syntax model consumed by the selector pipeline.
//!
//! Front ends (e.g. the Tree-sitter C# extractor) lower their concrete syntax
//! trees into these types. A host with a full semantic model can build them
//! directly, supplying resolved calling convention and declaring type.

use std::path::PathBuf;

use crate::types::Location;

/// A region of source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    /// Byte offset of the first character.
    pub offset: usize,
    /// Length in bytes.
    pub length: usize,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub fn new(offset: usize, length: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            length,
            line,
            column,
        }
    }

    /// Converts this span into a [`Location`] within `file`.
    #[must_use]
    pub fn to_location(self, file: PathBuf) -> Location {
        Location::new(file, self.line, self.column).with_span(self.offset, self.length)
    }
}

/// Calling convention of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallForm {
    /// Plain static invocation, e.g. `Extensions.Ignore(map, l => l.Link)`.
    Ordinary,
    /// Extension-method syntax, e.g. `map.Ignore(l => l.Link)`.
    Extension,
}

impl std::fmt::Display for CallForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ordinary => write!(f, "ordinary"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// An invocation found in source.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    /// Name of the invoked method (without type arguments).
    pub callee: String,
    /// Static type the method was invoked through, when known.
    ///
    /// Only meaningful for [`CallForm::Ordinary`]; `None` means the call was
    /// unqualified or the type could not be resolved.
    pub declaring_type: Option<String>,
    /// Calling convention.
    pub form: CallForm,
    /// Arguments in textual order.
    pub arguments: Vec<Argument>,
    /// Span of the whole invocation.
    pub span: Span,
}

impl CallExpression {
    /// Creates an extension-form call with no arguments.
    #[must_use]
    pub fn extension(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            declaring_type: None,
            form: CallForm::Extension,
            arguments: Vec::new(),
            span: Span::default(),
        }
    }

    /// Creates an ordinary-form call through `declaring_type` with no arguments.
    #[must_use]
    pub fn ordinary(declaring_type: impl Into<String>, callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
            declaring_type: Some(declaring_type.into()),
            form: CallForm::Ordinary,
            arguments: Vec::new(),
            span: Span::default(),
        }
    }

    /// Appends a positional argument.
    #[must_use]
    pub fn arg(mut self, value: Expr) -> Self {
        let position = self.arguments.len();
        self.arguments.push(Argument {
            name: None,
            position,
            value,
        });
        self
    }

    /// Appends a named argument.
    #[must_use]
    pub fn named_arg(mut self, name: impl Into<String>, value: Expr) -> Self {
        let position = self.arguments.len();
        self.arguments.push(Argument {
            name: Some(name.into()),
            position,
            value,
        });
        self
    }

    /// Sets the span of the call.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// Returns true if any argument is passed by name.
    #[must_use]
    pub fn has_named_arguments(&self) -> bool {
        self.arguments.iter().any(|a| a.name.is_some())
    }
}

/// A single argument slot of a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    /// Explicit parameter name (`name: value`), if given.
    pub name: Option<String>,
    /// Zero-based textual position.
    pub position: usize,
    /// The bound expression.
    pub value: Expr,
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    /// Shape of the expression.
    pub kind: ExprKind,
    /// Source region of the expression.
    pub span: Span,
}

/// Expression shapes distinguished by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A bare name, e.g. `l`.
    Identifier(String),
    /// `receiver.member`
    MemberAccess {
        /// Expression the member is read from.
        receiver: Box<Expr>,
        /// Accessed member name.
        member: String,
    },
    /// `(Type)operand`
    Cast {
        /// Target type as written.
        target: String,
        /// The converted expression.
        operand: Box<Expr>,
    },
    /// `(inner)`
    Parenthesized(Box<Expr>),
    /// A lambda literal.
    Lambda(Lambda),
    /// A method or function invocation.
    Call {
        /// Invoked expression.
        callee: Box<Expr>,
        /// Call arguments.
        arguments: Vec<Argument>,
    },
    /// A binary operator.
    Binary {
        /// Operator token, e.g. `+`.
        operator: String,
        /// Left operand.
        left: Box<Expr>,
        /// Right operand.
        right: Box<Expr>,
    },
    /// A prefix or postfix unary operator.
    Unary {
        /// Operator token, e.g. `!`.
        operator: String,
        /// Operand.
        operand: Box<Expr>,
    },
    /// `cond ? a : b`
    Conditional,
    /// `receiver[index]`
    ElementAccess {
        /// Indexed expression.
        receiver: Box<Expr>,
    },
    /// A literal value, as written.
    Literal(String),
    /// A statement block (lambda body with braces).
    Block,
    /// Any other syntax, tagged with the front end's node kind.
    Other(String),
}

impl ExprKind {
    /// Short human-readable name of this shape.
    #[must_use]
    pub fn describe(&self) -> &str {
        match self {
            Self::Identifier(_) => "identifier",
            Self::MemberAccess { .. } => "member access",
            Self::Cast { .. } => "cast",
            Self::Parenthesized(_) => "parenthesized expression",
            Self::Lambda(_) => "lambda",
            Self::Call { .. } => "method call",
            Self::Binary { .. } => "binary operator",
            Self::Unary { .. } => "unary operator",
            Self::Conditional => "conditional expression",
            Self::ElementAccess { .. } => "indexer",
            Self::Literal(_) => "literal",
            Self::Block => "statement block",
            Self::Other(kind) => kind,
        }
    }
}

/// A lambda literal.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    /// Formal parameter names.
    pub parameters: Vec<String>,
    /// Body expression.
    pub body: Box<Expr>,
}

impl Expr {
    /// Creates an expression with an empty span.
    #[must_use]
    pub fn new(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }

    /// Sets the span.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// `name`
    #[must_use]
    pub fn ident(name: impl Into<String>) -> Self {
        Self::new(ExprKind::Identifier(name.into()))
    }

    /// `self.member`
    #[must_use]
    pub fn member(self, member: impl Into<String>) -> Self {
        Self::new(ExprKind::MemberAccess {
            receiver: Box::new(self),
            member: member.into(),
        })
    }

    /// `(target)self`
    #[must_use]
    pub fn cast(self, target: impl Into<String>) -> Self {
        Self::new(ExprKind::Cast {
            target: target.into(),
            operand: Box::new(self),
        })
    }

    /// `(self)`
    #[must_use]
    pub fn paren(self) -> Self {
        Self::new(ExprKind::Parenthesized(Box::new(self)))
    }

    /// `function(args...)` with positional arguments.
    #[must_use]
    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        let arguments = args
            .into_iter()
            .enumerate()
            .map(|(position, value)| Argument {
                name: None,
                position,
                value,
            })
            .collect();
        Self::new(ExprKind::Call {
            callee: Box::new(Self::ident(function)),
            arguments,
        })
    }

    /// A string literal, as written in source.
    #[must_use]
    pub fn string(text: impl Into<String>) -> Self {
        Self::new(ExprKind::Literal(text.into()))
    }

    /// `param => body`
    #[must_use]
    pub fn lambda(param: impl Into<String>, body: Expr) -> Self {
        Self::lambda_with(vec![param.into()], body)
    }

    /// `(params...) => body`
    #[must_use]
    pub fn lambda_with(parameters: Vec<String>, body: Expr) -> Self {
        Self::new(ExprKind::Lambda(Lambda {
            parameters,
            body: Box::new(body),
        }))
    }

    /// Strips any number of enclosing parentheses.
    #[must_use]
    pub fn unparenthesized(&self) -> &Self {
        let mut current = self;
        while let ExprKind::Parenthesized(inner) = &current.kind {
            current = inner;
        }
        current
    }

    /// Returns the lambda if this expression is one (ignoring parentheses).
    #[must_use]
    pub fn as_lambda(&self) -> Option<&Lambda> {
        match &self.unparenthesized().kind {
            ExprKind::Lambda(lambda) => Some(lambda),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_assigns_positions() {
        let call = CallExpression::extension("LinkAndIgnore")
            .named_arg("selector", Expr::lambda("l", Expr::ident("l").member("Link")))
            .named_arg("relation", Expr::string("\"wow\""));
        assert_eq!(call.arguments[0].position, 0);
        assert_eq!(call.arguments[1].position, 1);
        assert!(call.has_named_arguments());
    }

    #[test]
    fn unparenthesized_strips_nesting() {
        let expr = Expr::ident("l").paren().paren();
        assert_eq!(expr.unparenthesized().kind, ExprKind::Identifier("l".into()));
    }

    #[test]
    fn as_lambda_sees_through_parentheses() {
        let expr = Expr::lambda("l", Expr::ident("l")).paren();
        assert_eq!(expr.as_lambda().map(|l| l.parameters.len()), Some(1));
        assert!(Expr::ident("selector").as_lambda().is_none());
    }

    #[test]
    fn span_to_location() {
        let loc = Span::new(10, 4, 2, 5).to_location(PathBuf::from("a.cs"));
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 5);
        assert_eq!(loc.offset, 10);
        assert_eq!(loc.length, 4);
    }
}
