//! C# language extractor using Tree-sitter.
//!
//! Lowers `invocation_expression` nodes into [`CallExpression`]s. Without a
//! semantic model the calling convention is decided from syntax:
//!
//! - `Type.Method(...)` where `Type` names a watched declaring type is an
//!   ordinary call through that type.
//! - `receiver.Method(...)` and `receiver?.Method(...)` are extension calls.
//! - `Method(...)` (e.g. under `using static`) is an ordinary call with an
//!   unknown declaring type.

use selector_lint_core::{
    Argument, CallExpression, CallForm, Expr, ExprKind, ExtractError, Lambda, LanguageExtractor,
    MethodTable, Span,
};
use tracing::trace;
use tree_sitter::{Language, Node, Parser};

const LANGUAGE_ID: &str = "csharp";

/// Extracts calls to watched methods from C# source.
pub struct CSharpExtractor {
    language: Language,
}

impl CSharpExtractor {
    /// Creates a new C# extractor.
    #[must_use]
    pub fn new() -> Self {
        Self {
            language: tree_sitter_c_sharp::LANGUAGE.into(),
        }
    }
}

impl Default for CSharpExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageExtractor for CSharpExtractor {
    fn language_id(&self) -> &'static str {
        LANGUAGE_ID
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".cs"]
    }

    fn extract(
        &self,
        source: &str,
        methods: &MethodTable,
    ) -> Result<Vec<CallExpression>, ExtractError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| ExtractError::Language {
                language: LANGUAGE_ID,
                message: e.to_string(),
            })?;
        let tree = parser
            .parse(source, None)
            .ok_or(ExtractError::Parse {
                language: LANGUAGE_ID,
            })?;

        let lowering = Lowering {
            src: source,
            methods,
        };

        let mut calls = Vec::new();
        let mut stack = vec![tree.root_node()];
        while let Some(node) = stack.pop() {
            if node.kind() == "invocation_expression" {
                if let Some(call) = lowering.watched_call(node) {
                    calls.push(call);
                }
            }
            let mut cursor = node.walk();
            let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
            stack.extend(children.into_iter().rev());
        }

        Ok(calls)
    }
}

struct Lowering<'s, 'm> {
    src: &'s str,
    methods: &'m MethodTable,
}

impl<'s> Lowering<'s, '_> {
    fn text(&self, node: Node<'_>) -> &'s str {
        self.src
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    /// Name of an `identifier` or `generic_name` without type arguments.
    fn simple_name(&self, node: Node<'_>) -> &'s str {
        if node.kind() == "generic_name" {
            let mut cursor = node.walk();
            let name = node
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier");
            if let Some(name) = name {
                return self.text(name);
            }
        }
        self.text(node)
    }

    fn watched_call(&self, node: Node<'_>) -> Option<CallExpression> {
        let function = node.child_by_field_name("function")?;
        let (name_node, receiver) = match function.kind() {
            "member_access_expression" => (
                function.child_by_field_name("name")?,
                function.child_by_field_name("expression"),
            ),
            "member_binding_expression" => (function.child_by_field_name("name")?, None),
            // `receiver?.Method(...)`
            "conditional_access_expression" => (conditional_member_name(function)?, None),
            "identifier" | "generic_name" => (function, None),
            _ => return None,
        };

        let callee = self.simple_name(name_node);
        self.methods.candidates(callee).next()?;

        let span = span(node);
        if node.has_error() {
            trace!(
                "{callee} at {}:{}: skipped, contains syntax errors",
                span.line,
                span.column
            );
            return None;
        }

        let (declaring_type, form) = match (function.kind(), receiver) {
            ("member_access_expression", Some(receiver)) => {
                let receiver = self.text(receiver).trim();
                if self.methods.declares(receiver) {
                    (Some(receiver.to_string()), CallForm::Ordinary)
                } else {
                    (None, CallForm::Extension)
                }
            }
            ("identifier" | "generic_name", _) => (None, CallForm::Ordinary),
            _ => (None, CallForm::Extension),
        };

        Some(CallExpression {
            callee: callee.to_string(),
            declaring_type,
            form,
            arguments: self.arguments(node),
            span,
        })
    }

    /// Arguments of an invocation, in textual order.
    fn arguments(&self, invocation: Node<'_>) -> Vec<Argument> {
        let Some(list) = invocation.child_by_field_name("arguments") else {
            return Vec::new();
        };
        let mut cursor = list.walk();
        let nodes: Vec<Node<'_>> = list
            .named_children(&mut cursor)
            .filter(|c| c.kind() == "argument")
            .collect();

        nodes
            .into_iter()
            .enumerate()
            .filter_map(|(position, node)| self.argument(node, position))
            .collect()
    }

    fn argument(&self, node: Node<'_>, position: usize) -> Option<Argument> {
        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.children(&mut cursor).collect();

        let mut name = node
            .child_by_field_name("name")
            .map(|n| self.text(n).to_string());

        // Older grammars wrap the name in `name_colon`.
        if let Some(name_colon) = children.iter().find(|c| c.kind() == "name_colon") {
            let mut cursor = name_colon.walk();
            let ident = name_colon
                .named_children(&mut cursor)
                .find(|c| c.kind() == "identifier");
            name = ident.map(|n| self.text(n).to_string());
        } else if name.is_none() {
            if let [first, colon, _, ..] = children.as_slice() {
                if first.kind() == "identifier" && colon.kind() == ":" {
                    name = Some(self.text(*first).to_string());
                }
            }
        }

        let value = children
            .iter()
            .rev()
            .find(|c| c.is_named() && c.kind() != "name_colon")?;

        Some(Argument {
            name,
            position,
            value: self.expr(*value),
        })
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let kind = self
            .expr_kind(node)
            .unwrap_or_else(|| ExprKind::Other(node.kind().to_string()));
        Expr::new(kind).with_span(span(node))
    }

    fn field(&self, node: Node<'_>, name: &str) -> Option<Box<Expr>> {
        node.child_by_field_name(name)
            .map(|child| Box::new(self.expr(child)))
    }

    fn first_named(&self, node: Node<'_>) -> Option<Box<Expr>> {
        let mut cursor = node.walk();
        let child = node.named_children(&mut cursor).next();
        child.map(|c| Box::new(self.expr(c)))
    }

    fn expr_kind(&self, node: Node<'_>) -> Option<ExprKind> {
        let kind = match node.kind() {
            "identifier" => ExprKind::Identifier(self.text(node).to_string()),
            "generic_name" => ExprKind::Identifier(self.simple_name(node).to_string()),
            "member_access_expression" => ExprKind::MemberAccess {
                receiver: self.field(node, "expression")?,
                member: self
                    .simple_name(node.child_by_field_name("name")?)
                    .to_string(),
            },
            "cast_expression" => ExprKind::Cast {
                target: self.text(node.child_by_field_name("type")?).to_string(),
                operand: self.field(node, "value")?,
            },
            "parenthesized_expression" => ExprKind::Parenthesized(self.first_named(node)?),
            "lambda_expression"
            | "simple_lambda_expression"
            | "parenthesized_lambda_expression" => ExprKind::Lambda(self.lambda(node)?),
            "invocation_expression" => ExprKind::Call {
                callee: self.field(node, "function")?,
                arguments: self.arguments(node),
            },
            "binary_expression" => ExprKind::Binary {
                operator: self.text(node.child_by_field_name("operator")?).to_string(),
                left: self.field(node, "left")?,
                right: self.field(node, "right")?,
            },
            "as_expression" | "is_expression" => ExprKind::Binary {
                operator: node.kind().trim_end_matches("_expression").to_string(),
                left: self
                    .field(node, "left")
                    .or_else(|| self.first_named(node))?,
                right: Box::new(Expr::new(ExprKind::Other("type".to_string()))),
            },
            "prefix_unary_expression" | "postfix_unary_expression" => {
                let mut cursor = node.walk();
                let operator = node
                    .children(&mut cursor)
                    .find(|c| !c.is_named())
                    .map(|c| self.text(c).to_string())
                    .unwrap_or_default();
                ExprKind::Unary {
                    operator,
                    operand: self.first_named(node)?,
                }
            }
            "await_expression" => ExprKind::Unary {
                operator: "await".to_string(),
                operand: self.first_named(node)?,
            },
            "conditional_expression" => ExprKind::Conditional,
            "element_access_expression" => ExprKind::ElementAccess {
                receiver: self.field(node, "expression")?,
            },
            "block" => ExprKind::Block,
            "interpolated_string_expression" => ExprKind::Literal(self.text(node).to_string()),
            kind if kind.ends_with("_literal") => ExprKind::Literal(self.text(node).to_string()),
            _ => return None,
        };
        Some(kind)
    }

    fn lambda(&self, node: Node<'_>) -> Option<Lambda> {
        let parameters = match node
            .child_by_field_name("parameters")
            .or_else(|| node.child_by_field_name("parameter"))
        {
            Some(params) if matches!(params.kind(), "identifier" | "implicit_parameter") => {
                vec![self.text(params).to_string()]
            }
            Some(params) => {
                let mut cursor = params.walk();
                let names: Vec<String> = params
                    .named_children(&mut cursor)
                    .filter_map(|p| match p.kind() {
                        "parameter" => p
                            .child_by_field_name("name")
                            .map(|n| self.text(n).to_string()),
                        "identifier" | "implicit_parameter" => Some(self.text(p).to_string()),
                        _ => None,
                    })
                    .collect();
                names
            }
            None => Vec::new(),
        };

        let body = node.child_by_field_name("body").or_else(|| {
            let mut cursor = node.walk();
            let last = node.named_children(&mut cursor).last();
            last
        })?;

        Some(Lambda {
            parameters,
            body: Box::new(self.expr(body)),
        })
    }
}

fn span(node: Node<'_>) -> Span {
    let start = node.start_position();
    Span::new(
        node.start_byte(),
        node.end_byte() - node.start_byte(),
        start.row + 1,
        start.column + 1,
    )
}

/// Name bound by the trailing `member_binding_expression` of `a?.B`.
fn conditional_member_name(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    let binding = node
        .named_children(&mut cursor)
        .find(|c| c.kind() == "member_binding_expression")?;
    binding.child_by_field_name("name")
}
