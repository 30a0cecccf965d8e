//! # selector-lint-core
//!
//! Core engine for checking the selector lambdas passed to transformation
//! map configuration methods (`Ignore`, `LinkAndIgnore`).
//!
//! A selector must be a plain member path on the lambda parameter, optionally
//! wrapped in a single cast: `l => l.Link` or `l => (Base)l.Link`. Anything
//! else (method calls, operators, nested chains) cannot be turned into a
//! member path and is reported.
//!
//! The pipeline for every call site is:
//!
//! 1. [`match_call`] checks the call against the [`MethodTable`] and binds
//!    arguments to declared parameters.
//! 2. [`locate_selector`] picks the selector argument.
//! 3. [`classify`] accepts or rejects the selector body.
//! 4. [`emit`] turns a rejection into one or more [`Violation`]s.
//!
//! [`Rule`] wires these steps together for one watched method, and
//! [`Analyzer`] runs rules over files produced by a [`LanguageExtractor`].
//!
//! ## Example
//!
//! ```ignore
//! use selector_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .extractor(MyExtractor)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod classifier;
mod config;
mod context;
mod emitter;
mod extractor;
mod locator;
mod matcher;
mod rule;
mod syntax;
mod types;

/// Watched configuration methods.
pub mod watch;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, CancellationFlag};
pub use classifier::{
    classify, Classification, InvalidReason, InvalidSelector, MemberPath, DEFAULT_MAX_CHAIN_DEPTH,
};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use emitter::{emit, DiagnosticDescriptor};
pub use extractor::{ExtractError, LanguageExtractor};
pub use locator::{locate_selector, SelectorArgument};
pub use matcher::{match_call, CallDescriptor};
pub use rule::{Rule, RuleBox};
pub use syntax::{Argument, CallExpression, CallForm, Expr, ExprKind, Lambda, Span};
pub use types::{
    Label, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
pub use watch::{MethodTable, WatchedMethod};
