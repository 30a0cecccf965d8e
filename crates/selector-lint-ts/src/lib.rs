//! # selector-lint-ts
//!
//! Tree-sitter based C# front end for selector-lint.
//!
//! This crate parses C# source with Tree-sitter and lowers calls to watched
//! methods into the `selector-lint-core` syntax model, so the core rules can
//! check their selector lambdas:
//!
//! - [`CSharpExtractor`] implements [`LanguageExtractor`] for `.cs` files

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod csharp;

pub use csharp::CSharpExtractor;
pub use selector_lint_core::LanguageExtractor;
