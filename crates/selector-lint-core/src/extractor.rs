//! Language front-end trait.
//!
//! `LanguageExtractor` is the extension point for adding source languages.
//! Implement it to lower a language's syntax tree into [`CallExpression`]s.

use crate::syntax::CallExpression;
use crate::watch::MethodTable;

/// Errors raised by a front end.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The grammar could not be loaded.
    #[error("failed to load {language} grammar: {message}")]
    Language {
        /// Language identifier.
        language: &'static str,
        /// Underlying error message.
        message: String,
    },

    /// The parser produced no tree.
    #[error("failed to parse {language} source")]
    Parse {
        /// Language identifier.
        language: &'static str,
    },
}

/// Trait for language-specific call extraction.
pub trait LanguageExtractor: Send + Sync {
    /// Language identifier (e.g., `"csharp"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".cs"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts the calls to methods named in `methods`, in source order.
    ///
    /// `methods` also tells the front end which declaring types mark an
    /// ordinary (static) call when no semantic model is available. Calls
    /// containing syntax errors are left out.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed at all.
    fn extract(
        &self,
        source: &str,
        methods: &MethodTable,
    ) -> Result<Vec<CallExpression>, ExtractError>;

    /// Returns true if this extractor handles files with `extension`
    /// (given without the leading dot).
    fn handles(&self, extension: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.trim_start_matches('.') == extension)
    }
}
