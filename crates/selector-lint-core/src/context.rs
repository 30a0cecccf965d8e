//! Context types for rule execution.

use std::path::{Path, PathBuf};

use crate::syntax::Span;
use crate::types::Location;
use crate::watch::MethodTable;

/// Context provided to rules for one source file.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Absolute path to the file.
    pub path: &'a Path,
    /// File contents as a string.
    pub content: &'a str,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Watched methods in effect.
    pub methods: &'a MethodTable,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context using the standard method table.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);

        Self {
            path,
            content,
            relative_path,
            methods: MethodTable::standard(),
        }
    }

    /// Uses `methods` instead of the standard table.
    #[must_use]
    pub fn with_methods(mut self, methods: &'a MethodTable) -> Self {
        self.methods = methods;
        self
    }

    /// Location of `span` in this file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        span.to_location(self.relative_path.clone())
    }

    /// Source text covered by `span`, or an empty string if out of bounds.
    #[must_use]
    pub fn snippet(&self, span: Span) -> &'a str {
        self.content
            .get(span.offset..span.offset + span.length)
            .unwrap_or("")
    }
}
