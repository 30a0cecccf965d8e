//! The table of watched configuration methods.

use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Declaring type of the standard configuration methods.
pub const TRANSFORMATION_MAP_EXTENSIONS: &str = "TransformationMapExtensions";

/// Name of the single-selector configuration method.
pub const IGNORE: &str = "Ignore";

/// Name of the compound (relation + selector) configuration method.
pub const LINK_AND_IGNORE: &str = "LinkAndIgnore";

/// A configuration method whose selector argument is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchedMethod {
    /// Method name, e.g. `Ignore`.
    pub name: String,
    /// Static type declaring the method.
    pub declaring_type: String,
    /// Name of the receiver parameter (`this` parameter of the extension).
    #[serde(default = "default_receiver")]
    pub receiver_parameter: String,
    /// Declared parameters after the receiver, in declaration order.
    pub parameters: Vec<String>,
    /// The parameter that takes the selector lambda.
    #[serde(default = "default_selector")]
    pub selector_parameter: String,
    /// Whether the ordinary (static call) form is legal.
    #[serde(default = "default_true")]
    pub ordinary: bool,
    /// Whether the extension-method form is legal.
    #[serde(default = "default_true")]
    pub extension: bool,
}

fn default_receiver() -> String {
    "transformationMap".to_string()
}

fn default_selector() -> String {
    "selector".to_string()
}

fn default_true() -> bool {
    true
}

impl WatchedMethod {
    /// Creates a method on [`TRANSFORMATION_MAP_EXTENSIONS`] legal in both forms.
    #[must_use]
    pub fn new(name: impl Into<String>, parameters: &[&str]) -> Self {
        Self {
            name: name.into(),
            declaring_type: TRANSFORMATION_MAP_EXTENSIONS.to_string(),
            receiver_parameter: default_receiver(),
            parameters: parameters.iter().map(|p| (*p).to_string()).collect(),
            selector_parameter: default_selector(),
            ordinary: true,
            extension: true,
        }
    }

    /// Sets the declaring type.
    #[must_use]
    pub fn declared_on(mut self, declaring_type: impl Into<String>) -> Self {
        self.declaring_type = declaring_type.into();
        self
    }

    /// Restricts which calling conventions are legal.
    #[must_use]
    pub fn forms(mut self, ordinary: bool, extension: bool) -> Self {
        self.ordinary = ordinary;
        self.extension = extension;
        self
    }

    /// Returns true if `declaring_type` names this method's declaring type.
    ///
    /// Qualified names match on their last segment, so
    /// `Tiger.Hal.TransformationMapExtensions` matches `TransformationMapExtensions`.
    #[must_use]
    pub fn is_declared_by(&self, declaring_type: &str) -> bool {
        last_segment(declaring_type) == last_segment(&self.declaring_type)
    }

    /// Checks the definition for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if !self.ordinary && !self.extension {
            return Err(format!("method '{}' allows no calling form", self.name));
        }
        if !self.parameters.contains(&self.selector_parameter) {
            return Err(format!(
                "method '{}': selector parameter '{}' is not declared",
                self.name, self.selector_parameter
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for param in std::iter::once(&self.receiver_parameter).chain(&self.parameters) {
            if !seen.insert(param.as_str()) {
                return Err(format!(
                    "method '{}': duplicate parameter '{param}'",
                    self.name
                ));
            }
        }
        Ok(())
    }
}

/// Last `.`- or `::`-separated segment of a type name, so `global::` and
/// alias qualifiers are ignored along with namespaces.
fn last_segment(name: &str) -> &str {
    name.rsplit(['.', ':']).next().unwrap_or(name).trim()
}

/// Immutable lookup table of watched methods.
#[derive(Debug, Clone, Default)]
pub struct MethodTable {
    methods: Vec<WatchedMethod>,
}

impl MethodTable {
    /// Creates a table from explicit entries.
    #[must_use]
    pub fn new(methods: Vec<WatchedMethod>) -> Self {
        Self { methods }
    }

    /// The process-wide standard table: `Ignore` and `LinkAndIgnore`.
    #[must_use]
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<MethodTable> = OnceLock::new();
        STANDARD.get_or_init(|| {
            Self::new(vec![
                WatchedMethod::new(IGNORE, &["selector"]),
                WatchedMethod::new(LINK_AND_IGNORE, &["relation", "selector"]),
            ])
        })
    }

    /// Returns a copy of this table extended with `extra` entries.
    #[must_use]
    pub fn extended(&self, extra: impl IntoIterator<Item = WatchedMethod>) -> Self {
        let mut methods = self.methods.clone();
        methods.extend(extra);
        Self { methods }
    }

    /// All entries named `name`.
    pub fn candidates<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a WatchedMethod> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// Returns true if `type_name`, qualified or not, declares any entry.
    ///
    /// Front ends use this to recognize calls made through the static type.
    #[must_use]
    pub fn declares(&self, type_name: &str) -> bool {
        self.methods.iter().any(|m| m.is_declared_by(type_name))
    }

    /// Iterates over all entries.
    pub fn iter(&self) -> impl Iterator<Item = &WatchedMethod> {
        self.methods.iter()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns true if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}
