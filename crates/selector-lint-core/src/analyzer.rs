//! Core analyzer for orchestrating lint execution.

use crate::config::{Config, RuleConfig};
use crate::context::FileContext;
use crate::extractor::LanguageExtractor;
use crate::rule::{Rule, RuleBox};
use crate::syntax::CallExpression;
use crate::types::{LintResult, Violation};
use crate::watch::MethodTable;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A source file could not be parsed.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Analysis was cancelled by the host.
    #[error("analysis cancelled")]
    Cancelled,
}

/// Shared cancellation signal.
///
/// Clones observe the same flag. The analyzer checks it between call sites,
/// never in the middle of classifying one.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Creates a flag that is not cancelled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Returns true once cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    extractors: Vec<Box<dyn LanguageExtractor>>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    methods: Option<MethodTable>,
    fail_on_parse_error: bool,
    cancellation: Option<CancellationFlag>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Registers a language front end.
    #[must_use]
    pub fn extractor<E: LanguageExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Overrides the watched-method table built from the configuration.
    #[must_use]
    pub fn methods(mut self, methods: MethodTable) -> Self {
        self.methods = Some(methods);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Shares a cancellation flag with the host.
    #[must_use]
    pub fn cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancellation = Some(flag);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or a
    /// glob pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();

        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let mut include_patterns = self.include_patterns;
        include_patterns.extend(config.analyzer.include.iter().cloned());

        let exclude = compile_patterns(&exclude_patterns)?;
        let include = compile_patterns(&include_patterns)?;

        let parallelism = config
            .analyzer
            .parallelism
            .or_else(|| std::thread::available_parallelism().ok().map(usize::from))
            .unwrap_or(1)
            .max(1);

        let methods = self.methods.unwrap_or_else(|| config.method_table());

        Ok(Analyzer {
            root,
            rules: self.rules,
            extractors: self.extractors,
            exclude,
            include,
            methods,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
            cancellation: self.cancellation.unwrap_or_default(),
            parallelism,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, AnalyzerError> {
    patterns
        .iter()
        .map(|p| glob::Pattern::new(p).map_err(AnalyzerError::from))
        .collect()
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    extractors: Vec<Box<dyn LanguageExtractor>>,
    exclude: Vec<glob::Pattern>,
    include: Vec<glob::Pattern>,
    methods: MethodTable,
    config: Config,
    fail_on_parse_error: bool,
    cancellation: CancellationFlag,
    parallelism: usize,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Returns the watched-method table in effect.
    #[must_use]
    pub fn methods(&self) -> &MethodTable {
        &self.methods
    }

    /// Returns the cancellation flag observed by this analyzer.
    #[must_use]
    pub fn cancellation(&self) -> &CancellationFlag {
        &self.cancellation
    }

    /// Analyzes all files under the root and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails, a file cannot be read, analysis
    /// is cancelled, or (with `fail_on_parse_error`) a file fails to parse.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let mut outcomes = self.analyze_files(&files);
        outcomes.sort_by_key(|(index, _)| *index);

        let mut result = LintResult::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(AnalyzerError::Parse { path, message }) => {
                    warn!("Failed to parse {}: {}", path.display(), message);
                    if self.fail_on_parse_error {
                        return Err(AnalyzerError::Parse { path, message });
                    }
                }
                Err(e) => {
                    debug!("Aborting at {}: {}", files[index].display(), e);
                    return Err(e);
                }
            }
        }

        if self.cancellation.is_cancelled() {
            return Err(AnalyzerError::Cancelled);
        }

        result.sort();

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Analyzes one in-memory source file.
    ///
    /// The extractor is picked from the extension of `path`; files no
    /// extractor handles produce an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be parsed or analysis is
    /// cancelled.
    pub fn analyze_source(&self, path: &Path, content: &str) -> Result<LintResult, AnalyzerError> {
        let mut result = LintResult::new();
        let Some(extractor) = self.extractor_for(path) else {
            return Ok(result);
        };

        let calls = extractor
            .extract(content, &self.methods)
            .map_err(|e| AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        let ctx = FileContext::new(path, content, &self.root).with_methods(&self.methods);

        result.violations = self.analyze_calls(&ctx, &calls)?;
        result.files_checked = 1;
        result.sort();
        Ok(result)
    }

    /// Runs every enabled rule over `calls`, in source order.
    ///
    /// This is the entry point for hosts that already hold a syntax model.
    /// Violations for one call are grouped together in rule registration
    /// order.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Cancelled`] if cancellation is requested
    /// before all call sites are processed.
    pub fn analyze_calls(
        &self,
        ctx: &FileContext<'_>,
        calls: &[CallExpression],
    ) -> Result<Vec<Violation>, AnalyzerError> {
        let rules: Vec<&RuleBox> = self
            .rules
            .iter()
            .filter(|rule| {
                let enabled = self.config.is_rule_enabled(rule.name());
                if !enabled {
                    debug!("Skipping disabled rule: {}", rule.name());
                }
                enabled
            })
            .collect();

        let mut violations = Vec::new();
        for call in calls {
            if self.cancellation.is_cancelled() {
                return Err(AnalyzerError::Cancelled);
            }
            for rule in &rules {
                let found = rule.check_call(ctx, call);
                violations.extend(self.apply_severity_override(rule.name(), found));
            }
        }
        Ok(violations)
    }

    /// Analyzes `files` on scoped worker threads, tagging each outcome with
    /// the index of its file.
    fn analyze_files(
        &self,
        files: &[PathBuf],
    ) -> Vec<(usize, Result<Vec<Violation>, AnalyzerError>)> {
        let workers = self.parallelism.min(files.len()).max(1);
        debug!("Analyzing with {} worker(s)", workers);

        let next = AtomicUsize::new(0);
        let next = &next;

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..workers)
                .map(|_| {
                    scope.spawn(move || {
                        let mut outcomes = Vec::new();
                        while !self.cancellation.is_cancelled() {
                            let index = next.fetch_add(1, Ordering::Relaxed);
                            let Some(path) = files.get(index) else {
                                break;
                            };
                            outcomes.push((index, self.analyze_file(path)));
                        }
                        outcomes
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                })
                .collect()
        })
    }

    /// Analyzes a single file and returns violations.
    fn analyze_file(&self, path: &Path) -> Result<Vec<Violation>, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let Some(extractor) = self.extractor_for(path) else {
            return Ok(Vec::new());
        };

        let content = std::fs::read_to_string(path)?;
        let calls = extractor
            .extract(&content, &self.methods)
            .map_err(|e| AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let ctx = FileContext::new(path, &content, &self.root).with_methods(&self.methods);
        self.analyze_calls(&ctx, &calls)
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    fn extractor_for(&self, path: &Path) -> Option<&dyn LanguageExtractor> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        self.extractors
            .iter()
            .find(|e| e.handles(ext))
            .map(AsRef::as_ref)
    }

    /// Discovers all source files handled by a registered extractor.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || self.extractor_for(path).is_none() {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            if !self.should_include(path) {
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path matches an exclude pattern.
    fn should_exclude(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| self.matches(p, path))
    }

    /// Checks if a path passes the include patterns (all paths when empty).
    fn should_include(&self, path: &Path) -> bool {
        self.include.is_empty() || self.include.iter().any(|p| self.matches(p, path))
    }

    fn matches(&self, pattern: &glob::Pattern, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        pattern.matches_path(relative) || pattern.matches_path(path)
    }

    /// Gets the rule configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, rule_name: &str) -> Option<&RuleConfig> {
        self.config.rules.get(rule_name)
    }
}
