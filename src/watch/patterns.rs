// src/watch/patterns.rs

use std::fmt;
use std::path::Path;

use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;

use crate::config::model::PluginOptions;
use crate::watch::path_utils::{resolve, to_slash};

/// A user glob rewritten as an absolute pattern rooted at `cwd`.
///
/// Globs that fail to compile keep their source text but never match; a typo
/// in a pattern must not break the build.
#[derive(Clone)]
pub struct AbsolutePattern {
    source: String,
    matcher: Option<GlobMatcher>,
}

impl fmt::Debug for AbsolutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AbsolutePattern")
            .field("source", &self.source)
            .field("valid", &self.matcher.is_some())
            .finish()
    }
}

impl AbsolutePattern {
    pub fn compile(raw: &str, cwd: &Path) -> Self {
        let source = to_slash(&resolve(cwd, raw));
        let matcher = match GlobBuilder::new(&source).literal_separator(true).build() {
            Ok(glob) => Some(glob.compile_matcher()),
            Err(err) => {
                debug!(pattern = %source, error = %err, "glob does not compile; it will never match");
                None
            }
        };
        Self { source, matcher }
    }

    /// The absolute pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.matcher.is_some()
    }

    pub fn matches(&self, path: &Path) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(to_slash(path)),
            None => false,
        }
    }
}

/// Rewrite each raw pattern as an absolute pattern under `cwd`, keeping order.
pub fn compile_patterns<S: AsRef<str>>(raw: &[S], cwd: &Path) -> Vec<AbsolutePattern> {
    raw.iter()
        .map(|pattern| AbsolutePattern::compile(pattern.as_ref(), cwd))
        .collect()
}

/// Compiled `exclude` and `outside` lists for one build.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    pub exclude: Vec<AbsolutePattern>,
    pub outside: Vec<AbsolutePattern>,
}

impl PatternSet {
    pub fn from_options(options: &PluginOptions, cwd: &Path) -> Self {
        Self {
            exclude: compile_patterns(&options.exclude, cwd),
            outside: compile_patterns(&options.outside, cwd),
        }
    }

    /// Never reported, even if unused.
    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclude.iter().any(|p| p.matches(path))
    }

    /// Forced into the module graph before reachability is judged.
    pub fn is_outside(&self, path: &Path) -> bool {
        self.outside.iter().any(|p| p.matches(path))
    }
}
