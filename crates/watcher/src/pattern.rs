//! File-name pattern matching
//!
//! The watched pattern is a single gitignore-style glob applied to bare
//! file names (no directory components), case-insensitively:
//! - `*.tmp` matches `a.tmp` and `A.TMP`
//! - `cache-??.bin` matches `cache-01.bin`
//!
//! Matching goes through the `ignore` crate so the glob dialect is the
//! same one used for `.gitignore` files.

use crate::WatchError;
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use std::path::Path;

/// Compiled name pattern
pub struct NamePattern {
    /// Pattern as written by the user
    raw: String,

    /// Compiled glob
    matcher: Gitignore,

    /// Literal extension of the pattern (`tmp` for `*.tmp`), lowercased
    extension: Option<String>,
}

impl NamePattern {
    /// Compile a file-name pattern
    pub fn new(pattern: &str) -> Result<Self, WatchError> {
        let raw = pattern.trim();

        if raw.is_empty() {
            return Err(WatchError::pattern(pattern, "pattern is empty"));
        }
        if raw.contains('/') || raw.contains('\\') {
            return Err(WatchError::pattern(
                pattern,
                "pattern must match file names, not paths",
            ));
        }
        if raw.starts_with('!') {
            return Err(WatchError::pattern(pattern, "negated patterns are not supported"));
        }

        let mut builder = GitignoreBuilder::new("");
        builder
            .case_insensitive(true)
            .map_err(|e| WatchError::pattern(pattern, e))?;
        builder
            .add_line(None, raw)
            .map_err(|e| WatchError::pattern(pattern, e))?;
        let matcher = builder.build().map_err(|e| WatchError::pattern(pattern, e))?;

        Ok(Self {
            raw: raw.to_string(),
            matcher,
            extension: literal_extension(raw),
        })
    }

    /// Check a bare file name against the pattern
    pub fn matches(&self, name: &str) -> bool {
        if name.is_empty() {
            return false;
        }
        self.matcher.matched(Path::new(name), false).is_ignore()
    }

    /// Check whether `name` carries the pattern's extension
    ///
    /// Patterns without a literal extension (`tmp*`, `*.t?p`) fall back to
    /// a full pattern match.
    pub fn matches_extension(&self, name: &str) -> bool {
        match &self.extension {
            Some(ext) => Path::new(name)
                .extension()
                .map(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
                .unwrap_or(false),
            None => self.matches(name),
        }
    }

    /// Literal extension of the pattern, if it has one
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Pattern as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl std::fmt::Debug for NamePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamePattern")
            .field("raw", &self.raw)
            .field("extension", &self.extension)
            .finish()
    }
}

/// Extract the extension of a pattern when it contains no glob syntax
fn literal_extension(pattern: &str) -> Option<String> {
    let (_, ext) = pattern.rsplit_once('.')?;
    if ext.is_empty() || ext.contains(['*', '?', '[', ']', '{', '}']) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}
