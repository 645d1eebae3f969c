//! Path pattern matching for copy rules.
//! Patterns are globs over `/`-separated paths relative to the template root.
//! A pattern also matches everything below the path it names, so `functions`
//! covers `functions/helpers.php`.

use crate::error::{Error, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::{Component, Path};

/// Strips `./` prefixes and trailing slashes from a configured pattern.
pub fn normalize_pattern(pattern: &str) -> &str {
    let mut pattern = pattern.trim();
    while let Some(rest) = pattern.strip_prefix("./") {
        pattern = rest;
    }
    pattern.trim_end_matches('/')
}

/// Converts a relative path into the `/`-separated form patterns match on.
///
/// # Errors
/// * `Error::ConfigError` if the path is not valid UTF-8 or is not relative
pub fn to_slash_path(path: &Path) -> Result<String> {
    let mut segments = Vec::new();
    for component in path.components() {
        match component {
            Component::Normal(segment) => segments.push(segment.to_str().ok_or_else(|| {
                Error::ConfigError(format!("path '{}' is not valid UTF-8", path.display()))
            })?),
            Component::CurDir => {}
            _ => {
                return Err(Error::ConfigError(format!(
                    "path '{}' is not relative to the template root",
                    path.display()
                )))
            }
        }
    }
    Ok(segments.join("/"))
}

/// Compiled, subtree-aware set of path patterns.
#[derive(Debug, Clone)]
pub struct PathMatcher {
    set: GlobSet,
    match_all: bool,
}

impl PathMatcher {
    /// Compiles `patterns`. `*` and `**` on their own match every path.
    ///
    /// # Errors
    /// * `Error::PatternError` if a pattern is not a valid glob
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = GlobSetBuilder::new();
        let mut match_all = false;
        for pattern in patterns {
            let pattern = normalize_pattern(pattern.as_ref());
            match pattern {
                "" => continue,
                "*" | "**" => {
                    match_all = true;
                    continue;
                }
                _ => {}
            }
            builder.add(GlobBuilder::new(pattern).literal_separator(true).build()?);
            builder.add(GlobBuilder::new(&format!("{pattern}/**")).literal_separator(true).build()?);
        }
        Ok(Self { set: builder.build()?, match_all })
    }

    /// Returns true when `path` or one of its parent directories matches.
    pub fn is_match(&self, path: &str) -> bool {
        self.match_all || self.set.is_match(path)
    }

    pub fn is_empty(&self) -> bool {
        !self.match_all && self.set.is_empty()
    }
}
