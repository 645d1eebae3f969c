//! Selection of the template files that end up in the generated plugin.

use crate::answers::AnswerSet;
use crate::config::CopySpec;
use crate::constants::DEFAULT_EXCLUDES;
use crate::error::{Error, Result};
use crate::patterns::{normalize_pattern, to_slash_path, PathMatcher};
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Sorted list of template files to copy, relative to the template root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedFileList(Vec<PathBuf>);

impl ResolvedFileList {
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        self.0.binary_search_by(|p| p.as_path().cmp(path.as_ref())).is_ok()
    }
}

impl FromIterator<PathBuf> for ResolvedFileList {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        let mut paths: Vec<PathBuf> = iter.into_iter().collect();
        paths.sort();
        paths.dedup();
        Self(paths)
    }
}

/// Why a file was or was not selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Keep,
    Excluded,
    GatedOff(String),
    NotIncluded,
}

struct Conditional {
    key: String,
    dir: String,
    matcher: PathMatcher,
}

/// Applies the include, exclude and conditional rules of a [`CopySpec`].
pub struct FileSetResolver {
    includes: PathMatcher,
    excludes: PathMatcher,
    conditionals: Vec<Conditional>,
}

impl FileSetResolver {
    /// Compiles the copy rules.
    ///
    /// An exclude that names a conditional directory exactly only marks that
    /// directory as off by default; the gate decides instead.
    ///
    /// # Errors
    /// * `Error::PatternError` if any pattern is not a valid glob
    pub fn new(spec: &CopySpec) -> Result<Self> {
        let conditional_dirs: Vec<&str> =
            spec.conditional.iter().map(|rule| normalize_pattern(&rule.dir)).collect();

        let excludes = spec
            .excludes
            .iter()
            .map(String::as_str)
            .filter(|pattern| !conditional_dirs.contains(&normalize_pattern(pattern)))
            .chain(DEFAULT_EXCLUDES);

        let conditionals = spec
            .conditional
            .iter()
            .map(|rule| -> Result<Conditional> {
                Ok(Conditional {
                    key: rule.key.clone(),
                    dir: normalize_pattern(&rule.dir).to_string(),
                    matcher: PathMatcher::new([&rule.dir])?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            includes: PathMatcher::new(&spec.includes)?,
            excludes: PathMatcher::new(excludes)?,
            conditionals,
        })
    }

    /// Decides whether the file at `path` (relative, `/`-separated) is copied.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a gating answer is missing from `answers`
    pub fn classify(&self, path: &str, answers: &AnswerSet) -> Result<Decision> {
        if self.excludes.is_match(path) {
            return Ok(Decision::Excluded);
        }

        let mut gated = false;
        for conditional in self.conditionals.iter().filter(|c| c.matcher.is_match(path)) {
            let enabled = answers.flag(&conditional.key).ok_or_else(|| {
                Error::ConfigError(format!(
                    "no yes/no answer for '{}' gating '{}'",
                    conditional.key, conditional.dir
                ))
            })?;
            if !enabled {
                return Ok(Decision::GatedOff(conditional.key.clone()));
            }
            gated = true;
        }

        if gated || self.includes.is_match(path) {
            Ok(Decision::Keep)
        } else {
            Ok(Decision::NotIncluded)
        }
    }

    /// Whether `path` can be selected for some combination of answers, i.e.
    /// it is not excluded and is either included or inside a conditional
    /// directory.
    pub fn may_select(&self, path: &str) -> bool {
        !self.excludes.is_match(path)
            && (self.includes.is_match(path)
                || self.conditionals.iter().any(|c| c.matcher.is_match(path)))
    }

    /// Walks `source_root` and returns the sorted list of files to copy.
    /// Symbolic links are followed, so a linked file is copied as a regular
    /// file.
    ///
    /// # Errors
    /// * `Error::WalkError` if the template tree cannot be read or contains a
    ///   symbolic link loop
    /// * `Error::ConfigError` if a gating answer is missing
    pub fn resolve<P: AsRef<Path>>(&self, source_root: P, answers: &AnswerSet) -> Result<ResolvedFileList> {
        let source_root = source_root.as_ref();
        let mut selected = Vec::new();

        for entry in WalkDir::new(source_root).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(source_root)
                .map_err(|e| Error::ConfigError(e.to_string()))?;
            let slash_path = to_slash_path(relative)?;

            match self.classify(&slash_path, answers)? {
                Decision::Keep => {
                    debug!("Selected {slash_path}");
                    selected.push(relative.to_path_buf());
                }
                decision => debug!("Skipping {slash_path}: {decision:?}"),
            }
        }

        Ok(selected.into_iter().collect())
    }
}
