//! Placeholder substitution in file contents and file names.

use crate::answers::AnswerSet;
use crate::config::{CopySpec, Question};
use crate::constants::BINARY_EXTENSIONS;
use crate::error::{Error, Result};
use crate::patterns::{normalize_pattern, to_slash_path};
use crate::resolver::ResolvedFileList;
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Placeholder token → replacement value, in question order.
#[derive(Debug, Clone)]
pub struct PlaceholderMap {
    entries: IndexMap<String, String>,
    pattern: Option<Regex>,
}

impl PlaceholderMap {
    /// Builds the map and its matcher. Tokens are matched literally, and the
    /// longest token wins when two start at the same position.
    pub fn new(entries: IndexMap<String, String>) -> Result<Self> {
        let mut tokens: Vec<&String> = entries.keys().filter(|t| !t.is_empty()).collect();
        tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        let pattern = if tokens.is_empty() {
            None
        } else {
            let alternation =
                tokens.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
            Some(Regex::new(&alternation).map_err(|e| {
                Error::ConfigError(format!("cannot build placeholder matcher: {e}"))
            })?)
        };
        Ok(Self { entries, pattern })
    }

    /// Maps each declared placeholder to the answer of its question.
    ///
    /// # Errors
    /// * `Error::ConfigError` if a placeholder question has no text answer
    pub fn from_answers(questions: &[Question], answers: &AnswerSet) -> Result<Self> {
        let mut entries = IndexMap::new();
        for question in questions {
            let Some(token) = &question.placeholder else { continue };
            let value = answers.text(&question.name).ok_or_else(|| {
                Error::ConfigError(format!(
                    "no answer for '{}' to fill placeholder {token}",
                    question.name
                ))
            })?;
            entries.insert(token.clone(), value.to_string());
        }
        Self::new(entries)
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.entries.get(token).map(String::as_str)
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First declared token occurring in `text`, if any.
    pub fn find_token<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.as_ref()?.find(text).map(|m| m.as_str())
    }

    /// Replaces every token in `text` in a single pass.
    pub fn apply(&self, text: &str) -> String {
        self.apply_counting(text, &mut IndexMap::new())
    }

    /// Like [`PlaceholderMap::apply`], adding the number of replacements per
    /// token to `counts`.
    pub fn apply_counting(&self, text: &str, counts: &mut IndexMap<String, usize>) -> String {
        let Some(pattern) = &self.pattern else {
            return text.to_string();
        };
        pattern
            .replace_all(text, |caps: &Captures| {
                let token = &caps[0];
                *counts.entry(token.to_string()).or_insert(0) += 1;
                self.entries.get(token).cloned().unwrap_or_else(|| token.to_string())
            })
            .into_owned()
    }
}

/// Decides which files bypass text substitution.
#[derive(Debug, Clone)]
pub struct BinaryClassifier {
    extensions: IndexSet<String>,
}

impl BinaryClassifier {
    pub fn new(spec: &CopySpec) -> Self {
        let forced_text: IndexSet<String> =
            spec.text_extensions.iter().map(|e| normalize_extension(e)).collect();
        let extensions = BINARY_EXTENSIONS
            .iter()
            .map(|e| e.to_string())
            .chain(spec.binary_extensions.iter().map(|e| normalize_extension(e)))
            .filter(|e| !forced_text.contains(e))
            .collect();
        Self { extensions }
    }

    pub fn is_binary(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| self.extensions.contains(&e.to_ascii_lowercase()))
    }
}

fn normalize_extension(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Content of a generated file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// Text after placeholder substitution
    Text(String),
    /// Bytes copied unchanged
    Binary(Vec<u8>),
}

/// A template file ready to be written.
#[derive(Debug, Clone)]
pub struct TransformedFile {
    /// Path relative to the template root
    pub source: PathBuf,
    /// Path relative to the output root, placeholders substituted
    pub target: PathBuf,
    pub content: FileContent,
    /// Permissions of the source file
    pub permissions: Option<fs::Permissions>,
}

/// Result of substituting a whole file list.
#[derive(Debug, Clone, Default)]
pub struct Substitution {
    pub files: Vec<TransformedFile>,
    /// Replacements made per token, in contents and paths
    pub replacements: IndexMap<String, usize>,
}

/// Produces the transformed content and output path of every resolved file.
pub struct Substitutor<'a> {
    placeholders: &'a PlaceholderMap,
    binary: BinaryClassifier,
    main_file: Option<(String, String)>,
}

impl<'a> Substitutor<'a> {
    pub fn new(placeholders: &'a PlaceholderMap, spec: &CopySpec) -> Self {
        Self { placeholders, binary: BinaryClassifier::new(spec), main_file: None }
    }

    /// Writes the template file `source` to `target` instead of its own name.
    pub fn with_main_file<S: AsRef<str>>(mut self, source: S, target: S) -> Self {
        self.main_file = Some((
            normalize_pattern(source.as_ref()).to_string(),
            normalize_pattern(target.as_ref()).to_string(),
        ));
        self
    }

    /// # Errors
    /// * `Error::IoError` if a file cannot be read
    /// * `Error::NotUtf8Error` if a text file is not valid UTF-8
    /// * `Error::InvalidOutputPath` if a substituted path is empty, escapes
    ///   the output root or collides with another output path
    /// * `Error::ValidationError` if answers and the surrounding template text
    ///   together form a placeholder that is left in a path or text file
    pub fn substitute<P: AsRef<Path>>(&self, source_root: P, files: &ResolvedFileList) -> Result<Substitution> {
        let source_root = source_root.as_ref();
        let mut replacements: IndexMap<String, usize> =
            self.placeholders.tokens().map(|t| (t.to_string(), 0)).collect();
        let mut transformed = Vec::with_capacity(files.len());
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();

        for relative in files.iter() {
            let slash_path = to_slash_path(relative)?;
            let name_template = match &self.main_file {
                Some((source, target)) if *source == slash_path => target.clone(),
                _ => slash_path.clone(),
            };
            let target = self.target_path(&name_template, &slash_path, &mut replacements)?;
            if let Some(previous) = claimed.insert(target.clone(), relative.to_path_buf()) {
                return Err(Error::InvalidOutputPath {
                    path: target.display().to_string(),
                    source_path: format!("{} and {}", previous.display(), slash_path),
                });
            }

            self.reject_leftover_token(&to_slash_path(&target)?, &slash_path)?;

            let absolute = source_root.join(relative);
            let permissions = fs::metadata(&absolute)?.permissions();
            let bytes = fs::read(&absolute)?;
            let content = if self.binary.is_binary(relative) {
                debug!("Copying binary file {slash_path} -> {}", target.display());
                FileContent::Binary(bytes)
            } else {
                let text = String::from_utf8(bytes)
                    .map_err(|_| Error::NotUtf8Error { path: absolute.clone() })?;
                debug!("Substituting {slash_path} -> {}", target.display());
                let text = self.placeholders.apply_counting(&text, &mut replacements);
                self.reject_leftover_token(&text, &slash_path)?;
                FileContent::Text(text)
            };

            transformed.push(TransformedFile {
                source: relative.to_path_buf(),
                target,
                content,
                permissions: Some(permissions),
            });
        }

        for target in claimed.keys() {
            if let Some(parent) = target.ancestors().skip(1).find(|a| claimed.contains_key(*a)) {
                return Err(Error::InvalidOutputPath {
                    path: target.display().to_string(),
                    source_path: format!("file '{}' is also a directory", parent.display()),
                });
            }
        }

        for (token, count) in &replacements {
            if *count == 0 {
                warn!("Placeholder {token} does not occur in any copied file");
            }
        }

        Ok(Substitution { files: transformed, replacements })
    }

    /// Single-pass replacement never rescans its output, so an answer can
    /// complete a token begun by the template text next to it.
    fn reject_leftover_token(&self, substituted: &str, source: &str) -> Result<()> {
        match self.placeholders.find_token(substituted) {
            Some(token) => Err(Error::ValidationError(format!(
                "answers combine with the text of '{source}' into placeholder {token}, \
                 which would be left unreplaced"
            ))),
            None => Ok(()),
        }
    }

    fn target_path(
        &self,
        name_template: &str,
        source: &str,
        counts: &mut IndexMap<String, usize>,
    ) -> Result<PathBuf> {
        let mut target = PathBuf::new();
        for segment in name_template.split('/') {
            let substituted = self.placeholders.apply_counting(segment, counts);
            let invalid = substituted.is_empty()
                || substituted == "."
                || substituted == ".."
                || substituted.contains(['/', '\\']);
            if invalid {
                return Err(Error::InvalidOutputPath {
                    path: self.placeholders.apply(name_template),
                    source_path: source.to_string(),
                });
            }
            target.push(substituted);
        }
        Ok(target)
    }
}
