//! Template configuration.
//! Loads `template.config.{json,yml,yaml}` from a template directory and checks
//! it for consistency before any file is touched.

use crate::answers::AnswerValidator;
use crate::constants::CONFIG_FILES;
use crate::error::{Error, Result};
use crate::patterns::normalize_pattern;
use crate::resolver::FileSetResolver;
use crate::transform::Transform;
use indexmap::IndexSet;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Kind of prompt shown for a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Input,
    Confirm,
}

/// Validation rules for an `input` answer. Every rule that is set must pass.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Validation {
    #[serde(default)]
    pub required: bool,
    /// Regular expression the raw answer must match
    pub pattern: Option<String>,
    /// JSON Schema the raw answer (as a JSON string) must satisfy
    pub schema: Option<serde_json::Value>,
    /// Message shown instead of the generated one when a rule fails
    pub message: Option<String>,
}

/// A single question and the placeholder its answer fills.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub message: String,
    /// Literal default, or a template string rendered against prior answers
    #[serde(default)]
    pub default: Option<serde_json::Value>,
    #[serde(default)]
    pub validate: Option<Validation>,
    #[serde(default)]
    transform: Transform,
    #[serde(default)]
    slugify: bool,
    #[serde(default)]
    pascal: bool,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl Question {
    /// Creates an `input` question with no default, validation or transform.
    pub fn input<S: Into<String>>(name: S, message: S) -> Self {
        Self {
            name: name.into(),
            kind: QuestionKind::Input,
            message: message.into(),
            default: None,
            validate: None,
            transform: Transform::None,
            slugify: false,
            pascal: false,
            placeholder: None,
        }
    }

    /// Creates a `confirm` question defaulting to `default`.
    pub fn confirm<S: Into<String>>(name: S, message: S, default: bool) -> Self {
        Self {
            kind: QuestionKind::Confirm,
            default: Some(serde_json::Value::Bool(default)),
            ..Self::input(name, message)
        }
    }

    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_placeholder<S: Into<String>>(mut self, token: S) -> Self {
        self.placeholder = Some(token.into());
        self
    }

    pub fn with_validation(mut self, validation: Validation) -> Self {
        self.validate = Some(validation);
        self
    }

    /// Effective transform. The `slugify: true` / `pascal: true` flags of the
    /// JavaScript-era configs are accepted as shorthands.
    pub fn transform(&self) -> Transform {
        match (self.transform, self.slugify, self.pascal) {
            (Transform::None, true, _) => Transform::Slugify,
            (Transform::None, false, true) => Transform::PascalCase,
            (transform, _, _) => transform,
        }
    }

    fn check(&self) -> Result<()> {
        let fail = |msg: String| Err(Error::ConfigError(format!("question '{}': {msg}", self.name)));

        if [self.transform != Transform::None, self.slugify, self.pascal]
            .iter()
            .filter(|set| **set)
            .count()
            > 1
        {
            return fail("only one of transform, slugify and pascal may be set".into());
        }

        match self.kind {
            QuestionKind::Confirm => {
                if self.transform() != Transform::None {
                    return fail("confirm questions cannot have a transform".into());
                }
                if self.placeholder.is_some() {
                    return fail("confirm questions cannot declare a placeholder".into());
                }
                if self.validate.is_some() {
                    return fail("confirm questions cannot have validation rules".into());
                }
                if !matches!(self.default, None | Some(serde_json::Value::Bool(_))) {
                    return fail("confirm default must be a boolean".into());
                }
            }
            QuestionKind::Input => {
                if !matches!(
                    self.default,
                    None | Some(serde_json::Value::String(_)) | Some(serde_json::Value::Number(_))
                ) {
                    return fail("input default must be a string or a number".into());
                }
                if let Some(validation) = &self.validate {
                    AnswerValidator::compile(&self.name, validation)?;
                }
            }
        }

        if matches!(&self.placeholder, Some(token) if token.is_empty()) {
            return fail("placeholder token cannot be empty".into());
        }
        Ok(())
    }
}

/// A directory that is only copied when the confirm question `key` was
/// answered with yes.
#[derive(Debug, Clone, Deserialize)]
pub struct ConditionalRule {
    pub key: String,
    pub dir: String,
}

fn default_includes() -> Vec<String> {
    vec!["*".to_string()]
}

/// Copy rules for the template tree.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CopySpec {
    #[serde(default = "default_includes")]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default)]
    pub conditional: Vec<ConditionalRule>,
    /// Extra extensions that bypass token substitution
    #[serde(default)]
    pub binary_extensions: Vec<String>,
    /// Extensions that are always substituted, even if listed as binary by default
    #[serde(default)]
    pub text_extensions: Vec<String>,
}

impl Default for CopySpec {
    fn default() -> Self {
        Self {
            includes: default_includes(),
            excludes: Vec::new(),
            conditional: Vec::new(),
            binary_extensions: Vec::new(),
            text_extensions: Vec::new(),
        }
    }
}

/// Parsed template configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateConfig {
    pub name: String,
    /// Entry file of the plugin, relative to the template root
    #[serde(default)]
    pub main_file_name: Option<String>,
    /// Output name of the entry file; placeholders are substituted in it
    #[serde(default)]
    pub main_file_target: Option<String>,
    #[serde(default)]
    pub copy_files: CopySpec,
    #[serde(alias = "questions")]
    pub placeholder_and_questions_map: Vec<Question>,
}

impl TemplateConfig {
    pub fn questions(&self) -> &[Question] {
        &self.placeholder_and_questions_map
    }

    pub fn question(&self, name: &str) -> Option<&Question> {
        self.questions().iter().find(|q| q.name == name)
    }

    /// Declared placeholder tokens, in question order.
    pub fn placeholder_tokens(&self) -> Vec<&str> {
        self.questions().iter().filter_map(|q| q.placeholder.as_deref()).collect()
    }

    /// Checks the configuration for internal consistency.
    ///
    /// # Errors
    /// * `Error::ConfigError` for duplicate names or tokens, conditional keys
    ///   that do not name a confirm question and invalid question settings
    /// * `Error::PatternError` for copy patterns that do not compile
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::ConfigError("template name cannot be empty".into()));
        }

        let mut names = IndexSet::new();
        let mut tokens = IndexSet::new();
        for question in self.questions() {
            if question.name.trim().is_empty() {
                return Err(Error::ConfigError("question name cannot be empty".into()));
            }
            if !names.insert(question.name.as_str()) {
                return Err(Error::ConfigError(format!(
                    "duplicate question name '{}'",
                    question.name
                )));
            }
            question.check()?;
            if let Some(token) = &question.placeholder {
                if !tokens.insert(token.as_str()) {
                    return Err(Error::ConfigError(format!(
                        "placeholder '{token}' is declared more than once"
                    )));
                }
            }
        }

        for rule in &self.copy_files.conditional {
            match self.question(&rule.key) {
                Some(q) if q.kind == QuestionKind::Confirm => {}
                Some(_) => {
                    return Err(Error::ConfigError(format!(
                        "conditional directory '{}' is gated by '{}', which is not a confirm question",
                        rule.dir, rule.key
                    )))
                }
                None => {
                    return Err(Error::ConfigError(format!(
                        "conditional directory '{}' is gated by unknown question '{}'",
                        rule.dir, rule.key
                    )))
                }
            }
            if normalize_pattern(&rule.dir).is_empty() {
                return Err(Error::ConfigError(format!(
                    "conditional rule for '{}' has an empty directory",
                    rule.key
                )));
            }
        }

        if self.main_file_target.is_some() && self.main_file_name.is_none() {
            return Err(Error::ConfigError(
                "mainFileTarget requires mainFileName to be set".into(),
            ));
        }

        let resolver = FileSetResolver::new(&self.copy_files)?;
        if let Some(main_file) = &self.main_file_name {
            if !resolver.may_select(normalize_pattern(main_file)) {
                return Err(Error::ConfigError(format!(
                    "main file '{main_file}' is excluded from the copied files"
                )));
            }
        }
        Ok(())
    }
}

/// Finds the configuration file of a template.
///
/// An explicit path wins; otherwise the first of [`CONFIG_FILES`] present in
/// `template_dir` is used.
///
/// # Errors
/// * `Error::ConfigError` if no configuration file exists
pub fn find_config<P: AsRef<Path>>(template_dir: P, explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(path.to_path_buf());
        }
        return Err(Error::ConfigError(format!(
            "configuration file '{}' does not exist",
            path.display()
        )));
    }

    for file in CONFIG_FILES {
        let config_path = template_dir.as_ref().join(file);
        if config_path.is_file() {
            return Ok(config_path);
        }
    }

    Err(Error::ConfigError(format!(
        "No configuration file found (tried: {})",
        CONFIG_FILES.join(", ")
    )))
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor YAML for
///   the configuration schema, or if it fails [`TemplateConfig::validate`]
pub fn parse_config(content: &str) -> Result<TemplateConfig> {
    let config: TemplateConfig = match serde_json::from_str(content) {
        Ok(config) => config,
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}")))?,
    };
    config.validate()?;
    Ok(config)
}

/// Locates, reads, parses and validates the configuration of a template.
pub fn load_config<P: AsRef<Path>>(
    template_dir: P,
    explicit: Option<&Path>,
) -> Result<TemplateConfig> {
    let config_path = find_config(template_dir, explicit)?;
    debug!("Loading configuration from {}", config_path.display());
    let content = std::fs::read_to_string(&config_path)?;
    parse_config(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    const YAML_CONFIG: &str = r#"
name: Template config
mainFileName: main.php
copyFiles:
  excludes: [composer.lock, functions]
  conditional:
    - key: enableFunctional
      dir: functions
placeholderAndQuestionsMap:
  - type: input
    name: name
    message: "Plugin Name (required): "
    validate:
      required: true
    placeholder: __NAME__
  - type: input
    name: slug
    message: "Plugin Slug: "
    default: "{{ name }}"
    slugify: true
    placeholder: __SLUG__
  - type: confirm
    name: enableFunctional
    message: "Enable functional programming?"
    default: false
"#;

    #[test]
    fn test_excluded_main_file_is_rejected() {
        let config = YAML_CONFIG.replace("[composer.lock, functions]", "[composer.lock, main.php]");
        match parse_config(&config) {
            Err(Error::ConfigError(msg)) => assert!(msg.contains("main.php")),
            other => panic!("expected ConfigError, got {other:?}"),
        }

        // a main file inside a gated directory can only be checked once answered
        let config = YAML_CONFIG.replace("mainFileName: main.php", "mainFileName: functions/main.php");
        assert!(parse_config(&config).is_ok());
    }

    #[test]
    fn test_parse_yaml_config() {
        let config = parse_config(YAML_CONFIG).unwrap();
        assert_eq!(config.name, "Template config");
        assert_eq!(config.main_file_name.as_deref(), Some("main.php"));
        assert_eq!(config.copy_files.includes, vec!["*"]);
        assert_eq!(config.questions().len(), 3);
        assert_eq!(config.question("slug").unwrap().transform(), Transform::Slugify);
        assert_eq!(config.placeholder_tokens(), vec!["__NAME__", "__SLUG__"]);
    }

    #[test]
    fn test_parse_json_config_with_questions_alias() {
        let config = parse_config(
            r#"{"name": "t", "questions": [
                {"type": "input", "name": "ns", "message": "NS", "transform": "pascalCase",
                 "placeholder": "__NAMESPACE__"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(config.question("ns").unwrap().transform(), Transform::PascalCase);
    }

    #[test]
    fn test_conditional_key_must_be_confirm_question() {
        let err = parse_config(
            r#"{"name": "t",
                "copyFiles": {"conditional": [{"key": "enableSettings", "dir": "views"}]},
                "questions": [{"type": "confirm", "name": "enableSetting", "message": "?"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(msg) if msg.contains("enableSettings")));
    }

    #[test]
    fn test_duplicate_placeholder_rejected() {
        let err = parse_config(
            r#"{"name": "t", "questions": [
                {"type": "input", "name": "a", "message": "a", "placeholder": "__X__"},
                {"type": "input", "name": "b", "message": "b", "placeholder": "__X__"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_confirm_with_placeholder_rejected() {
        let err = parse_config(
            r#"{"name": "t", "questions": [
                {"type": "confirm", "name": "a", "message": "a", "placeholder": "__A__"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_invalid_validation_pattern_rejected() {
        let err = parse_config(
            r#"{"name": "t", "questions": [
                {"type": "input", "name": "a", "message": "a", "validate": {"pattern": "("}}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_invalid_glob_rejected() {
        let err = parse_config(
            r#"{"name": "t", "copyFiles": {"excludes": ["a/[b"]}, "questions": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::PatternError(_)));
    }

    #[test]
    fn test_garbage_config_rejected() {
        assert!(matches!(parse_config("name: [unclosed"), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_find_config_missing() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        assert!(matches!(find_config(temp_dir.path(), None), Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_find_config_prefers_json() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("template.config.yaml"), "").unwrap();
        std::fs::write(temp_dir.path().join("template.config.json"), "").unwrap();
        let found = find_config(temp_dir.path(), None).unwrap();
        assert_eq!(found, temp_dir.path().join("template.config.json"));
    }
}
