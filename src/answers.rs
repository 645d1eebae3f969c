//! Question answering.
//! Asks every configured question in order and builds the [`AnswerSet`] that
//! drives file selection and placeholder substitution.

use crate::config::{Question, QuestionKind, Validation};
use crate::error::{Error, Result};
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;
use indexmap::IndexMap;
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use std::io::Read;

/// A stored answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnswerValue {
    Text(String),
    Flag(bool),
}

/// Answers keyed by question name, in question order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnswerSet(IndexMap<String, AnswerValue>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AnswerValue> {
        self.0.get(name)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(AnswerValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(AnswerValue::Flag(value)) => Some(*value),
            _ => None,
        }
    }

    pub fn insert<S: Into<String>>(&mut self, name: S, value: AnswerValue) {
        self.0.insert(name.into(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The answers as a rendering context for defaults and messages.
    pub fn to_context(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

/// Compiled [`Validation`] rules of one question.
pub struct AnswerValidator {
    required: bool,
    pattern: Option<Regex>,
    schema: Option<jsonschema::Validator>,
    message: Option<String>,
}

impl AnswerValidator {
    /// # Errors
    /// * `Error::ConfigError` if the pattern or schema does not compile
    pub fn compile(question: &str, validation: &Validation) -> Result<Self> {
        let pattern = match &validation.pattern {
            Some(pattern) => Some(Regex::new(pattern).map_err(|e| {
                Error::ConfigError(format!("question '{question}': invalid pattern: {e}"))
            })?),
            None => None,
        };
        let schema = match &validation.schema {
            Some(schema) => Some(jsonschema::validator_for(schema).map_err(|e| {
                Error::ConfigError(format!("question '{question}': invalid schema: {e}"))
            })?),
            None => None,
        };
        Ok(Self { required: validation.required, pattern, schema, message: validation.message.clone() })
    }

    fn reject(&self, fallback: String) -> Error {
        Error::ValidationError(self.message.clone().unwrap_or(fallback))
    }

    /// Checks a raw answer.
    pub fn check(&self, question: &str, raw: &str) -> Result<()> {
        if self.required && raw.trim().is_empty() {
            return Err(self.reject(format!("'{question}' is required")));
        }
        if let Some(pattern) = &self.pattern {
            if !pattern.is_match(raw) {
                return Err(self.reject(format!("'{question}' must match {}", pattern.as_str())));
            }
        }
        if let Some(schema) = &self.schema {
            if !schema.is_valid(&serde_json::Value::String(raw.to_string())) {
                return Err(self.reject(format!("'{question}' does not satisfy its schema")));
            }
        }
        Ok(())
    }
}

/// How answers without a preloaded value are obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerMode {
    /// Prompt, re-prompting on invalid input
    Interactive,
    /// Take the default of every question; invalid defaults are fatal
    Defaults,
}

/// Asks questions and builds an [`AnswerSet`].
pub struct QuestionRunner<'a> {
    prompter: &'a dyn Prompter,
    renderer: &'a dyn TemplateRenderer,
    mode: AnswerMode,
    preloaded: IndexMap<String, serde_json::Value>,
    reserved_tokens: Vec<String>,
}

impl<'a> QuestionRunner<'a> {
    pub fn new(
        prompter: &'a dyn Prompter,
        renderer: &'a dyn TemplateRenderer,
        mode: AnswerMode,
    ) -> Self {
        Self { prompter, renderer, mode, preloaded: IndexMap::new(), reserved_tokens: Vec::new() }
    }

    /// Answers that skip prompting. They are still validated and transformed.
    pub fn with_preloaded(mut self, preloaded: IndexMap<String, serde_json::Value>) -> Self {
        self.preloaded = preloaded;
        self
    }

    /// Placeholder tokens no answer may contain.
    pub fn with_reserved_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Answers every question in order.
    ///
    /// # Errors
    /// * `Error::ValidationError` for an invalid preloaded or default answer
    ///   when nobody can be re-prompted
    /// * `Error::Cancelled` if the user aborts a prompt
    /// * `Error::MinijinjaError` if a default or message fails to render
    pub fn run(&self, questions: &[Question]) -> Result<AnswerSet> {
        let mut answers = AnswerSet::new();
        for question in questions {
            let value = self.answer(question, &answers)?;
            debug!("Answer '{}' = {:?}", question.name, value);
            answers.insert(question.name.clone(), value);
        }
        Ok(answers)
    }

    fn answer(&self, question: &Question, answers: &AnswerSet) -> Result<AnswerValue> {
        let context = answers.to_context();
        let message = self.renderer.render(&question.message, &context)?;
        let validator = match &question.validate {
            Some(validation) => Some(AnswerValidator::compile(&question.name, validation)?),
            None => None,
        };

        match question.kind {
            QuestionKind::Confirm => {
                let default = question.default.as_ref().and_then(|d| d.as_bool()).unwrap_or(false);
                if let Some(value) = self.preloaded.get(&question.name) {
                    return match value {
                        serde_json::Value::Bool(flag) => Ok(AnswerValue::Flag(*flag)),
                        other => Err(Error::ValidationError(format!(
                            "'{}' expects true or false, got {other}",
                            question.name
                        ))),
                    };
                }
                match self.mode {
                    AnswerMode::Defaults => Ok(AnswerValue::Flag(default)),
                    AnswerMode::Interactive => {
                        Ok(AnswerValue::Flag(self.prompter.confirm(&message, default)?))
                    }
                }
            }
            QuestionKind::Input => {
                let default = self.text_default(question, &context)?;
                if let Some(value) = self.preloaded.get(&question.name) {
                    let raw = match value {
                        serde_json::Value::String(s) => s.clone(),
                        serde_json::Value::Number(n) => n.to_string(),
                        other => {
                            return Err(Error::ValidationError(format!(
                                "'{}' expects text, got {other}",
                                question.name
                            )))
                        }
                    };
                    return self.accept(question, validator.as_ref(), &raw);
                }
                match self.mode {
                    AnswerMode::Defaults => {
                        self.accept(question, validator.as_ref(), default.as_deref().unwrap_or(""))
                    }
                    AnswerMode::Interactive => loop {
                        let raw = self.prompter.input(&message, default.as_deref())?;
                        let raw = match (raw.is_empty(), &default) {
                            (true, Some(default)) => default.clone(),
                            _ => raw,
                        };
                        match self.accept(question, validator.as_ref(), &raw) {
                            Err(Error::ValidationError(reason)) => {
                                warn!("Rejected answer for '{}': {reason}", question.name);
                                self.prompter.report_invalid(&reason);
                            }
                            result => break result,
                        }
                    },
                }
            }
        }
    }

    fn text_default(&self, question: &Question, context: &serde_json::Value) -> Result<Option<String>> {
        match &question.default {
            Some(serde_json::Value::String(template)) => {
                Ok(Some(self.renderer.render(template, context)?))
            }
            Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
            _ => Ok(None),
        }
    }

    /// Validates `raw`, applies the transform and checks the final value.
    fn accept(
        &self,
        question: &Question,
        validator: Option<&AnswerValidator>,
        raw: &str,
    ) -> Result<AnswerValue> {
        if let Some(validator) = validator {
            validator.check(&question.name, raw)?;
        }
        let value = question.transform().apply(raw);
        if validator.is_some_and(|v| v.required) && value.is_empty() {
            return Err(Error::ValidationError(format!(
                "'{}' is empty after applying {:?}",
                question.name,
                question.transform()
            )));
        }
        if let Some(token) = self.reserved_tokens.iter().find(|t| value.contains(t.as_str())) {
            return Err(Error::ValidationError(format!(
                "'{}' cannot contain the placeholder {token}",
                question.name
            )));
        }
        Ok(AnswerValue::Text(value))
    }
}

/// Reads a JSON object of preloaded answers from stdin.
///
/// Empty input means no preloaded answers.
///
/// # Errors
/// * `Error::ConfigError` if the input is not a JSON object
pub fn load_from_stdin() -> Result<IndexMap<String, serde_json::Value>> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer)?;
    parse_preloaded_answers(&buffer)
}

pub fn parse_preloaded_answers(content: &str) -> Result<IndexMap<String, serde_json::Value>> {
    let content = content.trim();
    if content.is_empty() {
        return Ok(IndexMap::new());
    }
    serde_json::from_str(content)
        .map_err(|e| Error::ConfigError(format!("Failed to parse answers as a JSON object: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validation(required: bool, pattern: Option<&str>) -> Validation {
        Validation { required, pattern: pattern.map(String::from), ..Default::default() }
    }

    #[test]
    fn test_validator_required() {
        let validator = AnswerValidator::compile("name", &validation(true, None)).unwrap();
        assert!(validator.check("name", "Accessly").is_ok());
        assert!(matches!(validator.check("name", "  "), Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_validator_pattern_and_message() {
        let rules = Validation {
            message: Some("Use semantic versioning.".into()),
            ..validation(false, Some(r"^\d+\.\d+\.\d+$"))
        };
        let validator = AnswerValidator::compile("pluginVersion", &rules).unwrap();
        assert!(validator.check("pluginVersion", "1.2.3").is_ok());
        match validator.check("pluginVersion", "v1") {
            Err(Error::ValidationError(msg)) => assert_eq!(msg, "Use semantic versioning."),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_validator_schema() {
        let rules = Validation {
            schema: Some(json!({"type": "string", "maxLength": 5})),
            ..Default::default()
        };
        let validator = AnswerValidator::compile("short", &rules).unwrap();
        assert!(validator.check("short", "abc").is_ok());
        assert!(validator.check("short", "abcdef").is_err());
    }

    #[test]
    fn test_answer_set_context() {
        let mut answers = AnswerSet::new();
        answers.insert("name", AnswerValue::Text("Accessly".into()));
        answers.insert("enableUtils", AnswerValue::Flag(true));
        assert_eq!(answers.to_context(), json!({"name": "Accessly", "enableUtils": true}));
        assert_eq!(answers.text("name"), Some("Accessly"));
        assert_eq!(answers.flag("enableUtils"), Some(true));
        assert_eq!(answers.flag("name"), None);
    }

    #[test]
    fn test_parse_preloaded_answers() {
        assert!(parse_preloaded_answers("").unwrap().is_empty());
        let parsed = parse_preloaded_answers(r#"{"name": "x", "enableUtils": true}"#).unwrap();
        assert_eq!(parsed.get("name"), Some(&json!("x")));
        assert!(parse_preloaded_answers("[1, 2]").is_err());
        assert!(parse_preloaded_answers(r#"{"name": "#).is_err());
    }
}
