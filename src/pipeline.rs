//! Generation pipeline.
//! Drives a single generation through its stages:
//! `Idle → Prompting → Resolving → Substituting → Emitting → Done`,
//! with `Failed` reachable from every stage that is not terminal.

use crate::answers::{AnswerMode, AnswerSet, QuestionRunner};
use crate::config::TemplateConfig;
use crate::emitter::{check_destination, ProjectEmitter};
use crate::error::{Error, Result};
use crate::patterns::normalize_pattern;
use crate::prompt::Prompter;
use crate::renderer::TemplateRenderer;
use crate::resolver::FileSetResolver;
use crate::substitute::{PlaceholderMap, Substitutor, TransformedFile};
use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};

/// Stage of a generation. Stages only ever move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Idle,
    Prompting,
    Resolving,
    Substituting,
    Emitting,
    Done,
    Failed,
}

impl Stage {
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

/// Options for a single run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub mode: AnswerMode,
    pub preloaded: IndexMap<String, serde_json::Value>,
    /// Stop after substitution without writing anything
    pub dry_run: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self { mode: AnswerMode::Interactive, preloaded: IndexMap::new(), dry_run: false }
    }
}

/// What a finished generation produced.
#[derive(Debug)]
pub struct Outcome {
    pub answers: AnswerSet,
    pub files: Vec<TransformedFile>,
    pub replacements: IndexMap<String, usize>,
    /// Absolute paths written; empty for a dry run
    pub written: Vec<PathBuf>,
}

impl Outcome {
    /// Output paths relative to the output root, in generation order.
    pub fn targets(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.target.as_path())
    }
}

/// One generation of a plugin from a template.
pub struct Generator<'a> {
    config: &'a TemplateConfig,
    template_root: PathBuf,
    output_root: PathBuf,
    prompter: &'a dyn Prompter,
    renderer: &'a dyn TemplateRenderer,
    stage: Stage,
}

impl<'a> Generator<'a> {
    pub fn new<T: Into<PathBuf>, O: Into<PathBuf>>(
        config: &'a TemplateConfig,
        template_root: T,
        output_root: O,
        prompter: &'a dyn Prompter,
        renderer: &'a dyn TemplateRenderer,
    ) -> Self {
        Self {
            config,
            template_root: template_root.into(),
            output_root: output_root.into(),
            prompter,
            renderer,
            stage: Stage::Idle,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    fn enter(&mut self, next: Stage) {
        debug_assert!(!self.stage.is_terminal() && next > self.stage);
        debug!("Stage {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    /// Runs the whole pipeline once.
    ///
    /// # Errors
    /// Any error of a stage; the generator is then `Failed` and nothing is
    /// left in the output directory.
    pub fn run(&mut self, options: GenerateOptions) -> Result<Outcome> {
        if self.stage != Stage::Idle {
            return Err(Error::ConfigError(format!(
                "generator already ran (stage {:?})",
                self.stage
            )));
        }
        match self.execute(options) {
            Ok(outcome) => {
                self.enter(Stage::Done);
                Ok(outcome)
            }
            Err(err) => {
                debug!("Generation failed in stage {:?}: {err}", self.stage);
                self.enter(Stage::Failed);
                Err(err)
            }
        }
    }

    fn execute(&mut self, options: GenerateOptions) -> Result<Outcome> {
        check_destination(&self.output_root)?;
        if !self.template_root.is_dir() {
            return Err(Error::ConfigError(format!(
                "template directory '{}' does not exist",
                self.template_root.display()
            )));
        }

        self.enter(Stage::Prompting);
        let answers = QuestionRunner::new(self.prompter, self.renderer, options.mode)
            .with_preloaded(options.preloaded)
            .with_reserved_tokens(self.config.placeholder_tokens())
            .run(self.config.questions())?;

        self.enter(Stage::Resolving);
        let resolved =
            FileSetResolver::new(&self.config.copy_files)?.resolve(&self.template_root, &answers)?;
        if let Some(main_file) = &self.config.main_file_name {
            if !resolved.contains(normalize_pattern(main_file)) {
                return Err(Error::ConfigError(format!(
                    "main file '{main_file}' is not part of the copied files"
                )));
            }
        }
        debug!("Resolved {} template files", resolved.len());

        self.enter(Stage::Substituting);
        let placeholders = PlaceholderMap::from_answers(self.config.questions(), &answers)?;
        let mut substitutor = Substitutor::new(&placeholders, &self.config.copy_files);
        if let (Some(source), Some(target)) =
            (&self.config.main_file_name, &self.config.main_file_target)
        {
            substitutor = substitutor.with_main_file(source, target);
        }
        let substitution = substitutor.substitute(&self.template_root, &resolved)?;

        if options.dry_run {
            return Ok(Outcome {
                answers,
                files: substitution.files,
                replacements: substitution.replacements,
                written: Vec::new(),
            });
        }

        self.enter(Stage::Emitting);
        let written = ProjectEmitter::new(&self.output_root).emit(&substitution.files)?;

        Ok(Outcome {
            answers,
            files: substitution.files,
            replacements: substitution.replacements,
            written,
        })
    }
}
