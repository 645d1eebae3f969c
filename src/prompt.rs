//! User interaction.
//! The question runner only talks to the [`Prompter`] trait; the terminal
//! implementation is backed by dialoguer.

use crate::error::{Error, Result};
use dialoguer::{Confirm, Input};
use std::io;

/// Source of interactive answers.
pub trait Prompter {
    /// Asks for free text. An empty entry yields `default` when one is given.
    fn input(&self, message: &str, default: Option<&str>) -> Result<String>;

    /// Asks a yes/no question.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Tells the user why the previous answer was rejected.
    fn report_invalid(&self, reason: &str);
}

/// Terminal prompter.
#[derive(Default)]
pub struct DialoguerPrompter;

impl DialoguerPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn interaction_error(err: dialoguer::Error) -> Error {
    let err = io::Error::from(err);
    match err.kind() {
        io::ErrorKind::Interrupted | io::ErrorKind::UnexpectedEof => Error::Cancelled,
        _ => Error::IoError(err),
    }
}

impl Prompter for DialoguerPrompter {
    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::new().with_prompt(message).allow_empty(true);
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            input = input.default(default.to_string());
        }
        input.interact_text().map_err(interaction_error)
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::new()
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(interaction_error)
    }

    fn report_invalid(&self, reason: &str) {
        eprintln!("{reason}");
    }
}
