#![allow(dead_code)]

use indexmap::IndexMap;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use wpscaffold::error::{Error, Result};
use wpscaffold::prompt::Prompter;

pub const TOKENS: [&str; 9] = [
    "__NAME__",
    "__SLUG__",
    "__NAMESPACE__",
    "__TEXT_DOMAIN__",
    "__AUTHOR__",
    "__VERSION__",
    "__DESCRIPTION__",
    "__PLUGIN_URL__",
    "__AUTHOR_URL__",
];

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

pub fn template_dir() -> PathBuf {
    fixture("accessly")
}

/// Preloaded answers for the accessly fixture.
pub fn answers(name: &str, functional: bool, utils: bool, settings: bool) -> IndexMap<String, serde_json::Value> {
    IndexMap::from([
        ("name".to_string(), serde_json::json!(name)),
        ("enableFunctional".to_string(), serde_json::json!(functional)),
        ("enableUtils".to_string(), serde_json::json!(utils)),
        ("enableSettings".to_string(), serde_json::json!(settings)),
    ])
}

/// Relative `/`-separated paths of every file below `root`, sorted.
pub fn list_files(root: &Path) -> Vec<String> {
    let mut files: Vec<String> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            e.path()
                .strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect();
    files.sort();
    files
}

/// Prompter answering from a script. Running out of answers acts like the
/// user pressing Ctrl-C.
#[derive(Default)]
pub struct ScriptedPrompter {
    inputs: RefCell<VecDeque<String>>,
    confirms: RefCell<VecDeque<bool>>,
    pub messages: RefCell<Vec<String>>,
    pub rejections: RefCell<Vec<String>>,
    pub asked: Cell<usize>,
}

impl ScriptedPrompter {
    pub fn new(inputs: &[&str], confirms: &[bool]) -> Self {
        Self {
            inputs: RefCell::new(inputs.iter().map(|s| s.to_string()).collect()),
            confirms: RefCell::new(confirms.iter().copied().collect()),
            ..Default::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        self.asked.set(self.asked.get() + 1);
        self.messages.borrow_mut().push(message.to_string());
        let answer = self.inputs.borrow_mut().pop_front().ok_or(Error::Cancelled)?;
        match (answer.is_empty(), default) {
            (true, Some(default)) => Ok(default.to_string()),
            _ => Ok(answer),
        }
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.asked.set(self.asked.get() + 1);
        self.messages.borrow_mut().push(message.to_string());
        self.confirms.borrow_mut().pop_front().ok_or(Error::Cancelled)
    }

    fn report_invalid(&self, reason: &str) {
        self.rejections.borrow_mut().push(reason.to_string());
    }
}
