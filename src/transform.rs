//! Answer transforms applied after validation and before an answer is stored.

use cruet::Inflector;
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

static SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\p{Alphabetic}\p{Nd}]+").unwrap());

/// Transform applied to the raw text of an `input` answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Transform {
    #[default]
    None,
    Slugify,
    #[serde(alias = "pascal")]
    PascalCase,
    SnakeCase,
    ConstantCase,
}

impl Transform {
    pub fn apply(self, value: &str) -> String {
        match self {
            Transform::None => value.to_string(),
            Transform::Slugify => slugify(value),
            Transform::PascalCase => pascal_case(value),
            Transform::SnakeCase => value.to_snake_case(),
            Transform::ConstantCase => value.to_screaming_snake_case(),
        }
    }
}

/// Lowercases `value` and collapses every run of characters that are neither
/// letters nor decimal digits into a single hyphen. Leading and trailing
/// hyphens are dropped. Non-ASCII letters are kept, so `"Café"` becomes
/// `"café"`.
pub fn slugify(value: &str) -> String {
    let lowered = value.to_lowercase();
    SEPARATORS.replace_all(&lowered, "-").trim_matches('-').to_string()
}

/// Splits `value` on non-alphanumeric characters and concatenates the
/// segments with their first letter uppercased. The rest of each segment
/// keeps its casing, so `"wp REST api"` becomes `"WpRESTApi"`.
pub fn pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}
