//! Rendering of question defaults and messages.
//! A default such as `"{{ name }}"` is a function of the answers given so far;
//! it is rendered with MiniJinja against the current answer context.
use crate::error::Result;
use crate::transform::Transform;
use minijinja::Environment;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with the answer transforms registered as filters,
    /// so `{{ name | pascal_case }}` works inside defaults.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.add_filter("slugify", |value: String| Transform::Slugify.apply(&value));
        env.add_filter("pascal_case", |value: String| Transform::PascalCase.apply(&value));
        env.add_filter("snake_case", |value: String| Transform::SnakeCase.apply(&value));
        env.add_filter("constant_case", |value: String| {
            Transform::ConstantCase.apply(&value)
        });
        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    /// # Errors
    /// * `Error::MinijinjaError` if the template does not parse or render
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        Ok(self.env.render_str(template, context)?)
    }
}
