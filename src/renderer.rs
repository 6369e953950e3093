//! Template rendering for forge.
//! Wraps MiniJinja behind [`TemplateRenderer`] so the planner and hook runner
//! only ever see "render this string against this context".
use crate::error::{Error, Result};
use cruet::Inflector;
use indexmap::IndexMap;
use minijinja::{Environment, UndefinedBehavior};

/// Resolved variable values used during rendering, in resolution order.
pub type Context = IndexMap<String, String>;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Variables for interpolation and conditionals
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    ///
    /// # Errors
    /// Fails when the template is malformed or references a variable that is
    /// not present in `context`.
    fn render(&self, template: &str, context: &Context) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
}

impl MiniJinjaRenderer {
    /// Creates a renderer with strict undefined handling and the case filters.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        env.add_filter("snake_case", |value: String| value.to_snake_case());
        env.add_filter("kebab_case", |value: String| value.to_kebab_case());
        env.add_filter("camel_case", |value: String| value.to_camel_case());
        env.add_filter("pascal_case", |value: String| value.to_pascal_case());
        env.add_filter("screaming_snake_case", |value: String| {
            value.to_screaming_snake_case()
        });
        env.add_filter("title_case", |value: String| value.to_title_case());

        Self { env }
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &Context) -> Result<String> {
        self.env.render_str(template, context).map_err(Error::MinijinjaError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(pairs: &[(&str, &str)]) -> Context {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_render_interpolates() {
        let renderer = MiniJinjaRenderer::new();
        let result = renderer
            .render("Hello {{ name }}!", &context(&[("name", "forge")]))
            .unwrap();
        assert_eq!(result, "Hello forge!");
    }

    #[test]
    fn test_render_fails_on_undefined_variable() {
        let renderer = MiniJinjaRenderer::new();
        let result = renderer.render("Hello {{ missing }}!", &context(&[]));
        assert!(matches!(result, Err(Error::MinijinjaError(_))));
    }

    #[test]
    fn test_render_keeps_trailing_newline() {
        let renderer = MiniJinjaRenderer::new();
        let result = renderer.render("{{ a }}\n", &context(&[("a", "x")])).unwrap();
        assert_eq!(result, "x\n");
    }

    #[test]
    fn test_render_conditionals() {
        let renderer = MiniJinjaRenderer::new();
        let template = "{% if license == 'MIT' %}mit{% else %}other{% endif %}";
        assert_eq!(renderer.render(template, &context(&[("license", "MIT")])).unwrap(), "mit");
        assert_eq!(renderer.render(template, &context(&[("license", "BSD")])).unwrap(), "other");
    }

    #[test]
    fn test_case_filters() {
        let renderer = MiniJinjaRenderer::new();
        let ctx = context(&[("name", "My Cool Tool")]);
        assert_eq!(renderer.render("{{ name | snake_case }}", &ctx).unwrap(), "my_cool_tool");
        assert_eq!(renderer.render("{{ name | kebab_case }}", &ctx).unwrap(), "my-cool-tool");
        assert_eq!(renderer.render("{{ name | pascal_case }}", &ctx).unwrap(), "MyCoolTool");
    }
}
