//! Prompt block rendering.

use minijinja::Environment;

use super::domain::AssistantContext;

const CONTEXT_TEMPLATE: &str = r"## Database context
{% if connected -%}
Connected project: {{ project_url }}
{% if stats -%}
Tables: {{ stats.table_count }}{% if stats.database_size %} | Database size: {{ stats.database_size }}{% endif %}
{% endif -%}
{% if tables -%}
Schema (public):
{% for table in tables -%}
- {{ table.table }}{% if table.columns %}: {% for column in table.columns %}{{ column.name }} {{ column.data_type }}{% if not column.is_nullable %} not null{% endif %}{% if column.default_value %} default {{ column.default_value }}{% endif %}{% if not loop.last %}, {% endif %}{% endfor %}{% endif %}
{% endfor -%}
{% else -%}
The database has no tables yet.
{% endif -%}
{% if notes -%}
Notes: {{ notes }}
{% endif -%}
{% else -%}
No database is connected. Ask the user to connect an existing project or create a new one before using database actions.
{% endif -%}
";

/// Renders [`AssistantContext`] into the prompt block.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextBuilder;

impl ContextBuilder {
    /// Renders the natural-language context block.
    ///
    /// # Errors
    ///
    /// Returns the template engine's error when rendering fails.
    pub fn render(self, context: &AssistantContext) -> Result<String, minijinja::Error> {
        Environment::new().render_str(CONTEXT_TEMPLATE, context)
    }

    /// Renders the context block followed by the action instructions.
    ///
    /// # Errors
    ///
    /// Returns the template engine's error when rendering fails.
    pub fn render_with_instructions(
        self,
        context: &AssistantContext,
    ) -> Result<String, minijinja::Error> {
        let block = self.render(context)?;
        Ok(format!("{block}\n{}", super::domain::ACTION_INSTRUCTIONS))
    }
}
