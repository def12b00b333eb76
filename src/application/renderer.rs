//! Template rendering for exported records.
//!
//! Templates use Jinja syntax (`{{ conversation_id }}`,
//! `{% for m in messages %}`). Each template file is compiled once per run
//! and executed once per result page.

use std::io::Write;
use std::path::Path;

use minijinja::Environment;
use serde::Serialize;

use crate::domain::{AppError, Result};

/// A compiled user template.
pub struct TemplateRenderer {
    env: Environment<'static>,
    name: String,
}

impl TemplateRenderer {
    /// Read and compile a template file.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or does not compile.
    pub fn from_file(name: &str, path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path).map_err(|e| {
            AppError::io(format!("Failed to read template file {}", path.display()), e)
        })?;
        tracing::debug!(template = %name, path = %path.display(), "Template loaded");
        Self::from_source(name, source)
    }

    /// Compile a template from a string.
    ///
    /// # Errors
    /// Returns error if the source does not compile.
    pub fn from_source(name: &str, source: String) -> Result<Self> {
        let mut env = Environment::new();
        env.set_keep_trailing_newline(true);
        env.add_template_owned(name.to_string(), source)
            .map_err(|e| AppError::template("Failed to parse template", e))?;

        Ok(Self {
            env,
            name: name.to_string(),
        })
    }

    /// Execute the template against `context`, writing to `out`.
    ///
    /// # Errors
    /// Returns error if rendering or writing fails.
    pub fn render_to<S: Serialize, W: Write + ?Sized>(&self, context: &S, out: &mut W) -> Result<()> {
        let template = self
            .env
            .get_template(&self.name)
            .map_err(|e| AppError::template("Template missing", e))?;

        template
            .render_to_write(context, &mut *out)
            .map_err(|e| AppError::template("Failed to render template", e))?;

        out.flush()
            .map_err(|e| AppError::io("Failed to flush output", e))
    }
}
