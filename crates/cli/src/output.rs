//! Output rendering for reconciled variable views.

use anyhow::Result;
use stackenv_core::Variable;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl OutputFormat {
    /// Parse from string.
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => anyhow::bail!("Invalid output format: {}. Valid options: table, json", s),
        }
    }
}

/// Renders a variable list. Secrets arrive already masked from the view;
/// this function only lays them out.
pub fn render_variables(variables: &[Variable], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(variables)?),
        OutputFormat::Table => Ok(render_table(variables)),
    }
}

fn render_table(variables: &[Variable]) -> String {
    if variables.is_empty() {
        return "No variables.".to_string();
    }

    let key_width = variables
        .iter()
        .map(|v| v.key.len())
        .chain(std::iter::once("KEY".len()))
        .max()
        .unwrap_or(0);

    let mut out = format!("{:<key_width$}  {:<6}  VALUE\n", "KEY", "SECRET");
    for var in variables {
        let secret = if var.is_secret { "yes" } else { "no" };
        out.push_str(&format!(
            "{:<key_width$}  {:<6}  {}\n",
            var.key, secret, var.value
        ));
    }
    out
}
