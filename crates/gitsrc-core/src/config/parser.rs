//! TOML parser with helpful error messages

use super::schema::FetchConfig;
use anyhow::{Context, Result};
use std::path::Path;

/// Parse gitsrc.toml with detailed error messages
pub fn parse_fetch_toml(path: &Path) -> Result<FetchConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_fetch_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse gitsrc.toml content from string
pub fn parse_fetch_toml_str(content: &str) -> Result<FetchConfig> {
    let config: FetchConfig =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;
    config.validate()?;
    Ok(config)
}

/// Serialize a configuration to TOML string
pub fn to_toml(config: &FetchConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration to TOML")
}

/// Point at the offending line when the error carries a span
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let message = error.message().to_string();
    match error.span() {
        Some(span) => {
            let prefix = content.get(..span.start).unwrap_or(content);
            let line_num = prefix.matches('\n').count() + 1;
            anyhow::anyhow!(
                "TOML parsing error at line {}:\n{}\n\nError: {}",
                line_num,
                line_context(content, line_num),
                message
            )
        }
        None => anyhow::anyhow!("TOML parsing error: {}", message),
    }
}

fn line_context(content: &str, line_num: usize) -> String {
    let lines: Vec<&str> = content.lines().collect();
    let start = line_num.saturating_sub(2);
    let end = (line_num + 1).min(lines.len());

    (start..end)
        .map(|idx| {
            let num = idx + 1;
            let marker = if num == line_num { ">>>" } else { "   " };
            format!("{} {:4} | {}", marker, num, lines[idx])
        })
        .collect::<Vec<_>>()
        .join("\n")
}
