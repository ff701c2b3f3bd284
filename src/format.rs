use anyhow::{bail, Result};
use serde::Serialize;
use std::str::FromStr;

/// Output format for structured data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text with [OK]/[WARN]/[FAIL] markers
    #[default]
    Text,
    /// JSON - machine-parseable
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{}'. Use: text or json", s),
        }
    }
}

impl OutputFormat {
    /// Resolve an optional CLI choice to a concrete format.
    pub fn resolve(choice: Option<Self>) -> Self {
        choice.unwrap_or_default()
    }

    /// Serialize data to the requested format
    pub fn serialize<T: Serialize>(self, data: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(data)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {}", e)),
            Self::Text => {
                // Text format shouldn't use this path - caller should return raw text
                bail!("Text format should not use serialize()")
            }
        }
    }
}
