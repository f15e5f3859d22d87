//! Output formatting for CLI

use serde::Serialize;

/// Output format options
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

/// Pretty-printed JSON for any serializable report
pub fn to_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert!(matches!(OutputFormat::from("json"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from("JSON"), OutputFormat::Json));
        assert!(matches!(OutputFormat::from("text"), OutputFormat::Text));
        assert!(matches!(OutputFormat::from("table"), OutputFormat::Text));
    }
}
