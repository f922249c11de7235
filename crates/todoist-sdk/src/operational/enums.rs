//! Enum parsing for output formats and enumerated argument values.

use std::fmt;
use std::str::FromStr;

use todoist_client::{DurationUnit, ViewStyle};

/// Shape of successful tool results, chosen once at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Lossless pretty-printed JSON of every entity field.
    #[default]
    Json,
    /// Human-readable summary lines.
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "text" => Ok(Self::Text),
            _ => Err(format!(
                "Unknown output format '{}'. Valid values: json, text",
                s
            )),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Text => "text",
        })
    }
}

/// Parse a project view style.
///
/// Accepts: "list", "board", "calendar" (case-insensitive).
pub fn parse_view_style(s: &str) -> Result<ViewStyle, String> {
    match s.trim().to_lowercase().as_str() {
        "list" => Ok(ViewStyle::List),
        "board" => Ok(ViewStyle::Board),
        "calendar" => Ok(ViewStyle::Calendar),
        _ => Err(format!(
            "Unknown view style '{}'. Valid values: list, board, calendar",
            s
        )),
    }
}

/// Parse a task duration unit.
///
/// Accepts: "minute", "day" (case-insensitive).
pub fn parse_duration_unit(s: &str) -> Result<DurationUnit, String> {
    match s.trim().to_lowercase().as_str() {
        "minute" => Ok(DurationUnit::Minute),
        "day" => Ok(DurationUnit::Day),
        _ => Err(format!(
            "Unknown duration unit '{}'. Valid values: minute, day",
            s
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_round_trip() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("TEXT".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::Text.to_string(), "text");
        assert_eq!(OutputFormat::default(), OutputFormat::Json);
    }

    #[test]
    fn test_output_format_invalid() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.contains("Unknown output format 'yaml'"));
    }

    #[test]
    fn test_parse_view_style() {
        assert_eq!(parse_view_style("board").unwrap(), ViewStyle::Board);
        assert_eq!(parse_view_style("Calendar").unwrap(), ViewStyle::Calendar);
        assert!(parse_view_style("kanban")
            .unwrap_err()
            .contains("Unknown view style"));
    }

    #[test]
    fn test_parse_duration_unit() {
        assert_eq!(parse_duration_unit("minute").unwrap(), DurationUnit::Minute);
        assert_eq!(parse_duration_unit("DAY").unwrap(), DurationUnit::Day);
        assert!(parse_duration_unit("hour").is_err());
    }
}
