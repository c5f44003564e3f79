//! Summary response parsing
//!
//! The summary request asks for a JSON object, but models often wrap it in
//! prose or a code fence, or ignore the format entirely. Parsing yields
//! either the structured object or a line-based extraction.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::domain::SummarySource;

/// Leading bullet marker plus following whitespace
static BULLET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[-•]\s*").expect("valid bullet regex"));

/// Code-fenced block, optionally tagged json
static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(?:json)?\s*(\{.*?\})\s*```").expect("valid fence regex"));

/// Loose shape of the requested object
#[derive(Debug, Deserialize)]
struct StructuredSummary {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    recommendations: Value,
}

/// Flatten one recommendation item to text; `None` drops it
fn recommendation_text(item: &Value) -> Option<String> {
    let text = match item {
        Value::Null => return None,
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => {
            let parts: Vec<&str> = map.values().filter_map(Value::as_str).map(str::trim).collect();
            if parts.is_empty() {
                item.to_string()
            } else {
                parts.join(" - ")
            }
        }
        other => other.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

fn recommendation_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(recommendation_text).collect(),
        other => recommendation_text(other).into_iter().collect(),
    }
}

/// Outcome of parsing a summary response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryExtraction {
    /// The response contained the requested JSON object
    Structured {
        summary: String,
        recommendations: Vec<String>,
    },
    /// Fallback: first line plus bullet lines
    Extracted {
        summary: String,
        recommendations: Vec<String>,
    },
}

impl SummaryExtraction {
    pub fn source(&self) -> SummarySource {
        match self {
            Self::Structured { .. } => SummarySource::Structured,
            Self::Extracted { .. } => SummarySource::Extracted,
        }
    }

    /// Split into (summary, recommendations)
    pub fn into_parts(self) -> (String, Vec<String>) {
        match self {
            Self::Structured {
                summary,
                recommendations,
            }
            | Self::Extracted {
                summary,
                recommendations,
            } => (summary, recommendations),
        }
    }
}

fn try_structured(candidate: &str) -> Option<StructuredSummary> {
    // serde would also accept a JSON array as a struct; only objects count
    match serde_json::from_str::<Value>(candidate.trim()).ok()? {
        value @ Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

/// Line-based fallback extraction
///
/// The summary is the first line (trimmed). Every line whose trimmed form
/// starts with `-` or `•` becomes a recommendation with the marker and the
/// whitespace after it removed; empty items are dropped.
pub fn extract_fallback(text: &str) -> (String, Vec<String>) {
    let summary = text.lines().next().unwrap_or("").trim().to_string();
    let recommendations = text
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('-') || line.starts_with('•'))
        .map(|line| BULLET.replace(line, "").trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();
    (summary, recommendations)
}

/// Parse a summary response
///
/// Tries, in order: the whole text as JSON, a fenced JSON block, the span
/// from the first `{` to the last `}`. Falls back to [`extract_fallback`].
pub fn parse_summary(text: &str) -> SummaryExtraction {
    debug!(len = text.len(), "parse_summary: called");

    let fenced = FENCED.captures(text).and_then(|c| c.get(1)).map(|m| m.as_str());
    let braced = match (text.find('{'), text.rfind('}')) {
        (Some(start), Some(end)) if start < end => Some(&text[start..=end]),
        _ => None,
    };

    let parsed = try_structured(text)
        .or_else(|| fenced.and_then(try_structured))
        .or_else(|| braced.and_then(try_structured));

    match parsed {
        Some(s) => SummaryExtraction::Structured {
            summary: s.summary.as_deref().unwrap_or_default().trim().to_string(),
            recommendations: recommendation_list(&s.recommendations),
        },
        None => {
            warn!("parse_summary: response is not a JSON summary, using line extraction");
            let (summary, recommendations) = extract_fallback(text);
            SummaryExtraction::Extracted {
                summary,
                recommendations,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_json() {
        let text = r#"{"summary": "Site is on track.", "recommendations": ["Fly weekly", "Check fences"]}"#;
        let parsed = parse_summary(text);
        assert_eq!(parsed.source(), SummarySource::Structured);
        assert_eq!(
            parsed.into_parts(),
            (
                "Site is on track.".to_string(),
                vec!["Fly weekly".to_string(), "Check fences".to_string()]
            )
        );
    }

    #[test]
    fn test_fenced_json_with_prose() {
        let text = "Here is the JSON you asked for:\n```json\n{\"summary\": \"Good.\", \"recommendations\": [\"A\"]}\n```\nThanks!";
        let parsed = parse_summary(text);
        assert_eq!(
            parsed,
            SummaryExtraction::Structured {
                summary: "Good.".to_string(),
                recommendations: vec!["A".to_string()],
            }
        );
    }

    #[test]
    fn test_braced_json_inside_prose() {
        let text = "Sure! {\"summary\": \"Fine.\", \"recommendations\": []} Hope that helps.";
        assert_eq!(parse_summary(text).source(), SummarySource::Structured);
    }

    #[test]
    fn test_json_with_missing_fields_is_structured() {
        let parsed = parse_summary(r#"{"summary": "Only a summary"}"#);
        assert_eq!(
            parsed,
            SummaryExtraction::Structured {
                summary: "Only a summary".to_string(),
                recommendations: vec![],
            }
        );
    }

    #[test]
    fn test_null_summary_stays_structured() {
        let parsed = parse_summary("{\n  \"summary\": null,\n  \"recommendations\": [\"Fly weekly\"]\n}");
        assert_eq!(
            parsed,
            SummaryExtraction::Structured {
                summary: String::new(),
                recommendations: vec!["Fly weekly".to_string()],
            }
        );
    }

    #[test]
    fn test_object_recommendations_are_flattened() {
        let text = "{\n \"summary\": \"Site on track.\",\n \"recommendations\": [{\"title\": \"Fly weekly\"}, \"Check fences\", null, 3]\n}";
        let parsed = parse_summary(text);
        assert_eq!(
            parsed,
            SummaryExtraction::Structured {
                summary: "Site on track.".to_string(),
                recommendations: vec!["Fly weekly".to_string(), "Check fences".to_string(), "3".to_string()],
            }
        );
    }

    #[test]
    fn test_single_string_recommendation() {
        let (_, recs) = parse_summary(r#"{"summary": "Ok.", "recommendations": "Fly weekly"}"#).into_parts();
        assert_eq!(recs, vec!["Fly weekly"]);
    }

    #[test]
    fn test_fallback_extraction() {
        let text = "The site is progressing well.\n\nRecommendations:\n- Continue weekly flights\n  • Re-mark safety boundary\n-\n* not a bullet\n";
        let parsed = parse_summary(text);
        assert_eq!(parsed.source(), SummarySource::Extracted);
        let (summary, recs) = parsed.into_parts();
        assert_eq!(summary, "The site is progressing well.");
        assert_eq!(recs, vec!["Continue weekly flights", "Re-mark safety boundary"]);
    }

    #[test]
    fn test_fallback_empty_text() {
        assert_eq!(extract_fallback(""), (String::new(), vec![]));
    }

    #[test]
    fn test_json_array_is_not_structured() {
        let parsed = parse_summary(r#"["a", "b"]"#);
        assert_eq!(parsed.source(), SummarySource::Extracted);
    }

    proptest! {
        #[test]
        fn prop_fallback_items_are_trimmed_and_non_empty(text in "(?s).{0,200}") {
            let (_, recs) = extract_fallback(&text);
            for item in recs {
                prop_assert!(!item.is_empty());
                prop_assert_eq!(item.trim(), item.as_str());
            }
        }

        #[test]
        fn prop_bullet_lines_survive(items in proptest::collection::vec("[a-zA-Z][a-zA-Z ]{0,20}[a-zA-Z]", 0..6)) {
            let text = std::iter::once("Summary line".to_string())
                .chain(items.iter().map(|i| format!("- {}", i)))
                .collect::<Vec<_>>()
                .join("\n");
            let (summary, recs) = extract_fallback(&text);
            prop_assert_eq!(summary, "Summary line");
            prop_assert_eq!(recs, items);
        }
    }
}
