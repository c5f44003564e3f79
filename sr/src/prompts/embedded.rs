//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// System role instruction for every request
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Full-report request
pub const REPORT: &str = include_str!("../../prompts/report.pmt");

/// Summary/recommendations request
pub const SUMMARY: &str = include_str!("../../prompts/summary.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "system" => Some(SYSTEM),
        "report" => Some(REPORT),
        "summary" => Some(SUMMARY),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_embedded_system() {
        let system = get_embedded("system").unwrap();
        assert!(system.starts_with("You are an expert drone surveying and construction site analyst."));
    }

    #[test]
    fn test_get_embedded_report() {
        let report = get_embedded("report").unwrap();
        assert!(report.contains("{{plan_name}}"));
        assert!(report.contains("{{plan_id}}"));
        assert!(report.contains("{{data_summary}}"));
        assert!(report.contains("{{structure}}"));
    }

    #[test]
    fn test_get_embedded_summary() {
        let summary = get_embedded("summary").unwrap();
        assert!(summary.contains("\"summary\""));
        assert!(summary.contains("\"recommendations\""));
        assert!(summary.contains("{{report}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
