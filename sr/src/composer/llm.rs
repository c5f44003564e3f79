//! Network report composer

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::{
    ComposeError, ReportComposer, compose_prompt, missing_sections, parse_summary, report_structure,
};
use crate::config::LlmConfig;
use crate::domain::{Category, GeneratedReport, PlanDataBundle, ReportMode};
use crate::llm::{CompletionRequest, EMPTY_RESPONSE_TEXT, LlmClient, StopReason};
use crate::prompts::{PromptLoader, ReportPromptContext, SummaryPromptContext};

/// [`ReportComposer`] backed by an [`LlmClient`]
///
/// Issues two requests: the full report, then a summary of that report.
pub struct LlmReportComposer {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    temperature: f32,
}

impl LlmReportComposer {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, config: &LlmConfig) -> Self {
        debug!(max_tokens = %config.max_tokens, temperature = %config.temperature, "LlmReportComposer::new: called");
        Self {
            client,
            prompts,
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    fn request(&self, system: &str, prompt: String) -> CompletionRequest {
        CompletionRequest::single(system, prompt, self.max_tokens, self.temperature)
    }
}

fn template_error(e: eyre::Report) -> ComposeError {
    ComposeError::Template(e.to_string())
}

#[async_trait]
impl ReportComposer for LlmReportComposer {
    async fn generate_report(
        &self,
        plan_name: &str,
        plan_id: &str,
        bundle: &PlanDataBundle,
        selected: &BTreeSet<Category>,
    ) -> Result<GeneratedReport, ComposeError> {
        debug!(%plan_name, %plan_id, ?selected, "LlmReportComposer::generate_report: called");
        let system = self.prompts.system_prompt().map_err(template_error)?;

        let report_prompt = self
            .prompts
            .render(
                "report",
                &ReportPromptContext {
                    plan_name: plan_name.to_string(),
                    plan_id: plan_id.to_string(),
                    data_summary: compose_prompt(bundle, selected),
                    structure: report_structure(),
                },
            )
            .map_err(template_error)?;

        let response = self.client.complete(self.request(&system, report_prompt)).await?;
        let truncated = response.stop_reason == StopReason::MaxTokens;
        if truncated {
            warn!(%plan_id, max_tokens = self.max_tokens, "LlmReportComposer::generate_report: report hit the token limit");
        }
        let text = response.content.unwrap_or_else(|| EMPTY_RESPONSE_TEXT.to_string());
        info!(
            %plan_id,
            len = text.len(),
            tokens = response.usage.total(),
            "LlmReportComposer::generate_report: report received"
        );

        let missing = missing_sections(&text);
        if !missing.is_empty() {
            warn!(?missing, "LlmReportComposer::generate_report: report lacks required sections");
        }

        let summary_prompt = self
            .prompts
            .render("summary", &SummaryPromptContext { report: text.clone() })
            .map_err(template_error)?;

        let response = self.client.complete(self.request(&system, summary_prompt)).await?;
        let extraction = parse_summary(response.content.as_deref().unwrap_or_default());
        let summary_source = extraction.source();
        let (summary, recommendations) = extraction.into_parts();
        debug!(?summary_source, recommendations = recommendations.len(), "LlmReportComposer::generate_report: summary parsed");

        Ok(GeneratedReport {
            text,
            summary,
            recommendations,
            summary_source,
            mode: ReportMode::Network,
            truncated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;
    use crate::composer::REPORT_SECTIONS;
    use crate::domain::SummarySource;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionResponse, LlmError};

    fn composer(mock: Arc<MockLlmClient>) -> LlmReportComposer {
        LlmReportComposer::new(mock, PromptLoader::embedded_only(), &LlmConfig::default())
    }

    fn plan_001() -> PlanDataBundle {
        fixtures::plan_data().remove("plan_001").unwrap()
    }

    fn full_report() -> String {
        let mut text = String::from("# Site Report\n");
        for section in REPORT_SECTIONS {
            text.push_str(&format!("\n## {}\nContent.\n", section));
        }
        text
    }

    async fn generate(mock: Arc<MockLlmClient>, selected: &[Category]) -> Result<GeneratedReport, ComposeError> {
        composer(mock)
            .generate_report(
                "Downtown Construction Site",
                "plan_001",
                &plan_001(),
                &selected.iter().copied().collect(),
            )
            .await
    }

    #[tokio::test]
    async fn test_two_requests_and_structured_summary() {
        let report = full_report();
        let mock = Arc::new(MockLlmClient::texts(&[
            report.as_str(),
            r#"{"summary": "On track.", "recommendations": ["Fly weekly", "Check fences", "Survey again"]}"#,
        ]));

        let r = generate(mock.clone(), &[]).await.unwrap();
        assert_eq!(mock.call_count(), 2);
        assert_eq!(r.text, report);
        assert_eq!(r.summary, "On track.");
        assert_eq!(r.recommendations.len(), 3);
        assert_eq!(r.summary_source, SummarySource::Structured);
        assert_eq!(r.mode, ReportMode::Network);
        assert!(!r.truncated);
    }

    #[tokio::test]
    async fn test_token_limit_marks_report_truncated() {
        let cut = CompletionResponse {
            stop_reason: StopReason::MaxTokens,
            ..CompletionResponse::text("# Site Report\n\n## Executive Summary\nThe site")
        };
        let mock = Arc::new(MockLlmClient::new(vec![cut, CompletionResponse::text("{}")]));
        let r = generate(mock.clone(), &[]).await.unwrap();
        assert!(r.truncated);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn test_report_prompt_contents() {
        let mock = Arc::new(MockLlmClient::texts(&[full_report().as_str(), "{}"]));
        generate(mock.clone(), &[Category::Measurements]).await.unwrap();

        let requests = mock.requests();
        let first = requests[0].last_user_text().unwrap();
        assert!(first.contains("Downtown Construction Site (ID: plan_001)"));
        assert!(first.contains("## Measurements\n- AREA: 2.5 acres (Total site area)"));
        assert!(!first.contains("## Flight Data"));
        for section in REPORT_SECTIONS {
            assert!(first.contains(section), "prompt lacks {section}");
        }
        assert!(requests[0].system_prompt.starts_with("You are an expert drone surveying"));
        assert_eq!(requests[0].max_tokens, 2000);
    }

    #[tokio::test]
    async fn test_summary_prompt_embeds_report() {
        let report = full_report();
        let mock = Arc::new(MockLlmClient::texts(&[report.as_str(), "{}"]));
        generate(mock.clone(), &[]).await.unwrap();

        let second = mock.requests()[1].last_user_text().unwrap().to_string();
        assert!(second.contains("\"summary\""));
        assert!(second.ends_with(report.trim_end()));
    }

    #[tokio::test]
    async fn test_unstructured_summary_is_extracted() {
        let mock = Arc::new(MockLlmClient::texts(&[
            full_report().as_str(),
            "Work is progressing.\n- Keep flying\n• Fix fence",
        ]));
        let r = generate(mock, &[]).await.unwrap();
        assert_eq!(r.summary_source, SummarySource::Extracted);
        assert_eq!(r.summary, "Work is progressing.");
        assert_eq!(r.recommendations, vec!["Keep flying", "Fix fence"]);
    }

    #[tokio::test]
    async fn test_missing_content_uses_placeholder() {
        let empty = CompletionResponse {
            content: None,
            ..CompletionResponse::text("")
        };
        let mock = Arc::new(MockLlmClient::new(vec![empty, CompletionResponse::text("{}")]));
        let r = generate(mock, &[]).await.unwrap();
        assert_eq!(r.text, EMPTY_RESPONSE_TEXT);
    }

    #[tokio::test]
    async fn test_missing_key_is_configuration_error() {
        let mock = Arc::new(MockLlmClient::with_results(vec![Err(LlmError::MissingApiKey {
            env: "GROQ_API_KEY".to_string(),
        })]));
        let err = generate(mock.clone(), &[]).await.unwrap_err();
        assert!(matches!(err, ComposeError::Configuration(_)));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_upstream_status_propagates() {
        let mock = Arc::new(MockLlmClient::with_results(vec![Err(LlmError::ApiError {
            status: 503,
            message: "unavailable".to_string(),
        })]));
        let err = generate(mock.clone(), &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_summary_failure_propagates() {
        let mock = Arc::new(MockLlmClient::with_results(vec![
            Ok(CompletionResponse::text(full_report())),
            Err(LlmError::ApiError {
                status: 429,
                message: "rate limited".to_string(),
            }),
        ]));
        let err = generate(mock, &[]).await.unwrap_err();
        assert_eq!(err.status(), Some(429));
    }
}
