//! Enrichment client: a schema-constrained, Search-grounded audit of one lead.

use prospect_core::{AiAnalysisResult, Lead};

use crate::client::GeminiClient;
use crate::error::GeminiError;
use crate::prompts::{analysis_prompt, analysis_schema};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Tool};

/// Analyzes `lead` and always returns a usable result.
///
/// A successful answer goes through the no-website override exactly once.
/// Any failure (transport, API status, empty or malformed payload) is logged
/// and replaced by [`AiAnalysisResult::fallback`].
pub async fn analyze_lead(client: &GeminiClient, model: &str, lead: &Lead) -> AiAnalysisResult {
    match request_analysis(client, model, lead).await {
        Ok(mut analysis) => {
            if analysis.apply_no_website_override(lead.has_website(), lead.rating) {
                tracing::debug!(lead = %lead.name, "no website, upgraded to PRIORITY");
            }
            analysis
        }
        Err(e) => {
            tracing::error!(lead = %lead.name, error = %e, "lead analysis failed, using fallback");
            AiAnalysisResult::fallback()
        }
    }
}

async fn request_analysis(
    client: &GeminiClient,
    model: &str,
    lead: &Lead,
) -> Result<AiAnalysisResult, GeminiError> {
    let request = GenerateContentRequest::user_prompt(analysis_prompt(lead))
        .with_json_schema(analysis_schema())
        .with_tool(Tool::GoogleSearch {});
    let response = client.generate_content(model, &request).await?;
    parse_analysis(&response)
}

/// Decodes the model's JSON answer into an [`AiAnalysisResult`].
///
/// Tolerates a Markdown code fence around the JSON.
///
/// # Errors
///
/// - [`GeminiError::EmptyResponse`] if the response has no text.
/// - [`GeminiError::Deserialize`] if the text is not a complete, valid result
///   (missing field, wrong type, unknown `priorityStatus`).
pub fn parse_analysis(response: &GenerateContentResponse) -> Result<AiAnalysisResult, GeminiError> {
    let text = response.text().ok_or(GeminiError::EmptyResponse)?;
    serde_json::from_str(strip_code_fence(&text)).map_err(|e| GeminiError::Deserialize {
        context: "analysis payload".to_string(),
        source: e,
    })
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}
