use prospect_core::{
    AiAnalysisResult, AppConfig, DiscoveryError, Lead, LeadAnalyzer, LeadDiscovery, SearchParams,
};

use crate::client::GeminiClient;
use crate::discovery::search_businesses;
use crate::enrichment::analyze_lead;
use crate::error::GeminiError;

/// Gemini implementation of both orchestrator collaborators.
#[derive(Debug, Clone)]
pub struct GeminiProspector {
    client: GeminiClient,
    discovery_model: String,
    analysis_model: String,
    discovery_limit: u32,
}

impl GeminiProspector {
    #[must_use]
    pub fn new(
        client: GeminiClient,
        discovery_model: impl Into<String>,
        analysis_model: impl Into<String>,
        discovery_limit: u32,
    ) -> Self {
        Self {
            client,
            discovery_model: discovery_model.into(),
            analysis_model: analysis_model.into(),
            discovery_limit,
        }
    }

    /// Builds the client and models from application config.
    ///
    /// # Errors
    ///
    /// Returns [`GeminiError`] if the HTTP client cannot be built or the
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, GeminiError> {
        let client = GeminiClient::with_base_url(
            &config.gemini_api_key,
            config.request_timeout_secs,
            &config.gemini_base_url,
        )?
        .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);

        Ok(Self::new(
            client,
            config.discovery_model.clone(),
            config.analysis_model.clone(),
            config.discovery_limit,
        ))
    }
}

impl LeadDiscovery for GeminiProspector {
    async fn discover(&self, params: &SearchParams) -> Result<Vec<Lead>, DiscoveryError> {
        search_businesses(&self.client, &self.discovery_model, params, self.discovery_limit).await
    }
}

impl LeadAnalyzer for GeminiProspector {
    async fn analyze(&self, lead: &Lead) -> AiAnalysisResult {
        analyze_lead(&self.client, &self.analysis_model, lead).await
    }
}
