//! Seams between the orchestrator and the AI-backed collaborators.
//!
//! The production implementation lives in `prospect-gemini`; tests swap in
//! local stand-ins that follow the same contract.

use std::future::Future;

use thiserror::Error;

use crate::analysis::AiAnalysisResult;
use crate::lead::{Lead, SearchParams};

/// User-facing message shown when discovery fails.
pub const DISCOVERY_FAILED_MESSAGE: &str = "Échec de la recherche Google Maps via Gemini.";

/// The discovery phase could not produce a result.
///
/// Carries only a user-facing message; the underlying transport or service
/// error is logged where it happens and never exposed here.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct DiscoveryError {
    pub message: String,
}

impl DiscoveryError {
    #[must_use]
    pub fn failed() -> Self {
        Self {
            message: DISCOVERY_FAILED_MESSAGE.to_string(),
        }
    }
}

/// Finds candidate businesses for a search.
pub trait LeadDiscovery {
    /// Issues exactly one external call and returns de-duplicated `pending`
    /// leads in result order. No results is an empty vector, not an error.
    fn discover(
        &self,
        params: &SearchParams,
    ) -> impl Future<Output = Result<Vec<Lead>, DiscoveryError>> + Send;
}

/// Produces the enrichment analysis for one lead.
///
/// Infallible by contract: implementations absorb their own failures and
/// return [`AiAnalysisResult::fallback`] instead.
pub trait LeadAnalyzer {
    fn analyze(&self, lead: &Lead) -> impl Future<Output = AiAnalysisResult> + Send;
}
