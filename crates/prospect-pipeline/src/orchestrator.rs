use std::time::Duration;

use futures::future::join_all;
use prospect_core::{
    AiAnalysisResult, AppConfig, DiscoveryError, Lead, LeadAnalyzer, LeadDiscovery, LeadStatus,
    SearchParams,
};

use crate::store::{LeadPatch, LeadStore};

pub const DEFAULT_BATCH_SIZE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// Leads analysed concurrently per group.
    pub batch_size: usize,
    /// Per-lead deadline; `None` waits for the analyzer indefinitely.
    pub analysis_timeout: Option<Duration>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            analysis_timeout: None,
        }
    }
}

impl RunOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            batch_size: config.batch_size,
            analysis_timeout: (config.analysis_timeout_secs > 0)
                .then(|| Duration::from_secs(config.analysis_timeout_secs)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// Discovery succeeded but found nothing.
    NoResults,
    /// Every discovered lead settled; `errored` of them timed out.
    Completed { total: usize, errored: usize },
}

/// Splits leads into consecutive analysis groups of at most `batch_size`.
///
/// A zero size is treated as one.
pub fn batches(leads: &[Lead], batch_size: usize) -> std::slice::Chunks<'_, Lead> {
    leads.chunks(batch_size.max(1))
}

/// Runs one full prospecting pass and records its progress in `store`.
///
/// Discovery runs once. Discovered leads are then analysed group by group:
/// the leads of one group run concurrently, and the next group starts only
/// after every lead of the current group has settled. Analysis failures do
/// not abort the run.
///
/// # Errors
///
/// Returns the [`DiscoveryError`] when discovery fails. The store is left in
/// the `failed` phase with the error message and no analysis is attempted.
pub async fn run_prospecting<D, A>(
    store: &LeadStore,
    discovery: &D,
    analyzer: &A,
    params: &SearchParams,
    options: &RunOptions,
) -> Result<RunOutcome, DiscoveryError>
where
    D: LeadDiscovery + Sync,
    A: LeadAnalyzer + Sync,
{
    store.begin_run(params);
    tracing::info!(
        keyword = params.keyword(),
        location = params.location(),
        "prospecting run started"
    );

    let leads = match discovery.discover(params).await {
        Ok(leads) => leads,
        Err(e) => {
            tracing::warn!(error = %e, "discovery failed, run aborted");
            store.fail(&e.message);
            return Err(e);
        }
    };

    if leads.is_empty() {
        tracing::info!("discovery returned no businesses");
        store.no_results();
        return Ok(RunOutcome::NoResults);
    }

    let total = leads.len();
    store.load_leads(leads.clone());

    let mut errored = 0;
    for (index, group) in batches(&leads, options.batch_size).enumerate() {
        tracing::debug!(batch = index + 1, size = group.len(), "analysing batch");
        let in_flight: Vec<_> = group
            .iter()
            .map(|lead| analyze_one(store, analyzer, lead, options.analysis_timeout))
            .collect();
        let outcomes = join_all(in_flight).await;
        errored += outcomes.iter().filter(|s| **s == LeadStatus::Error).count();
    }

    store.finish();
    tracing::info!(total, errored, "prospecting run finished");
    Ok(RunOutcome::Completed { total, errored })
}

async fn analyze_one<A>(
    store: &LeadStore,
    analyzer: &A,
    lead: &Lead,
    timeout: Option<Duration>,
) -> LeadStatus
where
    A: LeadAnalyzer + Sync,
{
    if let Err(e) = store.update_lead(lead.id, LeadPatch::BeginAnalysis) {
        tracing::warn!(lead = %lead.name, error = %e, "could not mark lead as analyzing");
    }

    let (analysis, outcome) = match timeout {
        Some(limit) => match tokio::time::timeout(limit, analyzer.analyze(lead)).await {
            Ok(analysis) => (analysis, LeadStatus::Complete),
            Err(_) => {
                tracing::warn!(
                    lead = %lead.name,
                    timeout_secs = limit.as_secs(),
                    "lead analysis timed out"
                );
                (AiAnalysisResult::fallback(), LeadStatus::Error)
            }
        },
        None => (analyzer.analyze(lead).await, LeadStatus::Complete),
    };

    if let Err(e) = store.update_lead(lead.id, LeadPatch::Settle { analysis, outcome }) {
        tracing::warn!(lead = %lead.name, error = %e, "could not settle lead");
    }
    outcome
}

#[cfg(test)]
#[path = "orchestrator_test.rs"]
mod tests;
