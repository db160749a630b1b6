//! In-memory lead record store.
//!
//! [`LeadBoard`] is the plain state (phase, status message, ordered leads).
//! Its mutators are pure in-place transforms keyed by lead id. [`LeadStore`]
//! owns the board behind a `tokio::sync::watch` channel: every update is
//! applied atomically to one whole board and published to subscribers.

use prospect_core::{AiAnalysisResult, Lead, LeadStatus, SearchParams, TransitionError};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use uuid::Uuid;

pub const NO_RESULTS_MESSAGE: &str =
    "Aucune entreprise trouvée. Essayez une localisation plus précise ou un autre mot-clé.";
pub const DONE_MESSAGE: &str = "Audit terminé !";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("unknown lead {0}")]
    UnknownLead(Uuid),

    #[error(transparent)]
    Transition(#[from] TransitionError),
}

/// Whole-run state machine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunPhase {
    #[default]
    Idle,
    Discovering,
    NoResults,
    Analyzing,
    Done,
    Failed,
}

impl RunPhase {
    /// `true` while a run is in flight.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, RunPhase::Discovering | RunPhase::Analyzing)
    }
}

/// Change applied to one lead.
#[derive(Debug, Clone)]
pub enum LeadPatch {
    BeginAnalysis,
    Settle {
        analysis: AiAnalysisResult,
        outcome: LeadStatus,
    },
}

/// Settled/total counter shown next to the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadBoard {
    pub phase: RunPhase,
    pub status_message: String,
    /// Banner text for discovery failure or empty results.
    pub error: Option<String>,
    pub search: Option<SearchParams>,
    leads: Vec<Lead>,
}

impl LeadBoard {
    /// Leads in discovery order.
    #[must_use]
    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    #[must_use]
    pub fn lead(&self, id: Uuid) -> Option<&Lead> {
        self.leads.iter().find(|l| l.id == id)
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self
                .leads
                .iter()
                .filter(|l| l.status().is_settled())
                .count(),
            total: self.leads.len(),
        }
    }

    /// Applies `patch` to the lead with `id`. On error the board is unchanged.
    ///
    /// # Errors
    ///
    /// - [`StoreError::UnknownLead`] if no lead has this id.
    /// - [`StoreError::Transition`] if the patch would break the lifecycle.
    pub fn apply(&mut self, id: Uuid, patch: LeadPatch) -> Result<(), StoreError> {
        let lead = self
            .leads
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(StoreError::UnknownLead(id))?;
        match patch {
            LeadPatch::BeginAnalysis => lead.begin_analysis()?,
            LeadPatch::Settle { analysis, outcome } => lead.settle(analysis, outcome)?,
        }
        Ok(())
    }

    fn begin_run(&mut self, params: &SearchParams) {
        self.phase = RunPhase::Discovering;
        self.status_message = format!(
            "Recherche de {} à {} via Google Maps...",
            params.keyword(),
            params.location()
        );
        self.error = None;
        self.search = Some(params.clone());
        self.leads.clear();
    }

    fn fail(&mut self, message: &str) {
        self.phase = RunPhase::Failed;
        self.error = Some(message.to_string());
    }

    fn no_results(&mut self) {
        self.phase = RunPhase::NoResults;
        self.error = Some(NO_RESULTS_MESSAGE.to_string());
    }

    fn load_leads(&mut self, leads: Vec<Lead>) {
        self.phase = RunPhase::Analyzing;
        self.status_message = format!(
            "{} entreprises trouvées. Démarrage de l'audit IA...",
            leads.len()
        );
        self.leads = leads;
    }

    fn finish(&mut self) {
        self.phase = RunPhase::Done;
        self.status_message = DONE_MESSAGE.to_string();
    }
}

/// Shared handle to the current [`LeadBoard`].
#[derive(Debug)]
pub struct LeadStore {
    tx: watch::Sender<LeadBoard>,
}

impl Default for LeadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LeadStore {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(LeadBoard::default());
        Self { tx }
    }

    /// Receiver notified after every change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<LeadBoard> {
        self.tx.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> LeadBoard {
        self.tx.borrow().clone()
    }

    /// Read-modify-write of a single lead.
    ///
    /// # Errors
    ///
    /// See [`LeadBoard::apply`]. Subscribers are not notified on error.
    pub fn update_lead(&self, id: Uuid, patch: LeadPatch) -> Result<(), StoreError> {
        let mut result = Ok(());
        self.tx.send_if_modified(|board| match board.apply(id, patch) {
            Ok(()) => true,
            Err(e) => {
                result = Err(e);
                false
            }
        });
        result
    }

    /// Clears prior leads and enters `discovering`.
    pub fn begin_run(&self, params: &SearchParams) {
        self.tx.send_modify(|board| board.begin_run(params));
    }

    pub fn fail(&self, message: &str) {
        self.tx.send_modify(|board| board.fail(message));
    }

    pub fn no_results(&self) {
        self.tx.send_modify(LeadBoard::no_results);
    }

    /// Stores freshly discovered leads and enters `analyzing`.
    pub fn load_leads(&self, leads: Vec<Lead>) {
        self.tx.send_modify(|board| board.load_leads(leads));
    }

    pub fn finish(&self) {
        self.tx.send_modify(LeadBoard::finish);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> SearchParams {
        SearchParams::new("Boulangerie", "Lyon").unwrap()
    }

    fn loaded_store(names: &[&str]) -> (LeadStore, Vec<Uuid>) {
        let store = LeadStore::new();
        store.begin_run(&params());
        let leads: Vec<Lead> = names.iter().map(|n| Lead::discovered(*n, "Lyon")).collect();
        let ids = leads.iter().map(|l| l.id).collect();
        store.load_leads(leads);
        (store, ids)
    }

    #[test]
    fn new_store_is_idle_and_empty() {
        let board = LeadStore::new().snapshot();
        assert_eq!(board.phase, RunPhase::Idle);
        assert!(board.leads().is_empty());
        assert_eq!(board.progress(), Progress { completed: 0, total: 0 });
    }

    #[test]
    fn begin_run_clears_previous_leads_and_error() {
        let (store, _) = loaded_store(&["A", "B"]);
        store.fail("boom");
        store.begin_run(&params());
        let board = store.snapshot();
        assert_eq!(board.phase, RunPhase::Discovering);
        assert!(board.leads().is_empty());
        assert!(board.error.is_none());
        assert_eq!(
            board.status_message,
            "Recherche de Boulangerie à Lyon via Google Maps..."
        );
    }

    #[test]
    fn load_leads_enters_analyzing() {
        let (store, _) = loaded_store(&["A", "B", "C"]);
        let board = store.snapshot();
        assert_eq!(board.phase, RunPhase::Analyzing);
        assert_eq!(
            board.status_message,
            "3 entreprises trouvées. Démarrage de l'audit IA..."
        );
        assert_eq!(board.progress(), Progress { completed: 0, total: 3 });
    }

    #[test]
    fn update_lead_touches_only_that_lead() {
        let (store, ids) = loaded_store(&["A", "B"]);
        store.update_lead(ids[1], LeadPatch::BeginAnalysis).unwrap();
        let board = store.snapshot();
        assert_eq!(board.lead(ids[0]).unwrap().status(), LeadStatus::Pending);
        assert_eq!(board.lead(ids[1]).unwrap().status(), LeadStatus::Analyzing);
    }

    #[test]
    fn progress_counts_complete_and_error() {
        let (store, ids) = loaded_store(&["A", "B", "C"]);
        for id in &ids[..2] {
            store.update_lead(*id, LeadPatch::BeginAnalysis).unwrap();
        }
        store
            .update_lead(
                ids[0],
                LeadPatch::Settle {
                    analysis: AiAnalysisResult::fallback(),
                    outcome: LeadStatus::Complete,
                },
            )
            .unwrap();
        store
            .update_lead(
                ids[1],
                LeadPatch::Settle {
                    analysis: AiAnalysisResult::fallback(),
                    outcome: LeadStatus::Error,
                },
            )
            .unwrap();
        assert_eq!(store.snapshot().progress(), Progress { completed: 2, total: 3 });
    }

    #[test]
    fn unknown_lead_is_reported() {
        let (store, _) = loaded_store(&["A"]);
        let stranger = Uuid::new_v4();
        assert_eq!(
            store.update_lead(stranger, LeadPatch::BeginAnalysis),
            Err(StoreError::UnknownLead(stranger))
        );
    }

    #[test]
    fn illegal_transition_leaves_board_and_subscribers_untouched() {
        let (store, ids) = loaded_store(&["A"]);
        let mut rx = store.subscribe();
        rx.borrow_and_update();

        let err = store
            .update_lead(
                ids[0],
                LeadPatch::Settle {
                    analysis: AiAnalysisResult::fallback(),
                    outcome: LeadStatus::Complete,
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::Transition(_)));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot().leads()[0].status(), LeadStatus::Pending);
    }

    #[test]
    fn subscribers_see_updates() {
        let (store, ids) = loaded_store(&["A"]);
        let mut rx = store.subscribe();
        rx.borrow_and_update();
        store.update_lead(ids[0], LeadPatch::BeginAnalysis).unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().leads()[0].status(),
            LeadStatus::Analyzing
        );
    }

    #[test]
    fn no_results_and_finish_set_messages() {
        let store = LeadStore::new();
        store.begin_run(&params());
        store.no_results();
        let board = store.snapshot();
        assert_eq!(board.phase, RunPhase::NoResults);
        assert_eq!(board.error.as_deref(), Some(NO_RESULTS_MESSAGE));

        let (store, _) = loaded_store(&["A"]);
        store.finish();
        let board = store.snapshot();
        assert_eq!(board.phase, RunPhase::Done);
        assert_eq!(board.status_message, DONE_MESSAGE);
    }

    #[test]
    fn board_serializes_for_status_surface() {
        let (store, _) = loaded_store(&["A"]);
        let json = serde_json::to_value(store.snapshot()).unwrap();
        assert_eq!(json["phase"], "analyzing");
        assert_eq!(json["leads"][0]["status"], "pending");
        assert_eq!(json["search"]["keyword"], "Boulangerie");
    }
}
