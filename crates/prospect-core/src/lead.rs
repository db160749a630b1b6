use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::analysis::AiAnalysisResult;
use crate::error::{CoreError, TransitionError};

/// Placeholder address for grounding entries that carry none.
pub const UNKNOWN_ADDRESS: &str = "Adresse non trouvée";

/// Lifecycle of a lead: `pending -> analyzing -> {complete, error}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    Pending,
    Analyzing,
    Complete,
    Error,
}

impl LeadStatus {
    /// Whether the analysis of this lead has finished, successfully or not.
    #[must_use]
    pub const fn is_settled(self) -> bool {
        matches!(self, LeadStatus::Complete | LeadStatus::Error)
    }
}

impl std::fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeadStatus::Pending => write!(f, "pending"),
            LeadStatus::Analyzing => write!(f, "analyzing"),
            LeadStatus::Complete => write!(f, "complete"),
            LeadStatus::Error => write!(f, "error"),
        }
    }
}

/// A discovered business plus its enrichment state.
///
/// `status` and `analysis` are private so the only way to change them is
/// through [`Lead::begin_analysis`] and [`Lead::settle`], which keeps the
/// lifecycle forward-only and guarantees enrichment data is present exactly
/// when the lead is settled. Deserialization goes through `RawLead` and
/// rejects records that break that pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawLead")]
pub struct Lead {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google_maps_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(flatten)]
    analysis: Option<AiAnalysisResult>,
    status: LeadStatus,
}

/// Wire shape of a [`Lead`] before the status/analysis pairing is checked.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLead {
    id: Uuid,
    name: String,
    address: String,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_rating_count: Option<u32>,
    #[serde(default)]
    google_maps_uri: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(flatten)]
    analysis: Option<AiAnalysisResult>,
    status: LeadStatus,
}

impl TryFrom<RawLead> for Lead {
    type Error = CoreError;

    fn try_from(raw: RawLead) -> Result<Self, Self::Error> {
        if raw.status.is_settled() != raw.analysis.is_some() {
            return Err(CoreError::InconsistentLead { status: raw.status });
        }
        Ok(Self {
            id: raw.id,
            name: raw.name,
            address: raw.address,
            website: raw.website,
            rating: raw.rating,
            user_rating_count: raw.user_rating_count,
            google_maps_uri: raw.google_maps_uri,
            phone: raw.phone,
            analysis: raw.analysis,
            status: raw.status,
        })
    }
}

impl Lead {
    /// Creates a fresh `pending` lead with a new unique id.
    #[must_use]
    pub fn discovered(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            address: address.into(),
            website: None,
            rating: None,
            user_rating_count: None,
            google_maps_uri: None,
            phone: None,
            analysis: None,
            status: LeadStatus::Pending,
        }
    }

    #[must_use]
    pub fn status(&self) -> LeadStatus {
        self.status
    }

    /// Enrichment data; `Some` if and only if the lead is settled.
    #[must_use]
    pub fn analysis(&self) -> Option<&AiAnalysisResult> {
        self.analysis.as_ref()
    }

    /// Whether a non-blank website is known for this business.
    #[must_use]
    pub fn has_website(&self) -> bool {
        self.website.as_deref().is_some_and(|w| !w.trim().is_empty())
    }

    /// Moves a `pending` lead to `analyzing`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the lead is not `pending`.
    pub fn begin_analysis(&mut self) -> Result<(), TransitionError> {
        if self.status != LeadStatus::Pending {
            return Err(TransitionError {
                from: self.status,
                to: LeadStatus::Analyzing,
            });
        }
        self.status = LeadStatus::Analyzing;
        Ok(())
    }

    /// Merges an analysis into an `analyzing` lead and moves it to `outcome`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] if the lead is not `analyzing` or if
    /// `outcome` is not a settled status. The lead is left untouched.
    pub fn settle(
        &mut self,
        analysis: AiAnalysisResult,
        outcome: LeadStatus,
    ) -> Result<(), TransitionError> {
        if self.status != LeadStatus::Analyzing || !outcome.is_settled() {
            return Err(TransitionError {
                from: self.status,
                to: outcome,
            });
        }
        self.analysis = Some(analysis);
        self.status = outcome;
        Ok(())
    }
}

/// Validated input for one discovery call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    keyword: String,
    location: String,
}

impl SearchParams {
    /// Builds search parameters, trimming both fields.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptySearchField`] if either field is blank.
    pub fn new(keyword: &str, location: &str) -> Result<Self, CoreError> {
        let keyword = keyword.trim();
        let location = location.trim();
        if keyword.is_empty() {
            return Err(CoreError::EmptySearchField("keyword"));
        }
        if location.is_empty() {
            return Err(CoreError::EmptySearchField("location"));
        }
        Ok(Self {
            keyword: keyword.to_string(),
            location: location.to_string(),
        })
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::PriorityStatus;

    #[test]
    fn discovered_lead_is_pending_without_analysis() {
        let lead = Lead::discovered("Boulangerie Paul", "1 rue de la Paix");
        assert_eq!(lead.status(), LeadStatus::Pending);
        assert!(lead.analysis().is_none());
    }

    #[test]
    fn discovered_leads_get_distinct_ids() {
        let a = Lead::discovered("A", "x");
        let b = Lead::discovered("A", "x");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn lifecycle_moves_forward() {
        let mut lead = Lead::discovered("A", "x");
        lead.begin_analysis().unwrap();
        assert_eq!(lead.status(), LeadStatus::Analyzing);
        assert!(lead.analysis().is_none());
        lead.settle(AiAnalysisResult::fallback(), LeadStatus::Complete)
            .unwrap();
        assert_eq!(lead.status(), LeadStatus::Complete);
        assert!(lead.analysis().is_some());
    }

    #[test]
    fn begin_analysis_twice_is_rejected() {
        let mut lead = Lead::discovered("A", "x");
        lead.begin_analysis().unwrap();
        let err = lead.begin_analysis().unwrap_err();
        assert_eq!(err.from, LeadStatus::Analyzing);
        assert_eq!(err.to, LeadStatus::Analyzing);
    }

    #[test]
    fn settle_requires_analyzing() {
        let mut lead = Lead::discovered("A", "x");
        let err = lead
            .settle(AiAnalysisResult::fallback(), LeadStatus::Complete)
            .unwrap_err();
        assert_eq!(err.from, LeadStatus::Pending);
        assert!(lead.analysis().is_none());
    }

    #[test]
    fn settle_rejects_unsettled_outcome() {
        let mut lead = Lead::discovered("A", "x");
        lead.begin_analysis().unwrap();
        assert!(lead
            .settle(AiAnalysisResult::fallback(), LeadStatus::Pending)
            .is_err());
        assert_eq!(lead.status(), LeadStatus::Analyzing);
    }

    #[test]
    fn settled_lead_cannot_regress() {
        let mut lead = Lead::discovered("A", "x");
        lead.begin_analysis().unwrap();
        lead.settle(AiAnalysisResult::fallback(), LeadStatus::Error)
            .unwrap();
        assert!(lead.begin_analysis().is_err());
        assert!(lead
            .settle(AiAnalysisResult::fallback(), LeadStatus::Complete)
            .is_err());
        assert_eq!(lead.status(), LeadStatus::Error);
    }

    #[test]
    fn has_website_ignores_blank_values() {
        let mut lead = Lead::discovered("A", "x");
        assert!(!lead.has_website());
        lead.website = Some("  ".to_string());
        assert!(!lead.has_website());
        lead.website = Some("https://a.fr".to_string());
        assert!(lead.has_website());
    }

    #[test]
    fn settled_lead_serializes_flat_camel_case() {
        let mut lead = Lead::discovered("A", "x");
        lead.user_rating_count = Some(12);
        lead.begin_analysis().unwrap();
        let mut analysis = AiAnalysisResult::fallback();
        analysis.priority_status = PriorityStatus::DoNotContact;
        lead.settle(analysis, LeadStatus::Complete).unwrap();

        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["status"], "complete");
        assert_eq!(json["userRatingCount"], 12);
        assert_eq!(json["priorityStatus"], "DO_NOT_CONTACT");
        assert_eq!(json["isHttps"], false);
        assert!(json.get("website").is_none());
    }

    #[test]
    fn pending_lead_serializes_without_enrichment_fields() {
        let lead = Lead::discovered("A", "x");
        let json = serde_json::to_value(&lead).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json.get("email").is_none());
        assert!(json.get("priorityStatus").is_none());
    }

    #[test]
    fn settled_lead_reads_back_from_json() {
        let mut lead = Lead::discovered("A", "x");
        lead.rating = Some(4.2);
        lead.begin_analysis().unwrap();
        lead.settle(AiAnalysisResult::fallback(), LeadStatus::Complete)
            .unwrap();

        let json = serde_json::to_value(&lead).unwrap();
        let back: Lead = serde_json::from_value(json).unwrap();
        assert_eq!(back, lead);
    }

    #[test]
    fn settled_status_without_analysis_is_rejected() {
        let json = serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "A",
            "address": "x",
            "status": "complete",
        });
        let err = serde_json::from_value::<Lead>(json).unwrap_err();
        assert!(err.to_string().contains("complete"), "{err}");
    }

    #[test]
    fn pending_status_with_analysis_is_rejected() {
        let mut json = serde_json::to_value(AiAnalysisResult::fallback()).unwrap();
        let fields = json.as_object_mut().unwrap();
        fields.insert("id".to_string(), serde_json::json!(Uuid::new_v4()));
        fields.insert("name".to_string(), serde_json::json!("A"));
        fields.insert("address".to_string(), serde_json::json!("x"));
        fields.insert("status".to_string(), serde_json::json!("pending"));

        assert!(serde_json::from_value::<Lead>(json).is_err());
    }

    #[test]
    fn search_params_trim_and_reject_blank() {
        let params = SearchParams::new("  Boulangerie ", " Lyon").unwrap();
        assert_eq!(params.keyword(), "Boulangerie");
        assert_eq!(params.location(), "Lyon");
        assert_eq!(
            SearchParams::new(" ", "Lyon"),
            Err(CoreError::EmptySearchField("keyword"))
        );
        assert_eq!(
            SearchParams::new("Boulangerie", ""),
            Err(CoreError::EmptySearchField("location"))
        );
    }
}
