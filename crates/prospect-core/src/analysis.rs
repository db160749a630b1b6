//! Enrichment result produced for one lead.
//!
//! [`AiAnalysisResult`] mirrors the JSON object the analysis model is asked to
//! return. Field names are camelCase on the wire and every field is required,
//! so a payload missing any of them fails to deserialize.

use serde::{Deserialize, Serialize};

/// Email placeholder used when no address could be found.
pub const EMAIL_NOT_FOUND: &str = "Non trouvé";

/// Weakness written by the no-website override.
pub const NO_WEBSITE_WEAKNESS: &str = "Absence de site web";

/// Sales attractiveness of a lead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityStatus {
    Priority,
    Normal,
    DoNotContact,
}

impl PriorityStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PriorityStatus::Priority => "PRIORITY",
            PriorityStatus::Normal => "NORMAL",
            PriorityStatus::DoNotContact => "DO_NOT_CONTACT",
        }
    }
}

impl std::fmt::Display for PriorityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisResult {
    pub email: String,
    pub is_responsive: bool,
    pub is_https: bool,
    pub priority_status: PriorityStatus,
    pub status_summary: String,
    pub digital_weakness: String,
    pub sales_pitch: String,
}

impl AiAnalysisResult {
    /// The degraded result returned whenever an analysis cannot be obtained.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            email: EMAIL_NOT_FOUND.to_string(),
            is_responsive: false,
            is_https: false,
            priority_status: PriorityStatus::Normal,
            status_summary: "Erreur Analyse".to_string(),
            digital_weakness: "Inconnu".to_string(),
            sales_pitch: "Audit indisponible".to_string(),
        }
    }

    /// Upgrades a `NORMAL` verdict to `PRIORITY` for a well-rated business that
    /// has no website at all.
    ///
    /// Returns `true` when the override fired.
    pub fn apply_no_website_override(&mut self, has_website: bool, rating: Option<f64>) -> bool {
        let fires = !has_website
            && self.priority_status == PriorityStatus::Normal
            && rating.unwrap_or(0.0) > 4.0;
        if fires {
            self.priority_status = PriorityStatus::Priority;
            self.digital_weakness = NO_WEBSITE_WEAKNESS.to_string();
        }
        fires
    }
}

/// Coarse state of a business's web presence, as judged during analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteAssessment {
    /// No website listed.
    Missing,
    /// Website listed but unreachable.
    Dead,
    /// Reachable but dated or served over plain HTTP.
    Outdated,
    /// Reachable, HTTPS and mobile friendly.
    Modern,
}

/// Classification policy the analysis model is instructed to follow.
///
/// A dead site always wins; a highly rated business with a missing or
/// outdated site is a priority; everything else is normal.
#[must_use]
pub fn classify_priority(rating: Option<f64>, site: SiteAssessment) -> PriorityStatus {
    let rating = rating.unwrap_or(0.0);
    match site {
        SiteAssessment::Dead => PriorityStatus::DoNotContact,
        SiteAssessment::Missing | SiteAssessment::Outdated if rating > 4.5 => {
            PriorityStatus::Priority
        }
        _ => PriorityStatus::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(priority: PriorityStatus) -> AiAnalysisResult {
        AiAnalysisResult {
            email: "contact@example.fr".to_string(),
            is_responsive: true,
            is_https: true,
            priority_status: priority,
            status_summary: "OK".to_string(),
            digital_weakness: "Lent".to_string(),
            sales_pitch: "Accélérons votre site.".to_string(),
        }
    }

    #[test]
    fn override_fires_without_website_and_good_rating() {
        let mut result = analysis(PriorityStatus::Normal);
        assert!(result.apply_no_website_override(false, Some(4.2)));
        assert_eq!(result.priority_status, PriorityStatus::Priority);
        assert_eq!(result.digital_weakness, NO_WEBSITE_WEAKNESS);
    }

    #[test]
    fn override_never_fires_with_website() {
        for priority in [
            PriorityStatus::Normal,
            PriorityStatus::Priority,
            PriorityStatus::DoNotContact,
        ] {
            for rating in [None, Some(1.0), Some(4.2), Some(5.0)] {
                let mut result = analysis(priority);
                assert!(!result.apply_no_website_override(true, rating));
                assert_eq!(result, analysis(priority));
            }
        }
    }

    #[test]
    fn override_requires_rating_strictly_above_four() {
        let mut result = analysis(PriorityStatus::Normal);
        assert!(!result.apply_no_website_override(false, Some(4.0)));
        assert!(!result.apply_no_website_override(false, None));
        assert_eq!(result.priority_status, PriorityStatus::Normal);
    }

    #[test]
    fn override_leaves_do_not_contact_alone() {
        let mut result = analysis(PriorityStatus::DoNotContact);
        assert!(!result.apply_no_website_override(false, Some(4.8)));
        assert_eq!(result.priority_status, PriorityStatus::DoNotContact);
    }

    #[test]
    fn fallback_has_fixed_content() {
        let fallback = AiAnalysisResult::fallback();
        assert_eq!(fallback.email, "Non trouvé");
        assert!(!fallback.is_responsive);
        assert!(!fallback.is_https);
        assert_eq!(fallback.priority_status, PriorityStatus::Normal);
        assert_eq!(fallback.status_summary, "Erreur Analyse");
        assert_eq!(fallback.digital_weakness, "Inconnu");
        assert_eq!(fallback.sales_pitch, "Audit indisponible");
    }

    #[test]
    fn classify_priority_follows_policy() {
        assert_eq!(
            classify_priority(Some(4.8), SiteAssessment::Missing),
            PriorityStatus::Priority
        );
        assert_eq!(
            classify_priority(Some(4.8), SiteAssessment::Outdated),
            PriorityStatus::Priority
        );
        assert_eq!(
            classify_priority(Some(4.8), SiteAssessment::Modern),
            PriorityStatus::Normal
        );
        assert_eq!(
            classify_priority(Some(3.0), SiteAssessment::Missing),
            PriorityStatus::Normal
        );
        assert_eq!(
            classify_priority(Some(4.9), SiteAssessment::Dead),
            PriorityStatus::DoNotContact
        );
    }

    #[test]
    fn priority_status_uses_screaming_snake_case_on_the_wire() {
        let json = serde_json::to_string(&PriorityStatus::DoNotContact).unwrap();
        assert_eq!(json, "\"DO_NOT_CONTACT\"");
        let parsed: Result<PriorityStatus, _> = serde_json::from_str("\"URGENT\"");
        assert!(parsed.is_err(), "unknown priority must be rejected");
    }

    #[test]
    fn analysis_requires_every_field() {
        let partial = serde_json::json!({
            "email": "a@b.fr",
            "isResponsive": true,
            "isHttps": true,
            "priorityStatus": "NORMAL",
            "statusSummary": "OK",
            "digitalWeakness": "Lent"
        });
        assert!(serde_json::from_value::<AiAnalysisResult>(partial).is_err());
    }
}
