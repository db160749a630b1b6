//! CSV export of analysed leads.
//!
//! Only `complete` leads that are not `DO_NOT_CONTACT` are exported. Free-text
//! columns (name, address, weakness, pitch) are always quoted with embedded
//! quotes doubled; the remaining columns are written bare unless they contain
//! a delimiter, a quote or a line break.

use chrono::NaiveDate;
use prospect_core::analysis::EMAIL_NOT_FOUND;
use prospect_core::{Lead, LeadStatus, PriorityStatus};

pub const CSV_HEADERS: [&str; 11] = [
    "Nom",
    "Statut Priorité",
    "Email Vérifié",
    "Téléphone",
    "Adresse",
    "Site Web",
    "Note Google",
    "Sécurisé (HTTPS)",
    "Mobile Friendly",
    "Faille Technique",
    "Argumentaire Vente",
];

const NOT_AVAILABLE: &str = "N/A";

/// Leads eligible for export, in board order.
pub fn exportable_leads(leads: &[Lead]) -> impl Iterator<Item = &Lead> {
    leads.iter().filter(|lead| {
        lead.status() == LeadStatus::Complete
            && lead
                .analysis()
                .is_some_and(|a| a.priority_status != PriorityStatus::DoNotContact)
    })
}

/// Renders the export document, or `None` when no lead is eligible.
#[must_use]
pub fn leads_to_csv(leads: &[Lead]) -> Option<String> {
    let rows: Vec<String> = exportable_leads(leads).map(csv_row).collect();
    if rows.is_empty() {
        return None;
    }

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    lines.extend(rows);
    Some(lines.join("\n"))
}

/// `prospects_export_<YYYY-MM-DD>.csv`
#[must_use]
pub fn export_filename(date: NaiveDate) -> String {
    format!("prospects_export_{}.csv", date.format("%Y-%m-%d"))
}

fn csv_row(lead: &Lead) -> String {
    let analysis = lead.analysis();
    let priority = analysis.map_or(PriorityStatus::Normal, |a| a.priority_status);
    let email = analysis
        .map(|a| a.email.as_str())
        .filter(|e| !e.is_empty())
        .unwrap_or(EMAIL_NOT_FOUND);
    let rating = lead
        .rating
        .filter(|r| *r > 0.0)
        .map_or_else(|| NOT_AVAILABLE.to_string(), |r| r.to_string());

    let fields = [
        quoted(&lead.name),
        priority.as_str().to_string(),
        escaped(email),
        escaped(lead.phone.as_deref().unwrap_or_default()),
        quoted(&lead.address),
        escaped(
            lead.website
                .as_deref()
                .filter(|w| !w.trim().is_empty())
                .unwrap_or(NOT_AVAILABLE),
        ),
        rating,
        yes_no(analysis.is_some_and(|a| a.is_https)).to_string(),
        yes_no(analysis.is_some_and(|a| a.is_responsive)).to_string(),
        quoted(analysis.map_or("", |a| a.digital_weakness.as_str())),
        quoted(analysis.map_or("", |a| a.sales_pitch.as_str())),
    ];
    fields.join(",")
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Quotes `value` only when it would otherwise break the row.
fn escaped(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        quoted(value)
    } else {
        value.to_string()
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Oui"
    } else {
        "Non"
    }
}

#[cfg(test)]
mod tests {
    use prospect_core::AiAnalysisResult;

    use super::*;

    fn analysed(name: &str, priority: PriorityStatus, outcome: LeadStatus) -> Lead {
        let mut lead = Lead::discovered(name, "12 rue Mercière, Lyon");
        lead.begin_analysis().unwrap();
        lead.settle(
            AiAnalysisResult {
                email: "contact@paul.fr".to_string(),
                is_responsive: true,
                is_https: false,
                priority_status: priority,
                status_summary: "Site daté".to_string(),
                digital_weakness: "Pas de HTTPS".to_string(),
                sales_pitch: "Un site \"moderne\" pour vos clients.".to_string(),
            },
            outcome,
        )
        .unwrap();
        lead
    }

    #[test]
    fn header_line_is_french_column_list() {
        let csv = leads_to_csv(&[analysed("A", PriorityStatus::Normal, LeadStatus::Complete)])
            .unwrap();
        assert_eq!(
            csv.lines().next().unwrap(),
            "Nom,Statut Priorité,Email Vérifié,Téléphone,Adresse,Site Web,Note Google,Sécurisé (HTTPS),Mobile Friendly,Faille Technique,Argumentaire Vente"
        );
    }

    #[test]
    fn row_quotes_free_text_and_doubles_inner_quotes() {
        let mut lead = analysed(
            "Boulangerie \"Chez Paul\"",
            PriorityStatus::Priority,
            LeadStatus::Complete,
        );
        lead.rating = Some(4.6);
        lead.phone = Some("04 78 00 00 00".to_string());
        lead.website = Some("http://paul.fr".to_string());

        let csv = leads_to_csv(&[lead]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"Boulangerie \"\"Chez Paul\"\"\",PRIORITY,contact@paul.fr,04 78 00 00 00,\"12 rue Mercière, Lyon\",http://paul.fr,4.6,Non,Oui,\"Pas de HTTPS\",\"Un site \"\"moderne\"\" pour vos clients.\""
        );
    }

    #[test]
    fn bare_columns_are_quoted_when_they_hold_delimiters() {
        let mut lead = Lead::discovered("A", "Lyon");
        lead.phone = Some("04 78, poste 2".to_string());
        lead.website = Some("https://a.fr/?q=\"x\"".to_string());
        lead.begin_analysis().unwrap();
        lead.settle(
            AiAnalysisResult {
                email: "a@x.fr, b@x.fr".to_string(),
                ..AiAnalysisResult::fallback()
            },
            LeadStatus::Complete,
        )
        .unwrap();

        let csv = leads_to_csv(&[lead]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with(
            "\"A\",NORMAL,\"a@x.fr, b@x.fr\",\"04 78, poste 2\",\"Lyon\",\"https://a.fr/?q=\"\"x\"\"\","
        ));
    }

    #[test]
    fn missing_values_use_placeholders() {
        let mut lead = analysed("A", PriorityStatus::Normal, LeadStatus::Complete);
        lead.rating = Some(0.0);

        let csv = leads_to_csv(&[lead]).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert!(row.starts_with("\"A\",NORMAL,contact@paul.fr,,\"12 rue Mercière, Lyon\",N/A,N/A,"));
    }

    #[test]
    fn do_not_contact_and_unsettled_leads_are_excluded() {
        let leads = vec![
            analysed("Gardé", PriorityStatus::Normal, LeadStatus::Complete),
            analysed("Fermé", PriorityStatus::DoNotContact, LeadStatus::Complete),
            analysed("Erreur", PriorityStatus::Normal, LeadStatus::Error),
            Lead::discovered("En attente", "Lyon"),
        ];
        let csv = leads_to_csv(&leads).unwrap();
        assert_eq!(csv.lines().count(), 2);
        assert!(csv.contains("\"Gardé\""));
        assert!(!csv.contains("Fermé"));
    }

    #[test]
    fn nothing_exportable_yields_none() {
        let leads = vec![analysed("Fermé", PriorityStatus::DoNotContact, LeadStatus::Complete)];
        assert!(leads_to_csv(&leads).is_none());
        assert!(leads_to_csv(&[]).is_none());
    }

    #[test]
    fn lines_are_joined_without_trailing_newline() {
        let leads = vec![
            analysed("A", PriorityStatus::Normal, LeadStatus::Complete),
            analysed("B", PriorityStatus::Priority, LeadStatus::Complete),
        ];
        let csv = leads_to_csv(&leads).unwrap();
        assert_eq!(csv.matches('\n').count(), 2);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn filename_carries_iso_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(export_filename(date), "prospects_export_2025-03-07.csv");
    }
}
