//! Prompt text and response schema sent to Gemini.

use prospect_core::{Lead, SearchParams};
use serde_json::{json, Value};

/// Discovery prompt for the Maps-grounded model.
#[must_use]
pub fn discovery_prompt(params: &SearchParams, limit: u32) -> String {
    format!(
        "Trouve {limit} entreprises correspondant à \"{keyword}\" à \"{location}\".\n\
         Pour chacune, donne le nom, l'adresse complète, la note moyenne, le nombre d'avis, \
         le numéro de téléphone et le site web s'il existe.",
        keyword = params.keyword(),
        location = params.location(),
    )
}

/// Analysis prompt for the Search-grounded model.
///
/// Encodes the classification policy: a dead site is `DO_NOT_CONTACT`, a
/// rating above 4.5 with a missing or dated site is `PRIORITY`, a rating
/// below 3.5 is `NORMAL`.
#[must_use]
pub fn analysis_prompt(lead: &Lead) -> String {
    let website = lead
        .website
        .as_deref()
        .filter(|w| !w.trim().is_empty())
        .unwrap_or("Aucun site");
    let rating = lead.rating.unwrap_or(0.0);
    let reviews = lead.user_rating_count.unwrap_or(0);

    format!(
        "Tu es un expert en génération de leads. Effectue une triple vérification de cette entreprise.\n\
         \n\
         Données :\n\
         - Nom : {name}\n\
         - Site web : {website}\n\
         - Note Google : {rating}/5 ({reviews} avis)\n\
         \n\
         1. Existence : si une URL est fournie, vérifie qu'elle semble valide. \
         Si le site paraît mort ou inaccessible, priorityStatus = DO_NOT_CONTACT. \
         Cherche un email sur le web (page contact, pied de page, annuaires) s'il n'est pas connu.\n\
         2. Audit technique : le site utilise-t-il HTTPS ? Paraît-il daté ou non adapté au mobile ?\n\
         3. Pertinence commerciale : si la note est supérieure à 4.5 ET (pas de site OU site daté/HTTP), \
         priorityStatus = PRIORITY (succès réel mais vitrine défaillante). \
         Si la note est inférieure à 3.5, priorityStatus = NORMAL.\n\
         \n\
         Remplis le JSON avec rigueur.",
        name = lead.name,
    )
}

/// JSON schema the analysis answer must conform to.
#[must_use]
pub fn analysis_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "email": {
                "type": "STRING",
                "description": "Email trouvé sur le site ou via la recherche, sinon 'Non trouvé'."
            },
            "isResponsive": {
                "type": "BOOLEAN",
                "description": "Le site semble moderne et adapté au mobile."
            },
            "isHttps": {
                "type": "BOOLEAN",
                "description": "Le site utilise HTTPS."
            },
            "priorityStatus": {
                "type": "STRING",
                "enum": ["PRIORITY", "NORMAL", "DO_NOT_CONTACT"],
                "description": "PRIORITY si note > 4.5 ET site médiocre ou absent. DO_NOT_CONTACT si site mort."
            },
            "statusSummary": {
                "type": "STRING",
                "description": "Résumé court : 'OK', 'Site Mort', 'Succès réel mais vitrine défaillante'."
            },
            "digitalWeakness": {
                "type": "STRING",
                "description": "Principale faille technique (HTTP, lenteur, pas de site...)."
            },
            "salesPitch": {
                "type": "STRING",
                "description": "Phrase d'accroche commerciale basée sur la faille."
            }
        },
        "required": [
            "email",
            "isResponsive",
            "isHttps",
            "priorityStatus",
            "statusSummary",
            "digitalWeakness",
            "salesPitch"
        ]
    })
}
