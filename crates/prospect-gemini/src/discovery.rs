//! Discovery client: one Maps-grounded call turned into `pending` leads.

use std::collections::HashSet;

use prospect_core::lead::UNKNOWN_ADDRESS;
use prospect_core::{DiscoveryError, Lead, SearchParams};

use crate::client::GeminiClient;
use crate::prompts::discovery_prompt;
use crate::types::{GenerateContentRequest, GenerateContentResponse, MapsChunk, Tool};

/// Finds businesses matching `params` through Maps grounding.
///
/// Returns an empty vector when the model grounds nothing.
///
/// # Errors
///
/// Returns [`DiscoveryError`] with a generic user-facing message on any
/// transport or service failure. The underlying error is logged only.
pub async fn search_businesses(
    client: &GeminiClient,
    model: &str,
    params: &SearchParams,
    limit: u32,
) -> Result<Vec<Lead>, DiscoveryError> {
    let request = GenerateContentRequest::user_prompt(discovery_prompt(params, limit))
        .with_tool(Tool::GoogleMaps {});

    let response = client.generate_content(model, &request).await.map_err(|e| {
        tracing::error!(
            keyword = params.keyword(),
            location = params.location(),
            error = %e,
            "business discovery failed"
        );
        DiscoveryError::failed()
    })?;

    let leads = leads_from_response(&response);
    tracing::info!(
        keyword = params.keyword(),
        location = params.location(),
        chunks = response.grounding_chunks().len(),
        leads = leads.len(),
        "business discovery finished"
    );
    Ok(leads)
}

/// Maps the Maps grounding chunks of a response into de-duplicated leads.
///
/// Chunks without a Maps place or with a blank title are dropped.
#[must_use]
pub fn leads_from_response(response: &GenerateContentResponse) -> Vec<Lead> {
    let leads = response
        .grounding_chunks()
        .iter()
        .filter_map(|chunk| chunk.maps.as_ref())
        .filter_map(lead_from_place)
        .collect();
    dedupe_by_name(leads)
}

/// Keeps the first lead for each exact (case-sensitive) name, preserving order.
#[must_use]
pub fn dedupe_by_name(leads: Vec<Lead>) -> Vec<Lead> {
    let mut seen = HashSet::new();
    leads
        .into_iter()
        .filter(|lead| seen.insert(lead.name.clone()))
        .collect()
}

fn lead_from_place(place: &MapsChunk) -> Option<Lead> {
    let name = place.title.as_deref().filter(|t| !t.trim().is_empty())?;
    let address = non_blank(place.address.as_ref()).unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());

    let mut lead = Lead::discovered(name, address);
    lead.google_maps_uri = non_blank(place.uri.as_ref());
    lead.rating = place.rating;
    lead.user_rating_count = place.user_rating_count;
    lead.website = non_blank(place.website_uri.as_ref());
    lead.phone = non_blank(place.phone_number.as_ref());
    Some(lead)
}

fn non_blank(value: Option<&String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty()).cloned()
}
