//! Gemini-backed discovery and enrichment clients.
//!
//! Discovery asks a Maps-grounded model for businesses matching a search and
//! turns the grounding chunks into `pending` leads. Enrichment asks a
//! Search-grounded model for a schema-constrained audit of one lead and never
//! fails outward: every error degrades to a fixed fallback analysis.

pub mod client;
pub mod discovery;
pub mod enrichment;
pub mod error;
pub mod prompts;
pub mod prospector;
pub mod types;

mod retry;

pub use client::GeminiClient;
pub use discovery::{dedupe_by_name, leads_from_response, search_businesses};
pub use enrichment::{analyze_lead, parse_analysis};
pub use error::GeminiError;
pub use prospector::GeminiProspector;
pub use types::{GenerateContentRequest, GenerateContentResponse, Tool};
