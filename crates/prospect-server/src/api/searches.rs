use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use prospect_core::{Lead, SearchParams};
use prospect_pipeline::{
    export_filename, leads_to_csv, run_prospecting, Progress, RunOutcome, RunPhase,
};
use serde::{Deserialize, Serialize};

use super::{ApiError, ApiResponse, AppState, Prospector, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct SearchRequest {
    keyword: String,
    location: String,
}

#[derive(Debug, Serialize)]
pub(super) struct SearchAccepted {
    keyword: String,
    location: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct StatusData {
    phase: RunPhase,
    running: bool,
    status_message: String,
    error: Option<String>,
    progress: Progress,
    search: Option<SearchParams>,
}

/// Starts a prospecting run in the background. Only one run at a time.
pub(super) async fn start_search<P: Prospector>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) =
        payload.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;
    let params = SearchParams::new(&body.keyword, &body.location)
        .map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.to_string()))?;

    let Some(slot) = state.try_claim_run() else {
        return Err(ApiError::new(
            req_id.0,
            "conflict",
            "a search is already running",
        ));
    };

    let accepted = SearchAccepted {
        keyword: params.keyword().to_string(),
        location: params.location().to_string(),
    };

    tokio::spawn(async move {
        let _slot = slot;
        let prospector = &*state.prospector;
        match run_prospecting(&state.store, prospector, prospector, &params, &state.options).await
        {
            Ok(RunOutcome::NoResults) => tracing::info!("search finished without results"),
            Ok(RunOutcome::Completed { total, errored }) => {
                tracing::info!(total, errored, "search finished");
            }
            Err(e) => tracing::warn!(error = %e, "search failed"),
        }
    });

    Ok((
        StatusCode::ACCEPTED,
        Json(ApiResponse {
            data: accepted,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}

pub(super) async fn get_status<P: Prospector>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let board = state.store.snapshot();
    let progress = board.progress();
    Json(ApiResponse {
        data: StatusData {
            phase: board.phase,
            running: state.is_running(),
            status_message: board.status_message,
            error: board.error,
            progress,
            search: board.search,
        },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub(super) async fn list_leads<P: Prospector>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let leads: Vec<Lead> = state.store.snapshot().leads().to_vec();
    Json(ApiResponse {
        data: leads,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// Downloads the CSV export of the current board.
pub(super) async fn export_csv<P: Prospector>(
    State(state): State<AppState<P>>,
    Extension(req_id): Extension<RequestId>,
) -> Result<impl IntoResponse, ApiError> {
    let board = state.store.snapshot();
    let csv = leads_to_csv(board.leads())
        .ok_or_else(|| ApiError::new(req_id.0, "not_found", "no exportable leads"))?;
    let filename = export_filename(Utc::now().date_naive());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        csv,
    ))
}
