mod searches;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use prospect_core::{LeadAnalyzer, LeadDiscovery};
use prospect_pipeline::{LeadStore, RunOptions};
use serde::Serialize;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Anything that can both discover and analyse leads for a background run.
pub trait Prospector: LeadDiscovery + LeadAnalyzer + Send + Sync + 'static {}

impl<T> Prospector for T where T: LeadDiscovery + LeadAnalyzer + Send + Sync + 'static {}

pub struct AppState<P> {
    pub prospector: Arc<P>,
    pub store: Arc<LeadStore>,
    pub options: RunOptions,
    /// Held by the background task for the lifetime of a run.
    run_lock: Arc<Mutex<()>>,
    /// Mirrors `run_lock` for readers, which must never touch the mutex.
    running: Arc<AtomicBool>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            prospector: Arc::clone(&self.prospector),
            store: Arc::clone(&self.store),
            options: self.options.clone(),
            run_lock: Arc::clone(&self.run_lock),
            running: Arc::clone(&self.running),
        }
    }
}

impl<P> AppState<P> {
    pub fn new(prospector: Arc<P>, options: RunOptions) -> Self {
        Self {
            prospector,
            store: Arc::new(LeadStore::new()),
            options,
            run_lock: Arc::new(Mutex::new(())),
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether a background run currently holds the run slot.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Claims the single run slot, or `None` if a run is in progress.
    pub(crate) fn try_claim_run(&self) -> Option<RunSlot> {
        let lock = Arc::clone(&self.run_lock).try_lock_owned().ok()?;
        self.running.store(true, Ordering::Release);
        Some(RunSlot {
            _lock: lock,
            running: Arc::clone(&self.running),
        })
    }
}

/// Exclusive claim on the run slot; released when dropped.
pub(crate) struct RunSlot {
    _lock: OwnedMutexGuard<()>,
    running: Arc<AtomicBool>,
}

impl Drop for RunSlot {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Release);
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ])
        .expose_headers([
            header::CONTENT_DISPOSITION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn api_router<P: Prospector>(rate_limit: RateLimitState) -> Router<AppState<P>> {
    Router::new()
        .route("/api/v1/searches", post(searches::start_search::<P>))
        .route("/api/v1/status", get(searches::get_status::<P>))
        .route("/api/v1/leads", get(searches::list_leads::<P>))
        .route("/api/v1/export.csv", get(searches::export_csv::<P>))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app<P: Prospector>(state: AppState<P>, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router::<P>(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    Json(ApiResponse {
        data: HealthData { status: "ok" },
        meta: ResponseMeta::new(req_id.0),
    })
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}
