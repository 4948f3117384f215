use super::state::ApiState;
use axum::Json;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;
use chub_derive::{api_handler, api_model};
use chub_domain::constants::SYSTEM_TAG;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::warn;

static STARTED: LazyLock<Instant> = LazyLock::new(Instant::now);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub(super) enum Status {
    Up,
    Down,
}

/// Liveness report including the customer store.
#[api_model]
pub(super) struct HealthReport {
    /// `up` only when every dependency is reachable
    status: Status,
    database: Status,
    version: &'static str,
    /// Seconds since the first request
    uptime: u64,
    /// Registered feature slices
    slices: Vec<String>,
}

impl HealthReport {
    fn new(database: Status, slices: Vec<String>) -> Self {
        Self {
            status: database,
            database,
            version: env!("CARGO_PKG_VERSION"),
            uptime: STARTED.elapsed().as_secs(),
            slices,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self.status {
            Status::Up => StatusCode::OK,
            Status::Down => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

#[api_handler(
    get,
    path = "/health",
    responses(
        (status = OK, description = "Service and store are reachable", body = HealthReport),
        (status = SERVICE_UNAVAILABLE, description = "Customer store is unreachable", body = HealthReport),
    ),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health(State(state): State<ApiState>) -> impl IntoResponse {
    let database = match state.database.health().await {
        Ok(()) => Status::Up,
        Err(e) => {
            warn!(error = %e, "Customer store health check failed");
            Status::Down
        },
    };

    let mut slices: Vec<String> = state.slice_names().map(str::to_owned).collect();
    slices.sort_unstable();
    let report = HealthReport::new(database, slices);

    (
        report.status_code(),
        [(header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"), (header::PRAGMA, "no-cache")],
        Json(report),
    )
}
