use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::Utc;
use tower_http::cors::CorsLayer;

use crate::grid::{compose, ScheduleGrid};
use crate::ingest::scheduler::ScheduleSnapshot;
use crate::schedule::{ScheduleItem, DISPLAY_TZ};
use crate::window::select_window_with_horizon;

#[derive(Clone)]
pub struct AppState {
    pub snapshot: ScheduleSnapshot,
    pub horizon_ms: i64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/grid", get(grid))
        .route("/api/schedule/{source}", get(schedule_for_source))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(serde::Serialize)]
struct GridResponse {
    #[serde(flatten)]
    grid: ScheduleGrid,
    /// Sources that failed to fetch in the last refresh; their columns
    /// are simply absent from the grid.
    failed: Vec<String>,
}

/// The composed timeline for the current snapshot. "now" is captured
/// once here and threaded through every stage, so the window, the
/// boundaries and the sizing all agree on the same instant.
async fn grid(State(state): State<AppState>) -> Json<GridResponse> {
    let now = Utc::now().with_timezone(&DISPLAY_TZ);
    let fetch = state
        .snapshot
        .read()
        .expect("snapshot lock poisoned")
        .clone();

    let items = select_window_with_horizon(&fetch.per_source(), now, state.horizon_ms);
    let grid = compose(&items, now);

    Json(GridResponse {
        grid,
        failed: fetch.failed,
    })
}

/// One provider's raw backfilled schedule, as last fetched.
async fn schedule_for_source(
    State(state): State<AppState>,
    Path(source): Path<String>,
) -> Result<Json<Vec<ScheduleItem>>, StatusCode> {
    let fetch = state.snapshot.read().expect("snapshot lock poisoned");
    fetch
        .schedules
        .iter()
        .find(|s| s.source == source)
        .map(|s| Json(s.items.clone()))
        .ok_or(StatusCode::NOT_FOUND)
}
