use std::sync::Arc;

use axum::extract::State;
use axum::response::sse::{Event, Sse};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use librate::{wall_clock_timestamp, RateCounter, SAMPLE_PERIOD};
use serde::Serialize;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::{Stream, StreamExt};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) counter: Arc<RateCounter>,
}

pub(crate) fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/rps", get(rps_stream))
        .route("/rps-display", get(rps_display))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct IndexResponse {
    status: &'static str,
    message: &'static str,
    current_rps: u64,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    rps: u64,
}

#[derive(Debug, Serialize)]
struct RateFrame {
    rps: u64,
    timestamp: String,
}

/// Counts the request, then reports the rate published at the last sample
/// boundary. The reported value lags live traffic by up to one interval;
/// monitoring consumers rely on that.
async fn index(State(state): State<AppState>) -> Json<IndexResponse> {
    state.counter.increment();
    let current_rps = state.counter.current_rate();
    tracing::debug!(rps = current_rps, "request received");
    Json(IndexResponse {
        status: "ok",
        message: "Request received",
        current_rps,
    })
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        rps: state.counter.current_rate(),
    })
}

/// Server-sent events: one self-contained rate frame per second, for as
/// long as the client stays connected. Each connection gets its own
/// interval and performs its own atomic read per tick; dropping the
/// response body on disconnect tears the whole thing down.
async fn rps_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let counter = state.counter.clone();
    let stream = IntervalStream::new(tokio::time::interval(SAMPLE_PERIOD)).map(move |_| {
        Event::default().json_data(RateFrame {
            rps: counter.current_rate(),
            timestamp: wall_clock_timestamp(),
        })
    });
    Sse::new(stream)
}

async fn rps_display() -> Html<&'static str> {
    Html(include_str!("../static/rps_display.html"))
}
