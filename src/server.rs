//! HTTP server setup.
//!
//! Shared by the `serve` command and the integration tests.

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State},
    http::{header::CACHE_CONTROL, HeaderValue},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api::{self, ApiQuery, PaletteResponse, PlanQuery};
use crate::error::ApiError;
use crate::models::{AppConfig, EffectOverrides, StyleOverrides};
use crate::services::StrokeService;

/// Largest accepted upload
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<StrokeService>,
}

/// Create application state from a loaded configuration.
pub fn create_app_state(config: AppConfig) -> AppState {
    AppState {
        service: Arc::new(StrokeService::new(config)),
    }
}

/// Build the API router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/strokes", post(handle_strokes))
        .route("/api/palette", post(handle_palette))
        .route("/api/effects", get(api::handle_effect_list))
        .route("/api/effects/:kind", get(handle_effect))
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        // Every plan depends on the uploaded image
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}

async fn handle_strokes(
    State(state): State<AppState>,
    query: ApiQuery<PlanQuery>,
    overrides: ApiQuery<StyleOverrides>,
    body: Bytes,
) -> Result<Response, ApiError> {
    api::handle_strokes(State(state.service), query, overrides, body).await
}

async fn handle_palette(
    State(state): State<AppState>,
    query: ApiQuery<PlanQuery>,
    overrides: ApiQuery<StyleOverrides>,
    body: Bytes,
) -> Result<Json<PaletteResponse>, ApiError> {
    api::handle_palette(State(state.service), query, overrides, body).await
}

async fn handle_effect(
    State(state): State<AppState>,
    kind: Path<String>,
    query: ApiQuery<PlanQuery>,
    overrides: ApiQuery<EffectOverrides>,
) -> Result<Response, ApiError> {
    api::handle_effect(State(state.service), kind, query, overrides).await
}
