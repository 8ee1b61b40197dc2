use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use raster_strokes::{
    EffectArea, EffectKind, EffectTiming, ParseModeError, PlanMetrics, StrokeCommand,
};
use serde::Serialize;
use std::sync::Arc;

use super::strokes::wire_response;
use super::{ApiQuery, PlanQuery};
use crate::error::ApiError;
use crate::models::EffectOverrides;
use crate::services::StrokeService;

/// One entry of the effect catalogue
#[derive(Debug, Serialize)]
pub struct EffectInfo {
    pub kind: EffectKind,
    pub label: &'static str,
    pub description: &'static str,
}

/// What was traced, and how to replay it
#[derive(Debug, Serialize)]
pub struct EffectSummary {
    pub kind: EffectKind,
    pub label: &'static str,
    pub seed: u64,
    pub paths: usize,
    pub timing: EffectTiming,
    pub area: EffectArea,
}

/// Response body for a traced effect
#[derive(Debug, Serialize)]
pub struct EffectResponse {
    pub effect: EffectSummary,
    pub metrics: PlanMetrics,
    pub commands: Vec<StrokeCommand>,
}

/// List the available effects
pub async fn handle_effect_list() -> Json<Vec<EffectInfo>> {
    Json(
        EffectKind::ALL
            .into_iter()
            .map(|kind| EffectInfo {
                kind,
                label: kind.label(),
                description: kind.description(),
            })
            .collect(),
    )
}

/// Trace one effect over the surface or a region of it
///
/// Surface, region and `format` use the same query parameters as
/// `/api/strokes`; `density`, `tempo`, `mirror`, `jitter`, `seed` and
/// `color` override the configured effect defaults.
pub async fn handle_effect(
    State(service): State<Arc<StrokeService>>,
    Path(kind): Path<String>,
    ApiQuery(query): ApiQuery<PlanQuery>,
    ApiQuery(overrides): ApiQuery<EffectOverrides>,
) -> Result<Response, ApiError> {
    let kind: EffectKind = kind
        .parse()
        .map_err(|e: ParseModeError| ApiError::NotFound(e.to_string()))?;
    let wire = query.wire()?;

    let mut request = service.default_effect_request(kind);
    request.surface = query.surface(request.surface)?;
    request.region = query.region()?;
    request.options = overrides.apply(&request.options);
    request.color = overrides
        .color_or(request.color)
        .map_err(|e| ApiError::BadRequest(format!("Invalid color: {e}")))?;

    tracing::info!(
        effect = %kind,
        width = request.surface.width,
        height = request.surface.height,
        region = request.region.is_some(),
        "Effect request"
    );

    let effect = service.effect(&request)?;

    if wire {
        return Ok(wire_response(&effect.plan.commands));
    }

    Ok(Json(EffectResponse {
        effect: EffectSummary {
            kind: effect.kind,
            label: effect.kind.label(),
            seed: effect.seed,
            paths: effect.paths,
            timing: effect.timing,
            area: effect.area,
        },
        metrics: effect.plan.metrics,
        commands: effect.plan.commands,
    })
    .into_response())
}
