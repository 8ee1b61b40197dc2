use axum::{
    body::Bytes,
    extract::State,
    http::header,
    response::{IntoResponse, Json, Response},
};
use raster_strokes::{PlanMetrics, Region, StrokeCommand, SurfaceSize};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::ApiQuery;
use crate::error::ApiError;
use crate::models::StyleOverrides;
use crate::services::{PaletteSwatch, PlanRequest, SourceInfo, StrokeService};

// Surfaces above this size are rejected before any work is done
const MAX_SURFACE_WIDTH: u32 = 4000;
const MAX_SURFACE_HEIGHT: u32 = 4000;

/// Query parameters shared by the stroke and palette endpoints
#[derive(Debug, Default, Deserialize)]
pub struct PlanQuery {
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    /// Region as fractions of the surface; all four or none
    #[serde(default)]
    pub region_x: Option<f64>,
    #[serde(default)]
    pub region_y: Option<f64>,
    #[serde(default)]
    pub region_width: Option<f64>,
    #[serde(default)]
    pub region_height: Option<f64>,
    #[serde(default)]
    pub max_colors: Option<usize>,
    /// `json` (default) or `wire`
    #[serde(default)]
    pub format: Option<String>,
}

impl PlanQuery {
    pub(crate) fn surface(&self, fallback: SurfaceSize) -> Result<SurfaceSize, ApiError> {
        let width = self.width.unwrap_or(fallback.width);
        let height = self.height.unwrap_or(fallback.height);
        if width == 0 || height == 0 {
            return Err(ApiError::BadRequest(
                "Surface width and height must be positive".to_string(),
            ));
        }
        if width > MAX_SURFACE_WIDTH || height > MAX_SURFACE_HEIGHT {
            return Err(ApiError::BadRequest(format!(
                "Surface {width}x{height} exceeds {MAX_SURFACE_WIDTH}x{MAX_SURFACE_HEIGHT}"
            )));
        }
        Ok(SurfaceSize::new(width, height))
    }

    pub(crate) fn region(&self) -> Result<Option<Region>, ApiError> {
        match (
            self.region_x,
            self.region_y,
            self.region_width,
            self.region_height,
        ) {
            (None, None, None, None) => Ok(None),
            (Some(x), Some(y), Some(w), Some(h)) => Ok(Some(Region::new(x, y, w, h))),
            _ => Err(ApiError::BadRequest(
                "Region needs region_x, region_y, region_width and region_height".to_string(),
            )),
        }
    }

    /// Whether `format=wire` was requested
    pub(crate) fn wire(&self) -> Result<bool, ApiError> {
        match self.format.as_deref() {
            None | Some("json") => Ok(false),
            Some("wire") => Ok(true),
            Some(other) => Err(ApiError::BadRequest(format!(
                "Unknown format '{other}', expected json or wire"
            ))),
        }
    }
}

/// One wire frame per line as a plain-text body
pub(crate) fn wire_response(commands: &[StrokeCommand]) -> Response {
    let mut text = String::new();
    for command in commands {
        text.push_str(&command.to_wire());
        text.push('\n');
    }
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], text).into_response()
}

/// Response body for a compiled drawing
#[derive(Debug, Serialize)]
pub struct StrokesResponse {
    pub source: SourceInfo,
    pub palette: Vec<PaletteSwatch>,
    pub metrics: PlanMetrics,
    pub commands: Vec<StrokeCommand>,
}

/// Response body for palette inspection
#[derive(Debug, Serialize)]
pub struct PaletteResponse {
    pub source: SourceInfo,
    pub palette: Vec<PaletteSwatch>,
}

/// Compile a PNG body into stroke commands
///
/// Style fields may be overridden through query parameters. With
/// `format=wire` the body is one wire frame per line instead of JSON.
pub async fn handle_strokes(
    State(service): State<Arc<StrokeService>>,
    ApiQuery(query): ApiQuery<PlanQuery>,
    ApiQuery(overrides): ApiQuery<StyleOverrides>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let wire = query.wire()?;

    let base = service.default_request();
    let request = PlanRequest {
        surface: query.surface(base.surface)?,
        region: query.region()?,
        style: overrides.apply(&base.style),
        max_colors: query.max_colors.unwrap_or(base.max_colors),
    };

    tracing::info!(
        bytes = body.len(),
        width = request.surface.width,
        height = request.surface.height,
        region = request.region.is_some(),
        "Stroke request"
    );

    let drawing = service.compile_blocking(body.to_vec(), request).await?;

    if wire {
        return Ok(wire_response(&drawing.plan.commands));
    }

    Ok(Json(StrokesResponse {
        source: drawing.source,
        palette: drawing.palette,
        metrics: drawing.plan.metrics.clone(),
        commands: drawing.plan.commands.clone(),
    })
    .into_response())
}

/// Report the palette and per-color usage of a PNG body
pub async fn handle_palette(
    State(service): State<Arc<StrokeService>>,
    ApiQuery(query): ApiQuery<PlanQuery>,
    ApiQuery(overrides): ApiQuery<StyleOverrides>,
    body: Bytes,
) -> Result<Json<PaletteResponse>, ApiError> {
    let base = service.default_request();
    let style = overrides.apply(&base.style);
    let max_colors = query.max_colors.unwrap_or(base.max_colors);

    let (source, palette) = service
        .palette_blocking(body.to_vec(), max_colors, style)
        .await?;

    Ok(Json(PaletteResponse { source, palette }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_all_or_nothing() {
        let query = PlanQuery {
            region_x: Some(0.1),
            ..Default::default()
        };
        assert!(matches!(query.region(), Err(ApiError::BadRequest(_))));

        let query = PlanQuery {
            region_x: Some(0.1),
            region_y: Some(0.2),
            region_width: Some(0.5),
            region_height: Some(0.5),
            ..Default::default()
        };
        let region = query.region().unwrap().unwrap();
        assert_eq!(region.x(), 0.1);

        assert!(PlanQuery::default().region().unwrap().is_none());
    }

    #[test]
    fn test_surface_limits() {
        let fallback = SurfaceSize::new(800, 600);
        assert_eq!(PlanQuery::default().surface(fallback).unwrap(), fallback);

        let query = PlanQuery {
            width: Some(0),
            ..Default::default()
        };
        assert!(query.surface(fallback).is_err());

        let query = PlanQuery {
            width: Some(MAX_SURFACE_WIDTH + 1),
            ..Default::default()
        };
        assert!(query.surface(fallback).is_err());
    }
}
