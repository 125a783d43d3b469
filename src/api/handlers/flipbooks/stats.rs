use crate::AppState;
use crate::api::error::AppError;
use crate::services::flipbook_service::FlipbookService;
use crate::services::visibility::Viewer;
use axum::{
    Json,
    extract::{Path, State},
};

use super::types::*;

#[utoipa::path(
    get,
    path = "/flipbook/stats/{id}",
    params(
        ("id" = i32, Path, description = "Flipbook ID")
    ),
    responses(
        (status = 200, description = "View statistics", body = FlipbookStatsResponse),
        (status = 404, description = "Flipbook not found or not published")
    ),
    tag = "flipbook"
)]
pub async fn get_stats(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Json<FlipbookStatsResponse>, AppError> {
    let id = id
        .parse::<i32>()
        .map_err(|_| AppError::NotFound("Flipbook not found".to_string()))?;
    let summary = FlipbookService::find_visible(&state.db, id, &viewer).await?;
    Ok(Json(summary.into()))
}
