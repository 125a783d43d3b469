use crate::AppState;
use crate::services::flipbook_service::FlipbookService;
use crate::services::visibility::Viewer;
use axum::{Json, extract::State};

use super::types::*;

/// Published flipbooks for the website widget.
///
/// Always answers 200; failures are reported in the payload.
#[utoipa::path(
    post,
    path = "/flipbook/list",
    responses(
        (status = 200, description = "Published flipbooks, or an error payload", body = FlipbookListResponse)
    ),
    tag = "flipbook"
)]
pub async fn list_flipbooks(
    State(state): State<AppState>,
    viewer: Viewer,
) -> Json<FlipbookListResponse> {
    match FlipbookService::list_visible(&state.db, &viewer).await {
        Ok(items) => {
            let entries = items
                .into_iter()
                .map(|summary| FlipbookListEntry::from_summary(summary, &state.config))
                .collect();
            Json(FlipbookListResponse::success(entries))
        }
        Err(e) => {
            tracing::error!("Failed to list flipbooks: {}", e);
            Json(FlipbookListResponse::error("Could not load flipbooks"))
        }
    }
}
