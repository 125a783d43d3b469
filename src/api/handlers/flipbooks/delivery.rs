use crate::AppState;
use crate::api::error::AppError;
use crate::config::FlipbookConfig;
use crate::entities::flipbooks;
use crate::services::flipbook_service::FlipbookService;
use crate::services::visibility::Viewer;
use crate::utils::disposition::inline_disposition;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

#[utoipa::path(
    get,
    path = "/flipbook/pdf/{id}",
    params(
        ("id" = i32, Path, description = "Flipbook ID")
    ),
    responses(
        (status = 200, description = "PDF content (application/pdf)"),
        (status = 404, description = "Flipbook not found or not published")
    ),
    tag = "flipbook"
)]
pub async fn get_pdf(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Response {
    deliver(&state, &viewer, &id, None).await
}

#[utoipa::path(
    get,
    path = "/flipbook/pdf/{id}/{token}",
    params(
        ("id" = i32, Path, description = "Flipbook ID"),
        ("token" = String, Path, description = "Access token")
    ),
    responses(
        (status = 200, description = "PDF content (application/pdf)"),
        (status = 403, description = "Access token does not match"),
        (status = 404, description = "Flipbook not found or not published")
    ),
    tag = "flipbook"
)]
pub async fn get_pdf_with_token(
    State(state): State<AppState>,
    viewer: Viewer,
    Path((id, token)): Path<(String, String)>,
) -> Response {
    deliver(&state, &viewer, &id, Some(&token)).await
}

async fn deliver(state: &AppState, viewer: &Viewer, raw_id: &str, token: Option<&str>) -> Response {
    let Ok(id) = raw_id.parse::<i32>() else {
        return not_found();
    };

    match FlipbookService::resolve_for_delivery(&state.db, id, token, viewer).await {
        Ok(flipbook) => {
            FlipbookService::record_view(&state.db, flipbook.id).await;
            pdf_response(&state.config, flipbook)
        }
        Err(AppError::Forbidden(msg)) => {
            tracing::warn!("Rejected access token for flipbook {}", id);
            AppError::Forbidden(msg).into_response()
        }
        Err(AppError::NotFound(_)) => not_found(),
        Err(e) => {
            tracing::error!("Failed to deliver flipbook {}: {}", id, e);
            not_found()
        }
    }
}

fn pdf_response(config: &FlipbookConfig, flipbook: flipbooks::Model) -> Response {
    let disposition = inline_disposition(flipbook.pdf_filename.as_deref(), flipbook.id);
    let cache_control = if config.cache_max_age == 0 {
        "no-cache".to_string()
    } else {
        format!("public, max-age={}", config.cache_max_age)
    };
    let length = flipbook.pdf_file.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime::APPLICATION_PDF.as_ref())
        .header(header::CONTENT_LENGTH, length)
        .header(header::CACHE_CONTROL, cache_control)
        .header(header::ETAG, format!("\"{}\"", flipbook.checksum))
        .header(header::CONTENT_DISPOSITION, disposition)
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(flipbook.pdf_file))
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build PDF response: {}", e);
            not_found()
        })
}

fn not_found() -> Response {
    AppError::NotFound("Flipbook not found".to_string()).into_response()
}
