use crate::AppState;
use crate::api::error::AppError;
use crate::config::FlipbookConfig;
use crate::services::flipbook_service::{FlipbookService, FlipbookSummary};
use crate::services::visibility::Viewer;
use crate::utils::html::escape;
use axum::{
    extract::{Path, State},
    response::Html,
};

#[utoipa::path(
    get,
    path = "/flipbook/view/{id}",
    params(
        ("id" = i32, Path, description = "Flipbook ID")
    ),
    responses(
        (status = 200, description = "Viewer page (text/html)"),
        (status = 404, description = "Flipbook not found or not published")
    ),
    tag = "flipbook"
)]
pub async fn view_flipbook(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let id = id
        .parse::<i32>()
        .map_err(|_| AppError::NotFound("Flipbook not found".to_string()))?;
    let flipbook = FlipbookService::find_visible(&state.db, id, &viewer).await?;
    Ok(Html(render_viewer_page(&flipbook, &state.config)))
}

/// Standalone page hosting the page-flip widget for one flipbook.
pub fn render_viewer_page(flipbook: &FlipbookSummary, config: &FlipbookConfig) -> String {
    let name = escape(&flipbook.name);
    let description = flipbook
        .description
        .as_deref()
        .map(|d| format!("    <p class=\"flipbook-description\">{}</p>\n", escape(d)))
        .unwrap_or_default();
    let pdf_url = escape(&config.pdf_url(flipbook.id));
    let assets = escape(&config.assets_base_url);
    let pages = flipbook
        .page_count
        .map(|p| p.to_string())
        .unwrap_or_default();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{name}</title>
    <link rel="stylesheet" href="{assets}/css/flipbook_styles.css">
</head>
<body>
<main class="flipbook-page">
    <h1 class="flipbook-title">{name}</h1>
{description}    <div class="flipbook-container"
         data-flipbook-id="{id}"
         data-pdf-url="{pdf_url}"
         data-page-count="{pages}">
        <div class="flipbook-loading">Loading…</div>
        <div class="flipbook" data-role="flipbook"></div>
        <nav class="flipbook-controls">
            <button type="button" data-action="previous">&lsaquo;</button>
            <span class="flipbook-page-indicator"></span>
            <button type="button" data-action="next">&rsaquo;</button>
            <button type="button" data-action="fullscreen">&#x26F6;</button>
        </nav>
    </div>
</main>
<script src="{assets}/lib/pdfjs/pdf.min.js"></script>
<script src="{assets}/lib/turnjs/turn.min.js"></script>
<script>window.FLIPBOOK_PDF_WORKER = "{assets}/lib/pdfjs/pdf.worker.min.js";</script>
<script src="{assets}/js/flipbook_widget.js"></script>
</body>
</html>
"#,
        id = flipbook.id,
    )
}
