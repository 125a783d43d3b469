use crate::AppState;
use crate::api::error::AppError;
use crate::services::flipbook_service::{FlipbookPatch, FlipbookService, NewFlipbook};
use crate::utils::pdf::decode_pdf_payload;
use axum::{
    Json,
    extract::{Multipart, Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use super::types::*;

/// Fields accepted by the multipart create and replace endpoints
#[derive(Default)]
struct UploadForm {
    name: Option<String>,
    description: Option<String>,
    pdf_file: Option<Vec<u8>>,
    pdf_filename: Option<String>,
    sequence: Option<i32>,
    is_published: Option<bool>,
    company_id: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" | "pdf_file" => {
                form.pdf_filename = field.file_name().map(|f| f.to_string());
                let data = field.bytes().await.map_err(multipart_error)?;
                form.pdf_file = Some(data.to_vec());
            }
            "name" => form.name = Some(field.text().await.map_err(multipart_error)?),
            "description" => {
                form.description = Some(field.text().await.map_err(multipart_error)?)
            }
            "pdf_filename" => {
                let text = field.text().await.map_err(multipart_error)?;
                if !text.trim().is_empty() {
                    form.pdf_filename = Some(text);
                }
            }
            "sequence" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.sequence = Some(text.trim().parse().map_err(|_| {
                    AppError::BadRequest("sequence must be an integer".to_string())
                })?);
            }
            "is_published" => {
                let text = field.text().await.map_err(multipart_error)?;
                form.is_published = Some(parse_flag(&text));
            }
            "company_id" => form.company_id = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> AppError {
    let err_msg = e.to_string();
    if err_msg.contains("length limit exceeded") {
        AppError::Validation("The PDF file exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(err_msg)
    }
}

fn json_error(rejection: JsonRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Validation("The PDF file exceeds the maximum allowed size".to_string())
    } else {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Record name for an upload without one: the file name minus a single `.pdf`.
fn name_from_filename(filename: &str) -> String {
    let split = filename.len().saturating_sub(4);
    match filename.get(split..) {
        Some(ext) if ext.eq_ignore_ascii_case(".pdf") => filename[..split].to_string(),
        _ => filename.to_string(),
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "1" | "true" | "on" | "yes"
    )
}

#[utoipa::path(
    post,
    path = "/flipbooks",
    request_body = CreateFlipbookRequest,
    responses(
        (status = 201, description = "Flipbook created", body = FlipbookResponse),
        (status = 400, description = "Invalid PDF or request"),
        (status = 401, description = "Unauthorized")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn create_flipbook(
    State(state): State<AppState>,
    payload: Result<Json<CreateFlipbookRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<FlipbookResponse>), AppError> {
    let Json(req) = payload.map_err(json_error)?;
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let pdf_file = decode_pdf_payload(&req.pdf_file, state.config.max_pdf_size)?;

    let created = FlipbookService::create(
        &state.db,
        NewFlipbook {
            name: req.name,
            description: req.description,
            pdf_file,
            pdf_filename: req.pdf_filename,
            sequence: req.sequence,
            is_published: req.is_published,
            company_id: req.company_id,
            access_token: None,
        },
        state.config.max_pdf_size,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(FlipbookResponse::from_summary(created.into(), &state.config)),
    ))
}

#[utoipa::path(
    post,
    path = "/flipbooks/upload",
    request_body(content = Multipart, description = "PDF file plus metadata fields"),
    responses(
        (status = 201, description = "Flipbook created", body = FlipbookResponse),
        (status = 400, description = "Invalid PDF or request"),
        (status = 401, description = "Unauthorized")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn upload_flipbook(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FlipbookResponse>), AppError> {
    let form = read_upload_form(multipart).await?;

    let pdf_file = form
        .pdf_file
        .ok_or(AppError::Validation("A PDF file is required".to_string()))?;
    let name = form
        .name
        .or_else(|| form.pdf_filename.as_deref().map(name_from_filename))
        .unwrap_or_default();

    let created = FlipbookService::create(
        &state.db,
        NewFlipbook {
            name,
            description: form.description,
            pdf_file,
            pdf_filename: form.pdf_filename,
            sequence: form.sequence,
            is_published: form.is_published.unwrap_or(false),
            company_id: form.company_id,
            access_token: None,
        },
        state.config.max_pdf_size,
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(FlipbookResponse::from_summary(created.into(), &state.config)),
    ))
}

#[utoipa::path(
    get,
    path = "/flipbooks",
    responses(
        (status = 200, description = "All flipbooks, published or not", body = Vec<FlipbookResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn list_all_flipbooks(
    State(state): State<AppState>,
) -> Result<Json<Vec<FlipbookResponse>>, AppError> {
    let items = FlipbookService::list_all(&state.db).await?;
    Ok(Json(
        items
            .into_iter()
            .map(|summary| FlipbookResponse::from_summary(summary, &state.config))
            .collect(),
    ))
}

#[utoipa::path(
    get,
    path = "/flipbooks/{id}",
    params(("id" = i32, Path, description = "Flipbook ID")),
    responses(
        (status = 200, description = "Flipbook metadata", body = FlipbookResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Flipbook not found")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn get_flipbook(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<FlipbookResponse>, AppError> {
    let summary = FlipbookService::get(&state.db, id).await?;
    Ok(Json(FlipbookResponse::from_summary(summary, &state.config)))
}

#[utoipa::path(
    put,
    path = "/flipbooks/{id}",
    params(("id" = i32, Path, description = "Flipbook ID")),
    request_body = UpdateFlipbookRequest,
    responses(
        (status = 200, description = "Flipbook updated", body = FlipbookResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Flipbook not found")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn update_flipbook(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateFlipbookRequest>,
) -> Result<Json<FlipbookResponse>, AppError> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let summary = FlipbookService::update_details(
        &state.db,
        id,
        FlipbookPatch {
            name: req.name,
            description: req.description,
            pdf_filename: req.pdf_filename,
            sequence: req.sequence,
            is_published: req.is_published,
            company_id: req.company_id,
        },
    )
    .await?;

    Ok(Json(FlipbookResponse::from_summary(summary, &state.config)))
}

#[utoipa::path(
    put,
    path = "/flipbooks/{id}/pdf",
    params(("id" = i32, Path, description = "Flipbook ID")),
    request_body(content = Multipart, description = "Replacement PDF file"),
    responses(
        (status = 200, description = "PDF replaced", body = FlipbookResponse),
        (status = 400, description = "Invalid PDF"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Flipbook not found")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn replace_flipbook_pdf(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    multipart: Multipart,
) -> Result<Json<FlipbookResponse>, AppError> {
    let form = read_upload_form(multipart).await?;
    let pdf_file = form
        .pdf_file
        .ok_or(AppError::Validation("A PDF file is required".to_string()))?;

    let summary = FlipbookService::replace_pdf(
        &state.db,
        id,
        pdf_file,
        form.pdf_filename,
        state.config.max_pdf_size,
    )
    .await?;

    Ok(Json(FlipbookResponse::from_summary(summary, &state.config)))
}

#[utoipa::path(
    post,
    path = "/flipbooks/{id}/token",
    params(("id" = i32, Path, description = "Flipbook ID")),
    responses(
        (status = 200, description = "New access token", body = TokenResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Flipbook not found")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn regenerate_token(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TokenResponse>, AppError> {
    let access_token = FlipbookService::regenerate_token(&state.db, id).await?;
    Ok(Json(TokenResponse {
        id,
        token_url: format!("{}/{}", state.config.pdf_url(id), access_token),
        access_token,
    }))
}

#[utoipa::path(
    delete,
    path = "/flipbooks/{id}",
    params(("id" = i32, Path, description = "Flipbook ID")),
    responses(
        (status = 204, description = "Flipbook deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Flipbook not found")
    ),
    security(("editor_key" = [])),
    tag = "editor"
)]
pub async fn delete_flipbook(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    FlipbookService::delete(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag(" ON "));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(""));
    }

    #[test]
    fn test_name_from_filename() {
        assert_eq!(name_from_filename("menu.pdf"), "menu");
        assert_eq!(name_from_filename("MENU.PDF"), "MENU");
        assert_eq!(name_from_filename("menu.pdf.pdf"), "menu.pdf");
        assert_eq!(name_from_filename("notes.txt"), "notes.txt");
        assert_eq!(name_from_filename("pdf"), "pdf");
        assert_eq!(name_from_filename("résumé.pdf"), "résumé");
    }
}
