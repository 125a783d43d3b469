use crate::AppState;
use crate::api::error::AppError;
use crate::services::visibility::Viewer;
use crate::utils::hash::calculate_hash;
use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

pub const COMPANY_IDS_HEADER: &str = "x-company-ids";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
}

/// True when the request carries the configured editor key
pub fn is_editor(headers: &HeaderMap, state: &AppState) -> bool {
    match (bearer_token(headers), state.config.editor_api_key.as_deref()) {
        // Digests, not raw keys: comparison time must not leak the key prefix
        (Some(given), Some(expected)) => {
            calculate_hash(given.as_bytes()) == calculate_hash(expected.as_bytes())
        }
        _ => false,
    }
}

pub async fn editor_auth_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_editor(req.headers(), &state) {
        return Ok(next.run(req).await);
    }

    Err(AppError::Unauthorized(
        "A valid editor key is required".to_string(),
    ))
}

#[async_trait]
impl FromRequestParts<AppState> for Viewer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let company_ids = parts
            .headers
            .get(COMPANY_IDS_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(Viewer::parse_company_ids)
            .unwrap_or_default();

        Ok(Viewer {
            company_ids,
            is_editor: is_editor(&parts.headers, state),
        })
    }
}
