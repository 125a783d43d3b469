use crate::config::FlipbookConfig;
use crate::services::flipbook_service::FlipbookSummary;
use crate::utils::format::format_file_size;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

#[derive(Serialize, ToSchema, Debug)]
pub struct FlipbookListEntry {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub pdf_url: String,
    pub view_count: i64,
    /// Human readable, e.g. `2.4 MB`
    pub file_size: String,
}

impl FlipbookListEntry {
    pub fn from_summary(summary: FlipbookSummary, config: &FlipbookConfig) -> Self {
        Self {
            pdf_url: config.pdf_url(summary.id),
            file_size: format_file_size(summary.file_size.max(0) as u64),
            id: summary.id,
            name: summary.name,
            description: summary.description,
            view_count: summary.view_count,
        }
    }
}

/// `{status: "success", flipbooks: [...]}` or `{status: "error", message}`
#[derive(Serialize, ToSchema, Debug)]
pub struct FlipbookListResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flipbooks: Option<Vec<FlipbookListEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FlipbookListResponse {
    pub fn success(flipbooks: Vec<FlipbookListEntry>) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            flipbooks: Some(flipbooks),
            message: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR.to_string(),
            flipbooks: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize, ToSchema, Debug)]
pub struct FlipbookStatsResponse {
    pub id: i32,
    pub name: String,
    pub view_count: i64,
    pub last_viewed: Option<chrono::DateTime<Utc>>,
    pub file_size: i64,
    pub file_size_human: String,
    pub page_count: Option<i32>,
}

impl From<FlipbookSummary> for FlipbookStatsResponse {
    fn from(summary: FlipbookSummary) -> Self {
        Self {
            file_size_human: format_file_size(summary.file_size.max(0) as u64),
            id: summary.id,
            name: summary.name,
            view_count: summary.view_count,
            last_viewed: summary.last_viewed,
            file_size: summary.file_size,
            page_count: summary.page_count,
        }
    }
}

/// Full record as seen by editors
#[derive(Serialize, ToSchema, Debug)]
pub struct FlipbookResponse {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub pdf_filename: Option<String>,
    pub file_size: i64,
    pub file_size_human: String,
    pub checksum: String,
    pub page_count: Option<i32>,
    pub access_token: String,
    pub pdf_url: String,
    pub token_url: String,
    pub view_count: i64,
    pub last_viewed: Option<chrono::DateTime<Utc>>,
    pub sequence: i32,
    pub is_published: bool,
    pub company_id: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}

impl FlipbookResponse {
    pub fn from_summary(summary: FlipbookSummary, config: &FlipbookConfig) -> Self {
        let pdf_url = config.pdf_url(summary.id);
        Self {
            token_url: format!("{}/{}", pdf_url, summary.access_token),
            pdf_url,
            file_size_human: format_file_size(summary.file_size.max(0) as u64),
            id: summary.id,
            name: summary.name,
            description: summary.description,
            pdf_filename: summary.pdf_filename,
            file_size: summary.file_size,
            checksum: summary.checksum,
            page_count: summary.page_count,
            access_token: summary.access_token,
            view_count: summary.view_count,
            last_viewed: summary.last_viewed,
            sequence: summary.sequence,
            is_published: summary.is_published,
            company_id: summary.company_id,
            created_at: summary.created_at,
            updated_at: summary.updated_at,
        }
    }
}

#[derive(Deserialize, ToSchema, Validate)]
pub struct CreateFlipbookRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,
    pub description: Option<String>,
    /// PDF content, base64 encoded
    #[validate(length(min = 1, message = "A PDF file is required"))]
    pub pdf_file: String,
    #[validate(length(max = 255, message = "Filename is too long"))]
    pub pdf_filename: Option<String>,
    pub sequence: Option<i32>,
    #[serde(default)]
    pub is_published: bool,
    pub company_id: Option<String>,
}

#[derive(Deserialize, ToSchema, Validate, Default)]
pub struct UpdateFlipbookRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 255, message = "Filename is too long"))]
    pub pdf_filename: Option<String>,
    pub sequence: Option<i32>,
    pub is_published: Option<bool>,
    pub company_id: Option<String>,
}

#[derive(Serialize, ToSchema, Debug)]
pub struct TokenResponse {
    pub id: i32,
    pub access_token: String,
    pub token_url: String,
}
