use crate::api::error::AppError;
use crate::entities::{flipbooks, prelude::*};
use crate::services::visibility::{self, Access, Viewer};
use crate::utils::{hash::calculate_hash, pdf, token::generate_access_token};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, FromQueryResult,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, sea_query::Expr,
};

pub const DEFAULT_SEQUENCE: i32 = 10;

/// Input for a new flipbook
#[derive(Debug, Clone, Default)]
pub struct NewFlipbook {
    pub name: String,
    pub description: Option<String>,
    pub pdf_file: Vec<u8>,
    pub pdf_filename: Option<String>,
    pub sequence: Option<i32>,
    pub is_published: bool,
    pub company_id: Option<String>,
    /// Pre-assigned token; generated when absent
    pub access_token: Option<String>,
}

/// Metadata changes. `None` leaves a field untouched; an empty string clears
/// an optional text field.
#[derive(Debug, Clone, Default)]
pub struct FlipbookPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pdf_filename: Option<String>,
    pub sequence: Option<i32>,
    pub is_published: Option<bool>,
    pub company_id: Option<String>,
}

/// A flipbook row without its PDF payload
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct FlipbookSummary {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub pdf_filename: Option<String>,
    pub file_size: i64,
    pub checksum: String,
    pub page_count: Option<i32>,
    pub access_token: String,
    pub view_count: i64,
    pub last_viewed: Option<DateTime<Utc>>,
    pub sequence: i32,
    pub is_published: bool,
    pub company_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<flipbooks::Model> for FlipbookSummary {
    fn from(model: flipbooks::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            pdf_filename: model.pdf_filename,
            file_size: model.file_size,
            checksum: model.checksum,
            page_count: model.page_count,
            access_token: model.access_token,
            view_count: model.view_count,
            last_viewed: model.last_viewed,
            sequence: model.sequence,
            is_published: model.is_published,
            company_id: model.company_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Facts derived from a validated PDF payload
struct PdfFacts {
    file_size: i64,
    checksum: String,
    page_count: Option<i32>,
}

pub struct FlipbookService;

impl FlipbookService {
    /// Store a new flipbook after validating its PDF
    pub async fn create(
        db: &DatabaseConnection,
        new: NewFlipbook,
        max_pdf_size: usize,
    ) -> Result<flipbooks::Model, AppError> {
        let name = required_name(&new.name)?;
        let facts = inspect_pdf(&new.pdf_file, max_pdf_size)?;

        let access_token = new
            .access_token
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(generate_access_token);

        let now = Utc::now();
        let flipbook = flipbooks::ActiveModel {
            name: Set(name),
            description: Set(non_empty(new.description)),
            pdf_file: Set(new.pdf_file),
            pdf_filename: Set(non_empty(new.pdf_filename)),
            file_size: Set(facts.file_size),
            checksum: Set(facts.checksum),
            page_count: Set(facts.page_count),
            access_token: Set(access_token),
            view_count: Set(0),
            last_viewed: Set(None),
            sequence: Set(new.sequence.unwrap_or(DEFAULT_SEQUENCE)),
            is_published: Set(new.is_published),
            company_id: Set(non_empty(new.company_id)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let created = flipbook.insert(db).await?;
        tracing::info!(
            "Created flipbook {} '{}' ({} bytes)",
            created.id,
            created.name,
            created.file_size
        );
        Ok(created)
    }

    /// Update metadata fields; the PDF payload is left alone
    pub async fn update_details(
        db: &DatabaseConnection,
        id: i32,
        patch: FlipbookPatch,
    ) -> Result<FlipbookSummary, AppError> {
        let existing = Self::find_model(db, id).await?;
        let mut active: flipbooks::ActiveModel = existing.into();

        if let Some(name) = patch.name {
            active.name = Set(required_name(&name)?);
        }
        if let Some(description) = patch.description {
            active.description = Set(non_empty(Some(description)));
        }
        if let Some(filename) = patch.pdf_filename {
            active.pdf_filename = Set(non_empty(Some(filename)));
        }
        if let Some(sequence) = patch.sequence {
            active.sequence = Set(sequence);
        }
        if let Some(published) = patch.is_published {
            active.is_published = Set(published);
        }
        if let Some(company) = patch.company_id {
            active.company_id = Set(non_empty(Some(company)));
        }
        active.updated_at = Set(Utc::now());

        active.update(db).await?;
        Self::get(db, id).await
    }

    /// Replace the PDF payload, re-validating it and recomputing derived fields
    pub async fn replace_pdf(
        db: &DatabaseConnection,
        id: i32,
        pdf_file: Vec<u8>,
        pdf_filename: Option<String>,
        max_pdf_size: usize,
    ) -> Result<FlipbookSummary, AppError> {
        let facts = inspect_pdf(&pdf_file, max_pdf_size)?;
        let existing = Self::find_model(db, id).await?;
        let mut active: flipbooks::ActiveModel = existing.into();

        active.pdf_file = Set(pdf_file);
        active.file_size = Set(facts.file_size);
        active.checksum = Set(facts.checksum);
        active.page_count = Set(facts.page_count);
        if let Some(filename) = non_empty(pdf_filename) {
            active.pdf_filename = Set(Some(filename));
        }
        active.updated_at = Set(Utc::now());

        active.update(db).await?;
        tracing::info!("Replaced PDF of flipbook {} ({} bytes)", id, facts.file_size);
        Self::get(db, id).await
    }

    /// Issue a fresh access token, invalidating the previous one
    pub async fn regenerate_token(db: &DatabaseConnection, id: i32) -> Result<String, AppError> {
        let existing = Self::find_model(db, id).await?;
        let token = generate_access_token();

        let mut active: flipbooks::ActiveModel = existing.into();
        active.access_token = Set(token.clone());
        active.updated_at = Set(Utc::now());
        active.update(db).await?;

        tracing::info!("Regenerated access token of flipbook {}", id);
        Ok(token)
    }

    pub async fn delete(db: &DatabaseConnection, id: i32) -> Result<(), AppError> {
        let result = Flipbooks::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound("Flipbook not found".to_string()));
        }
        tracing::info!("Deleted flipbook {}", id);
        Ok(())
    }

    /// Any flipbook by id, regardless of publication (editor use)
    pub async fn get(db: &DatabaseConnection, id: i32) -> Result<FlipbookSummary, AppError> {
        summaries()
            .filter(flipbooks::Column::Id.eq(id))
            .into_model::<FlipbookSummary>()
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Flipbook not found".to_string()))
    }

    /// Every flipbook ordered by (sequence, name) (editor use)
    pub async fn list_all(db: &DatabaseConnection) -> Result<Vec<FlipbookSummary>, AppError> {
        Self::list_where(db, Condition::all()).await
    }

    /// Published flipbooks the viewer may see, ordered by (sequence, name)
    pub async fn list_visible(
        db: &DatabaseConnection,
        viewer: &Viewer,
    ) -> Result<Vec<FlipbookSummary>, AppError> {
        Self::list_where(db, visibility::condition(viewer, Access::Direct)).await
    }

    /// A single flipbook the viewer may see
    pub async fn find_visible(
        db: &DatabaseConnection,
        id: i32,
        viewer: &Viewer,
    ) -> Result<FlipbookSummary, AppError> {
        summaries()
            .filter(flipbooks::Column::Id.eq(id))
            .filter(visibility::condition(viewer, Access::Direct))
            .into_model::<FlipbookSummary>()
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Flipbook not found".to_string()))
    }

    /// Resolve the record whose PDF is about to be streamed.
    ///
    /// Missing, unpublished or foreign-tenant records and empty payloads are
    /// `NotFound`. A supplied token that does not match is `Forbidden` when the
    /// caller could see the record anyway and `NotFound` otherwise.
    pub async fn resolve_for_delivery(
        db: &DatabaseConnection,
        id: i32,
        token: Option<&str>,
        viewer: &Viewer,
    ) -> Result<flipbooks::Model, AppError> {
        let access = if token.is_some() {
            Access::Token
        } else {
            Access::Direct
        };

        let flipbook = Flipbooks::find_by_id(id)
            .filter(visibility::condition(viewer, access))
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Flipbook not found".to_string()))?;

        if let Some(token) = token {
            if flipbook.access_token != token {
                // Outside the caller's tenants a bad token must look like a missing record
                if !visibility::admits_company(viewer, flipbook.company_id.as_deref()) {
                    return Err(AppError::NotFound("Flipbook not found".to_string()));
                }
                return Err(AppError::Forbidden("Invalid access token".to_string()));
            }
        }

        if flipbook.pdf_file.is_empty() {
            return Err(AppError::NotFound("Flipbook has no PDF".to_string()));
        }

        Ok(flipbook)
    }

    /// Count a successful delivery. Never fails: errors are logged and dropped.
    pub async fn record_view(db: &DatabaseConnection, id: i32) {
        let result = Flipbooks::update_many()
            .col_expr(
                flipbooks::Column::ViewCount,
                Expr::col(flipbooks::Column::ViewCount).add(1),
            )
            .col_expr(flipbooks::Column::LastViewed, Expr::value(Utc::now()))
            .filter(flipbooks::Column::Id.eq(id))
            .exec(db)
            .await;

        match result {
            Ok(_) => tracing::debug!("Recorded view of flipbook {}", id),
            Err(e) => tracing::warn!("Failed to record view of flipbook {}: {}", id, e),
        }
    }

    async fn find_model(db: &DatabaseConnection, id: i32) -> Result<flipbooks::Model, AppError> {
        Flipbooks::find_by_id(id)
            .one(db)
            .await?
            .ok_or(AppError::NotFound("Flipbook not found".to_string()))
    }

    async fn list_where(
        db: &DatabaseConnection,
        cond: Condition,
    ) -> Result<Vec<FlipbookSummary>, AppError> {
        let items = summaries()
            .filter(cond)
            .order_by_asc(flipbooks::Column::Sequence)
            .order_by_asc(flipbooks::Column::Name)
            .into_model::<FlipbookSummary>()
            .all(db)
            .await?;
        Ok(items)
    }
}

/// Select every column except the PDF payload
fn summaries() -> Select<Flipbooks> {
    Flipbooks::find().select_only().columns([
        flipbooks::Column::Id,
        flipbooks::Column::Name,
        flipbooks::Column::Description,
        flipbooks::Column::PdfFilename,
        flipbooks::Column::FileSize,
        flipbooks::Column::Checksum,
        flipbooks::Column::PageCount,
        flipbooks::Column::AccessToken,
        flipbooks::Column::ViewCount,
        flipbooks::Column::LastViewed,
        flipbooks::Column::Sequence,
        flipbooks::Column::IsPublished,
        flipbooks::Column::CompanyId,
        flipbooks::Column::CreatedAt,
        flipbooks::Column::UpdatedAt,
    ])
}

fn inspect_pdf(data: &[u8], max_pdf_size: usize) -> Result<PdfFacts, AppError> {
    pdf::validate_pdf(data, max_pdf_size)?;
    Ok(PdfFacts {
        file_size: data.len() as i64,
        checksum: calculate_hash(data),
        page_count: pdf::inspect_page_count(data),
    })
}

fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("A flipbook name is required".to_string()));
    }
    Ok(name.to_string())
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
