//! Who may see which flipbook.
//!
//! Every read path (PDF delivery, listing, viewer page, statistics) builds its
//! filter from this module so the publication and tenant rules live in one
//! place.

use crate::entities::flipbooks;
use sea_orm::{ColumnTrait, Condition};

/// Request context for read operations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    /// Tenants (companies) the caller is allowed to see
    pub company_ids: Vec<String>,
    /// Authenticated editors see unpublished and foreign-tenant records
    pub is_editor: bool,
}

impl Viewer {
    pub fn public() -> Self {
        Self::default()
    }

    pub fn with_companies<I, S>(companies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            company_ids: companies.into_iter().map(Into::into).collect(),
            is_editor: false,
        }
    }

    pub fn editor() -> Self {
        Self {
            company_ids: Vec::new(),
            is_editor: true,
        }
    }

    /// Parses the `x-company-ids` header value (comma separated).
    pub fn parse_company_ids(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// How the caller reaches the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Plain request, subject to publication and tenant rules
    Direct,
    /// Request carrying an access token; the token stands in for tenant
    /// membership but never for publication
    Token,
}

/// Filter selecting the flipbooks `viewer` may read.
pub fn condition(viewer: &Viewer, access: Access) -> Condition {
    if viewer.is_editor {
        return Condition::all();
    }

    let published = Condition::all().add(flipbooks::Column::IsPublished.eq(true));

    match access {
        Access::Token => published,
        Access::Direct => published.add(tenant_condition(viewer)),
    }
}

/// Tenant rule checked against an already loaded record.
pub fn admits_company(viewer: &Viewer, company_id: Option<&str>) -> bool {
    match company_id {
        _ if viewer.is_editor => true,
        None => true,
        Some(company) => viewer.company_ids.iter().any(|id| id == company),
    }
}

fn tenant_condition(viewer: &Viewer) -> Condition {
    let mut cond = Condition::any().add(flipbooks::Column::CompanyId.is_null());
    if !viewer.company_ids.is_empty() {
        cond = cond.add(flipbooks::Column::CompanyId.is_in(viewer.company_ids.clone()));
    }
    cond
}
