pub mod api;
pub mod config;
pub mod entities;
pub mod infrastructure;
pub mod services;
pub mod utils;

use crate::config::FlipbookConfig;
use axum::{
    Router,
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post, put},
};
use sea_orm::DatabaseConnection;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::health::health_check,
        api::handlers::flipbooks::get_pdf,
        api::handlers::flipbooks::get_pdf_with_token,
        api::handlers::flipbooks::list_flipbooks,
        api::handlers::flipbooks::view_flipbook,
        api::handlers::flipbooks::get_stats,
        api::handlers::flipbooks::create_flipbook,
        api::handlers::flipbooks::upload_flipbook,
        api::handlers::flipbooks::list_all_flipbooks,
        api::handlers::flipbooks::get_flipbook,
        api::handlers::flipbooks::update_flipbook,
        api::handlers::flipbooks::replace_flipbook_pdf,
        api::handlers::flipbooks::regenerate_token,
        api::handlers::flipbooks::delete_flipbook,
    ),
    components(
        schemas(
            api::handlers::health::HealthResponse,
            api::handlers::flipbooks::FlipbookListEntry,
            api::handlers::flipbooks::FlipbookListResponse,
            api::handlers::flipbooks::FlipbookStatsResponse,
            api::handlers::flipbooks::FlipbookResponse,
            api::handlers::flipbooks::CreateFlipbookRequest,
            api::handlers::flipbooks::UpdateFlipbookRequest,
            api::handlers::flipbooks::TokenResponse,
        )
    ),
    tags(
        (name = "flipbook", description = "Public flipbook delivery"),
        (name = "editor", description = "Flipbook management for site editors"),
        (name = "system", description = "Service health")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: FlipbookConfig,
}

/// Request body ceiling: the PDF limit as base64 plus room for the
/// surrounding JSON or multipart framing.
pub fn body_limit(config: &FlipbookConfig) -> usize {
    config.max_pdf_size / 3 * 4 + 4 + 1024 * 1024
}

fn cors_layer(config: &FlipbookConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub fn create_app(state: AppState) -> Router {
    let editor_routes = Router::new()
        .route(
            "/flipbooks",
            get(api::handlers::flipbooks::list_all_flipbooks)
                .post(api::handlers::flipbooks::create_flipbook),
        )
        .route(
            "/flipbooks/upload",
            post(api::handlers::flipbooks::upload_flipbook),
        )
        .route(
            "/flipbooks/:id",
            get(api::handlers::flipbooks::get_flipbook)
                .put(api::handlers::flipbooks::update_flipbook)
                .delete(api::handlers::flipbooks::delete_flipbook),
        )
        .route(
            "/flipbooks/:id/pdf",
            put(api::handlers::flipbooks::replace_flipbook_pdf),
        )
        .route(
            "/flipbooks/:id/token",
            post(api::handlers::flipbooks::regenerate_token),
        )
        .route_layer(from_fn_with_state(
            state.clone(),
            api::middleware::auth::editor_auth_middleware,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route("/flipbook/pdf/:id", get(api::handlers::flipbooks::get_pdf))
        .route(
            "/flipbook/pdf/:id/:token",
            get(api::handlers::flipbooks::get_pdf_with_token),
        )
        .route(
            "/flipbook/list",
            post(api::handlers::flipbooks::list_flipbooks),
        )
        .route(
            "/flipbook/view/:id",
            get(api::handlers::flipbooks::view_flipbook),
        )
        .route(
            "/flipbook/stats/:id",
            get(api::handlers::flipbooks::get_stats),
        )
        .merge(editor_routes)
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .layer(cors_layer(&state.config))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit(
            &state.config,
        )))
        .with_state(state)
}
