#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use flipbook_server::config::{FlipbookConfig, MAX_PDF_SIZE};
use flipbook_server::entities::flipbooks;
use flipbook_server::infrastructure::database;
use flipbook_server::services::flipbook_service::{FlipbookService, NewFlipbook};
use flipbook_server::{AppState, create_app};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::Value;
use tower::ServiceExt;

pub const EDITOR_KEY: &str = "dev-editor-key";
pub const SAMPLE_PDF: &[u8] = b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\n%%EOF\n";

pub async fn setup_test_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub async fn setup_app() -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let config = FlipbookConfig {
        cache_max_age: 600,
        ..FlipbookConfig::development()
    };
    let app = create_app(AppState {
        db: db.clone(),
        config,
    });
    (app, db)
}

/// App whose PDF ceiling (and therefore request body limit) is `max_pdf_size`.
pub async fn setup_app_with_limit(max_pdf_size: usize) -> (Router, DatabaseConnection) {
    let db = setup_test_db().await;
    let config = FlipbookConfig {
        max_pdf_size,
        ..FlipbookConfig::development()
    };
    let app = create_app(AppState {
        db: db.clone(),
        config,
    });
    (app, db)
}

pub async fn seed(
    db: &DatabaseConnection,
    name: &str,
    sequence: i32,
    is_published: bool,
    company_id: Option<&str>,
) -> flipbooks::Model {
    FlipbookService::create(
        db,
        NewFlipbook {
            name: name.to_string(),
            description: Some(format!("{} description", name)),
            pdf_file: SAMPLE_PDF.to_vec(),
            pdf_filename: Some(format!("{}.pdf", name.to_lowercase())),
            sequence: Some(sequence),
            is_published,
            company_id: company_id.map(str::to_string),
            access_token: None,
        },
        MAX_PDF_SIZE,
    )
    .await
    .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    send(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn multipart_body(boundary: &str, fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, data)) = file {
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    body
}
