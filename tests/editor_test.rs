mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::Engine;
use common::*;
use flipbook_server::services::flipbook_service::FlipbookService;
use serde_json::json;

const BOUNDARY: &str = "---------------------------flipbook0123456789";

fn editor_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", EDITOR_KEY))
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn editor_multipart(method: &str, uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", EDITOR_KEY))
        .header(
            "Content-Type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

fn editor_empty(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("Authorization", format!("Bearer {}", EDITOR_KEY))
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn test_editor_routes_require_key() {
    let (app, _db) = setup_app().await;

    let response = get(&app, "/flipbooks").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(
        &app,
        Request::builder()
            .method("GET")
            .uri("/flipbooks")
            .header("Authorization", "Bearer wrong-key")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send(&app, editor_empty("GET", "/flipbooks")).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_create_from_base64() {
    let (app, db) = setup_app().await;
    let encoded = base64::engine::general_purpose::STANDARD.encode(SAMPLE_PDF);

    let response = send(
        &app,
        editor_json(
            "POST",
            "/flipbooks",
            json!({
                "name": "Annual report",
                "description": "2024 edition",
                "pdf_file": encoded,
                "pdf_filename": "report.pdf",
                "sequence": 3,
                "is_published": true
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let id = json["id"].as_i64().unwrap() as i32;
    assert_eq!(json["name"], "Annual report");
    assert_eq!(json["file_size"], SAMPLE_PDF.len());
    assert_eq!(json["sequence"], 3);
    assert_eq!(json["is_published"], true);
    let token = json["access_token"].as_str().unwrap().to_string();
    assert!(!token.is_empty());
    assert_eq!(
        json["token_url"],
        format!("/flipbook/pdf/{}/{}", id, token)
    );

    let stored = FlipbookService::get(&db, id).await.unwrap();
    assert_eq!(stored.file_size, SAMPLE_PDF.len() as i64);

    let response = get(&app, &format!("/flipbook/pdf/{}/{}", id, token)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, SAMPLE_PDF);
}

#[tokio::test]
async fn test_create_rejects_invalid_payloads() {
    let (app, _db) = setup_app().await;
    let not_pdf = base64::engine::general_purpose::STANDARD.encode(b"<html>nope</html>");

    let response = send(
        &app,
        editor_json(
            "POST",
            "/flipbooks",
            json!({ "name": "Fake", "pdf_file": not_pdf }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("not a valid PDF"));

    let response = send(
        &app,
        editor_json(
            "POST",
            "/flipbooks",
            json!({ "name": "Garbage", "pdf_file": "***" }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let encoded = base64::engine::general_purpose::STANDARD.encode(SAMPLE_PDF);
    let response = send(
        &app,
        editor_json("POST", "/flipbooks", json!({ "name": "", "pdf_file": encoded })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(&app, editor_empty("GET", "/flipbooks")).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_rejects_body_over_limit() {
    let (app, _db) = setup_app_with_limit(1024).await;
    let oversized = "A".repeat(2 * 1024 * 1024);

    let response = send(
        &app,
        editor_json(
            "POST",
            "/flipbooks",
            json!({ "name": "Huge", "pdf_file": oversized }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("maximum allowed size"));

    let response = send(&app, editor_empty("GET", "/flipbooks")).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_create_rejects_malformed_json() {
    let (app, _db) = setup_app().await;

    let response = send(
        &app,
        Request::builder()
            .method("POST")
            .uri("/flipbooks")
            .header("Authorization", format!("Bearer {}", EDITOR_KEY))
            .header("Content-Type", "application/json")
            .body(Body::from("{\"name\": "))
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["error"].is_string());
}

#[tokio::test]
async fn test_tokens_differ_between_records() {
    let (_app, db) = setup_app().await;
    let mut tokens = std::collections::HashSet::new();
    for i in 0..20 {
        let flipbook = seed(&db, &format!("Book {}", i), i, true, None).await;
        assert!(!flipbook.access_token.is_empty());
        tokens.insert(flipbook.access_token);
    }
    assert_eq!(tokens.len(), 20);
}

#[tokio::test]
async fn test_multipart_upload_and_replace() {
    let (app, db) = setup_app().await;

    let body = multipart_body(
        BOUNDARY,
        &[("name", "Leaflet"), ("is_published", "on"), ("sequence", "7")],
        Some(("leaflet.pdf", SAMPLE_PDF)),
    );
    let response = send(&app, editor_multipart("POST", "/flipbooks/upload", body)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let id = json["id"].as_i64().unwrap() as i32;
    assert_eq!(json["pdf_filename"], "leaflet.pdf");
    assert_eq!(json["is_published"], true);
    assert_eq!(json["sequence"], 7);

    let replacement: &[u8] = b"%PDF-1.7\n% second edition with more bytes\n%%EOF\n";
    let body = multipart_body(BOUNDARY, &[], Some(("leaflet-v2.pdf", replacement)));
    let response = send(
        &app,
        editor_multipart("PUT", &format!("/flipbooks/{}/pdf", id), body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["file_size"], replacement.len());
    assert_eq!(json["pdf_filename"], "leaflet-v2.pdf");

    let response = get(&app, &format!("/flipbook/pdf/{}", id)).await;
    assert_eq!(body_bytes(response).await, replacement);

    let body = multipart_body(BOUNDARY, &[], Some(("image.png", &b"\x89PNG\r\n"[..])));
    let response = send(
        &app,
        editor_multipart("PUT", &format!("/flipbooks/{}/pdf", id), body),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let stored = FlipbookService::get(&db, id).await.unwrap();
    assert_eq!(stored.file_size, replacement.len() as i64);

    let body = multipart_body(BOUNDARY, &[("name", "No file")], None);
    let response = send(&app, editor_multipart("POST", "/flipbooks/upload", body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_regenerate_token_invalidates_old_one() {
    let (app, db) = setup_app().await;
    let flipbook = seed(&db, "Secret", 1, true, None).await;

    let response = send(
        &app,
        editor_empty("POST", &format!("/flipbooks/{}/token", flipbook.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let new_token = json["access_token"].as_str().unwrap().to_string();
    assert_ne!(new_token, flipbook.access_token);

    let response = get(
        &app,
        &format!("/flipbook/pdf/{}/{}", flipbook.id, flipbook.access_token),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get(&app, &format!("/flipbook/pdf/{}/{}", flipbook.id, new_token)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_publish_and_delete() {
    let (app, db) = setup_app().await;
    let flipbook = seed(&db, "Draft", 1, false, None).await;

    let response = get(&app, &format!("/flipbook/pdf/{}", flipbook.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(
        &app,
        editor_json(
            "PUT",
            &format!("/flipbooks/{}", flipbook.id),
            json!({ "name": "Published", "is_published": true }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Published");
    assert_eq!(json["is_published"], true);

    let response = get(&app, &format!("/flipbook/pdf/{}", flipbook.id)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(
        &app,
        editor_empty("GET", &format!("/flipbooks/{}", flipbook.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["view_count"], 1);

    let response = send(
        &app,
        editor_empty("DELETE", &format!("/flipbooks/{}", flipbook.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(
        &app,
        editor_empty("DELETE", &format!("/flipbooks/{}", flipbook.id)),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, &format!("/flipbook/pdf/{}", flipbook.id)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
