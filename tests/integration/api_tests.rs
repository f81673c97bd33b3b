//! API integration tests for slide operations and error handling.
//!
//! Tests verify:
//! - Slide insert/edit/delete through the HTTP API
//! - HTTP response codes for invalid indices and unknown identities
//! - Error body shapes

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use super::test_utils::{
    create_presentation, get_json, insert_slide, post_json, test_app, test_app_with, StubGenerator,
};

// =============================================================================
// Health & presentation lifecycle
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();
    let (status, body) = get_json(&app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_create_and_fetch_presentation() {
    let app = test_app();
    let id = create_presentation(&app.router).await;

    let (status, body) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"].as_str().unwrap(), id.to_string());
    assert_eq!(body["n_slides"], 0);
    assert!(body["slides"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_unknown_presentation() {
    let app = test_app();
    let (status, body) = get_json(
        &app.router,
        &format!("/api/v1/presentation/{}", Uuid::new_v4()),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// =============================================================================
// Insert
// =============================================================================

#[tokio::test]
async fn test_insert_slide_returns_updated_deck() {
    let app = test_app();
    let id = create_presentation(&app.router).await;

    let body = insert_slide(&app.router, id, 0).await;

    assert_eq!(body["n_slides"], 1);
    let slides = body["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0]["index"], 0);
    assert_eq!(slides[0]["content"]["title"], "outline 0");
    assert_eq!(slides[0]["speaker_note"], "note: outline 0");
    // The image node was resolved during insert
    assert!(slides[0]["content"]["hero"]["__image_url__"]
        .as_str()
        .unwrap()
        .contains("/tmp/images/"));
}

#[tokio::test]
async fn test_insert_out_of_range() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    insert_slide(&app.router, id, 0).await;

    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/create",
        json!({"presentation_id": id, "slide_index": 2, "content": "too far"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "index_out_of_range");
    assert!(body["message"].as_str().unwrap().contains("2"));

    // Collection untouched
    let (_, deck) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    assert_eq!(deck["n_slides"], 1);
}

#[tokio::test]
async fn test_insert_into_unknown_presentation() {
    let app = test_app();
    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/create",
        json!({"presentation_id": Uuid::new_v4(), "slide_index": 0, "content": "x"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_insert_with_failed_generator_maps_to_bad_gateway() {
    let app = test_app_with(StubGenerator::failing());
    let id = create_presentation(&app.router).await;

    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/create",
        json!({"presentation_id": id, "slide_index": 0, "content": "x"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "generation_failed");

    // Nothing was committed
    let (_, deck) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    assert_eq!(deck["n_slides"], 0);
    assert!(deck["slides"].as_array().unwrap().is_empty());
}

// =============================================================================
// Edit
// =============================================================================

#[tokio::test]
async fn test_edit_slide_changes_identity() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    let deck = insert_slide(&app.router, id, 0).await;
    let old_id = deck["slides"][0]["id"].as_str().unwrap().to_string();

    let (status, slide) = post_json(
        &app.router,
        "/api/v1/slide/edit",
        json!({"presentation_id": id, "slide_index": 0, "prompt": "shorter"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(slide["id"].as_str().unwrap(), old_id);
    assert_eq!(slide["index"], 0);
    assert_eq!(slide["content"]["title"], "edited: shorter");
}

#[tokio::test]
async fn test_edit_missing_slide() {
    let app = test_app();
    let id = create_presentation(&app.router).await;

    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/edit",
        json!({"presentation_id": id, "slide_index": 0, "prompt": "x"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_edit_html_roundtrip() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    let deck = insert_slide(&app.router, id, 0).await;
    let slide_id = deck["slides"][0]["id"].as_str().unwrap().to_string();

    let (status, slide) = post_json(
        &app.router,
        "/api/v1/slide/edit-html",
        json!({"id": slide_id, "prompt": "center it", "html": "<h1>t</h1>"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_ne!(slide["id"].as_str().unwrap(), slide_id);
    assert_eq!(slide["html_content"], "<!-- center it --><h1>t</h1>");
}

#[tokio::test]
async fn test_edit_html_without_html_is_rejected() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    let deck = insert_slide(&app.router, id, 0).await;
    let slide_id = deck["slides"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/edit-html",
        json!({"id": slide_id, "prompt": "center it"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "no_editable_html");
}

#[tokio::test]
async fn test_edit_html_unknown_slide() {
    let app = test_app();
    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/edit-html",
        json!({"id": Uuid::new_v4(), "prompt": "x", "html": "<p>y</p>"}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_slide_returns_updated_deck() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    insert_slide(&app.router, id, 0).await;
    insert_slide(&app.router, id, 1).await;

    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n_slides"], 1);
    let slides = body["slides"].as_array().unwrap();
    assert_eq!(slides.len(), 1);
    assert_eq!(slides[0]["index"], 0);
    assert_eq!(slides[0]["content"]["title"], "outline 1");
}

#[tokio::test]
async fn test_delete_at_count_rejected() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    insert_slide(&app.router, id, 0).await;

    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": 1}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "index_out_of_range");

    let (_, deck) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    assert_eq!(deck["n_slides"], 1);
}

#[tokio::test]
async fn test_delete_from_unknown_presentation() {
    let app = test_app();
    let (status, body) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": Uuid::new_v4(), "slide_index": 0}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

// =============================================================================
// Malformed requests
// =============================================================================

#[tokio::test]
async fn test_negative_index_rejected_at_deserialization() {
    let app = test_app();
    let id = create_presentation(&app.router).await;

    let (status, _) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": -1}),
    )
    .await;

    // Indices are unsigned; negative values never reach the service
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
