//! Collection invariant tests across operation sequences.
//!
//! These drive the HTTP API end to end and re-derive the authoritative
//! slide count from the ordered listing after every committed operation,
//! so counter drift or index gaps show up immediately.

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use super::test_utils::{create_presentation, get_json, insert_slide, post_json, test_app};

/// Assert indices are exactly `0..len` and `n_slides` matches the listing.
fn assert_deck_consistent(deck: &Value) {
    let slides = deck["slides"].as_array().unwrap();
    let n_slides = deck["n_slides"].as_u64().unwrap() as usize;
    assert_eq!(
        n_slides,
        slides.len(),
        "counter disagrees with ordered listing"
    );
    for (expected, slide) in slides.iter().enumerate() {
        assert_eq!(slide["index"].as_u64().unwrap() as usize, expected);
    }
}

fn slide_ids(deck: &Value) -> Vec<String> {
    deck["slides"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_contiguity_through_scripted_operations() {
    let app = test_app();
    let id = create_presentation(&app.router).await;

    // insert, insert, insert-front, delete-middle, insert-back, delete-front
    let script: &[(&str, u32)] = &[
        ("insert", 0),
        ("insert", 1),
        ("insert", 0),
        ("delete", 1),
        ("insert", 2),
        ("delete", 0),
    ];

    let mut expected_len = 0usize;
    for &(op, index) in script {
        let deck = match op {
            "insert" => {
                expected_len += 1;
                insert_slide(&app.router, id, index).await
            }
            _ => {
                expected_len -= 1;
                let (status, deck) = post_json(
                    &app.router,
                    "/api/v1/slide/delete",
                    json!({"presentation_id": id, "slide_index": index}),
                )
                .await;
                assert_eq!(status, StatusCode::OK);
                deck
            }
        };
        assert_eq!(deck["slides"].as_array().unwrap().len(), expected_len);
        assert_deck_consistent(&deck);
    }
}

#[tokio::test]
async fn test_insert_shift_preserves_neighbor_identities() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    for i in 0..3 {
        insert_slide(&app.router, id, i).await;
    }
    let (_, before) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    let before_ids = slide_ids(&before);

    let deck = insert_slide(&app.router, id, 1).await;
    let after_ids = slide_ids(&deck);

    // [0, new, old-1, old-2]: identities only moved, never reassigned
    assert_eq!(after_ids.len(), 4);
    assert_eq!(after_ids[0], before_ids[0]);
    assert_eq!(after_ids[2], before_ids[1]);
    assert_eq!(after_ids[3], before_ids[2]);
    assert!(!before_ids.contains(&after_ids[1]));
    assert_deck_consistent(&deck);
}

#[tokio::test]
async fn test_insert_then_delete_is_identity_on_neighbors() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    for i in 0..3 {
        insert_slide(&app.router, id, i).await;
    }
    let (_, before) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    let before_ids = slide_ids(&before);

    insert_slide(&app.router, id, 1).await;
    let (status, deck) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(slide_ids(&deck), before_ids);
    assert_deck_consistent(&deck);
}

#[tokio::test]
async fn test_delete_middle_of_three() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    for i in 0..3 {
        insert_slide(&app.router, id, i).await;
    }
    let (_, before) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    let before_ids = slide_ids(&before);

    let (status, deck) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": 1}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(deck["n_slides"], 2);
    let after_ids = slide_ids(&deck);
    assert_eq!(after_ids, vec![before_ids[0].clone(), before_ids[2].clone()]);
    assert_deck_consistent(&deck);
}

#[tokio::test]
async fn test_failed_operations_leave_collection_unchanged() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    for i in 0..2 {
        insert_slide(&app.router, id, i).await;
    }
    let (_, before) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;

    // Out-of-range insert and delete both reject without touching state
    let (status, _) = post_json(
        &app.router,
        "/api/v1/slide/create",
        json!({"presentation_id": id, "slide_index": 3, "content": "x"}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, after) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    assert_eq!(slide_ids(&after), slide_ids(&before));
    assert_eq!(after["n_slides"], before["n_slides"]);
}

#[tokio::test]
async fn test_edit_keeps_collection_shape() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    for i in 0..3 {
        insert_slide(&app.router, id, i).await;
    }
    let (_, before) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    let before_ids = slide_ids(&before);

    let (status, edited) = post_json(
        &app.router,
        "/api/v1/slide/edit",
        json!({"presentation_id": id, "slide_index": 1, "prompt": "rework"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, after) = get_json(&app.router, &format!("/api/v1/presentation/{id}")).await;
    let after_ids = slide_ids(&after);

    // Only the edited slide's identity changed; order and count intact
    assert_eq!(after["n_slides"], 3);
    assert_eq!(after_ids[0], before_ids[0]);
    assert_eq!(after_ids[1], edited["id"].as_str().unwrap());
    assert_ne!(after_ids[1], before_ids[1]);
    assert_eq!(after_ids[2], before_ids[2]);
    assert_deck_consistent(&after);
}

#[tokio::test]
async fn test_decks_are_isolated() {
    let app = test_app();
    let a = create_presentation(&app.router).await;
    let b = create_presentation(&app.router).await;

    insert_slide(&app.router, a, 0).await;
    insert_slide(&app.router, a, 1).await;
    insert_slide(&app.router, b, 0).await;

    let (_, deck_a) = get_json(&app.router, &format!("/api/v1/presentation/{a}")).await;
    let (_, deck_b) = get_json(&app.router, &format!("/api/v1/presentation/{b}")).await;

    assert_eq!(deck_a["n_slides"], 2);
    assert_eq!(deck_b["n_slides"], 1);
    assert_deck_consistent(&deck_a);
    assert_deck_consistent(&deck_b);
}

#[tokio::test]
async fn test_nil_uuid_presentation_not_found() {
    let app = test_app();
    let (status, _) = get_json(
        &app.router,
        &format!("/api/v1/presentation/{}", Uuid::nil()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_counter_verification_against_service_listing() {
    let app = test_app();
    let id = create_presentation(&app.router).await;
    for i in 0..4 {
        insert_slide(&app.router, id, i).await;
    }
    let (status, _) = post_json(
        &app.router,
        "/api/v1/slide/delete",
        json!({"presentation_id": id, "slide_index": 2}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Verify through the service, not the HTTP shape
    let deck = app.service.deck(id).await.unwrap();
    deck_composer::counters::verify(&deck.presentation, &deck.slides).unwrap();
}
