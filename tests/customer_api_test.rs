mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{id_of, TestApp};

#[tokio::test]
async fn registering_an_existing_email_returns_the_same_customer() {
    let app = TestApp::new().await;

    let first = app.create_customer("Ana", "ana@example.com").await;
    let (status, second) = app
        .json(
            Method::POST,
            "/customers",
            Some(json!({ "name": "Ana María", "email": "ana@example.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["name"], "Ana");

    let (_, all) = app.json(Method::GET, "/customers", None).await;
    assert_eq!(all.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn customers_without_email_are_always_created() {
    let app = TestApp::new().await;

    for _ in 0..2 {
        let (status, body) = app
            .json(Method::POST, "/customers", Some(json!({ "name": "Invitado" })))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert!(body["email"].is_null());
    }

    let (_, all) = app.json(Method::GET, "/customers", None).await;
    assert_eq!(all.as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn malformed_email_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/customers",
            Some(json!({ "name": "Ana", "email": "not-an-email" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .starts_with("Validation error"));
}

#[tokio::test]
async fn email_cannot_be_taken_from_another_customer() {
    let app = TestApp::new().await;
    app.create_customer("Ana", "ana@example.com").await;
    let bruno = app.create_customer("Bruno", "bruno@example.com").await;

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/customers/{}", id_of(&bruno)),
            Some(json!({ "email": "ana@example.com" })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Conflict: Email ana@example.com is already registered");
}

#[tokio::test]
async fn patch_updates_and_clears_fields() {
    let app = TestApp::new().await;
    let (_, ana) = app
        .json(
            Method::POST,
            "/customers",
            Some(json!({ "name": "Ana", "email": "ana@example.com", "phone": "555-0102" })),
        )
        .await;
    let uri = format!("/customers/{}", id_of(&ana));

    let (status, updated) = app
        .json(
            Method::PUT,
            &uri,
            Some(json!({ "name": "Ana López", "phone": null })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Ana López");
    assert_eq!(updated["email"], "ana@example.com");
    assert!(updated["phone"].is_null());

    let (_, fetched) = app.json(Method::GET, &uri, None).await;
    assert_eq!(fetched, updated);
}

#[tokio::test]
async fn customer_with_orders_cannot_be_deleted() {
    let app = TestApp::new().await;
    let restaurant_id = id_of(&app.create_restaurant("La Cocina").await);
    let ana = id_of(&app.create_customer("Ana", "ana@example.com").await);
    let bruno = id_of(&app.create_customer("Bruno", "bruno@example.com").await);
    let (status, _) = app
        .json(
            Method::POST,
            "/orders",
            Some(json!({ "restaurant_id": restaurant_id, "customer_id": ana })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .json(Method::DELETE, &format!("/customers/{ana}"), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let response = app
        .request(Method::DELETE, &format!("/customers/{bruno}"), None)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, body) = app
        .json(Method::GET, &format!("/customers/{bruno}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], format!("Not found: Customer {bruno} not found"));
}

#[tokio::test]
async fn unknown_customer_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.json(Method::GET, "/customers/42", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}
