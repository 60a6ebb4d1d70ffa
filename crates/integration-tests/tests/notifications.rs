//! Integration tests for the staff unread-order notification stream.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, StatusCode, header};
use futures::StreamExt;
use serde_json::{Value, json};

use customer_ops_integration_tests::TestApp;

type Frames = axum::body::BodyDataStream;

/// Read SSE frames until one carries data, and parse it.
async fn next_update(stream: &mut Frames) -> Value {
    loop {
        let frame = tokio::time::timeout(Duration::from_secs(5), stream.next())
            .await
            .expect("timed out waiting for an unread event")
            .expect("stream ended")
            .unwrap();
        let text = String::from_utf8(frame.to_vec()).unwrap();
        if let Some(data) = text.lines().find_map(|l| l.strip_prefix("data: ")) {
            assert!(text.contains("event: unread"), "{text}");
            return serde_json::from_str(data).unwrap();
        }
    }
}

#[tokio::test]
async fn test_stream_notifies_on_first_new_order_only() {
    let app = TestApp::new();
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;

    let response = staff.open(Method::GET, "/api/orders/unread/stream").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/event-stream"
    );
    let mut stream = Body::into_data_stream(response.into_body());

    // Baseline
    assert_eq!(
        next_update(&mut stream).await,
        json!({ "count": 0, "notify": false })
    );

    buyer
        .post("/api/orders", json!({ "title": "Depot Restock" }))
        .await;
    assert_eq!(
        next_update(&mut stream).await,
        json!({ "count": 1, "notify": true })
    );

    buyer
        .post("/api/orders", json!({ "title": "Second Restock" }))
        .await;
    assert_eq!(
        next_update(&mut stream).await,
        json!({ "count": 2, "notify": false })
    );
}

#[tokio::test]
async fn test_stream_baseline_with_existing_unread_does_not_notify() {
    let app = TestApp::new();
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;
    buyer
        .post("/api/orders", json!({ "title": "Depot Restock" }))
        .await;

    let mut staff = app.staff("ops@example.com", "Ops Lead").await;
    let response = staff.open(Method::GET, "/api/orders/unread/stream").await;
    let mut stream = Body::into_data_stream(response.into_body());

    assert_eq!(
        next_update(&mut stream).await,
        json!({ "count": 1, "notify": false })
    );
}

#[tokio::test]
async fn test_stream_is_staff_only() {
    let app = TestApp::new();
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;

    let response = buyer.open(Method::GET, "/api/orders/unread/stream").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .anonymous()
        .open(Method::GET, "/api/orders/unread/stream")
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
