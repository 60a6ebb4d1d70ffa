//! Integration tests for customers, products and the lookbook.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::{Value, json};

use customer_ops_integration_tests::TestApp;

fn ids(list: &Value) -> Vec<&str> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|v| v["id"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_customer_management() {
    let app = TestApp::new();
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;

    let missing_name = staff.post("/api/customers", json!({ "name": " " })).await;
    assert_eq!(missing_name.status, StatusCode::BAD_REQUEST);

    let zephyr = staff
        .post(
            "/api/customers",
            json!({ "name": "Zephyr Goods", "contactEmail": "hello@zephyr.example" }),
        )
        .await;
    assert_eq!(zephyr.status, StatusCode::CREATED);
    assert_eq!(zephyr.json["active"], true);
    let zephyr_id = zephyr.json["id"].as_str().unwrap().to_owned();

    staff
        .post("/api/customers", json!({ "name": "Acme Denim" }))
        .await;

    let all = staff.get("/api/customers").await;
    let names: Vec<&str> = all
        .json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Acme Denim", "Zephyr Goods"]);

    let search = staff.get("/api/customers?q=ZEPHYR.example").await;
    assert_eq!(ids(&search.json), [zephyr_id.as_str()]);

    let uri = format!("/api/customers/{zephyr_id}");
    let update = staff.put(&uri, json!({ "contactPhone": "555-0100" })).await;
    assert_eq!(update.status, StatusCode::NO_CONTENT);
    let shown = staff.get(&uri).await;
    assert_eq!(shown.json["contactPhone"], "555-0100");
    assert_eq!(shown.json["name"], "Zephyr Goods");

    assert_eq!(staff.delete(&uri).await.status, StatusCode::NO_CONTENT);
    assert_eq!(staff.get(&uri).await.status, StatusCode::NOT_FOUND);

    let gone = staff.put(&uri, json!({ "name": "Back" })).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_products_seeded_and_searchable() {
    let app = TestApp::seeded().await;
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;

    let all = staff.get("/api/products").await;
    assert_eq!(all.json.as_array().unwrap().len(), 13);

    let atlas = staff.get("/api/products/orb-001").await;
    assert_eq!(atlas.status, StatusCode::OK);
    assert_eq!(atlas.json["price"], "285");

    let by_sku = staff.get("/api/products?q=orb-001").await;
    assert!(by_sku.status.is_success());

    let missing = staff.get("/api/products/nope").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_product_toggle_hides_from_customers() {
    let app = TestApp::seeded().await;
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;

    let toggle = staff.post("/api/products/orb-001/toggle", json!({})).await;
    assert_eq!(toggle.json["active"], false);

    let staff_active = staff.get("/api/products?active=true").await;
    assert_eq!(staff_active.json.as_array().unwrap().len(), 12);
    let staff_all = staff.get("/api/products").await;
    assert_eq!(staff_all.json.as_array().unwrap().len(), 13);

    // Customers only ever see active products
    let buyer_all = buyer.get("/api/products?active=false").await;
    assert_eq!(buyer_all.json.as_array().unwrap().len(), 12);
    assert!(!ids(&buyer_all.json).contains(&"orb-001"));
    assert_eq!(
        buyer.get("/api/products/orb-001").await.status,
        StatusCode::NOT_FOUND
    );

    let toggle = staff.post("/api/products/orb-001/toggle", json!({})).await;
    assert_eq!(toggle.json["active"], true);
}

#[tokio::test]
async fn test_product_create_update_delete() {
    let app = TestApp::new();
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;

    let nameless = staff.post("/api/products", json!({ "sku": "X-1" })).await;
    assert_eq!(nameless.status, StatusCode::UNPROCESSABLE_ENTITY);

    let blank = staff
        .post("/api/products", json!({ "name": "  ", "sku": "X-1" }))
        .await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let created = staff
        .post(
            "/api/products",
            json!({ "name": "Nova Taper", "sku": "ORB-NOV-011", "price": "198.50" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.json["active"], true);
    let uri = format!("/api/products/{}", created.json["id"].as_str().unwrap());

    let update = staff.put(&uri, json!({ "category": "Taper" })).await;
    assert_eq!(update.status, StatusCode::NO_CONTENT);
    let shown = staff.get(&uri).await;
    assert_eq!(shown.json["category"], "Taper");
    assert_eq!(shown.json["name"], "Nova Taper");

    assert_eq!(staff.delete(&uri).await.status, StatusCode::NO_CONTENT);
    assert_eq!(staff.get(&uri).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_lookbook_feed_and_filters() {
    let app = TestApp::seeded().await;
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;

    let feed = buyer.get("/api/lookbook").await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(feed.json["posts"].as_array().unwrap().len(), 6);
    let featured = feed.json["featured"].as_array().unwrap();
    assert!(featured.len() <= 2);
    assert!(!featured.is_empty());
    assert!(featured.iter().all(|p| p["featured"] == true));

    let campaigns = buyer.get("/api/lookbook?type=campaign").await;
    assert_eq!(campaigns.json["featured"], json!([]));
    assert!(
        campaigns.json["posts"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["type"] == "campaign")
    );

    let unknown = buyer.get("/api/lookbook?type=podcast").await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);

    let publish = buyer
        .post("/api/lookbook", json!({ "type": "news", "title": "Leak" }))
        .await;
    assert_eq!(publish.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_lookbook_publishing_and_comments() {
    let app = TestApp::new();
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;

    let untitled = staff
        .post("/api/lookbook", json!({ "type": "news", "title": "" }))
        .await;
    assert_eq!(untitled.status, StatusCode::BAD_REQUEST);

    let post = staff
        .post(
            "/api/lookbook",
            json!({ "type": "news", "title": "Mill Visit", "featured": true }),
        )
        .await;
    assert_eq!(post.status, StatusCode::CREATED);
    assert_eq!(post.json["type"], "news");
    let post_id = post.json["id"].as_str().unwrap().to_owned();
    let comments_uri = format!("/api/lookbook/{post_id}/comments");

    let first = buyer
        .post(&comments_uri, json!({ "message": "Love this" }))
        .await;
    assert_eq!(first.status, StatusCode::CREATED);
    assert_eq!(first.json["createdByName"], "buyer@depot.example");
    staff
        .post(&comments_uri, json!({ "message": "Thanks!" }))
        .await;

    let blank = buyer.post(&comments_uri, json!({ "message": " " })).await;
    assert_eq!(blank.status, StatusCode::BAD_REQUEST);

    let listed = buyer.get(&comments_uri).await;
    let messages: Vec<&str> = listed
        .json
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages, ["Love this", "Thanks!"]);

    let update = staff
        .put(
            &format!("/api/lookbook/{post_id}"),
            json!({ "subtitle": "Okayama, spring" }),
        )
        .await;
    assert_eq!(update.status, StatusCode::NO_CONTENT);
    let feed = buyer.get("/api/lookbook").await;
    assert_eq!(feed.json["posts"][0]["subtitle"], "Okayama, spring");

    let removed = staff.delete(&format!("/api/lookbook/{post_id}")).await;
    assert_eq!(removed.status, StatusCode::NO_CONTENT);

    let orphan = buyer
        .post(&comments_uri, json!({ "message": "Still here?" }))
        .await;
    assert_eq!(orphan.status, StatusCode::NOT_FOUND);
}
