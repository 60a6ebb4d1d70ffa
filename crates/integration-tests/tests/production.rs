//! Integration tests for the dashboard and production board.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;

use customer_ops_integration_tests::{TestApp, TestClient};

async fn order_with_status(staff: &mut TestClient<'_>, title: &str, status: &str) -> String {
    let created = staff
        .post("/api/orders", json!({ "title": title, "customer": "cust-1" }))
        .await;
    let id = created.json["id"].as_str().unwrap().to_owned();
    if status != "submitted" {
        staff
            .post(
                &format!("/api/orders/{id}/status"),
                json!({ "status": status }),
            )
            .await;
    }
    id
}

#[tokio::test]
async fn test_customer_dashboard_counts() {
    let app = TestApp::new();
    let depot = app.create_customer("Denim Depot").await;
    let mut buyer = app.customer("buyer@depot.example", &depot).await;
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;

    let mut ids = Vec::new();
    for title in ["A", "B", "C", "D", "E", "F"] {
        let created = buyer.post("/api/orders", json!({ "title": title })).await;
        ids.push(created.json["id"].as_str().unwrap().to_owned());
    }
    for (id, status) in ids.iter().zip(["in_progress", "delivered", "closed", "cancelled"]) {
        staff
            .post(
                &format!("/api/orders/{id}/status"),
                json!({ "status": status }),
            )
            .await;
    }
    // Another customer's order does not count
    order_with_status(&mut staff, "Elsewhere", "submitted").await;

    let dashboard = buyer.get("/api/dashboard").await;
    assert_eq!(dashboard.status, StatusCode::OK);
    assert_eq!(dashboard.json["total"], 6);
    assert_eq!(dashboard.json["active"], 4);
    assert_eq!(dashboard.json["inProgress"], 1);
    assert_eq!(dashboard.json["delivered"], 1);
    assert_eq!(dashboard.json["recent"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_production_board() {
    let app = TestApp::new();
    let mut staff = app.staff("ops@example.com", "Ops Lead").await;

    order_with_status(&mut staff, "Waiting", "submitted").await;
    order_with_status(&mut staff, "Booked", "confirmed").await;
    order_with_status(&mut staff, "Cutting", "in_progress").await;
    order_with_status(&mut staff, "Sewing", "in_progress").await;
    order_with_status(&mut staff, "Shipped", "delivered").await;
    order_with_status(&mut staff, "Done", "closed").await;

    let board = staff.get("/api/production").await;
    assert_eq!(board.status, StatusCode::OK);

    let pipeline = board.json["pipeline"].as_array().unwrap();
    let columns: Vec<(&str, usize)> = pipeline
        .iter()
        .map(|c| {
            (
                c["status"].as_str().unwrap(),
                c["orders"].as_array().unwrap().len(),
            )
        })
        .collect();
    assert_eq!(
        columns,
        [
            ("submitted", 1),
            ("confirmed", 1),
            ("in_progress", 2),
            ("delivered", 1)
        ]
    );
    assert_eq!(pipeline[2]["label"], "in progress");

    let calendar = board.json["calendar"].as_array().unwrap();
    assert_eq!(calendar.len(), 4);
    assert!(calendar.iter().all(|week| week.as_array().unwrap().len() == 7));
    let todays: usize = calendar
        .iter()
        .flat_map(|week| week.as_array().unwrap())
        .filter(|day| day["isToday"] == true)
        .count();
    assert_eq!(todays, 1);

    assert_eq!(
        board.json["capacity"],
        json!({ "daily": 100, "utilized": 30, "percent": 30 })
    );
}
