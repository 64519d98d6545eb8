use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::helpers::{jan_15, TestApp};

fn laptop() -> Value {
    json!({
        "name": "HP Laptop",
        "category": "Laptops",
        "quantity": 3,
        "price": "55000.00",
        "sku": "HP-LT-001",
        "low_stock_threshold": 5,
    })
}

fn mouse() -> Value {
    json!({
        "name": "Mouse",
        "category": "Accessories",
        "quantity": 50,
        "price": "499.00",
        "sku": "HP-MS-002",
        "description": "Wireless",
        "low_stock_threshold": 5,
    })
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

#[tokio::test]
async fn should_add_products_and_derive_the_inventory_page() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;

    let added = app.post("/products", &cookie, Some(laptop())).await;
    assert_eq!(added.status, StatusCode::OK);
    assert_eq!(added.body["outcome"]["success"], true);
    app.post("/products", &cookie, Some(mouse())).await;

    let page = app.get("/inventory", &cookie).await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["total_products"], 2);
    let low: Vec<_> = page.body["low_stock"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(low, vec!["HP Laptop"]);
    assert_eq!(
        decimal(&page.body["total_value"]),
        Decimal::new(3 * 55_000 + 50 * 499, 0)
    );
    assert_eq!(page.body["category_count"], 2);

    let dashboard = app.get("/dashboard", &cookie).await;
    assert_eq!(dashboard.body["low_stock_count"], 1);
}

#[tokio::test]
async fn should_search_and_filter_by_category() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;
    app.post("/products", &cookie, Some(laptop())).await;
    app.post("/products", &cookie, Some(mouse())).await;

    let by_sku = app.get("/inventory?search=hp-ms", &cookie).await;
    assert_eq!(by_sku.body["products"][0]["name"], "Mouse");
    assert_eq!(by_sku.body["products"].as_array().unwrap().len(), 1);

    let by_category = app.get("/inventory?category=Laptops", &cookie).await;
    assert_eq!(by_category.body["products"].as_array().unwrap().len(), 1);
    assert_eq!(by_category.body["products"][0]["sku"], "HP-LT-001");

    let everything = app.get("/inventory?category=all&search=", &cookie).await;
    assert_eq!(everything.body["products"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn should_patch_only_the_given_fields() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;
    let added = app.post("/products", &cookie, Some(mouse())).await;
    let before = added.body["products"][0].clone();
    let id = before["id"].as_str().unwrap();

    let reply = app
        .request(
            Method::PATCH,
            &format!("/products/{}", id),
            Some(&cookie),
            Some(json!({ "quantity": 7 })),
        )
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    let after = &reply.body["products"][0];
    assert_eq!(after["quantity"], 7);
    for field in ["name", "category", "sku", "price", "description", "low_stock_threshold", "created_at"] {
        assert_eq!(after[field], before[field], "{}", field);
    }
}

#[tokio::test]
async fn should_delete_a_product_and_log_its_name() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;
    let added = app.post("/products", &cookie, Some(laptop())).await;
    let id = added.body["products"][0]["id"].as_str().unwrap().to_string();

    let reply = app
        .request(
            Method::DELETE,
            &format!("/products/{}", id),
            Some(&cookie),
            None,
        )
        .await;

    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.body["products"].as_array().unwrap().is_empty());

    let feed = app.get("/activity", &cookie).await;
    assert_eq!(feed.body[0]["action"], "Delete Product");
    assert_eq!(feed.body[0]["details"], "Deleted product: HP Laptop");
    assert_eq!(feed.body[1]["details"], "Added product: HP Laptop");
}

#[tokio::test]
async fn should_report_a_failed_mutation_with_its_message() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;
    app.post("/products", &cookie, Some(laptop())).await;

    let reply = app.post("/products", &cookie, Some(laptop())).await;

    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.body["outcome"]["success"], false);
    assert!(reply.body["outcome"]["error"]
        .as_str()
        .unwrap()
        .contains("HP-LT-001"));
    assert_eq!(reply.body["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn should_answer_unavailable_when_products_cannot_load() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;
    app.post("/products", &cookie, Some(laptop())).await;

    app.backend.fail_reads(true);
    let page = app.get("/inventory", &cookie).await;

    assert_eq!(page.status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_list_products_once_per_mutation() {
    let app = TestApp::at(jan_15(10, 0));
    let cookie = app.signed_in("admin@example.com", "Admin").await;

    let before = app.backend.list_calls();
    let added = app.post("/products", &cookie, Some(mouse())).await;
    assert_eq!(app.backend.list_calls() - before, 1);

    let id = added.body["products"][0]["id"].as_str().unwrap().to_string();
    let before = app.backend.list_calls();
    app.request(
        Method::PATCH,
        &format!("/products/{}", id),
        Some(&cookie),
        Some(json!({ "quantity": 9 })),
    )
    .await;
    assert_eq!(app.backend.list_calls() - before, 1);
}
