mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn transfer(from: &str, to: &str, quantity: i64) -> Value {
    json!({
        "productId": "P001",
        "fromWarehouseId": from,
        "toWarehouseId": to,
        "quantity": quantity
    })
}

#[tokio::test]
async fn transfer_creates_destination_record() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    server
        .post_authed("/api/add-warehouse", &token, json!({ "id": "W2", "location": "North" }))
        .await?;
    server.add_product(&token, common::product("Widget", "W1", 40, 5)).await?;

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 15))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = res.json().await?;
    assert_eq!(body["data"]["createdDestination"], true);
    assert_eq!(body["data"]["source"]["currentStock"], 25);
    assert_eq!(body["data"]["destination"]["currentStock"], 15);
    assert_eq!(body["data"]["destination"]["warehouseLocation"], "North");
    assert_eq!(body["data"]["destination"]["productName"], "Widget");

    let products = server.inventory().await?;
    assert_eq!(products.len(), 2);
    let total: i64 = products
        .iter()
        .map(|p| p["currentStock"].as_i64().unwrap())
        .sum();
    assert_eq!(total, 40);

    Ok(())
}

#[tokio::test]
async fn transfer_into_existing_record_adds_stock() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    server.add_product(&token, common::product("Widget", "W1", 40, 5)).await?;
    server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 10))
        .await?;

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 5))
        .await?;
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["createdDestination"], false);
    assert_eq!(body["data"]["destination"]["currentStock"], 15);
    assert_eq!(server.inventory().await?.len(), 2);

    Ok(())
}

#[tokio::test]
async fn transfer_rejects_insufficient_stock_without_changes() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    server.add_product(&token, common::product("Widget", "W1", 4, 1)).await?;

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 5))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    let products = server.inventory().await?;
    assert_eq!(products.len(), 1);
    assert_eq!(products[0]["currentStock"], 4);

    Ok(())
}

#[tokio::test]
async fn transfer_validation_and_missing_source() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W1", 5))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 0))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 5))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn transfer_past_the_stock_bound_is_rejected_without_changes() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;
    server.add_product(&token, common::product("Widget", "W1", 10, 5)).await?;
    server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 1))
        .await?;

    let res = server
        .post_authed(
            "/api/update-stock",
            &token,
            json!({ "productId": "P001", "warehouseId": "W2", "currentStock": i64::MAX }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = server
        .post_authed(
            "/api/update-stock",
            &token,
            json!({ "productId": "P001", "warehouseId": "W2", "currentStock": 1_000_000_000_000i64 }),
        )
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let before = server.inventory().await?;

    let res = server
        .post_authed("/api/transfer-stock", &token, transfer("W1", "W2", 1))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    assert_eq!(server.inventory().await?, before);
    Ok(())
}
