mod common;

use anyhow::Result;
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use serde_json::Value;

const HEADER: &str = "productId,productName,category,warehouseId,warehouseLocation,currentStock,minThreshold,maxCapacity,expectedDemand\n";

async fn upload(server: &common::TestServer, token: &str, csv: String) -> Result<reqwest::Response> {
    let form = Form::new().part(
        "file",
        Part::bytes(csv.into_bytes())
            .file_name("products.csv")
            .mime_str("text/csv")?,
    );
    Ok(server
        .client
        .post(server.url("/api/upload-products"))
        .bearer_auth(token)
        .multipart(form)
        .send()
        .await?)
}

#[tokio::test]
async fn upload_adds_all_rows() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let csv = format!(
        "{HEADER}P010,Gear,Parts,W1,Central,40,10,100,25\nP011,Cog,Parts,W2,North,2,5,50,5\n"
    );
    let res = upload(&server, &token, csv).await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["data"]["added"], 2);

    let products = server.inventory().await?;
    assert_eq!(products.len(), 2);
    assert_eq!(products[1]["productId"], "P011");

    let body: Value = server.get("/api/alerts").await?.json().await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    // The id counter moves past uploaded ids
    let id = server.add_product(&token, common::product("Sprocket", "W1", 5, 1)).await?;
    assert_eq!(id, "P012");

    Ok(())
}

#[tokio::test]
async fn upload_with_bad_row_adds_nothing() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let csv = format!(
        "{HEADER}P010,Gear,Parts,W1,Central,40,10,100,25\nP011,Cog,Parts,W2,North,lots,5,50,5\n"
    );
    let res = upload(&server, &token, csv).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().contains("row 2"));

    assert!(server.inventory().await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn upload_of_existing_identity_conflicts() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let csv = format!("{HEADER}P010,Gear,Parts,W1,Central,40,10,100,25\n");
    assert_eq!(upload(&server, &token, csv.clone()).await?.status(), StatusCode::OK);

    let res = upload(&server, &token, csv).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "CONFLICT");
    assert_eq!(server.inventory().await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.login().await?;

    let form = Form::new().text("note", "no file here");
    let res = server
        .client
        .post(server.url("/api/upload-products"))
        .bearer_auth(&token)
        .multipart(form)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    Ok(())
}
