#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use tempfile::TempDir;

use stockroom_api::auth::password::{hash_password, MIN_COST};
use stockroom_api::config::AppConfig;
use stockroom_api::server;
use stockroom_api::state::AppState;
use stockroom_api::store::StoreError;
use stockroom_api::types::User;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

/// One server per test over its own temporary data directory
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
    dir: TempDir,
}

impl TestServer {
    pub fn data_dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Log in as the seeded admin and return the bearer token
    pub async fn login(&self) -> Result<String> {
        let res = self
            .client
            .post(self.url("/api/login"))
            .json(&json!({ "username": ADMIN_USER, "password": ADMIN_PASSWORD }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK, "admin login failed");

        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response carried no token")
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).send().await?)
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    pub async fn post_authed(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn delete_authed(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .delete(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?)
    }

    /// Add a product through the API and return its assigned id
    pub async fn add_product(&self, token: &str, body: Value) -> Result<String> {
        let res = self.post_authed("/api/add-product", token, body).await?;
        assert_eq!(res.status(), StatusCode::CREATED, "add-product failed");
        let body: Value = res.json().await?;
        body["data"]["productId"]
            .as_str()
            .map(str::to_string)
            .context("add-product response carried no productId")
    }

    pub async fn inventory(&self) -> Result<Vec<Value>> {
        let body: Value = self.get("/api/inventory").await?.json().await?;
        body["data"]
            .as_array()
            .cloned()
            .context("inventory response carried no array")
    }
}

/// Start the API in-process on a free port with an `admin` user seeded
pub async fn spawn_server() -> Result<TestServer> {
    let dir = tempfile::tempdir().context("failed to create data dir")?;
    let state = AppState::new(AppConfig::for_data_dir(dir.path()))?;

    let password_hash = hash_password(ADMIN_PASSWORD, MIN_COST)?;
    state
        .store
        .users
        .mutate(|users| {
            users.push(User {
                username: ADMIN_USER.to_string(),
                password_hash,
                role: "admin".to_string(),
            });
            Ok::<_, StoreError>(())
        })
        .await?;

    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;

    let app = server::app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        state,
        client: reqwest::Client::new(),
        dir,
    })
}

/// Body for a product with the given stock levels in `warehouse_id`
pub fn product(name: &str, warehouse_id: &str, current: i64, min: i64) -> Value {
    json!({
        "productName": name,
        "category": "General",
        "warehouseId": warehouse_id,
        "currentStock": current,
        "minThreshold": min,
        "maxCapacity": 500,
        "expectedDemand": 10
    })
}
