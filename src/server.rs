use axum::{
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method},
    middleware::from_fn_with_state,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Environment;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::jwt_auth_middleware;
use crate::scheduler;
use crate::state::AppState;

/// Build the full router over `state`
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(public_routes())
        // Protected API
        .merge(protected_routes(state.clone()))
        .layer(DefaultBodyLimit::max(state.config.api.max_request_size_bytes));

    if let Some(cors) = cors_layer(&state) {
        router = router.layer(cors);
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

/// Serve `state` on the configured port, with the daily scheduler alongside
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    if state.config.scheduler.enabled {
        tokio::spawn(scheduler::run_scheduler(state.clone()));
    }

    let bind_addr = format!("0.0.0.0:{}", state.config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!(
        "Stockroom API listening on http://{} (data in {})",
        bind_addr,
        state.store.data_dir().display()
    );

    axum::serve(listener, app(state)).await?;
    Ok(())
}

fn public_routes() -> Router<AppState> {
    use handlers::public::{auth, history, inventory};

    Router::new()
        .route("/api/login", post(auth::login_post))
        .route("/api/inventory", get(inventory::inventory_get))
        .route("/api/warehouse/:id", get(inventory::warehouse_products_get))
        .route("/api/alerts", get(inventory::alerts_get))
        .route("/api/warehouses", get(inventory::warehouses_get))
        .route("/api/auto-update-history", post(history::auto_update_history_post))
}

fn protected_routes(state: AppState) -> Router<AppState> {
    use handlers::protected::{activity, auth, products, stock, warehouses};

    Router::new()
        .route("/api/protected", get(auth::session_whoami))
        .route("/api/upload-products", post(products::upload_products_post))
        .route("/api/update-stock", post(stock::update_stock_post))
        .route("/api/add-product", post(products::add_product_post))
        .route("/api/delete-product", delete(products::delete_product))
        .route("/api/add-warehouse", post(warehouses::add_warehouse_post))
        .route("/api/transfer-stock", post(stock::transfer_stock_post))
        .route(
            "/api/activity-log",
            get(activity::activity_log_get).post(activity::activity_log_post),
        )
        .route("/api/log-export", post(activity::log_export_post))
        .route_layer(from_fn_with_state(state, jwt_auth_middleware))
}

fn cors_layer(state: &AppState) -> Option<CorsLayer> {
    let security = &state.config.security;
    if !security.enable_cors {
        return None;
    }
    if matches!(state.config.environment, Environment::Development)
        || security.cors_origins.iter().any(|o| o == "*") {
        return Some(CorsLayer::permissive());
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(AllowHeaders::mirror_request()),
    )
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Stockroom API",
            "version": version,
            "description": "Inventory tracking backend built with Rust (Axum)",
            "endpoints": {
                "login": "/api/login (public - token acquisition)",
                "inventory": "/api/inventory, /api/warehouse/:id, /api/alerts, /api/warehouses (public)",
                "history": "/api/auto-update-history (public)",
                "stock": "/api/update-stock, /api/transfer-stock (protected)",
                "products": "/api/add-product, /api/upload-products, /api/delete-product (protected)",
                "warehouses": "/api/add-warehouse (protected)",
                "activity": "/api/activity-log, /api/log-export (protected)",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    state.store.health_check().map_err(|e| {
        tracing::error!("Health check failed: {}", e);
        ApiError::service_unavailable("Document store unavailable")
    })?;

    Ok(Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
            "storage": "ok"
        }
    })))
}
