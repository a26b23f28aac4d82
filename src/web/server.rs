//! Axum router and server loop.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, error, info};

use super::etag::{content_hash, if_none_match_matches};
use crate::config::ServerSettings;
use crate::lookup::fetch_food_document;
use crate::store::FoodSource;

/// Body of every 500 response; the detail goes to the log only.
const INTERNAL_ERROR_BODY: &str = "Internal server error";

/// Application state shared across handlers
pub struct AppState {
    pub source: Arc<dyn FoodSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn FoodSource>) -> Self {
        Self { source }
    }
}

/// Build the axum router with all routes
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health))
        .route("/api/foods/{id}", get(get_food))
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn serve(settings: &ServerSettings, source: Arc<dyn FoodSource>) -> std::io::Result<()> {
    let app = router(Arc::new(AppState::new(source)));

    let addr = settings.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "foodcomp listening");

    axum::serve(listener, app).await
}

// ============================================================================
// API Handlers
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// GET /api/health
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /api/foods/:id - Assembled food document
async fn get_food(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let document = match fetch_food_document(state.source.as_ref(), &id).await {
        Ok(document) => document,
        Err(e) if e.is_not_found() => {
            debug!(id = %id, "food not found");
            return (StatusCode::NOT_FOUND, e.to_string()).into_response();
        }
        Err(e) => {
            error!(id = %id, error = %e, "food lookup failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
        }
    };

    let body = match serde_json::to_vec(&document) {
        Ok(body) => body,
        Err(e) => {
            error!(id = %id, error = %e, "failed to serialize food document");
            return (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response();
        }
    };

    let etag = format!("\"{}\"", content_hash(&body));
    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| if_none_match_matches(value, &etag));

    if not_modified {
        return (StatusCode::NOT_MODIFIED, [(header::ETAG, etag)]).into_response();
    }

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (header::ETAG, etag),
        ],
        body,
    )
        .into_response()
}
