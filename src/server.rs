//! HTTP API over the store.
//!
//! [`router`] builds the axum [`Router`]; [`serve`] binds it and runs until
//! Ctrl-C. Store calls are synchronous file I/O, so every handler runs its
//! call on the blocking pool.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::store::{Store, StoreError, TouchpointFilter, TouchpointInput};

/// Errors a handler can answer with.
#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid JSON: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store(e @ StoreError::NotFound { .. }) => (StatusCode::NOT_FOUND, e.to_string()),
            Self::Store(e) if e.is_client_error() => (StatusCode::BAD_REQUEST, e.to_string()),
            Self::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Run a store call on the blocking pool.
async fn blocking<T, F>(store: &Arc<Store>, f: F) -> ApiResult<T>
where
    F: FnOnce(&Store) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
        .map_err(ApiError::from)
}

#[derive(Debug, Deserialize, Serialize)]
pub struct NamePayload {
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReportPayload {
    pub filename: String,
    #[serde(default)]
    pub content: String,
}

/// Build the API router.
pub fn router(store: Arc<Store>) -> Router {
    Router::new()
        .route("/api/touchpoints", get(list_touchpoints).post(create_touchpoint))
        .route(
            "/api/touchpoints/{id}",
            put(update_touchpoint).delete(delete_touchpoint),
        )
        .route("/api/metadata", get(get_metadata))
        .route("/api/metadata/categories", post(add_category))
        .route("/api/metadata/categories/{name}", delete(remove_category))
        .route("/api/metadata/tags", post(add_tag))
        .route("/api/metadata/tags/{name}", delete(remove_tag))
        .route("/api/reports", get(list_reports).post(create_report))
        .route("/api/reports/{filename}", get(get_report))
        .layer(middleware::from_fn(log_request))
        .with_state(store)
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    tracing::info!(%method, %path, status = response.status().as_u16(), "request");
    response
}

async fn list_touchpoints(
    State(store): State<Arc<Store>>,
    Query(filter): Query<TouchpointFilter>,
) -> ApiResult<impl IntoResponse> {
    let touchpoints = blocking(&store, move |s| s.list_touchpoints(&filter)).await?;
    Ok(Json(touchpoints))
}

async fn create_touchpoint(
    State(store): State<Arc<Store>>,
    payload: Result<Json<TouchpointInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let touchpoint = blocking(&store, move |s| s.create_touchpoint(input)).await?;
    Ok((StatusCode::CREATED, Json(touchpoint)))
}

async fn update_touchpoint(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
    payload: Result<Json<TouchpointInput>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(input) = payload?;
    let touchpoint = blocking(&store, move |s| s.update_touchpoint(&id, input)).await?;
    Ok(Json(touchpoint))
}

async fn delete_touchpoint(
    State(store): State<Arc<Store>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&store, move |s| s.delete_touchpoint(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn get_metadata(State(store): State<Arc<Store>>) -> ApiResult<impl IntoResponse> {
    let metadata = blocking(&store, |s| s.get_metadata()).await?;
    Ok(Json(metadata))
}

async fn add_category(
    State(store): State<Arc<Store>>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let name = payload.name.clone();
    blocking(&store, move |s| s.add_category(&name)).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

async fn remove_category(
    State(store): State<Arc<Store>>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&store, move |s| s.remove_category(&name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn add_tag(
    State(store): State<Arc<Store>>,
    payload: Result<Json<NamePayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let name = payload.name.clone();
    blocking(&store, move |s| s.add_tag(&name)).await?;
    Ok((StatusCode::CREATED, Json(payload)))
}

async fn remove_tag(
    State(store): State<Arc<Store>>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    blocking(&store, move |s| s.remove_tag(&name)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_reports(State(store): State<Arc<Store>>) -> ApiResult<impl IntoResponse> {
    let names = blocking(&store, |s| s.list_reports()).await?;
    Ok(Json(names))
}

async fn get_report(
    State(store): State<Arc<Store>>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let content = blocking(&store, move |s| s.get_report(&filename)).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        Body::from(content),
    )
        .into_response())
}

async fn create_report(
    State(store): State<Arc<Store>>,
    payload: Result<Json<ReportPayload>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(ReportPayload { filename, content }) = payload?;
    let name = filename.clone();
    blocking(&store, move |s| s.create_report(&name, &content)).await?;
    Ok((StatusCode::CREATED, Json(json!({ "filename": filename }))))
}

/// Bind to `bind_addr` and serve the API until Ctrl-C.
pub async fn serve(store: Arc<Store>, bind_addr: &str) -> anyhow::Result<()> {
    let router = router(store);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "ohara listening at http://{bind_addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending::<()>().await;
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
