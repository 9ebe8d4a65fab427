//! HTTP routing and controller for the article API.
//!
//! # Responsibility
//! - Map the five `/api/articles` request shapes onto `ArticleService`.
//! - Translate absent targets into the fixed 404 envelope and storage faults
//!   into bare 500 responses.
//!
//! # Invariants
//! - Handlers never touch the storage file; all I/O goes through the service
//!   on the blocking thread pool.
//! - Request bodies must be JSON objects; their fields are not validated.

use axum::body::Body;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::{error, info};
use quill_core::{
    Article, ArticleFields, ArticleRepository, ArticleService, RepoError, RepoResult,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Instant;

pub const NOT_FOUND_MESSAGE: &str = "Article not found";
pub const WELCOME_TEXT: &str = "Welcome to the Article API";

/// Shared handler state: one service instance for the whole process.
pub struct AppState<R: ArticleRepository> {
    service: Arc<ArticleService<R>>,
}

impl<R: ArticleRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
        }
    }
}

impl<R> AppState<R>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    pub fn new(service: ArticleService<R>) -> Self {
        Self {
            service: Arc::new(service),
        }
    }

    /// Runs a service call on the blocking pool; repository I/O is synchronous.
    async fn call<T, F>(&self, op: F) -> Result<T, ApiFailure>
    where
        T: Send + 'static,
        F: FnOnce(&ArticleService<R>) -> RepoResult<T> + Send + 'static,
    {
        let service = Arc::clone(&self.service);
        match tokio::task::spawn_blocking(move || op(&service)).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(ApiFailure::Storage(err)),
            Err(err) => Err(ApiFailure::Task(err.to_string())),
        }
    }
}

/// Builds the complete HTTP surface around `service`.
pub fn build_router<R>(service: ArticleService<R>) -> Router
where
    R: ArticleRepository + Send + Sync + 'static,
{
    Router::new()
        .route(
            "/api/articles",
            get(list_articles::<R>).post(create_article::<R>),
        )
        .route(
            "/api/articles/:id",
            get(get_article::<R>)
                .put(update_article::<R>)
                .delete(delete_article::<R>),
        )
        .fallback(welcome)
        .layer(middleware::from_fn(log_requests))
        .with_state(AppState::new(service))
}

#[derive(Debug)]
enum ApiFailure {
    NotFound,
    InvalidBody(String),
    Storage(RepoError),
    Task(String),
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        match self {
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": NOT_FOUND_MESSAGE })),
            )
                .into_response(),
            Self::InvalidBody(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "message": message }))).into_response()
            }
            Self::Storage(err) => {
                error!("event=http_storage_fault module=http status=error error={err}");
                internal_error()
            }
            Self::Task(message) => {
                error!("event=http_task_failed module=http status=error error={message}");
                internal_error()
            }
        }
    }
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

fn body_fields(
    payload: Result<Json<ArticleFields>, JsonRejection>,
) -> Result<ArticleFields, ApiFailure> {
    payload
        .map(|Json(fields)| fields)
        .map_err(|rejection| ApiFailure::InvalidBody(rejection.body_text()))
}

async fn list_articles<R>(
    State(state): State<AppState<R>>,
) -> Result<Json<Vec<Article>>, ApiFailure>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let articles = state.call(|service| service.list_articles()).await?;
    Ok(Json(articles))
}

async fn get_article<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiFailure>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    state
        .call(move |service| service.get_article(&id))
        .await?
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

async fn create_article<R>(
    State(state): State<AppState<R>>,
    payload: Result<Json<ArticleFields>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), ApiFailure>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let draft = body_fields(payload)?;
    let created = state
        .call(move |service| service.create_article(draft))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_article<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
    payload: Result<Json<ArticleFields>, JsonRejection>,
) -> Result<Json<Article>, ApiFailure>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    let changes = body_fields(payload)?;
    state
        .call(move |service| service.update_article(&id, changes))
        .await?
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

async fn delete_article<R>(
    State(state): State<AppState<R>>,
    Path(id): Path<String>,
) -> Result<Json<Article>, ApiFailure>
where
    R: ArticleRepository + Send + Sync + 'static,
{
    state
        .call(move |service| service.delete_article(&id))
        .await?
        .map(Json)
        .ok_or(ApiFailure::NotFound)
}

async fn welcome() -> &'static str {
    WELCOME_TEXT
}

async fn log_requests(request: Request<Body>, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http method={} path={} status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
