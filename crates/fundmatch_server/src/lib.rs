//! HTTP surface for fundmatch.
//!
//! # Responsibility
//! - Route requests to core services over a shared SQLite store.
//! - Map core outcomes to status codes and JSON bodies.
//!
//! # Invariants
//! - Store calls run on the blocking pool while holding the connection lock,
//!   so requests serialize at the store.

pub mod config;
pub mod error;
mod handlers;

use axum::extract::{DefaultBodyLimit, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;
use log::info;
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use std::time::Instant;

pub use config::{ServerConfig, DEFAULT_MAX_BODY_BYTES, IN_MEMORY_DATABASE};
pub use error::{ApiError, ApiResult, StartupError};

/// Shared handle to the one store connection.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs `op` against the connection on tokio's blocking pool.
    pub async fn call<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&Connection) -> ApiResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn
                .lock()
                .map_err(|_| ApiError::Internal("database lock poisoned".to_string()))?;
            op(&guard)
        })
        .await
        .map_err(|err| ApiError::Internal(format!("store task failed: {err}")))?
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, max_body_bytes: usize) -> Self {
        Self { db, max_body_bytes }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route(
            "/projects",
            get(handlers::projects::list_projects).post(handlers::projects::create_project),
        )
        .route(
            "/projects/{id}",
            get(handlers::projects::get_project)
                .patch(handlers::projects::patch_project)
                .put(handlers::projects::put_project),
        )
        .route(
            "/projects/{id}/investors",
            get(handlers::projects::investors_for_project),
        )
        .route(
            "/investors",
            get(handlers::investors::list_investors).post(handlers::investors::create_investor),
        )
        .route(
            "/investors/{id}",
            get(handlers::investors::get_investor)
                .patch(handlers::investors::patch_investor)
                .put(handlers::investors::put_investor),
        )
        .route(
            "/investors/{id}/projects",
            get(handlers::investors::projects_for_investor),
        )
        .route(
            "/investors/{id}/projects/{project_id}/invest",
            post(handlers::investors::invest),
        )
        .layer(middleware::from_fn(log_requests))
        .layer(DefaultBodyLimit::max(state.max_body_bytes))
        .with_state(state)
}

async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let started_at = Instant::now();

    let response = next.run(request).await;

    info!(
        "event=http_request module=server status={} method={} path={} code={} duration_ms={}",
        if response.status().is_server_error() {
            "error"
        } else {
            "ok"
        },
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
