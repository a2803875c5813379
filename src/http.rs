//! HTTP front door: `GET /api/explain?command=...`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::helper::Matcher;

pub const MISSING_COMMAND: &str = "No command provided.";

#[derive(Debug, Deserialize)]
pub struct ExplainQuery {
    pub command: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExplainResponse {
    pub message: String,
}

pub fn router(matcher: Arc<Matcher>) -> Router {
    Router::new()
        .route("/api/explain", get(explain))
        .layer(TraceLayer::new_for_http())
        .with_state(matcher)
}

/// An empty or malformed `command` is treated the same as a missing one.
async fn explain(
    State(matcher): State<Arc<Matcher>>,
    query: Result<Query<ExplainQuery>, QueryRejection>,
) -> (StatusCode, Json<ExplainResponse>) {
    let command = match query {
        Ok(Query(query)) => query.command.filter(|c| !c.is_empty()),
        Err(rejection) => {
            warn!("Rejected query string: {rejection}");
            None
        }
    };
    let Some(command) = command else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ExplainResponse { message: MISSING_COMMAND.to_string() }),
        );
    };

    let message = matcher.respond("http", &command);
    (StatusCode::OK, Json(ExplainResponse { message }))
}

pub async fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("🌐 HTTP API listening on {}", listener.local_addr()?);
    Ok(listener)
}

/// Serve the API until Ctrl-C.
pub async fn serve(listener: TcpListener, matcher: Arc<Matcher>) -> std::io::Result<()> {
    axum::serve(listener, router(matcher))
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
        })
        .await
}
