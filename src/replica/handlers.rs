//! Node HTTP Handlers
//!
//! Thin axum adapters over the `ReplicaEngine`. Malformed queries never reach
//! the engine: the `Query` extractor rejects them with 400 at the boundary.

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::engine::ReplicaEngine;
use super::protocol::{
    AppendParams, GetParams, SetParams, WriteAck, ENDPOINT_APPEND, ENDPOINT_GET, ENDPOINT_SET,
};

pub fn app(engine: Arc<ReplicaEngine>) -> Router {
    Router::new()
        .route(ENDPOINT_SET, get(handle_set))
        .route(ENDPOINT_GET, get(handle_get))
        .route(ENDPOINT_APPEND, get(handle_append))
        .layer(Extension(engine))
}

/// `GET /set?key=..&value=..` — a client write forwarded by the gateway.
pub async fn handle_set(
    Extension(engine): Extension<Arc<ReplicaEngine>>,
    Query(params): Query<SetParams>,
) -> (StatusCode, Json<WriteAck>) {
    tracing::info!(
        "Node {}: SET key={} value={}",
        engine.id,
        params.key,
        params.value
    );
    let index = engine.local_write(params.key, params.value).await;
    (StatusCode::OK, Json(WriteAck { ok: true, index }))
}

/// `GET /append?index=..&key=..&value=..` — an entry relayed from the leader.
pub async fn handle_append(
    Extension(engine): Extension<Arc<ReplicaEngine>>,
    Query(params): Query<AppendParams>,
) -> (StatusCode, Json<WriteAck>) {
    engine
        .remote_apply(params.index, params.key, params.value)
        .await;
    (
        StatusCode::OK,
        Json(WriteAck {
            ok: true,
            index: params.index,
        }),
    )
}

/// `GET /get?key=..` — local map lookup; 404 when the key is absent.
pub async fn handle_get(
    Extension(engine): Extension<Arc<ReplicaEngine>>,
    Query(params): Query<GetParams>,
) -> (StatusCode, String) {
    match engine.get(&params.key) {
        Some(value) => (StatusCode::OK, value),
        None => (StatusCode::NOT_FOUND, "key not found".to_string()),
    }
}
