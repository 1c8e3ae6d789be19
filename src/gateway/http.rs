//! Gateway HTTP Adapter
//!
//! The query-parameter encoding of the client operations:
//! `GET /set?key=&value=`, `GET /get?key=`, `GET /status`. STATUS answers
//! JSON here; the socket transports render the same projection as text.

use std::sync::Arc;

use axum::extract::{Extension, Query};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use super::command::http_status;
use super::router::RequestRouter;
use crate::replica::protocol::{GetParams, SetParams};

pub fn app(router: Arc<RequestRouter>) -> Router {
    Router::new()
        .route("/set", get(handle_set))
        .route("/get", get(handle_get))
        .route("/status", get(handle_status))
        .layer(Extension(router))
}

async fn handle_set(
    Extension(router): Extension<Arc<RequestRouter>>,
    Query(params): Query<SetParams>,
) -> Response {
    match router.set(params.key, params.value).await {
        Ok(ack) => (StatusCode::OK, Json(ack)).into_response(),
        Err(e) => (http_status(&e), e.to_string()).into_response(),
    }
}

async fn handle_get(
    Extension(router): Extension<Arc<RequestRouter>>,
    Query(params): Query<GetParams>,
) -> Response {
    match router.get(&params.key).await {
        Ok(Some(value)) => (StatusCode::OK, value).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "key not found").into_response(),
        Err(e) => (http_status(&e), e.to_string()).into_response(),
    }
}

async fn handle_status(Extension(router): Extension<Arc<RequestRouter>>) -> Response {
    (StatusCode::OK, Json(router.status().await)).into_response()
}
