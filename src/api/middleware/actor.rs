//! Actor resolution middleware.
//!
//! Extracts `X-Actor-Id`, loads the actor (and doctor profile) from the
//! store, and injects `ActorContext` into request extensions for downstream
//! handlers. Unknown or malformed ids are rejected with 401.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ActorContext, ApiContext, ACTOR_HEADER};
use crate::api::with_db;
use crate::db::repository;

/// Require a known actor on the request.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn require_actor(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_actor_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_actor_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let actor_id = req
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(ApiError::ActorRequired)?;

    let actor = with_db(&ctx.core, move |_, conn| {
        Ok(repository::get_actor(conn, &actor_id)?)
    })
    .await?
    .ok_or_else(|| {
        tracing::warn!(%actor_id, "Unknown actor rejected");
        ApiError::ActorRequired
    })?;

    req.extensions_mut().insert(ActorContext { actor });
    Ok(next.run(req).await)
}
