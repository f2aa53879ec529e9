//! Audit logging middleware.
//!
//! Logs every API request with actor id and role (when resolved), method,
//! path, and response status. Runs innermost, after the actor middleware.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::api::types::ActorContext;

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let (actor_id, role) = req
        .extensions()
        .get::<ActorContext>()
        .map(|c| (c.actor.id.to_string(), c.actor.role_kind().as_str()))
        .unwrap_or_else(|| ("anonymous".to_string(), "none"));

    let response = next.run(req).await;

    tracing::info!(
        target: "audit",
        %method,
        %path,
        %actor_id,
        role,
        status = response.status().as_u16(),
        "API access"
    );
    response
}
