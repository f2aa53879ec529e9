//! Care API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack for protected routes (outermost → innermost):
//! 1. Actor resolution → 2. Audit logger

use std::sync::Arc;

use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{get, post, put};
use axum::Router;
use tower_http::set_header::SetResponseHeaderLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the care API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // Layers apply bottom-up: Extension (outermost) → Actor → Audit → Handler.
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let protected = Router::new()
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::create),
        )
        .route("/appointments/:id", get(endpoints::appointments::detail))
        .route(
            "/appointments/:id/status",
            post(endpoints::appointments::update_status),
        )
        .route("/appointments/:id/cancel", post(endpoints::appointments::cancel))
        .route(
            "/appointments/:id/summary",
            get(endpoints::summaries::read).put(endpoints::summaries::upsert),
        )
        .route("/summaries", get(endpoints::summaries::list))
        .route("/doctors/me/availability", put(endpoints::doctors::set_availability))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::actor::require_actor))
        .layer(axum::Extension(ctx.clone()));

    let public = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/triage", post(endpoints::triage::classify))
        .route("/triage/categories", get(endpoints::triage::categories))
        .route("/doctors", get(endpoints::doctors::list))
        .route("/doctors/:id", get(endpoints::doctors::detail))
        .route("/facilities", get(endpoints::facilities::list))
        .route("/facilities/nearby", get(endpoints::facilities::nearby))
        .route("/facilities/cities", get(endpoints::facilities::cities))
        .route("/facilities/:id", get(endpoints::facilities::detail))
        .route("/emergency", get(endpoints::facilities::emergency))
        .with_state(ctx.clone())
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::Extension(ctx));

    Router::new()
        .nest("/api", protected.merge(public))
        .layer(SetResponseHeaderLayer::overriding(
            CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
}
