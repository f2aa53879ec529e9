//! HTTP surface of the care services.
//!
//! Routes are nested under `/api/`. Directory, triage and health routes are
//! public; appointment and summary routes require an `X-Actor-Id` header that
//! resolves to a known actor.
//!
//! The router is composable: `api_router()` returns a `Router` that can be
//! mounted on any axum server instance.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

use std::sync::Arc;

use rusqlite::Connection;

use crate::core_state::CoreState;
use error::ApiError;

pub use router::api_router;
pub use server::{start_api_server, ApiServer};
pub use types::{ActorContext, ApiContext};

/// Run blocking store work on the blocking pool with a fresh connection.
pub(crate) async fn with_db<T, F>(core: &Arc<CoreState>, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CoreState, &mut Connection) -> Result<T, ApiError> + Send + 'static,
{
    let core = Arc::clone(core);
    tokio::task::spawn_blocking(move || {
        let mut conn = core.open_db()?;
        work(&core, &mut conn)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("blocking task failed: {e}")))?
}
