//! Shared types for the API layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::api::error::ApiError;
use crate::core_state::CoreState;
use crate::models::Actor;

/// Header carrying the requesting actor's id. Authenticating it is the job of
/// whatever sits in front of this service.
pub const ACTOR_HEADER: &str = "X-Actor-Id";

// ═══════════════════════════════════════════════════════════
// API context: shared state for the router
// ═══════════════════════════════════════════════════════════

/// Shared context for all API routes and middleware.
#[derive(Clone)]
pub struct ApiContext {
    pub core: Arc<CoreState>,
}

impl ApiContext {
    pub fn new(core: Arc<CoreState>) -> Self {
        Self { core }
    }
}

// ═══════════════════════════════════════════════════════════
// Actor context: injected by the actor middleware
// ═══════════════════════════════════════════════════════════

/// The resolved actor, re-loaded from the store on every request.
#[derive(Debug, Clone)]
pub struct ActorContext {
    pub actor: Actor,
}

/// Parse a path id. Malformed ids are a client error, not a missing row.
pub fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("Invalid ID format: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_hyphenated_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(matches!(parse_id("42"), Err(ApiError::BadRequest(_))));
    }
}
