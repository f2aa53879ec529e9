//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Actor resolver: loads the actor named by `X-Actor-Id` (protected routes)
//! 2. Audit logger: logs method, path, actor and status

pub mod actor;
pub mod audit;
