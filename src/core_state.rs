//! Transport-agnostic application state.
//!
//! Holds only immutable configuration: where the store lives and which clock
//! decides "now". Each request opens its own connection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;

use crate::clock::{Clock, SystemClock};
use crate::config::ServiceConfig;
use crate::db;

// ═══════════════════════════════════════════════════════════
// CoreState
// ═══════════════════════════════════════════════════════════

/// Shared by every request handler behind an `Arc`.
pub struct CoreState {
    db_path: PathBuf,
    clock: Arc<dyn Clock>,
}

impl CoreState {
    pub fn new(db_path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            db_path: db_path.into(),
            clock,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Result<Self, CoreError> {
        let clock = SystemClock::with_offset_minutes(config.utc_offset_minutes)
            .ok_or(CoreError::InvalidClockOffset(config.utc_offset_minutes))?;
        tracing::info!(utc_offset = %clock.offset(), "Canonical booking clock");
        Ok(Self::new(config.db_path.clone(), Arc::new(clock)))
    }

    /// Creates the data directory and brings the schema up to date.
    pub fn initialize(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        db::open_database(&self.db_path)?;
        tracing::info!(path = %self.db_path.display(), "Database ready");
        Ok(())
    }

    /// Open a fresh connection. Most common operation in handlers.
    pub fn open_db(&self) -> Result<Connection, CoreError> {
        Ok(db::open_database(&self.db_path)?)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("UTC offset of {0} minutes is out of range")]
    InvalidClockOffset(i32),
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
