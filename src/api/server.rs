//! HTTP server lifecycle: bind, serve the care router in a background task,
//! and hand back a handle with a shutdown channel.

use std::net::SocketAddr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::api::router::api_router;
use crate::core_state::CoreState;

// ═══════════════════════════════════════════════════════════
// Public types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind API server on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("Failed to get server address: {0}")]
    LocalAddr(std::io::Error),
}

/// Handle to a running API server.
pub struct ApiServer {
    pub addr: SocketAddr,
    pub started_at: DateTime<Utc>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ApiServer {
    /// Signal graceful shutdown. Repeated calls are no-ops.
    pub fn shutdown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
            tracing::info!("API server shutdown signal sent");
        }
    }

    /// Wait for the serving task to finish.
    pub async fn wait(self) {
        if let Err(e) = self.task.await {
            tracing::error!("API server task failed: {e}");
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Server lifecycle
// ═══════════════════════════════════════════════════════════

/// Bind `bind` (port 0 picks an ephemeral port) and serve `api_router`
/// until `shutdown` is called.
pub async fn start_api_server(core: Arc<CoreState>, bind: SocketAddr) -> Result<ApiServer, ServerError> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|source| ServerError::Bind { addr: bind, source })?;
    let addr = listener.local_addr().map_err(ServerError::LocalAddr)?;

    let app = api_router(core);
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
            tracing::info!("API server received shutdown signal");
        };

        tracing::info!(%addr, "API server started");

        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
        {
            tracing::error!("API server error: {e}");
        }

        tracing::info!("API server stopped");
    });

    Ok(ApiServer {
        addr,
        started_at: Utc::now(),
        shutdown_tx: Some(shutdown_tx),
        task,
    })
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    use crate::clock::FixedClock;
    use crate::db::repository::fixtures::ts;

    fn test_core(dir: &tempfile::TempDir) -> Arc<CoreState> {
        let core = CoreState::new(
            dir.path().join("care.db"),
            Arc::new(FixedClock(ts("2026-03-01 09:00:00"))),
        );
        core.initialize().unwrap();
        Arc::new(core)
    }

    fn loopback() -> SocketAddr {
        "127.0.0.1:0".parse().unwrap()
    }

    #[tokio::test]
    async fn serves_health_and_shuts_down() {
        let dir = tempfile::tempdir().unwrap();
        let mut server = start_api_server(test_core(&dir), loopback()).await.expect("server should start");
        assert!(server.addr.port() > 0);

        let mut stream = tokio::net::TcpStream::connect(server.addr).await.unwrap();
        stream
            .write_all(b"GET /api/health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut raw = String::new();
        stream.read_to_string(&mut raw).await.unwrap();
        assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
        assert!(raw.contains("\"status\":\"ok\""));

        server.shutdown();
        server.shutdown();
        tokio::time::timeout(std::time::Duration::from_secs(5), server.wait())
            .await
            .expect("server should stop");
    }

    #[tokio::test]
    async fn bind_conflict_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let core = test_core(&dir);
        let mut first = start_api_server(core.clone(), loopback()).await.unwrap();

        let err = start_api_server(core, first.addr).await.err().unwrap();
        assert!(matches!(err, ServerError::Bind { .. }));

        first.shutdown();
    }
}
