//! Bridge HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::BridgeError;
use crate::routes::create_router;
use crate::state::BridgeState;

/// A bound, not yet serving, bridge server.
pub struct BridgeServer {
    listener: TcpListener,
    state: Arc<BridgeState>,
}

impl BridgeServer {
    /// Bind the listener. Port 0 picks an ephemeral port.
    pub async fn bind(addr: &str, state: Arc<BridgeState>) -> Result<Self, BridgeError> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, state })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, BridgeError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn state(&self) -> Arc<BridgeState> {
        self.state.clone()
    }

    /// Serve until the process exits.
    pub async fn run(self) -> Result<(), BridgeError> {
        let addr = self.local_addr()?;
        info!("Bridge server listening on http://{}", addr);
        axum::serve(self.listener, create_router(self.state)).await?;
        Ok(())
    }

    /// Serve on a background task until the handle is shut down.
    pub fn spawn(self) -> Result<BridgeServerHandle, BridgeError> {
        let addr = self.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = create_router(self.state);
        let listener = self.listener;

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .map_err(BridgeError::from)
        });

        info!("Bridge server listening on http://{}", addr);
        Ok(BridgeServerHandle {
            addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }
}

/// Handle to a server started with [`BridgeServer::spawn`].
pub struct BridgeServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<(), BridgeError>>,
}

impl BridgeServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stop accepting requests and wait for the server task.
    pub async fn shutdown(mut self) -> Result<(), BridgeError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let result = (&mut self.task)
            .await
            .map_err(|e| BridgeError::Server(e.to_string()))?;
        debug!("Bridge server on {} stopped", self.addr);
        result
    }
}

impl Drop for BridgeServerHandle {
    fn drop(&mut self) {
        if self.shutdown.is_some() {
            self.task.abort();
        }
    }
}
