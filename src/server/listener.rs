use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::server::handler::Handler;

/// Accepts connections and serves each one on its own task.
pub struct Server<H> {
    listener: TcpListener,
    handler: Arc<H>,
    read_buffer_size: usize,
    shutdown: Arc<Shutdown>,
}

struct Shutdown {
    closed: AtomicBool,
    notify: Notify,
}

/// Stops a running [`Server`] from accepting new connections.
///
/// In-flight connections are left to finish on their own.
#[derive(Clone)]
pub struct CloseHandle {
    shutdown: Arc<Shutdown>,
}

impl CloseHandle {
    /// Returns `false` if the server had already been closed.
    pub fn close(&self) -> bool {
        if self.shutdown.closed.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.shutdown.notify.notify_one();
        true
    }

    pub fn is_closed(&self) -> bool {
        self.shutdown.closed.load(Ordering::SeqCst)
    }
}

impl<H: Handler> Server<H> {
    pub async fn bind(cfg: &Config, handler: H) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(&cfg.listen_addr)
            .await
            .with_context(|| format!("failed to bind {}", cfg.listen_addr))?;

        Ok(Self {
            listener,
            handler: Arc::new(handler),
            read_buffer_size: cfg.read_buffer_size,
            shutdown: Arc::new(Shutdown {
                closed: AtomicBool::new(false),
                notify: Notify::new(),
            }),
        })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    pub fn close_handle(&self) -> CloseHandle {
        CloseHandle {
            shutdown: self.shutdown.clone(),
        }
    }

    /// Runs the accept loop until [`CloseHandle::close`] is called.
    pub async fn serve(self) -> anyhow::Result<()> {
        info!("Listening on {}", self.local_addr()?);

        while !self.shutdown.closed.load(Ordering::SeqCst) {
            let accepted = tokio::select! {
                _ = self.shutdown.notify.notified() => break,
                res = self.listener.accept() => res,
            };

            let (socket, peer) = match accepted {
                Ok(conn) => conn,
                Err(e) => {
                    tracing::warn!(error = %e, "accept failed");
                    continue;
                }
            };

            if self.shutdown.closed.load(Ordering::SeqCst) {
                break;
            }

            info!("Accepted connection from {}", peer);

            let handler = self.handler.clone();
            let read_buffer_size = self.read_buffer_size;
            tokio::spawn(async move {
                let mut conn = Connection::new(socket, handler, read_buffer_size);
                if let Err(e) = conn.run().await {
                    tracing::error!("Connection error from {}: {}", peer, e);
                }
            });
        }

        info!("Listener closed");
        Ok(())
    }
}

/// Binds `cfg.listen_addr` and serves `handler` until `close` is signalled.
pub async fn run<H: Handler>(cfg: &Config, handler: H) -> anyhow::Result<CloseHandle> {
    let server = Server::bind(cfg, handler).await?;
    let handle = server.close_handle();

    tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    Ok(handle)
}
