use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::commands::Registry;
use crate::connection::Connection;
use crate::frame::{self, Frame};
use crate::persist::Persist;
use crate::store::Store;

/// Capability the accept loop drives: one `handle` call per accepted
/// socket, and a `close` that stops new work and cascades to live
/// connections.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, stream: TcpStream, peer: SocketAddr) -> impl Future<Output = ()> + Send;
    fn close(&self);
}

/// Early bring-up handler: parses frames and writes them straight back.
#[derive(Default)]
pub struct EchoHandler {
    shutdown: CancellationToken,
}

impl EchoHandler {
    pub fn new() -> EchoHandler {
        EchoHandler::default()
    }
}

impl Handler for EchoHandler {
    async fn handle(&self, stream: TcpStream, peer: SocketAddr) {
        if self.shutdown.is_cancelled() {
            return;
        }
        let mut conn = Connection::new(stream);
        loop {
            let frame = tokio::select! {
                res = conn.read_frame() => res,
                _ = self.shutdown.cancelled() => break,
            };
            match frame {
                Ok(Some(frame)) => {
                    if conn.write_frame(&frame).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    debug!(error = %err, %peer, "echo connection error");
                    break;
                }
            }
        }
        conn.shutdown().await;
    }

    fn close(&self) {
        self.shutdown.cancel();
    }
}

/// The production handler: reads command arrays off each connection,
/// dispatches them against the shared store, and writes replies in arrival
/// order.
pub struct RedisHandler {
    store: Store,
    registry: Registry,
    persistor: Arc<dyn Persist>,
    shutdown: CancellationToken,
}

impl RedisHandler {
    pub fn new(
        store: Store,
        persistor: Arc<dyn Persist>,
        shutdown: CancellationToken,
    ) -> RedisHandler {
        RedisHandler {
            store,
            registry: Registry::new(),
            persistor,
            shutdown,
        }
    }

    #[instrument(name = "connection", skip(self, stream), fields(connection_id))]
    async fn serve_connection(&self, stream: TcpStream, peer: SocketAddr) {
        let mut conn = Connection::new(stream);
        tracing::Span::current().record("connection_id", conn.id);
        info!("accepted connection");

        loop {
            let frame = tokio::select! {
                res = conn.read_frame() => res,
                _ = self.shutdown.cancelled() => break,
            };

            match frame {
                Ok(Some(Frame::Array(parts))) => {
                    let reply = self
                        .registry
                        .dispatch(parts, &self.store, self.persistor.as_ref());
                    if let Err(err) = conn.write_frame(&reply).await {
                        error!(error = %err, "failed to write reply");
                        break;
                    }
                }
                // Commands arrive as arrays; anything else is noise from a
                // confused client.
                Ok(Some(frame)) => debug!(frame = %frame, "ignoring non-array payload"),
                // Clean EOF between frames.
                Ok(None) => break,
                Err(err) => {
                    match err.downcast_ref::<frame::Error>() {
                        Some(protocol_err) => {
                            // Report the malformed frame. The byte stream
                            // cannot be resynchronized after it, so the
                            // connection closes either way.
                            let reply = Frame::Error(format!("ERR {}", protocol_err));
                            let _ = conn.write_frame(&reply).await;
                        }
                        None => debug!(error = %err, "connection error"),
                    }
                    break;
                }
            }
        }

        conn.shutdown().await;
        info!("connection closed");
    }
}

impl Handler for RedisHandler {
    async fn handle(&self, stream: TcpStream, peer: SocketAddr) {
        // A handler that is already shut down drops fresh connections on
        // the floor.
        if self.shutdown.is_cancelled() {
            return;
        }
        self.serve_connection(stream, peer).await;
    }

    fn close(&self) {
        self.shutdown.cancel();
    }
}
