use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use crate::handler::{Handler, RedisHandler};
use crate::persist::ChannelPersistor;
use crate::store::{Store, DEFAULT_SHARDS};
use crate::Error;

/// Runtime options, normally filled in from the command line.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub shards: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            bind: "127.0.0.1".to_string(),
            port: 6379,
            shards: DEFAULT_SHARDS,
        }
    }
}

/// Binds the listener, wires shutdown signals, and serves until one
/// arrives. A bind failure propagates out as a fatal error.
pub async fn run(config: Config) -> Result<(), Error> {
    let _ = tracing_subscriber::fmt()
        .try_init()
        .map_err(|e| debug!("Failed to initialize global tracing: {}", e));

    let listener = TcpListener::bind((config.bind.as_str(), config.port)).await?;
    info!("listening on {}", listener.local_addr()?);

    let shutdown = CancellationToken::new();
    subscribe_signals(shutdown.clone())?;

    let store = Store::with_shards(config.shards);
    let persistor = Arc::new(ChannelPersistor::spawn());
    let handler = Arc::new(RedisHandler::new(store, persistor, shutdown.clone()));

    serve(listener, handler, shutdown).await
}

/// Accept loop over any handler. On shutdown it stops accepting, closes
/// the handler (which cascades to live connections) and waits for every
/// connection task to finish.
pub async fn serve<H: Handler>(
    listener: TcpListener,
    handler: Arc<H>,
    shutdown: CancellationToken,
) -> Result<(), Error> {
    let tracker = TaskTracker::new();

    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        debug!(%peer, "accepted");
                        let handler = Arc::clone(&handler);
                        tracker.spawn(async move {
                            handler.handle(stream, peer).await;
                        });
                    }
                    Err(err) => error!(error = %err, "accept error"),
                }
            }
            _ = shutdown.cancelled() => break,
        }
    }

    info!("shutting down");
    drop(listener);
    handler.close();
    tracker.close();
    tracker.wait().await;
    info!("all connections drained");
    Ok(())
}

/// Translates process signals into a cancellation. On Unix the full set
/// the original daemon honored is wired up; elsewhere Ctrl-C is the only
/// trigger.
fn subscribe_signals(shutdown: CancellationToken) -> Result<(), Error> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sighup = signal(SignalKind::hangup())?;
        let mut sigquit = signal(SignalKind::quit())?;
        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::spawn(async move {
            tokio::select! {
                _ = sighup.recv() => info!("received SIGHUP"),
                _ = sigquit.recv() => info!("received SIGQUIT"),
                _ = sigterm.recv() => info!("received SIGTERM"),
                _ = sigint.recv() => info!("received SIGINT"),
            }
            shutdown.cancel();
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received Ctrl-C");
            }
            shutdown.cancel();
        });
    }

    Ok(())
}
