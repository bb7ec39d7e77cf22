//! The accept loop and bounded graceful shutdown.
//!
//! Scheduling substrate is `tokio` tasks, not OS threads, per the chosen
//! substitution in the spec's §5.1: a `tokio::task::JoinSet` plays the
//! part of the worker list (it is inherently single-owner, so no mutex is
//! needed), `AtomicBool` plays `running`, and a `watch::Receiver<bool>`
//! clone per worker plays the cooperative-cancellation check.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use procd_rpc::Registry;
use procd_utils::StatsCounter;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::metrics::ServerMetrics;
use crate::worker::handle_connection;
use crate::{ServerError, ShutdownController};

/// A running server. `listen` binds the socket and spawns the accept
/// loop; `shutdown` stops it within a bounded budget.
pub struct Server {
    local_addr: SocketAddr,
    running: Arc<AtomicBool>,
    shutdown: ShutdownController,
    shutdown_timeout: Duration,
    accept_task: Option<JoinHandle<()>>,
}

impl Server {
    /// Binds a listening socket and starts accepting connections.
    /// `registry` must already contain every procedure the caller wants
    /// served — there is no way to register one after this call (the
    /// Registry is frozen into an `Arc` here, per the §9 REDESIGN FLAG).
    pub async fn listen(
        addr: impl ToSocketAddrs,
        registry: Registry,
        config: ServerConfig,
        metrics: Arc<ServerMetrics>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        let running = Arc::new(AtomicBool::new(true));
        let shutdown = ShutdownController::new();
        let shutdown_rx = shutdown.subscribe();
        let registry = Arc::new(registry);
        let shutdown_timeout = config.shutdown_timeout;

        info!(addr = %local_addr, "server listening");

        let accept_task = tokio::spawn(accept_loop(
            listener,
            registry,
            config,
            metrics,
            running.clone(),
            shutdown_rx,
        ));

        Ok(Self {
            local_addr,
            running,
            shutdown,
            shutdown_timeout,
            accept_task: Some(accept_task),
        })
    }

    /// The address actually bound — useful when `listen` was given port
    /// `0` and the OS chose one.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stops accepting new connections, signals every in-flight worker to
    /// abandon its current read, and waits for the accept loop and all
    /// workers to finish — bounded by `shutdown_timeout` (default 5 s;
    /// see `ServerConfig`). If the bound is exceeded the remaining
    /// accept-loop task is left detached rather than awaited forever,
    /// matching the deliberate "leak past the deadline" choice in the
    /// spec's design notes.
    pub async fn shutdown(mut self) {
        self.running.store(false, Ordering::SeqCst);
        self.shutdown.shutdown();

        let Some(task) = self.accept_task.take() else {
            return;
        };

        if timeout(self.shutdown_timeout, task).await.is_err() {
            warn!(
                budget_secs = self.shutdown_timeout.as_secs(),
                "shutdown budget exceeded; accept loop left detached"
            );
        }
    }

    /// Blocks until SIGINT/SIGTERM is received, then shuts down. The
    /// convenience entry point a binary's `main` calls instead of driving
    /// `ShutdownController` and `Server::shutdown` separately.
    pub async fn run_until_signal(self) {
        self.shutdown.wait_for_signal().await;
        self.shutdown().await;
    }
}

async fn accept_loop(
    listener: TcpListener,
    registry: Arc<Registry>,
    config: ServerConfig,
    metrics: Arc<ServerMetrics>,
    running: Arc<AtomicBool>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut workers: JoinSet<()> = JoinSet::new();
    let shutdown_budget = config.shutdown_timeout;
    // Ad hoc accept-loop tallies, kept out of the Prometheus registry
    // (`ServerMetrics`) since nothing outside this process needs to scrape
    // them — just surfaced in the stopped-loop log line below.
    let stats = StatsCounter::new(&["connections_accepted", "accept_errors"]);

    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }

            Some(_) = workers.join_next(), if !workers.is_empty() => {
                // Reap: `JoinSet` already removed the finished worker.
            }

            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => {
                        stats.increment("connections_accepted");
                        debug!(peer = %peer, "accepted connection");
                        workers.spawn(handle_connection(
                            stream,
                            Arc::clone(&registry),
                            config.clone(),
                            Arc::clone(&metrics),
                            shutdown_rx.clone(),
                        ));
                    }
                    Err(e) => {
                        if !running.load(Ordering::SeqCst) {
                            break;
                        }
                        stats.increment("accept_errors");
                        warn!(error = %e, "accept() failed; backing off");
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        }
    }

    info!(stats = ?stats.snapshot(), "accept loop stopping");

    let drain = async {
        while workers.join_next().await.is_some() {}
    };

    if timeout(shutdown_budget, drain).await.is_err() {
        warn!("shutdown budget exceeded; aborting remaining connection workers");
        workers.abort_all();
        while workers.join_next().await.is_some() {}
    }

    info!("accept loop stopped, listener closing");
}
