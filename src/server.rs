//! HTTP server and graceful shutdown.
//!
//! # Kubernetes
//!
//! On pod termination Kubernetes sends **SIGTERM** and waits
//! `terminationGracePeriodSeconds` before SIGKILL. The server then:
//! 1. stops calling `listener.accept()`,
//! 2. asks every open connection to close once its current response is out,
//! 3. waits for them, at most [`DEFAULT_DRAIN_TIMEOUT`] unless overridden,
//! 4. returns `Ok(())` from [`Server::serve`].
//!
//! `/crash` deliberately skips all of this.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::error::Error;
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::router::Router;
use crate::status::Status;

/// How long in-flight connections get to finish after a shutdown signal.
pub const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

/// A bound, not yet serving, HTTP server.
pub struct Server {
    listener: TcpListener,
    drain_timeout: Duration,
}

impl Server {
    /// Binds the listening socket. Host names are resolved; port `0` picks an
    /// ephemeral port, see [`local_addr`](Server::local_addr).
    pub async fn bind(addr: impl ToSocketAddrs) -> Result<Self, Error> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { listener, drain_timeout: DEFAULT_DRAIN_TIMEOUT })
    }

    /// Upper bound on the drain after shutdown. Connections still open when
    /// it expires are aborted.
    pub fn drain_timeout(mut self, timeout: Duration) -> Self {
        self.drain_timeout = timeout;
        self
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves until SIGTERM or Ctrl-C, then drains in-flight connections.
    pub async fn serve(self, router: Router) -> Result<(), Error> {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Serves until `signal` resolves, then drains in-flight connections.
    ///
    /// Every open connection is told to shut down: idle keep-alive
    /// connections close at once, busy ones after their current response.
    pub async fn serve_with_shutdown(
        self,
        router: Router,
        signal: impl Future<Output = ()>,
    ) -> Result<(), Error> {
        let addr = self.local_addr()?;
        let router = Arc::new(router);
        let mut tasks = tokio::task::JoinSet::new();
        let (stop_tx, stop_rx) = watch::channel(false);

        info!(%addr, "listening");

        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Check shutdown first so a pending signal wins over queued
                // connections.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = self.listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let stop = stop_rx.clone();
                    tasks.spawn(serve_connection(stream, peer, router, stop));
                }

                // Reap finished tasks so the set stays bounded.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        drop(self.listener);
        let _ = stop_tx.send(true);

        let drain = async { while tasks.join_next().await.is_some() {} };
        if tokio::time::timeout(self.drain_timeout, drain).await.is_err() {
            warn!(
                remaining = tasks.len(),
                timeout_s = self.drain_timeout.as_secs(),
                "drain timed out, aborting remaining connections"
            );
            tasks.shutdown().await;
        }

        info!("stopped");
        Ok(())
    }
}

/// Drives one connection until the client closes it or `stop` flips, in
/// which case hyper finishes the request in progress and then closes.
async fn serve_connection(
    stream: TcpStream,
    peer: SocketAddr,
    router: Arc<Router>,
    mut stop: watch::Receiver<bool>,
) {
    // Called once per request on this connection.
    let svc = service_fn(move |req| {
        let router = Arc::clone(&router);
        async move { dispatch(&router, req, peer).await }
    });

    let builder = ConnBuilder::new(TokioExecutor::new());
    let conn = builder.serve_connection(TokioIo::new(stream), svc);
    tokio::pin!(conn);

    let res = tokio::select! {
        res = conn.as_mut() => res,
        Ok(()) = stop.changed() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    };

    if let Err(e) = res {
        error!(%peer, "connection error: {e}");
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request and produces one response. Every failure is already an
/// HTTP status here, so hyper never sees an error.
async fn dispatch(
    router: &Router,
    req: hyper::Request<Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _body) = req.into_parts();

    let response = match Method::try_from(&parts.method) {
        Ok(method) => router.dispatch(Request::from_parts(method, &parts)).await,
        Err(()) => Response::status(Status::MethodNotAllowed),
    };

    debug!(
        %peer,
        method = %parts.method,
        path = parts.uri.path(),
        status = u16::from(response.status_code()),
        latency_us = started.elapsed().as_micros() as u64,
        "request"
    );

    Ok(response.into_inner())
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on SIGTERM (Unix) or Ctrl-C.
///
/// If a handler cannot be installed that arm never fires; the other one
/// still can.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
