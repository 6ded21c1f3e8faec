//! Single-shot OAuth redirect capture server
//!
//! Completes a browser-redirect handshake without a long-lived listening
//! service. The listener runs on its own OS thread with a dedicated
//! current-thread runtime, so the owning context can impose a wall-clock
//! bound and tear the whole unit down without touching its own executor.
//!
//! The server accepts exactly one request: the token is delivered over a
//! one-shot channel strictly before the HTTP response is produced, the
//! response is flushed by graceful shutdown, and then the runtime exits.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use brokkr_core::{Error, Result};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::sync::Notify;
use tracing::{debug, warn};

/// Query-string field carrying the token in the redirect callback
const AUTH_TOKEN_PARAM: &str = "authToken";

const CONFIRMATION_PAGE: &str = "<script type=\"text/javascript\">window.close()</script>\
You are authenticated, you can close this tab now.";

const FAILURE_PAGE: &str = "Authentication failed, you can close this tab and try again.";

#[derive(Clone)]
struct CaptureState {
    result_tx: mpsc::Sender<Result<String>>,
    served: Arc<Notify>,
}

/// An in-flight redirect capture, owning the listener thread
///
/// Created when a redirect-based auth flow starts; resolving [`wait`]
/// (success, failure, or timeout) tears the listener down before returning.
///
/// [`wait`]: CaptureSession::wait
#[derive(Debug)]
pub struct CaptureSession {
    addr: SocketAddr,
    result_rx: mpsc::Receiver<Result<String>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl CaptureSession {
    /// Bind the listener on its own thread and return once the bind resolved
    ///
    /// Port 0 is supported; the actually bound address is available through
    /// [`addr`](CaptureSession::addr).
    pub fn spawn(host: &str, port: u16) -> Result<CaptureSession> {
        let bind_addr = format!("{}:{}", host, port);
        let (result_tx, result_rx) = mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (bound_tx, bound_rx) = mpsc::channel();

        let thread = std::thread::Builder::new()
            .name("auth-capture".to_string())
            .spawn(move || {
                if let Err(err) =
                    run_capture_server(&bind_addr, result_tx, shutdown_rx, bound_tx.clone())
                {
                    // Surface pre-bind failures to the spawner; if the bind
                    // already succeeded this send is simply ignored.
                    let _ = bound_tx.send(Err(err));
                }
            })?;

        let addr = match bound_rx.recv() {
            Ok(Ok(addr)) => addr,
            Ok(Err(err)) => {
                let _ = thread.join();
                return Err(err);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(Error::authentication(
                    "Redirect capture server exited before binding",
                ));
            }
        };

        debug!("redirect capture server listening on {}", addr);
        Ok(CaptureSession {
            addr,
            result_rx,
            shutdown_tx: Some(shutdown_tx),
            thread: Some(thread),
        })
    }

    /// Address the listener is bound to
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Wait up to `timeout` for the callback to deliver a token
    ///
    /// Whatever the outcome, the listener is torn down before this returns.
    pub fn wait(mut self, timeout: Duration) -> Result<String> {
        let outcome = match self.result_rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(_) => Err(Error::authentication_timeout(timeout)),
        };
        self.teardown();
        outcome
    }

    fn teardown(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                warn!("redirect capture thread panicked during teardown");
            }
        }
    }
}

impl Drop for CaptureSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

/// Run the capture server to completion on the current thread
///
/// This must be invoked from a dedicated thread: calling it with an ambient
/// async runtime present is a programming error (it would park the caller's
/// executor behind a listening socket) and fails fast with `NotSupported`.
pub fn run_capture_server(
    bind_addr: &str,
    result_tx: mpsc::Sender<Result<String>>,
    shutdown_rx: oneshot::Receiver<()>,
    bound_tx: mpsc::Sender<Result<SocketAddr>>,
) -> Result<()> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(Error::not_supported(
            "Redirect capture server must run in its own thread, not on the caller's runtime",
        ));
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(serve(bind_addr, result_tx, shutdown_rx, bound_tx))
}

async fn serve(
    bind_addr: &str,
    result_tx: mpsc::Sender<Result<String>>,
    shutdown_rx: oneshot::Receiver<()>,
    bound_tx: mpsc::Sender<Result<SocketAddr>>,
) -> Result<()> {
    let listener = match tokio::net::TcpListener::bind(bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            let _ = bound_tx.send(Err(err.into()));
            return Ok(());
        }
    };
    let local_addr = listener.local_addr()?;
    let _ = bound_tx.send(Ok(local_addr));

    let served = Arc::new(Notify::new());
    let state = CaptureState {
        result_tx,
        served: served.clone(),
    };

    // The callback may land on any path, so route everything to the handler
    let app = Router::new()
        .route("/", get(capture_handler))
        .fallback(get(capture_handler))
        .with_state(state);

    // Graceful shutdown waits for the in-flight response to flush before the
    // runtime exits, preserving the deliver-then-respond-then-exit ordering.
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            tokio::select! {
                _ = served.notified() => {}
                _ = shutdown_rx => {}
            }
        })
        .await?;

    debug!("redirect capture server on {} shut down", local_addr);
    Ok(())
}

async fn capture_handler(
    State(state): State<CaptureState>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    // Deliver to the waiting owner before the response is produced
    let response = match params.get(AUTH_TOKEN_PARAM).filter(|t| !t.is_empty()) {
        Some(token) => {
            let _ = state.result_tx.send(Ok(token.clone()));
            (StatusCode::OK, Html(CONFIRMATION_PAGE)).into_response()
        }
        None => {
            let _ = state
                .result_tx
                .send(Err(Error::authentication("Failed to authenticate")));
            (StatusCode::UNAUTHORIZED, Html(FAILURE_PAGE)).into_response()
        }
    };

    // One request only: retire the listener once this response is flushed
    state.served.notify_one();
    response
}
