//! Process shutdown
//!
//! [`ShutdownOrchestrator`] moves through `Running -> Draining -> Terminated`.
//! A signal stops the listener from accepting connections and gives
//! in-flight requests a grace period. The pipeline is not drained: queued
//! tokens, episodes and outcomes are discarded and reported.

use std::future::Future;
use std::io;
use std::time::Duration;

use serde::Serialize;
use showrss_worker::{PipelineHandle, PipelineStats};
use thiserror::Error;
use tokio::signal;
use tokio::sync::watch;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Lifecycle of the process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShutdownState {
    Running,
    Draining,
    Terminated,
}

/// Fatal listener outcomes
#[derive(Error, Debug)]
pub enum ShutdownError {
    /// Bind or serve failure before any signal
    #[error("HTTP listener failed: {0}")]
    Listener(#[from] io::Error),

    /// The listener returned without being asked to stop
    #[error("HTTP listener stopped before a shutdown signal")]
    ListenerStopped,
}

/// How the listener ended after a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerExit {
    /// Every in-flight request finished within the grace period
    Drained,
    /// Requests were still running when the grace period ran out
    GraceElapsed,
    /// The listener reported an error while draining
    Failed,
}

/// What happened during a shutdown
#[derive(Debug, Clone, Copy)]
pub struct ShutdownReport {
    pub listener: ListenerExit,
    /// Time from signal to termination
    pub elapsed: Duration,
    /// Pipeline state at the moment it was aborted
    pub discarded: PipelineStats,
}

/// Coordinates the listener and the pipeline on process exit
#[derive(Debug)]
pub struct ShutdownOrchestrator {
    grace_period: Duration,
    drain: CancellationToken,
    state: watch::Sender<ShutdownState>,
}

impl ShutdownOrchestrator {
    pub fn new(grace_period: Duration) -> Self {
        let (state, _) = watch::channel(ShutdownState::Running);
        Self {
            grace_period,
            drain: CancellationToken::new(),
            state,
        }
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    pub fn state(&self) -> ShutdownState {
        *self.state.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<ShutdownState> {
        self.state.subscribe()
    }

    /// Resolves when draining starts; hand it to `with_graceful_shutdown`
    pub fn drain_signal(&self) -> impl Future<Output = ()> + Send + 'static {
        self.drain.clone().cancelled_owned()
    }

    /// Drive the process until `signal` fires or the listener fails
    ///
    /// `server` must stop accepting connections once [`Self::drain_signal`]
    /// resolves. It is abandoned if it has not returned after the grace
    /// period.
    pub async fn run<S, G>(
        self,
        server: S,
        signal: G,
        pipeline: PipelineHandle,
    ) -> Result<ShutdownReport, ShutdownError>
    where
        S: Future<Output = io::Result<()>>,
        G: Future<Output = ()>,
    {
        tokio::pin!(server);

        tokio::select! {
            result = &mut server => {
                pipeline.abort();
                self.transition(ShutdownState::Terminated);
                return Err(match result {
                    Err(e) => {
                        error!(error = %e, "HTTP listener failed");
                        ShutdownError::Listener(e)
                    }
                    Ok(()) => {
                        error!("HTTP listener stopped unexpectedly");
                        ShutdownError::ListenerStopped
                    }
                });
            }
            _ = signal => {}
        }

        let started = Instant::now();
        self.transition(ShutdownState::Draining);
        self.drain.cancel();
        info!(
            grace_period_secs = self.grace_period.as_secs_f64(),
            "Draining HTTP listener"
        );

        let listener = match tokio::time::timeout(self.grace_period, &mut server).await {
            Ok(Ok(())) => ListenerExit::Drained,
            Ok(Err(e)) => {
                warn!(error = %e, "HTTP listener failed while draining");
                ListenerExit::Failed
            }
            Err(_) => {
                warn!("Grace period elapsed with requests still in flight");
                ListenerExit::GraceElapsed
            }
        };

        let discarded = pipeline.abort();
        self.transition(ShutdownState::Terminated);

        let report = ShutdownReport {
            listener,
            elapsed: started.elapsed(),
            discarded,
        };
        info!(
            listener = ?report.listener,
            elapsed_ms = report.elapsed.as_millis() as u64,
            discarded = report.discarded.discarded_work(),
            "Shutdown complete"
        );

        Ok(report)
    }

    fn transition(&self, next: ShutdownState) {
        let previous = self.state.send_replace(next);
        info!(from = ?previous, to = ?next, "Shutdown state changed");
    }
}

/// Await `close` for at most `grace`, returning whether it finished
pub async fn close_within<F>(resource: &'static str, grace: Duration, close: F) -> bool
where
    F: Future<Output = ()>,
{
    match tokio::time::timeout(grace, close).await {
        Ok(()) => {
            info!(resource, "Closed");
            true
        }
        Err(_) => {
            warn!(
                resource,
                grace_period_secs = grace.as_secs_f64(),
                "Close did not finish within the grace period"
            );
            false
        }
    }
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
