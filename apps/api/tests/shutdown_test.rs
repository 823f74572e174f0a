//! Integration tests for process shutdown
//!
//! The listener is drained within the grace period; queued pipeline work
//! is discarded and reported rather than persisted.

mod common;

use std::future::IntoFuture;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use common::*;
use showrss_api::shutdown::{ListenerExit, ShutdownError};
use showrss_api::{ShutdownOrchestrator, ShutdownState};
use showrss_worker::TokenOrigin;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::oneshot;

const GRACE: Duration = Duration::from_secs(2);

#[test_log::test(tokio::test)]
async fn test_shutdown_discards_queued_updates_and_stops_listener() {
    let store = Arc::new(BlockingStore::new());
    let source = Arc::new(ScriptedSource::new(episodes(1, 6)));
    let TestApp { router, pipeline } = TestApp::builder()
        .source(source)
        .store(store.clone())
        .build();

    // One update is stuck inside the store, five wait behind it
    let monitor = pipeline.monitor();
    pipeline.trigger().inject(TokenOrigin::Manual).await.unwrap();
    wait_until("five queued updates", || {
        monitor.snapshot().update_queue.len == 5 && store.attempts() == 1
    })
    .await;

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let orchestrator = ShutdownOrchestrator::new(GRACE);
    let mut states = orchestrator.subscribe();
    let server = axum::serve(listener, router)
        .with_graceful_shutdown(orchestrator.drain_signal())
        .into_future();

    let (signal_tx, signal_rx) = oneshot::channel::<()>();
    let signal = async move {
        let _ = signal_rx.await;
    };
    let run = tokio::spawn(orchestrator.run(server, signal, pipeline));

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    drop(client);
    assert_eq!(*states.borrow_and_update(), ShutdownState::Running);

    signal_tx.send(()).unwrap();
    let report = tokio::time::timeout(GRACE + Duration::from_secs(1), run)
        .await
        .expect("shutdown should finish within the grace period")
        .unwrap()
        .unwrap();

    assert_eq!(report.listener, ListenerExit::Drained);
    assert!(report.elapsed < GRACE);
    assert_eq!(report.discarded.update_queue.len, 5);
    assert_eq!(report.discarded.search_queue.len, 0);
    assert_eq!(report.discarded.discarded_work(), 5);
    assert_eq!(*states.borrow_and_update(), ShutdownState::Terminated);

    // Nothing queued was persisted, and nothing will be
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(store.persisted(), 0);
    assert_eq!(store.attempts(), 1);

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_listener_failure_before_signal_is_fatal() {
    let TestApp { pipeline, .. } = TestApp::builder().build();
    let trigger = pipeline.trigger();

    let orchestrator = ShutdownOrchestrator::new(GRACE);
    let states = orchestrator.subscribe();
    let server = async {
        Err::<(), _>(io::Error::new(io::ErrorKind::AddrInUse, "address in use"))
    };

    let result = orchestrator
        .run(server, std::future::pending::<()>(), pipeline)
        .await;

    assert_matches!(result, Err(ShutdownError::Listener(e)) if e.kind() == io::ErrorKind::AddrInUse);
    assert_eq!(*states.borrow(), ShutdownState::Terminated);
    wait_until("pipeline to stop", || trigger.is_closed()).await;
}

#[tokio::test]
async fn test_listener_stopping_on_its_own_is_fatal() {
    let TestApp { pipeline, .. } = TestApp::builder().build();
    let orchestrator = ShutdownOrchestrator::new(GRACE);

    let result = orchestrator
        .run(async { Ok(()) }, std::future::pending::<()>(), pipeline)
        .await;

    assert_matches!(result, Err(ShutdownError::ListenerStopped));
}

#[tokio::test]
async fn test_stuck_listener_is_abandoned_after_grace_period() {
    let TestApp { pipeline, .. } = TestApp::builder().build();
    let orchestrator = ShutdownOrchestrator::new(Duration::from_millis(200));

    let report = tokio::time::timeout(
        TEST_TIMEOUT,
        orchestrator.run(
            std::future::pending::<io::Result<()>>(),
            async {},
            pipeline,
        ),
    )
    .await
    .expect("grace period should bound the shutdown")
    .unwrap();

    assert_eq!(report.listener, ListenerExit::GraceElapsed);
    assert!(report.elapsed >= Duration::from_millis(200));
    assert_eq!(report.discarded.discarded_work(), 0);
}
