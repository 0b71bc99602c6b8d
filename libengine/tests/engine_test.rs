use std::sync::Arc;

use libengine::{assemble, Backend, BackendError, EventSink, HttpBackend, LatencySummary, StreamingWindow, TestSession};
use libprotocol::SampleBatch;

#[test]
fn it_fills_and_slides_the_window_end_to_end() {
    // qps=2 -> capacity 40; bursts of 5, 5 and 35 samples
    let mut window = StreamingWindow::with_capacity(40);
    window.append(&SampleBatch { latencies: vec![0.01; 5], error_rate: 0.0 });
    window.append(&SampleBatch { latencies: vec![0.02; 5], error_rate: 0.1 });
    window.append(&SampleBatch { latencies: vec![0.03; 35], error_rate: 0.5 });

    assert_eq!(40, window.len());
    assert_eq!(window.len(), window.error_rates().len());
    // the 5 oldest entries were trimmed: nothing from the first burst survives
    assert!(window.latencies().iter().all(|&l| l > 0.015));

    let summary = LatencySummary::compute(window.latencies(), window.error_rates()).unwrap();
    assert_eq!(40, summary.total_requests);
    // 5 surviving replicas of 0.1 plus 35 of 0.5
    let expected_errors = 5.0 * 0.1 + 35.0 * 0.5;
    assert!((summary.total_errors - expected_errors).abs() < 1e-9);

    let series = assemble(window.latencies(), window.error_rates(), window.capacity());
    assert_eq!(40, series.len());
    assert!(series.iter().all(|slot| slot.latency.is_some()));
}

#[tokio::test]
async fn it_http_backend_round_trips_the_wire_contract() {
    let (base_url, shutdown_tx, handle) = test_support::test_server::spawn_test_server();
    test_support::test_server::wait_until_ready(&base_url).await;

    let backend = HttpBackend::new(base_url.clone());

    let batch = backend.fetch("http://target.example/ok", 3).await.unwrap();
    assert_eq!(3, batch.len());
    assert_eq!(0.0, batch.error_rate);

    let err = backend.fetch("http://target.example/fail", 1).await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));

    let err = backend.fetch("http://target.example/malformed", 1).await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test]
async fn it_runs_a_session_against_the_stub_backend() {
    let (base_url, shutdown_tx, handle) = test_support::test_server::spawn_test_server();
    test_support::test_server::wait_until_ready(&base_url).await;

    let mut session = TestSession::new(Arc::new(HttpBackend::new(base_url)), EventSink::noop());
    session.start("http://target.example/flaky", 2).await;

    assert_eq!((2, 40), session.window_fill());
    let summary = session.snapshot().unwrap();
    assert_eq!(2, summary.total_requests);
    // two samples carrying the stub's 0.25 burst error rate
    assert!((summary.total_errors - 0.5).abs() < 1e-12);

    session.stop();
    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
