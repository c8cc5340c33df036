use std::time::Duration;

use axum::routing::get;
use axum::Router;
use libloadgen::{run, run_with, LoadOptions};
use test_support::{spawn_rps_server, wait_until_ready};
use tokio::sync::oneshot;

/// Server whose only route holds every request for `delay` before
/// answering, so completion times are predictable.
fn spawn_slow_server(delay: Duration) -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());

    let app = Router::new().route(
        "/",
        get(move || async move {
            tokio::time::sleep(delay).await;
            "ok"
        }),
    );
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(async move {
        axum::serve(tokio::net::TcpListener::from_std(listener).unwrap(), app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (base_url, shutdown_tx, handle)
}

#[tokio::test(flavor = "multi_thread")]
async fn it_reports_each_completion_as_it_happens() {
    let delay = Duration::from_millis(200);
    let (base_url, shutdown_tx, handle) = spawn_slow_server(delay);

    let options = LoadOptions {
        url: format!("{}/", base_url),
        requests: 4,
        concurrency: 1,
    };

    let started = std::time::Instant::now();
    let mut reported_at = Vec::new();
    let summary = run_with(&options, |_| reported_at.push(started.elapsed()))
        .await
        .unwrap();

    assert_eq!(summary.successful, 4);
    assert_eq!(reported_at.len(), 4);
    // at concurrency 1 the run takes ~4 * delay; the first outcome must
    // surface near its own completion, not once the batch is done
    assert!(
        reported_at[0] < delay * 2 + Duration::from_millis(100),
        "first outcome reported only after {:?}",
        reported_at[0]
    );
    assert!(
        *reported_at.last().unwrap() > reported_at[0] + delay,
        "completions were delivered in one burst: {:?}",
        reported_at
    );

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test(flavor = "multi_thread")]
async fn it_runs_ten_requests_at_concurrency_three_against_a_live_server() {
    let (base_url, shutdown_tx, handle) = spawn_rps_server();
    wait_until_ready(&base_url).await;

    let options = LoadOptions {
        url: format!("{}/", base_url),
        requests: 10,
        concurrency: 3,
    };

    let mut seen = Vec::new();
    let summary = run_with(&options, |outcome| seen.push(outcome.index))
        .await
        .unwrap();

    assert_eq!(summary.total, 10);
    assert_eq!(summary.successful, 10);
    assert_eq!(summary.failed, 0);
    assert!(summary.mean_latency_secs.unwrap() > 0.0);
    assert!(summary.throughput_rps > 0.0);

    // every request reported exactly once, whatever the completion order
    assert_eq!(seen.len(), 10);
    seen.sort_unstable();
    assert_eq!(seen, (1..=10).collect::<Vec<_>>());

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}

#[tokio::test(flavor = "multi_thread")]
async fn it_records_every_failure_against_an_unreachable_host() {
    // nothing listens on port 1
    let options = LoadOptions {
        url: "http://127.0.0.1:1/".to_string(),
        requests: 5,
        concurrency: 2,
    };

    let mut errors = Vec::new();
    let summary = run_with(&options, |outcome| {
        assert!(!outcome.success);
        errors.push(outcome.error.clone().unwrap());
    })
    .await
    .unwrap();

    assert_eq!(summary.failed, 5);
    assert!(summary.mean_latency_secs.is_none());
    assert_eq!(summary.to_string(), "All 5 requests failed!");
    assert_eq!(errors.len(), 5);
    assert!(errors.iter().all(|e| !e.is_empty()));
}

#[tokio::test]
async fn it_handles_a_zero_request_run() {
    let options = LoadOptions {
        url: "http://127.0.0.1:1/".to_string(),
        requests: 0,
        concurrency: 1,
    };

    let summary = run(&options).await.unwrap();
    assert_eq!(summary.total, 0);
    assert_eq!(summary.to_string(), "All 0 requests failed!");
}

#[tokio::test(flavor = "multi_thread")]
async fn it_captures_status_and_body_prefix_on_success() {
    let (base_url, shutdown_tx, handle) = spawn_rps_server();
    wait_until_ready(&base_url).await;

    let options = LoadOptions {
        url: format!("{}/health", base_url),
        requests: 1,
        concurrency: 1,
    };

    let mut statuses = Vec::new();
    let mut bodies = Vec::new();
    run_with(&options, |outcome| {
        statuses.push(outcome.status);
        bodies.push(outcome.body_prefix.clone());
    })
    .await
    .unwrap();

    assert_eq!(statuses, vec![Some(200)]);
    assert!(bodies[0].as_deref().unwrap().contains("healthy"));

    let _ = shutdown_tx.send(());
    let _ = handle.await;
}
