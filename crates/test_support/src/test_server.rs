use std::net::TcpListener;
use std::sync::Arc;

use librate::{spawn_sampler, RateCounter};
use tokio::sync::oneshot;

/// Spawns the full rpsmon application (router + sampler) on a random free
/// port. Returns `(base_url, shutdown_sender, join_handle)`; sending on the
/// channel shuts the server down gracefully and stops the sampler.
pub fn spawn_rps_server() -> (String, oneshot::Sender<()>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    listener.set_nonblocking(true).unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let handle = tokio::spawn(async move {
        let counter = Arc::new(RateCounter::new());
        let (sampler_shutdown, sampler) = spawn_sampler(counter.clone());

        let server = axum::serve(
            tokio::net::TcpListener::from_std(listener).unwrap(),
            libserver::app(counter),
        )
        .with_graceful_shutdown(async {
            let _ = shutdown_rx.await;
        });

        // a failing server must fail the test
        server.await.unwrap();

        let _ = sampler_shutdown.send(true);
        let _ = sampler.await;
    });

    (base_url, shutdown_tx, handle)
}

/// Polls the health endpoint until the server answers.
pub async fn wait_until_ready(base_url: &str) {
    let client = reqwest::Client::new();
    for _ in 0..20 {
        if client
            .get(format!("{}/health", base_url))
            .send()
            .await
            .is_ok()
        {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    panic!("test server not ready");
}
