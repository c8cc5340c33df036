mod summary;

pub use summary::{RequestOutcome, RunSummary};

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, Semaphore};
use tokio::time::Instant;

pub const DEFAULT_REQUESTS: u32 = 1000;
pub const DEFAULT_CONCURRENCY: u32 = 1;
pub const DEFAULT_URL: &str = "http://localhost:80";
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub url: String,
    pub requests: u32,
    pub concurrency: u32,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            requests: DEFAULT_REQUESTS,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// Dispatches `options.requests` GET requests with at most
/// `options.concurrency` in flight, invoking `on_complete` for every outcome
/// in completion order. A request failure is captured in its outcome and
/// never aborts the rest of the batch.
pub async fn run_with<F>(options: &LoadOptions, mut on_complete: F) -> Result<RunSummary, LoadError>
where
    F: FnMut(&RequestOutcome),
{
    let client = reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let sem = Arc::new(Semaphore::new(options.concurrency.max(1) as usize));
    let (tx, mut rx) = mpsc::unbounded_channel::<RequestOutcome>();
    let started = Instant::now();

    // submission runs on its own task so the drain below reports each
    // completion as it lands, not after the whole batch is queued
    let requests = options.requests;
    let url = options.url.clone();
    let submitter = tokio::spawn(async move {
        let mut handles = Vec::with_capacity(requests as usize);
        for index in 1..=requests {
            // backpressure: submission itself waits for a free permit
            let permit = sem.clone().acquire_owned().await.unwrap();
            let client = client.clone();
            let url = url.clone();
            let tx = tx.clone();
            handles.push(tokio::spawn(async move {
                let _permit = permit;
                let _ = tx.send(send_request(&client, &url, index).await);
            }));
        }
        drop(tx);
        for handle in handles {
            let _ = handle.await;
        }
    });

    let mut outcomes = Vec::with_capacity(requests as usize);
    while let Some(outcome) = rx.recv().await {
        on_complete(&outcome);
        outcomes.push(outcome);
    }
    let _ = submitter.await;

    Ok(RunSummary::from_outcomes(requests, &outcomes, started.elapsed()))
}

/// Same as [`run_with`] without per-completion reporting.
pub async fn run(options: &LoadOptions) -> Result<RunSummary, LoadError> {
    run_with(options, |_| {}).await
}

async fn send_request(client: &reqwest::Client, url: &str, index: u32) -> RequestOutcome {
    let started = Instant::now();
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            RequestOutcome {
                index,
                status: Some(status),
                elapsed_secs: Some(started.elapsed().as_secs_f64()),
                success: true,
                error: None,
                body_prefix: Some(body.chars().take(100).collect()),
            }
        }
        Err(err) => RequestOutcome {
            index,
            status: None,
            elapsed_secs: None,
            success: false,
            error: Some(err.to_string()),
            body_prefix: None,
        },
    }
}
