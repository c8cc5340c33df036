use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use crate::RateCounter;

pub const SAMPLE_PERIOD: Duration = Duration::from_secs(1);

/// Background task that once per second drains the pending count into the
/// published rate and emits an operator log line.
///
/// The loop only exits when the shutdown channel signals (or its sender is
/// gone); a single odd tick never stops metric collection.
pub struct Sampler {
    counter: Arc<RateCounter>,
    shutdown: watch::Receiver<bool>,
}

impl Sampler {
    pub fn new(counter: Arc<RateCounter>, shutdown: watch::Receiver<bool>) -> Self {
        Self { counter, shutdown }
    }

    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = tokio::time::sleep(SAMPLE_PERIOD) => {
                    let rate = self.counter.sample_and_reset();
                    self.counter.publish(rate);
                    tracing::info!(rps = rate, "[{}] Current RPS: {}", crate::wall_clock_timestamp(), rate);
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        break;
                    }
                }
            }
        }
    }
}

/// Spawns a sampler for `counter`, returning the shutdown sender and the
/// task handle. Send `true` (or drop the sender) to stop it.
pub fn spawn_sampler(
    counter: Arc<RateCounter>,
) -> (watch::Sender<bool>, tokio::task::JoinHandle<()>) {
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(Sampler::new(counter, shutdown_rx).run());
    (shutdown_tx, handle)
}
