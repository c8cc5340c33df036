mod clock;
mod sampler;

pub use clock::wall_clock_timestamp;
pub use sampler::{spawn_sampler, Sampler, SAMPLE_PERIOD};

use std::sync::atomic::{AtomicU64, Ordering};

/// Shared request-rate state: a pending event count that ingress bumps and
/// the rate published at the last sample boundary.
///
/// `pending` is written by arbitrarily many request handlers and drained by
/// exactly one sampler; `published` is written only by the sampler. Both are
/// single atomics, so readers never observe a torn value.
#[derive(Debug, Default)]
pub struct RateCounter {
    pending: AtomicU64,
    published: AtomicU64,
}

impl RateCounter {
    pub fn new() -> Self {
        Self {
            pending: AtomicU64::new(0),
            published: AtomicU64::new(0),
        }
    }

    /// Records one inbound unit of work.
    #[inline]
    pub fn increment(&self) {
        self.pending.fetch_add(1, Ordering::Relaxed);
    }

    /// Drains the pending count and returns it. The swap makes each
    /// increment land in exactly one sample interval.
    pub fn sample_and_reset(&self) -> u64 {
        self.pending.swap(0, Ordering::Relaxed)
    }

    /// Stores the rate computed at a sample boundary. Sampler-only writer.
    pub fn publish(&self, rate: u64) {
        self.published.store(rate, Ordering::Relaxed);
    }

    /// Rate from the last sample boundary. Lags live traffic by up to one
    /// sampling interval.
    #[inline]
    pub fn current_rate(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}
