use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Outcome of a single request, in completion order.
#[derive(Debug, Clone, Serialize)]
pub struct RequestOutcome {
    pub index: u32,
    pub status: Option<u16>,
    pub elapsed_secs: Option<f64>,
    pub success: bool,
    pub error: Option<String>,
    /// First 100 chars of the response body, kept for spot checks.
    pub body_prefix: Option<String>,
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.success {
            write!(
                f,
                "Request {}: Status {}, Time: {:.3}s",
                self.index,
                self.status.unwrap_or(0),
                self.elapsed_secs.unwrap_or(0.0)
            )
        } else {
            write!(
                f,
                "Request {}: FAILED - {}",
                self.index,
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

/// Aggregate over a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub total: u32,
    pub successful: u32,
    pub failed: u32,
    /// Mean over successful requests only; `None` when nothing succeeded.
    pub mean_latency_secs: Option<f64>,
    pub total_secs: f64,
    pub throughput_rps: f64,
}

impl RunSummary {
    pub fn from_outcomes(total: u32, outcomes: &[RequestOutcome], wall: Duration) -> Self {
        let successful = outcomes.iter().filter(|o| o.success).count() as u32;
        let failed = total.saturating_sub(successful);
        let total_secs = wall.as_secs_f64();

        let mean_latency_secs = if successful > 0 {
            let sum: f64 = outcomes.iter().filter_map(|o| o.elapsed_secs).sum();
            Some(sum / successful as f64)
        } else {
            None
        };

        let throughput_rps = if total_secs > 0.0 {
            total as f64 / total_secs
        } else {
            0.0
        };

        Self {
            total,
            successful,
            failed,
            mean_latency_secs,
            total_secs,
            throughput_rps,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mean_latency_secs {
            Some(mean) => {
                writeln!(f, "Total requests: {}", self.total)?;
                writeln!(f, "Successful: {}", self.successful)?;
                writeln!(f, "Failed: {}", self.failed)?;
                writeln!(f, "Average response time: {:.3}s", mean)?;
                writeln!(f, "Total time: {:.3}s", self.total_secs)?;
                write!(f, "Requests per second: {:.2}", self.throughput_rps)
            }
            None => write!(f, "All {} requests failed!", self.total),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(index: u32, elapsed: f64) -> RequestOutcome {
        RequestOutcome {
            index,
            status: Some(200),
            elapsed_secs: Some(elapsed),
            success: true,
            error: None,
            body_prefix: Some("ok".to_string()),
        }
    }

    fn failed(index: u32) -> RequestOutcome {
        RequestOutcome {
            index,
            status: None,
            elapsed_secs: None,
            success: false,
            error: Some("connection refused".to_string()),
            body_prefix: None,
        }
    }

    #[test]
    fn it_averages_latency_over_successes_only() {
        let outcomes = vec![ok(1, 0.1), failed(2), ok(3, 0.3)];
        let summary = RunSummary::from_outcomes(3, &outcomes, Duration::from_secs(2));

        assert_eq!(summary.successful, 2);
        assert_eq!(summary.failed, 1);
        let mean = summary.mean_latency_secs.unwrap();
        assert!((mean - 0.2).abs() < 1e-9);
        assert!((summary.throughput_rps - 1.5).abs() < 1e-9);
    }

    #[test]
    fn it_prints_a_distinct_all_failed_summary() {
        let outcomes = vec![failed(1), failed(2)];
        let summary = RunSummary::from_outcomes(2, &outcomes, Duration::from_secs(1));

        assert!(summary.mean_latency_secs.is_none());
        assert_eq!(summary.to_string(), "All 2 requests failed!");
    }

    #[test]
    fn it_handles_an_empty_run_without_dividing_by_zero() {
        let summary = RunSummary::from_outcomes(0, &[], Duration::from_millis(1));
        assert_eq!(summary.total, 0);
        assert!(summary.mean_latency_secs.is_none());
        assert_eq!(summary.to_string(), "All 0 requests failed!");
    }

    #[test]
    fn it_formats_per_request_lines() {
        assert_eq!(ok(5, 0.0125).to_string(), "Request 5: Status 200, Time: 0.013s");
        assert_eq!(
            failed(7).to_string(),
            "Request 7: FAILED - connection refused"
        );
    }
}
