//! Recurring inbox checks at a once-randomized interval

use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::PollConfig;
use crate::responder::AutoResponder;

/// Sample the poll interval, uniform over [min, max] seconds inclusive
fn sample_interval_secs(min: u64, max: u64) -> u64 {
    rand::thread_rng().gen_range(min..=max)
}

/// Drives the responder forever.
///
/// The interval is sampled once at construction and reused for every tick.
/// That matches the reference behavior exactly: the jitter exists to avoid a
/// predictable polling phase at startup, not to vary spacing between cycles.
/// Do not "fix" this to re-roll per cycle.
pub struct PollScheduler {
    responder: AutoResponder,
    interval: Duration,
}

impl PollScheduler {
    pub fn new(responder: AutoResponder, config: &PollConfig) -> Self {
        let secs = sample_interval_secs(config.min_interval_secs, config.max_interval_secs);
        info!(interval_secs = secs, "Poll interval fixed for this run");

        Self {
            responder,
            interval: Duration::from_secs(secs),
        }
    }

    /// The interval every tick of this scheduler will use
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Run inbox checks until the process is terminated.
    ///
    /// The first check happens one interval after start, as with a plain
    /// repeating timer. A failed cycle is logged and the loop keeps going;
    /// there is no backoff and no stop operation.
    pub async fn start(mut self) {
        let mut ticker = tokio::time::interval(self.interval);
        // An interval's first tick completes immediately; consume it so the
        // first check lands a full interval from now.
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match self.responder.process_inbox().await {
                Ok(report) => {
                    if report.failed() > 0 {
                        warn!(
                            errors = report.errors,
                            malformed = report.malformed,
                            "Cycle finished with failures"
                        );
                    }
                }
                Err(e) => {
                    warn!("Inbox check failed: {}", e);
                }
            }
        }
    }
}
