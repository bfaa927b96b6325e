//! Periodic statistics polling
//!
//! Polls a peer's statistics on a fixed interval, feeds each snapshot to a
//! [`StatsSampler`] and forwards the resulting samples to a channel.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::peer::PeerConnection;
use crate::stats::{StatsSample, StatsSampler};

/// Statistics polling configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Interval between `get_stats` calls, in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
        }
    }
}

impl StatsConfig {
    /// Poll interval as a duration; zero is bumped to one millisecond
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

/// Polls a peer connection's statistics until told to stop
pub struct StatsPoller {
    config: StatsConfig,
    sampler: StatsSampler,
    samples_tx: Option<mpsc::Sender<StatsSample>>,
}

impl StatsPoller {
    /// Create a poller
    pub fn new(config: StatsConfig) -> Self {
        Self {
            config,
            sampler: StatsSampler::new(),
            samples_tx: None,
        }
    }

    /// Forward every sample to `tx` as it is computed
    pub fn with_sample_channel(mut self, tx: mpsc::Sender<StatsSample>) -> Self {
        self.samples_tx = Some(tx);
        self
    }

    /// Poll `peer` until `shutdown` turns true or its sender is dropped.
    ///
    /// A failed `get_stats` is logged and polling carries on. Shutdown is
    /// also honoured while waiting for room on the sample channel. Returns
    /// the sampler with the accumulated series.
    pub async fn run<P: PeerConnection + ?Sized>(
        mut self,
        peer: Arc<P>,
        mut shutdown: watch::Receiver<bool>,
    ) -> StatsSampler {
        let mut interval = tokio::time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        'poll: loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                _ = interval.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
            }

            let report = match peer.get_stats().await {
                Ok(report) => report,
                Err(e) => {
                    warn!("Failed to get stats: {}", e);
                    continue;
                }
            };

            for sample in self.sampler.ingest(report) {
                debug!(
                    "{}: {:.1} kbit/s, {} packets",
                    sample.id, sample.bitrate_kbps, sample.packets
                );
                let Some(tx) = self.samples_tx.clone() else {
                    continue;
                };

                // A full channel must not hold off shutdown
                tokio::select! {
                    sent = tx.send(sample) => {
                        if sent.is_err() {
                            debug!("Sample receiver dropped, no longer forwarding");
                            self.samples_tx = None;
                        }
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() {
                            break 'poll;
                        }
                        continue 'poll;
                    }
                }
            }
        }

        self.sampler
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_interval() {
        assert_eq!(StatsConfig::default().poll_interval(), Duration::from_secs(1));
        let zero = StatsConfig { poll_interval_ms: 0 };
        assert_eq!(zero.poll_interval(), Duration::from_millis(1));
    }
}
