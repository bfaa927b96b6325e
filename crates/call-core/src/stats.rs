//! Outbound RTP statistics sampling
//!
//! Turns successive statistics snapshots into bitrate and packet-rate points.
//! Each snapshot is diffed against the previous one by report id.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Report types carrying outbound RTP counters.
/// `outboundrtp` is the pre-standard spelling; `ssrc` is the legacy one.
const OUTBOUND_RTP_TYPES: [&str; 2] = ["outbound-rtp", "outboundrtp"];
const LEGACY_SSRC_TYPE: &str = "ssrc";

/// One entry of a statistics snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcStats {
    /// Report id, stable across snapshots
    pub id: String,
    /// Report type, e.g. `outbound-rtp`
    #[serde(rename = "type")]
    pub stats_type: String,
    /// Snapshot time in milliseconds
    #[serde(rename = "timestamp")]
    pub timestamp_ms: f64,
    /// Total bytes sent
    pub bytes_sent: Option<u64>,
    /// Total packets sent
    pub packets_sent: Option<u64>,
}

impl RtcStats {
    /// Outbound RTP report
    pub fn outbound_rtp(id: impl Into<String>, timestamp_ms: f64, bytes_sent: u64, packets_sent: u64) -> Self {
        Self {
            id: id.into(),
            stats_type: "outbound-rtp".to_string(),
            timestamp_ms,
            bytes_sent: Some(bytes_sent),
            packets_sent: Some(packets_sent),
        }
    }

    /// Whether this report carries outbound RTP counters worth sampling
    pub fn is_outbound_rtp(&self) -> bool {
        OUTBOUND_RTP_TYPES.contains(&self.stats_type.as_str())
            || (self.stats_type == LEGACY_SSRC_TYPE && self.bytes_sent.unwrap_or(0) > 0)
    }
}

/// A statistics snapshot, keyed by report id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    reports: HashMap<String, RtcStats>,
}

impl StatsReport {
    /// Empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a report
    pub fn insert(&mut self, stats: RtcStats) {
        self.reports.insert(stats.id.clone(), stats);
    }

    /// Builder-style insert
    pub fn with(mut self, stats: RtcStats) -> Self {
        self.insert(stats);
        self
    }

    /// Report by id
    pub fn get(&self, id: &str) -> Option<&RtcStats> {
        self.reports.get(id)
    }

    /// All reports, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &RtcStats> {
        self.reports.values()
    }

    /// Number of reports
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether the snapshot is empty
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl FromIterator<RtcStats> for StatsReport {
    fn from_iter<I: IntoIterator<Item = RtcStats>>(iter: I) -> Self {
        let mut report = StatsReport::new();
        for stats in iter {
            report.insert(stats);
        }
        report
    }
}

/// Bitrate and packet count between two snapshots of one stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSample {
    /// Report id the sample was computed for
    pub id: String,
    /// Time of the newer snapshot, milliseconds
    pub timestamp: f64,
    /// Bits per millisecond, i.e. kbit/s
    pub bitrate_kbps: f64,
    /// Packets sent since the previous snapshot
    pub packets: u64,
}

/// A time-ordered series of chart points
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimelineSeries {
    points: Vec<(f64, f64)>,
}

impl TimelineSeries {
    /// Empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point
    pub fn add_point(&mut self, timestamp: f64, value: f64) {
        self.points.push((timestamp, value));
    }

    /// All points in insertion order
    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Timestamp of the newest point
    pub fn end_time(&self) -> Option<f64> {
        self.points.last().map(|(ts, _)| *ts)
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Diffs successive statistics snapshots into timeline series
#[derive(Debug, Default)]
pub struct StatsSampler {
    last: Option<StatsReport>,
    bitrate: TimelineSeries,
    packets: TimelineSeries,
}

impl StatsSampler {
    /// New sampler with no previous snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a snapshot and return the samples it produced.
    ///
    /// The first snapshot only primes the sampler. A stream yields a sample
    /// once it appears in two consecutive snapshots with both counters
    /// present and a strictly increasing timestamp.
    pub fn ingest(&mut self, report: StatsReport) -> Vec<StatsSample> {
        let mut samples = Vec::new();

        if let Some(last) = &self.last {
            for stats in report.iter().filter(|s| s.is_outbound_rtp()) {
                let Some(previous) = last.get(&stats.id) else {
                    continue;
                };
                if let Some(sample) = diff(previous, stats) {
                    samples.push(sample);
                }
            }
        }

        samples.sort_by(|a, b| a.id.cmp(&b.id));
        for sample in &samples {
            self.bitrate.add_point(sample.timestamp, sample.bitrate_kbps);
            self.packets.add_point(sample.timestamp, sample.packets as f64);
        }

        self.last = Some(report);
        samples
    }

    /// Bitrate series, kbit/s
    pub fn bitrate_series(&self) -> &TimelineSeries {
        &self.bitrate
    }

    /// Packets-per-interval series
    pub fn packet_series(&self) -> &TimelineSeries {
        &self.packets
    }

    /// Previous snapshot
    pub fn last_report(&self) -> Option<&StatsReport> {
        self.last.as_ref()
    }
}

fn diff(previous: &RtcStats, current: &RtcStats) -> Option<StatsSample> {
    let elapsed_ms = current.timestamp_ms - previous.timestamp_ms;
    if !(elapsed_ms > 0.0) {
        return None;
    }

    let bytes = current.bytes_sent?.checked_sub(previous.bytes_sent?)?;
    let packets = current.packets_sent?.checked_sub(previous.packets_sent?)?;

    Some(StatsSample {
        id: current.id.clone(),
        timestamp: current.timestamp_ms,
        bitrate_kbps: 8.0 * bytes as f64 / elapsed_ms,
        packets,
    })
}
