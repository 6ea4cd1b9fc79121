//! Bounded, concurrency-safe log of past scan cycles.

use crate::detector::DetectionResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Default number of scan cycle records retained in memory.
pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Which collaborator failed for a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanErrorKind {
    Acquisition,
    Classification,
}

/// Per-zone failure entry; the cycle continues past it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZoneScanError {
    pub zone: String,
    pub kind: ScanErrorKind,
    pub message: String,
}

/// One zone's entry in a cycle record: a detection or a recovered error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ZoneScanOutcome {
    Detection(DetectionResult),
    Error(ZoneScanError),
}

impl ZoneScanOutcome {
    pub fn zone(&self) -> &str {
        match self {
            ZoneScanOutcome::Detection(result) => &result.zone,
            ZoneScanOutcome::Error(error) => &error.zone,
        }
    }

    pub fn is_fire(&self) -> bool {
        matches!(self, ZoneScanOutcome::Detection(result) if result.is_fire())
    }
}

/// Record of one full pass over all configured zones. Append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanCycleRecord {
    pub timestamp: DateTime<Utc>,
    /// One entry per configured zone, successes and failures alike
    pub results: Vec<ZoneScanOutcome>,
    pub fires_detected: usize,
}

impl ScanCycleRecord {
    pub fn new(results: Vec<ZoneScanOutcome>) -> Self {
        let fires_detected = results.iter().filter(|r| r.is_fire()).count();
        Self {
            timestamp: Utc::now(),
            results,
            fires_detected,
        }
    }
}

/// Fixed-capacity FIFO ring of scan cycle records, safe under concurrent
/// appenders (scheduled cycles and manual scans interleave freely).
pub struct HistoryStore {
    capacity: usize,
    records: Mutex<VecDeque<ScanCycleRecord>>,
}

impl HistoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    /// Append a record, evicting the oldest entry when at capacity.
    pub async fn append(&self, record: ScanCycleRecord) {
        let mut records = self.records.lock().await;
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(record);
    }

    /// Last `limit` records, most-recent-last. `limit` is clamped to the
    /// current length.
    pub async fn recent(&self, limit: usize) -> Vec<ScanCycleRecord> {
        let records = self.records.lock().await;
        let skip = records.len().saturating_sub(limit);
        records.iter().skip(skip).cloned().collect()
    }

    /// Most recent record, if any cycle has completed.
    pub async fn latest(&self) -> Option<ScanCycleRecord> {
        self.records.lock().await.back().cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_marker(marker: usize) -> ScanCycleRecord {
        ScanCycleRecord::new(vec![ZoneScanOutcome::Error(ZoneScanError {
            zone: format!("zone-{}", marker),
            kind: ScanErrorKind::Acquisition,
            message: "test".to_string(),
        })])
    }

    #[tokio::test]
    async fn test_append_and_latest() {
        let store = HistoryStore::new(10);
        assert!(store.is_empty().await);
        assert!(store.latest().await.is_none());

        store.append(record_with_marker(1)).await;
        store.append(record_with_marker(2)).await;

        assert_eq!(store.len().await, 2);
        let latest = store.latest().await.unwrap();
        assert_eq!(latest.results[0].zone(), "zone-2");
    }

    #[tokio::test]
    async fn test_capacity_bound_holds_after_overflow() {
        let store = HistoryStore::new(100);
        for i in 0..105 {
            store.append(record_with_marker(i)).await;
        }

        // Never exceeds capacity; the 5 oldest are gone, order preserved
        assert_eq!(store.len().await, 100);
        let all = store.recent(100).await;
        assert_eq!(all[0].results[0].zone(), "zone-5");
        assert_eq!(all[99].results[0].zone(), "zone-104");
    }

    #[tokio::test]
    async fn test_recent_clamps_limit() {
        let store = HistoryStore::new(10);
        store.append(record_with_marker(0)).await;
        store.append(record_with_marker(1)).await;

        let recent = store.recent(50).await;
        assert_eq!(recent.len(), 2);

        let recent = store.recent(1).await;
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].results[0].zone(), "zone-1");
    }

    #[tokio::test]
    async fn test_concurrent_appends_keep_bound() {
        let store = std::sync::Arc::new(HistoryStore::new(20));
        let mut handles = Vec::new();
        for i in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                for j in 0..10 {
                    store.append(record_with_marker(i * 10 + j)).await;
                }
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 20);
    }

    #[test]
    fn test_fires_detected_count() {
        use crate::detector::FireLabel;
        let detection = |label: FireLabel| {
            ZoneScanOutcome::Detection(crate::detector::DetectionResult {
                zone: "z".to_string(),
                label,
                confidence: 0.9,
                raw_scores: vec![],
                coordinates: None,
                timestamp: Utc::now(),
                brightness_kelvin: None,
                spread_radius_km: None,
                image: None,
            })
        };

        let record = ScanCycleRecord::new(vec![
            detection(FireLabel::Fire),
            detection(FireLabel::NoFire),
            detection(FireLabel::Fire),
        ]);
        assert_eq!(record.fires_detected, 2);
    }
}
