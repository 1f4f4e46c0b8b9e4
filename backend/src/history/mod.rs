//! Session-scoped calculation history
//!
//! Each session keeps a bounded list of past calculations. Pushing onto a
//! full history evicts the oldest entry first.

pub mod session;

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde::Serialize;
use tracing::debug;

use crate::config::DEFAULT_HISTORY_CAPACITY;
use crate::costs::CostReport;
use crate::models::company::CompanyProfile;

pub use session::{SessionState, SessionStore, UnknownSession};

/// Summary of one calculation, as kept in the session
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    #[serde(serialize_with = "serialize_iso")]
    pub timestamp: DateTime<Local>,
    #[serde(rename = "entreprise")]
    pub company: CompanyProfile,
    pub total_general: f64,
    pub user_id: String,
}

impl HistoryEntry {
    pub fn from_report(report: &CostReport, user_id: &str, timestamp: DateTime<Local>) -> Self {
        Self {
            timestamp,
            company: report.company().clone(),
            total_general: report.total_general(),
            user_id: user_id.to_string(),
        }
    }
}

fn serialize_iso<S: serde::Serializer>(ts: &DateTime<Local>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&ts.naive_local().format("%Y-%m-%dT%H:%M:%S%.6f").to_string())
}

/// Bounded FIFO of history entries
#[derive(Debug, Clone)]
pub struct CalculationHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl Default for CalculationHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}

impl CalculationHistory {
    /// # Panics
    ///
    /// Panics if `capacity` is 0 (config validation rejects it earlier).
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "history capacity must be positive");
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting the oldest ones if the history is full
    pub fn push(&mut self, entry: HistoryEntry) {
        while self.entries.len() >= self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                debug!(timestamp = %evicted.timestamp, "history full, oldest entry evicted");
            }
        }
        self.entries.push_back(entry);
    }

    /// Entries belonging to `user_id`, newest first
    pub fn entries_for(&self, user_id: &str) -> Vec<HistoryEntry> {
        let mut entries: Vec<HistoryEntry> = self
            .entries
            .iter()
            .filter(|e| e.user_id == user_id)
            .cloned()
            .collect();
        // Reversed first so equal timestamps come out newest first
        entries.reverse();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        entries
    }

    /// All entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn entry(user: &str, minutes: i64, total: f64) -> HistoryEntry {
        let base = Local.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
        HistoryEntry {
            timestamp: base + Duration::minutes(minutes),
            company: CompanyProfile::new("SIM", "Industrie", "Grande", 5e7, 300).unwrap(),
            total_general: total,
            user_id: user.to_string(),
        }
    }

    #[test]
    fn test_push_evicts_oldest_first() {
        let mut history = CalculationHistory::with_capacity(3);
        for i in 0..5 {
            history.push(entry("u1", i, i as f64));
        }

        assert_eq!(history.len(), 3);
        let totals: Vec<f64> = history.iter().map(|e| e.total_general).collect();
        assert_eq!(totals, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_default_capacity_is_fifty() {
        let mut history = CalculationHistory::default();
        for i in 0..60 {
            history.push(entry("u1", i, i as f64));
        }
        assert_eq!(history.len(), 50);
        assert_eq!(history.iter().next().unwrap().total_general, 10.0);
    }

    #[test]
    fn test_entries_for_filters_and_sorts_newest_first() {
        let mut history = CalculationHistory::default();
        history.push(entry("u1", 0, 1.0));
        history.push(entry("u2", 1, 2.0));
        history.push(entry("u1", 2, 3.0));

        let mine: Vec<f64> = history.entries_for("u1").iter().map(|e| e.total_general).collect();
        assert_eq!(mine, vec![3.0, 1.0]);
        assert!(history.entries_for("u3").is_empty());
    }

    #[test]
    fn test_entry_serialization() {
        let json = serde_json::to_value(entry("u1", 0, 880_400.0)).unwrap();
        assert_eq!(json["timestamp"], "2024-05-01T09:00:00.000000");
        assert_eq!(json["entreprise"]["nom"], "SIM");
        assert_eq!(json["total_general"], 880_400.0);
        assert_eq!(json["user_id"], "u1");
    }

    #[test]
    #[should_panic(expected = "history capacity must be positive")]
    fn test_zero_capacity_panics() {
        CalculationHistory::with_capacity(0);
    }
}
