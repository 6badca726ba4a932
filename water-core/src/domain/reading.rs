//! Meter reading records and the per-kind reading ledger.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Which physical meter a reading came from.
///
/// Tap and recycled histories never diff against each other; deltas are
/// always computed within one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeterKind {
    Tap,
    Recycled,
}

impl MeterKind {
    pub const ALL: [MeterKind; 2] = [MeterKind::Tap, MeterKind::Recycled];

    fn index(self) -> usize {
        match self {
            Self::Tap => 0,
            Self::Recycled => 1,
        }
    }
}

impl std::fmt::Display for MeterKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tap => write!(f, "tap"),
            Self::Recycled => write!(f, "recycled"),
        }
    }
}

/// One accepted meter scan or manual entry.
///
/// `consumption_liters` is always derived from the previous raw value of the
/// same kind, never entered directly. Records are immutable once created;
/// external profile management may delete a whole record, which does not
/// recompute the deltas of its neighbours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    pub id: u64,
    pub kind: MeterKind,
    /// Cumulative meter value in cubic meters as reported by OCR or entry.
    pub raw_m3: f64,
    /// Volume used since the prior reading of the same kind, in liters.
    pub consumption_liters: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub recorded_at: OffsetDateTime,
}

/// Append-only reading history with an explicit most-recent index per meter
/// kind.
///
/// The previous reading of a kind is an O(1) accessor rather than an
/// array-tail convention, and the ledger is rebuilt from the stored history
/// on load, so external whole-record deletions are absorbed without any
/// bookkeeping here.
#[derive(Debug, Clone, Default)]
pub struct ReadingLedger {
    readings: Vec<MeterReading>,
    last_by_kind: [Option<usize>; 2],
}

impl ReadingLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the ledger from a stored history slice, indexing the most
    /// recent reading of each kind in one pass.
    pub fn from_history(history: &[MeterReading]) -> Self {
        let mut last_by_kind = [None; 2];
        for (i, r) in history.iter().enumerate() {
            last_by_kind[r.kind.index()] = Some(i);
        }
        Self {
            readings: history.to_vec(),
            last_by_kind,
        }
    }

    /// The most recent reading of `kind`, if any.
    pub fn last(&self, kind: MeterKind) -> Option<&MeterReading> {
        self.last_by_kind[kind.index()].map(|i| &self.readings[i])
    }

    /// Appends an accepted reading and moves the kind's most-recent index.
    pub fn push(&mut self, reading: MeterReading) {
        self.last_by_kind[reading.kind.index()] = Some(self.readings.len());
        self.readings.push(reading);
    }

    pub fn readings(&self) -> &[MeterReading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn reading(id: u64, kind: MeterKind, raw_m3: f64) -> MeterReading {
        MeterReading {
            id,
            kind,
            raw_m3,
            consumption_liters: 0.0,
            recorded_at: datetime!(2026-08-01 08:00:00 UTC),
        }
    }

    #[test]
    fn empty_ledger_has_no_last_reading() {
        let ledger = ReadingLedger::new();
        assert!(ledger.is_empty());
        assert!(ledger.last(MeterKind::Tap).is_none());
        assert!(ledger.last(MeterKind::Recycled).is_none());
    }

    #[test]
    fn last_is_tracked_per_kind() {
        let mut ledger = ReadingLedger::new();
        ledger.push(reading(1, MeterKind::Tap, 100.0));
        ledger.push(reading(2, MeterKind::Recycled, 10.0));
        ledger.push(reading(3, MeterKind::Tap, 102.0));

        assert_eq!(ledger.last(MeterKind::Tap).map(|r| r.id), Some(3));
        assert_eq!(ledger.last(MeterKind::Recycled).map(|r| r.id), Some(2));
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn from_history_indexes_most_recent_of_each_kind() {
        let history = vec![
            reading(1, MeterKind::Tap, 100.0),
            reading(2, MeterKind::Tap, 101.0),
            reading(3, MeterKind::Recycled, 5.0),
        ];
        let ledger = ReadingLedger::from_history(&history);
        assert_eq!(ledger.last(MeterKind::Tap).map(|r| r.raw_m3), Some(101.0));
        assert_eq!(
            ledger.last(MeterKind::Recycled).map(|r| r.raw_m3),
            Some(5.0)
        );
    }

    #[test]
    fn rebuild_after_external_deletion_points_at_survivor() {
        let mut history = vec![
            reading(1, MeterKind::Tap, 100.0),
            reading(2, MeterKind::Tap, 103.0),
        ];
        // External profile management removed the newest record wholesale.
        history.retain(|r| r.id != 2);
        let ledger = ReadingLedger::from_history(&history);
        assert_eq!(ledger.last(MeterKind::Tap).map(|r| r.id), Some(1));
    }

    #[test]
    fn reading_round_trips_through_json() {
        let r = reading(7, MeterKind::Recycled, 12.5);
        let json = serde_json::to_string(&r).expect("serialize");
        assert!(json.contains("\"recycled\""));
        let back: MeterReading = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, r);
    }
}
