//! Reading ingestion state machine: validation, delta computation, points,
//! and alert decisions.
//!
//! `process_reading` is a pure transform over the ledger; it never mutates
//! anything. The caller appends the returned record and persists history and
//! points in a single store update, so a rejected submission cannot leave a
//! partial write behind.

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::{MeterKind, MeterReading, ReadingLedger};
use crate::tariff;

/// Goal applied when a profile has none configured, in liters per period.
pub const DEFAULT_WATER_GOAL_LITERS: f64 = 1500.0;

/// A usage alert fires once consumption reaches this fraction of the goal.
pub const ALERT_GOAL_FRACTION: f64 = 0.8;

const POINTS_WITHIN_GOAL: u64 = 20;
const POINTS_OVER_GOAL: u64 = 5;

/// Domain errors for a submitted raw meter value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReadingError {
    /// The new cumulative value is lower than the last accepted one for the
    /// same meter kind. The entry is discarded, never silently corrected.
    #[error(
        "new reading {submitted_m3} m³ is lower than the previous reading {previous_m3} m³"
    )]
    Regression { previous_m3: f64, submitted_m3: f64 },
    /// Cumulative meter values cannot be negative.
    #[error("meter value must be non-negative, got {0} m³")]
    Negative(f64),
}

/// Warning payload handed to the notification dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageAlert {
    pub consumption_liters: f64,
    pub water_goal_liters: f64,
}

/// Display-only impact of an accepted entry. Not persisted on the record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryImpact {
    /// Estimated cost of a tap entry on the per-entry display schedule.
    CostRwf(i64),
    /// Recycled water is never billed; it converts into a point bonus.
    RecycledBonusPoints(u64),
}

/// Everything the caller needs after an accepted submission.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingOutcome {
    /// The record to append to history.
    pub record: MeterReading,
    /// True when this reading established the baseline for its kind.
    pub baseline: bool,
    /// Eco-points earned by this reading (zero for baseline and no-op deltas).
    pub points_awarded: u64,
    /// Present when consumption reached the alert threshold.
    pub alert: Option<UsageAlert>,
    /// Display impact for positive consumption.
    pub impact: Option<EntryImpact>,
}

/// Validates a raw cumulative reading against the ledger and derives the
/// consumption record, points, alert, and display impact.
///
/// The first reading of a kind establishes a baseline with zero consumption.
/// After that, `raw_m3` must be at least the previous value of the same kind;
/// a lower value is rejected with [`ReadingError::Regression`] and the ledger
/// is left untouched.
pub fn process_reading(
    ledger: &ReadingLedger,
    kind: MeterKind,
    raw_m3: f64,
    water_goal_liters: f64,
    id: u64,
    recorded_at: OffsetDateTime,
) -> Result<ReadingOutcome, ReadingError> {
    if raw_m3 < 0.0 {
        return Err(ReadingError::Negative(raw_m3));
    }

    let (consumption_liters, baseline) = match ledger.last(kind) {
        None => (0.0, true),
        Some(prev) => {
            if raw_m3 < prev.raw_m3 {
                return Err(ReadingError::Regression {
                    previous_m3: prev.raw_m3,
                    submitted_m3: raw_m3,
                });
            }
            ((raw_m3 - prev.raw_m3) * 1000.0, false)
        }
    };

    let record = MeterReading {
        id,
        kind,
        raw_m3,
        consumption_liters,
        recorded_at,
    };

    let points_awarded = if consumption_liters > 0.0 {
        if consumption_liters <= water_goal_liters {
            POINTS_WITHIN_GOAL
        } else {
            // Exceeding the goal still earns the minimal reward.
            POINTS_OVER_GOAL
        }
    } else {
        0
    };

    let alert = (!baseline && consumption_liters >= ALERT_GOAL_FRACTION * water_goal_liters)
        .then_some(UsageAlert {
            consumption_liters,
            water_goal_liters,
        });

    let impact = if consumption_liters > 0.0 {
        Some(match kind {
            MeterKind::Tap => EntryImpact::CostRwf(tariff::entry_cost_rwf(consumption_liters)),
            MeterKind::Recycled => {
                EntryImpact::RecycledBonusPoints(tariff::recycled_point_bonus(consumption_liters))
            }
        })
    } else {
        None
    };

    Ok(ReadingOutcome {
        record,
        baseline,
        points_awarded,
        alert,
        impact,
    })
}
