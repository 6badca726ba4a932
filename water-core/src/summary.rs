//! History aggregation for dashboards and the summary endpoint.

use serde::Serialize;

use crate::domain::{AccountKind, MeterKind, MeterReading};
use crate::tariff;

/// Aggregate view over a reading history.
///
/// Totals cover the entire history passed in, not a calendar month; the bill
/// estimate applies the monthly schedule to that all-time tap total. Callers
/// wanting a per-period figure slice the history before aggregating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSummary {
    /// Total tap consumption in liters.
    pub tap_liters: f64,
    /// Total recycled consumption in liters.
    pub recycled_liters: f64,
    /// Estimated bill for the aggregated tap total on the monthly schedule.
    /// Zero when nothing was consumed, so an empty history does not show the
    /// fixed fee.
    pub estimated_bill_rwf: i64,
    /// Money saved by recycled usage, at the flat per-liter savings rate.
    pub recycled_savings_rwf: i64,
    /// Number of records aggregated.
    pub entries: usize,
}

impl UsageSummary {
    pub fn from_history(history: &[MeterReading], account: AccountKind) -> Self {
        let mut tap_liters = 0.0;
        let mut recycled_liters = 0.0;
        for r in history {
            match r.kind {
                MeterKind::Tap => tap_liters += r.consumption_liters,
                MeterKind::Recycled => recycled_liters += r.consumption_liters,
            }
        }

        let estimated_bill_rwf = if tap_liters > 0.0 {
            tariff::monthly_bill_rwf(tap_liters, account)
        } else {
            0
        };

        Self {
            tap_liters,
            recycled_liters,
            estimated_bill_rwf,
            recycled_savings_rwf: tariff::recycled_savings_rwf(recycled_liters),
            entries: history.len(),
        }
    }
}
