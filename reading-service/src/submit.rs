//! Reading submission orchestration.
//!
//! One submission is one logical read-modify-write over a single user's
//! history: load the profile, run the pure reading processor against the
//! rebuilt ledger, persist exactly one update, then dispatch any usage alert
//! best-effort. The core assumes it observed the latest prior reading, so
//! callers must not race concurrent submissions for the same user and meter
//! kind; the store's atomic per-call update is the serialization point.

use std::sync::Arc;

use serde::Serialize;
use time::OffsetDateTime;

use water_core::processor::{self, EntryImpact, ReadingError};
use water_core::{MeterKind, ReadingLedger};

use crate::notify::AlertDispatcher;
use crate::store::{ProfileStore, ReadingUpdate, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// The OCR result (or manual entry) carried no numeric meter value; no
    /// record is created and the user should rescan.
    #[error("no meter value recognized in {0:?}")]
    Unrecognized(String),
    /// Domain validation rejected the value; history and points are
    /// untouched.
    #[error(transparent)]
    Rejected(#[from] ReadingError),
    #[error("user \"{0}\" not found")]
    UnknownUser(String),
    /// The profile update failed; the whole submission failed and nothing
    /// may be assumed persisted.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the caller gets back after an accepted submission.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionReceipt {
    pub meter: MeterKind,
    pub raw_m3: f64,
    pub baseline: bool,
    pub consumption_liters: f64,
    pub points_awarded: u64,
    pub eco_points_total: u64,
    pub impact: Option<EntryImpact>,
    pub alert_sent: bool,
}

pub struct SubmissionService {
    store: Arc<dyn ProfileStore>,
    dispatcher: Arc<dyn AlertDispatcher>,
    default_water_goal_liters: f64,
}

impl SubmissionService {
    pub fn new(
        store: Arc<dyn ProfileStore>,
        dispatcher: Arc<dyn AlertDispatcher>,
        default_water_goal_liters: f64,
    ) -> Self {
        Self {
            store,
            dispatcher,
            default_water_goal_liters,
        }
    }

    /// Submits a raw meter value for one user and meter kind.
    ///
    /// `raw_value` is the numeric string from the vision service or manual
    /// entry. Empty or non-numeric input means "no meter detected" and
    /// creates no record.
    pub async fn submit(
        &self,
        user_id: &str,
        meter: MeterKind,
        raw_value: &str,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let raw_m3 = parse_meter_value(raw_value).ok_or_else(|| {
            metrics::counter!("readings_unrecognized_total").increment(1);
            SubmitError::Unrecognized(raw_value.to_string())
        })?;

        let profile = self
            .store
            .get(user_id)
            .await?
            .ok_or_else(|| SubmitError::UnknownUser(user_id.to_string()))?;

        let ledger = ReadingLedger::from_history(&profile.history);
        // The goal must be positive; a profile written by another client may
        // violate that, in which case the configured default applies.
        let goal = profile
            .water_goal_liters
            .filter(|g| *g > 0.0 && g.is_finite())
            .unwrap_or(self.default_water_goal_liters);
        let now = OffsetDateTime::now_utc();
        let id = (now.unix_timestamp_nanos() / 1_000_000) as u64;

        let outcome =
            processor::process_reading(&ledger, meter, raw_m3, goal, id, now).map_err(|e| {
                metrics::counter!("readings_rejected_total").increment(1);
                tracing::info!(user = user_id, meter = %meter, error = %e, "reading rejected");
                SubmitError::Rejected(e)
            })?;

        let mut history = profile.history.clone();
        history.push(outcome.record.clone());
        let eco_points_total = profile.eco_points + outcome.points_awarded;

        self.store
            .apply_reading(
                user_id,
                ReadingUpdate {
                    history,
                    eco_points: eco_points_total,
                },
            )
            .await?;
        metrics::counter!("readings_accepted_total").increment(1);

        let mut alert_sent = false;
        if let Some(alert) = &outcome.alert {
            match self.dispatcher.send_usage_alert(&profile, alert).await {
                Ok(()) => {
                    alert_sent = true;
                    metrics::counter!("usage_alerts_sent_total").increment(1);
                }
                Err(e) => {
                    // Best-effort by design: the reading already landed.
                    metrics::counter!("usage_alert_failures_total").increment(1);
                    tracing::warn!(user = user_id, error = %e, "usage alert dispatch failed");
                }
            }
        }

        tracing::info!(
            user = user_id,
            meter = %meter,
            raw_m3 = outcome.record.raw_m3,
            consumption_liters = outcome.record.consumption_liters,
            points_awarded = outcome.points_awarded,
            baseline = outcome.baseline,
            "reading accepted"
        );

        Ok(SubmissionReceipt {
            meter,
            raw_m3: outcome.record.raw_m3,
            baseline: outcome.baseline,
            consumption_liters: outcome.record.consumption_liters,
            points_awarded: outcome.points_awarded,
            eco_points_total,
            impact: outcome.impact,
            alert_sent,
        })
    }
}

/// Parses the vision/OCR output. Whitespace is tolerated; anything that is
/// not a finite number counts as "no meter detected".
fn parse_meter_value(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}
