//! Usage-alert dispatcher collaborator seam.
//!
//! Alerts are best-effort: a dispatch failure is logged and counted, never
//! surfaced to the submitting user.

use async_trait::async_trait;

use water_core::processor::UsageAlert;

use crate::store::UserProfile;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("alert dispatch failed: {0}")]
    Dispatch(String),
}

#[async_trait]
pub trait AlertDispatcher: Send + Sync {
    async fn send_usage_alert(
        &self,
        profile: &UserProfile,
        alert: &UsageAlert,
    ) -> Result<(), NotifyError>;
}

/// Default dispatcher: emits a tracing event instead of e-mail. The real
/// e-mail sender is an external collaborator behind the same trait.
pub struct LogAlertDispatcher;

#[async_trait]
impl AlertDispatcher for LogAlertDispatcher {
    async fn send_usage_alert(
        &self,
        profile: &UserProfile,
        alert: &UsageAlert,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            user = %profile.user_id,
            recipient = %profile.email,
            consumption_liters = alert.consumption_liters,
            water_goal_liters = alert.water_goal_liters,
            "usage alert"
        );
        Ok(())
    }
}
