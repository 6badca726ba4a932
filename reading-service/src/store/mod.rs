//! Profile store collaborator seam.
//!
//! The real profile store is an external document database; this service only
//! depends on the narrow contract below. A successful reading submission
//! issues exactly one `apply_reading` call carrying the appended history and
//! the new points total, so persistence either lands whole or not at all.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use water_core::{AccountKind, MeterReading};

pub mod memory;

pub use memory::MemoryProfileStore;

/// A user account as the document store holds it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub district: String,
    pub account: AccountKind,
    pub eco_points: u64,
    /// Liters per period; `None` means the configured default applies.
    pub water_goal_liters: Option<f64>,
    pub monthly_budget_rwf: Option<i64>,
    pub history: Vec<MeterReading>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The single write a successful submission performs.
#[derive(Debug, Clone)]
pub struct ReadingUpdate {
    /// Full history including the newly appended record.
    pub history: Vec<MeterReading>,
    /// New eco-points total (unchanged or incremented).
    pub eco_points: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("user \"{0}\" not found")]
    NotFound(String),
    #[error("user \"{0}\" already exists")]
    AlreadyExists(String),
    #[error("profile store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError>;

    /// All profiles, for the leaderboard. Ordering is the caller's concern.
    async fn list(&self) -> Result<Vec<UserProfile>, StoreError>;

    async fn create(&self, profile: UserProfile) -> Result<(), StoreError>;

    /// Atomically replaces the user's history and points total.
    async fn apply_reading(&self, user_id: &str, update: ReadingUpdate) -> Result<(), StoreError>;
}
