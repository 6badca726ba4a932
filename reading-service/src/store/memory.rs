//! In-memory profile store, the document-store stand-in for demos and tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{ProfileStore, ReadingUpdate, StoreError, UserProfile};

#[derive(Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profiles.read().await.get(user_id).cloned())
    }

    async fn list(&self) -> Result<Vec<UserProfile>, StoreError> {
        Ok(self.profiles.read().await.values().cloned().collect())
    }

    async fn create(&self, profile: UserProfile) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        if profiles.contains_key(&profile.user_id) {
            return Err(StoreError::AlreadyExists(profile.user_id));
        }
        profiles.insert(profile.user_id.clone(), profile);
        Ok(())
    }

    async fn apply_reading(&self, user_id: &str, update: ReadingUpdate) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(user_id)
            .ok_or_else(|| StoreError::NotFound(user_id.to_string()))?;
        profile.history = update.history;
        profile.eco_points = update.eco_points;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use water_core::AccountKind;

    fn profile(user_id: &str) -> UserProfile {
        UserProfile {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.rw"),
            display_name: "Test User".to_string(),
            district: "Gasabo".to_string(),
            account: AccountKind::Residential,
            eco_points: 0,
            water_goal_liters: None,
            monthly_budget_rwf: Some(5_000),
            history: Vec::new(),
            created_at: datetime!(2026-08-01 00:00:00 UTC),
        }
    }

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let store = MemoryProfileStore::new();
        store.create(profile("alice")).await.expect("create");
        let got = store.get("alice").await.expect("get");
        assert_eq!(got.map(|p| p.district).as_deref(), Some("Gasabo"));
    }

    #[tokio::test]
    async fn list_returns_every_profile() {
        let store = MemoryProfileStore::new();
        store.create(profile("alice")).await.expect("create");
        store.create(profile("bob")).await.expect("create");
        let mut ids: Vec<String> = store
            .list()
            .await
            .expect("list")
            .into_iter()
            .map(|p| p.user_id)
            .collect();
        ids.sort();
        assert_eq!(ids, ["alice", "bob"]);
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = MemoryProfileStore::new();
        store.create(profile("alice")).await.expect("create");
        let err = store.create(profile("alice")).await.expect_err("duplicate");
        assert!(matches!(err, StoreError::AlreadyExists(_)));
    }

    #[tokio::test]
    async fn apply_reading_to_unknown_user_fails() {
        let store = MemoryProfileStore::new();
        let err = store
            .apply_reading(
                "ghost",
                ReadingUpdate {
                    history: Vec::new(),
                    eco_points: 5,
                },
            )
            .await
            .expect_err("unknown user");
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn apply_reading_replaces_history_and_points() {
        let store = MemoryProfileStore::new();
        store.create(profile("alice")).await.expect("create");
        store
            .apply_reading(
                "alice",
                ReadingUpdate {
                    history: Vec::new(),
                    eco_points: 25,
                },
            )
            .await
            .expect("apply");
        let got = store.get("alice").await.expect("get").expect("present");
        assert_eq!(got.eco_points, 25);
    }
}
