//! Eco-point rankings: individual users and per-district aggregates.

use serde::Serialize;

use crate::store::UserProfile;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRank {
    pub rank: usize,
    pub user_id: String,
    pub display_name: String,
    pub district: String,
    pub eco_points: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictRank {
    pub rank: usize,
    pub district: String,
    pub eco_points: u64,
    pub members: usize,
}

/// Ranks users by eco-points, highest first. Ties break on user id so the
/// ordering is stable across calls.
pub fn rank_users(profiles: &[UserProfile]) -> Vec<UserRank> {
    let mut ranked: Vec<&UserProfile> = profiles.iter().collect();
    ranked.sort_by(|a, b| {
        b.eco_points
            .cmp(&a.eco_points)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    ranked
        .into_iter()
        .enumerate()
        .map(|(i, p)| UserRank {
            rank: i + 1,
            user_id: p.user_id.clone(),
            display_name: p.display_name.clone(),
            district: p.district.clone(),
            eco_points: p.eco_points,
        })
        .collect()
}

/// Sums eco-points per district and ranks districts by the total.
pub fn rank_districts(profiles: &[UserProfile]) -> Vec<DistrictRank> {
    let mut totals: Vec<(String, u64, usize)> = Vec::new();
    for p in profiles {
        match totals.iter_mut().find(|(d, _, _)| *d == p.district) {
            Some((_, pts, members)) => {
                *pts += p.eco_points;
                *members += 1;
            }
            None => totals.push((p.district.clone(), p.eco_points, 1)),
        }
    }
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    totals
        .into_iter()
        .enumerate()
        .map(|(i, (district, eco_points, members))| DistrictRank {
            rank: i + 1,
            district,
            eco_points,
            members,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use water_core::AccountKind;

    fn profile(user_id: &str, district: &str, eco_points: u64) -> UserProfile {
        UserProfile {
            user_id: user_id.to_string(),
            email: format!("{user_id}@example.rw"),
            display_name: user_id.to_uppercase(),
            district: district.to_string(),
            account: AccountKind::Residential,
            eco_points,
            water_goal_liters: None,
            monthly_budget_rwf: None,
            history: Vec::new(),
            created_at: datetime!(2026-08-01 00:00:00 UTC),
        }
    }

    #[test]
    fn users_rank_by_points_descending() {
        let profiles = vec![
            profile("alice", "Gasabo", 40),
            profile("bob", "Nyarugenge", 120),
            profile("carol", "Gasabo", 65),
        ];
        let ranked = rank_users(&profiles);
        assert_eq!(
            ranked.iter().map(|r| r.user_id.as_str()).collect::<Vec<_>>(),
            ["bob", "carol", "alice"]
        );
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn tied_users_order_by_id() {
        let profiles = vec![profile("zoe", "Gasabo", 50), profile("amy", "Gasabo", 50)];
        let ranked = rank_users(&profiles);
        assert_eq!(ranked[0].user_id, "amy");
        assert_eq!(ranked[1].user_id, "zoe");
    }

    #[test]
    fn districts_aggregate_points_and_members() {
        let profiles = vec![
            profile("alice", "Gasabo", 40),
            profile("bob", "Nyarugenge", 120),
            profile("carol", "Gasabo", 100),
        ];
        let districts = rank_districts(&profiles);
        assert_eq!(districts.len(), 2);
        assert_eq!(districts[0].district, "Gasabo");
        assert_eq!(districts[0].eco_points, 140);
        assert_eq!(districts[0].members, 2);
        assert_eq!(districts[1].district, "Nyarugenge");
        assert_eq!(districts[1].rank, 2);
    }

    #[test]
    fn empty_store_yields_empty_rankings() {
        assert!(rank_users(&[]).is_empty());
        assert!(rank_districts(&[]).is_empty());
    }
}
