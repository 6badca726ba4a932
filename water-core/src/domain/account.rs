use serde::{Deserialize, Serialize};

/// Customer account classification chosen at onboarding.
///
/// The utility publishes distinct tariff schedules for residential and
/// non-residential connections. `Industrial` is a selectable classification
/// but has no schedule of its own; it bills on the residential schedule until
/// the tariff owner publishes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Residential,
    NonResidential,
    Industrial,
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Residential => write!(f, "residential"),
            Self::NonResidential => write!(f, "non_residential"),
            Self::Industrial => write!(f, "industrial"),
        }
    }
}
