//! Progressive (tiered) water tariff schedules.
//!
//! Two schedules coexist on purpose. `monthly_bill_rwf` follows the utility's
//! published monthly billing formula (marginal brackets plus, for residential
//! connections, a fixed service fee and VAT uplift). `entry_cost_rwf` is the
//! finer-grained VAT-inclusive schedule used for per-entry cost display. Their
//! bracket boundaries and rates diverge for what is ostensibly the same bill;
//! the tariff owner has not confirmed a canonical schedule, so both are kept
//! distinct rather than silently unified.

use crate::domain::AccountKind;

/// One marginal bracket: volume up to `upper_m3` bills at `rate_rwf_per_m3`.
struct Bracket {
    upper_m3: f64,
    rate_rwf_per_m3: f64,
}

const RESIDENTIAL_BRACKETS: &[Bracket] = &[
    Bracket {
        upper_m3: 5.0,
        rate_rwf_per_m3: 340.0,
    },
    Bracket {
        upper_m3: 20.0,
        rate_rwf_per_m3: 720.0,
    },
    Bracket {
        upper_m3: f64::INFINITY,
        rate_rwf_per_m3: 845.0,
    },
];

const NON_RESIDENTIAL_BRACKETS: &[Bracket] = &[
    Bracket {
        upper_m3: 50.0,
        rate_rwf_per_m3: 1037.491,
    },
    Bracket {
        upper_m3: f64::INFINITY,
        rate_rwf_per_m3: 1058.785,
    },
];

/// Per-entry display schedule, VAT-inclusive unit rates.
const ENTRY_DISPLAY_BRACKETS: &[Bracket] = &[
    Bracket {
        upper_m3: 5.0,
        rate_rwf_per_m3: 402.0,
    },
    Bracket {
        upper_m3: 20.0,
        rate_rwf_per_m3: 852.0,
    },
    Bracket {
        upper_m3: 50.0,
        rate_rwf_per_m3: 999.635,
    },
    Bracket {
        upper_m3: f64::INFINITY,
        rate_rwf_per_m3: 1037.491,
    },
];

/// Fixed monthly service charge on residential bills.
pub const RESIDENTIAL_SERVICE_FEE_RWF: f64 = 850.0;

/// VAT applied on top of the residential tiered cost plus service fee.
pub const VAT_RATE: f64 = 0.18;

/// Aggregate savings estimate for recycled water, per liter.
pub const RECYCLED_SAVINGS_RWF_PER_LITER: f64 = 0.34;

/// Per-entry eco-point bonus for recycled water, per liter.
pub const RECYCLED_POINTS_PER_LITER: f64 = 2.0;

/// Classic marginal-bracket accumulation: every lower bracket bills at its own
/// rate for the volume inside it.
fn marginal_cost_rwf(m3: f64, brackets: &[Bracket]) -> f64 {
    let mut cost = 0.0;
    let mut lower = 0.0;
    for bracket in brackets {
        if m3 <= bracket.upper_m3 {
            return cost + (m3 - lower) * bracket.rate_rwf_per_m3;
        }
        cost += (bracket.upper_m3 - lower) * bracket.rate_rwf_per_m3;
        lower = bracket.upper_m3;
    }
    cost
}

/// Estimated monthly bill in RWF for `volume_liters` on the given account.
///
/// Input must be non-negative; the reading processor guarantees this for
/// derived consumption.
pub fn monthly_bill_rwf(volume_liters: f64, account: AccountKind) -> i64 {
    let m3 = volume_liters / 1000.0;
    match account {
        AccountKind::NonResidential => {
            marginal_cost_rwf(m3, NON_RESIDENTIAL_BRACKETS).round() as i64
        }
        // Industrial has no published schedule; it falls through to the
        // residential brackets until the tariff owner says otherwise.
        AccountKind::Residential | AccountKind::Industrial => {
            let tiered = marginal_cost_rwf(m3, RESIDENTIAL_BRACKETS);
            ((tiered + RESIDENTIAL_SERVICE_FEE_RWF) * (1.0 + VAT_RATE)).round() as i64
        }
    }
}

/// Per-entry display cost in RWF, on the VAT-inclusive graduated schedule.
pub fn entry_cost_rwf(volume_liters: f64) -> i64 {
    marginal_cost_rwf(volume_liters / 1000.0, ENTRY_DISPLAY_BRACKETS).round() as i64
}

/// Eco-point bonus shown for a recycled entry.
pub fn recycled_point_bonus(liters: f64) -> u64 {
    (liters * RECYCLED_POINTS_PER_LITER).round() as u64
}

/// Money saved by substituting recycled water for tap water, in RWF.
pub fn recycled_savings_rwf(liters: f64) -> i64 {
    (liters * RECYCLED_SAVINGS_RWF_PER_LITER).round() as i64
}
