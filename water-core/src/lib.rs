//! Domain core for the water usage tracker: meter readings, progressive
//! tariffs, eco-point rules, and history aggregation. Pure computation only;
//! persistence and notification live in the service crate.

pub mod domain;
pub mod processor;
pub mod summary;
pub mod tariff;

pub use domain::{AccountKind, MeterKind, MeterReading, ReadingLedger};
