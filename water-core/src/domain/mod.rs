pub mod account;
pub mod reading;

pub use account::AccountKind;
pub use reading::{MeterKind, MeterReading, ReadingLedger};
