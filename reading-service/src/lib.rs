pub mod config;
pub mod export;
pub mod http;
pub mod leaderboard;
pub mod notify;
pub mod observability;
pub mod store;
pub mod submit;

pub use submit::{SubmissionReceipt, SubmissionService, SubmitError};
