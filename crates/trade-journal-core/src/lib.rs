pub mod config;
pub mod error;
pub mod trade;
pub mod types;

#[cfg(feature = "analytics")]
pub mod analytics;

#[cfg(feature = "export")]
pub mod export;

pub use config::{AnalyticsConfig, HourRange};
pub use error::JournalError;
pub use trade::{Classification, Direction, Outcome, TradeInput, TradeRecord};
pub use types::*;

/// Standard result type for all trade-journal operations
pub type JournalResult<T> = Result<T, JournalError>;
