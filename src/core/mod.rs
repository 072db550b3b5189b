//! Core business logic abstractions

pub mod clock;
pub mod config;
pub mod error;
pub mod log;
pub mod rates;
pub mod store;

// Re-export main types for cleaner imports
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{AppError, AppResult};
pub use rates::{
    ComparisonRecord, ComparisonReport, ExchangeRateEntry, ExchangeRateSnapshot, RateSource,
};
pub use store::RateStore;
