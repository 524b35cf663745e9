pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use core::backend::BackendClient;
pub use core::fetcher::{ExerciseFetcher, FetcherConfig};
pub use core::hr_zones::{calculate_hr_zones, max_heart_rate, HeartRateZones};
pub use core::normalize::{normalize_listing, normalize_record};
pub use core::retry::RetryPolicy;
pub use domain::model::{
    FetchOutcome, LanguageCode, ListingRequest, ListingResult, NormalizedRecord, RawRecord,
};
pub use domain::ports::ExerciseSource;
pub use utils::error::{FetchError, Result, SpmError};
