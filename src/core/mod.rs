pub mod backend;
pub mod fetcher;
pub mod hr_zones;
pub mod normalize;
pub mod retry;

pub use crate::domain::model::{
    FetchOutcome, LanguageCode, ListingRequest, ListingResult, NormalizedRecord, RawListing,
    RawRecord,
};
pub use crate::domain::ports::ExerciseSource;
pub use crate::utils::error::Result;
