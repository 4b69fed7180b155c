pub mod candidate;
pub mod history;
pub mod planet_type;
pub mod result;

pub use candidate::{CandidateRecord, ValidationError, FEATURE_COLUMNS, FEATURE_COUNT};
pub use history::{
    owner_stats, HistoryError, HistoryPage, MemoryStore, OwnerStats, PredictionRecord,
    PredictionStore, MAX_PAGE_LIMIT, STATS_WINDOW,
};
pub use planet_type::{coarse_planet_type_label, planet_type_label};
pub use result::{round_confidence, ClassificationResult, ResultDetails};
