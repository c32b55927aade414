pub mod use_cases;

pub use use_cases::batch_writer::BatchWriter;
pub use use_cases::import_rankings::ImportRankingsUseCase;
pub use use_cases::row_normalizer::{NormalizedRow, RowNormalizer};
pub use use_cases::run_verifier::{RunVerifier, Verification};
