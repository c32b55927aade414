pub mod batch_writer;
pub mod import_rankings;
pub mod row_normalizer;
pub mod run_verifier;
