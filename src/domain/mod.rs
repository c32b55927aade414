pub mod error;
pub mod ranking;
