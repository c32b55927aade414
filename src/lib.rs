pub mod app;
pub mod application;
pub mod domain;
pub mod infrastructure;

pub use app::run;
pub use domain::error::{ImportError, Result};
pub use domain::ranking::{ImportConfig, ImportReport, SourceRecord, TargetRow};
