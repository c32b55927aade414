// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Encoding detection and header-keyed CSV parsing

mod csv_parser;
mod encoding_resolver;

pub use csv_parser::{CsvParser, ParsedSource};
pub use encoding_resolver::{DecodedSource, EncodingResolver};
