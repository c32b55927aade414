// ============================================================
// ENCODING RESOLVER
// ============================================================
// Ordered fallback chain of strict decoders

use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::{info, warn};

use super::CsvParser;
use crate::domain::error::{ImportError, Result};

/// Source text decoded with the first candidate that worked
#[derive(Debug, Clone)]
pub struct DecodedSource {
    pub encoding: &'static Encoding,
    pub label: String,
    pub text: String,
}

pub struct EncodingResolver {
    candidates: Vec<String>,
}

impl EncodingResolver {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: candidates.into_iter().map(Into::into).collect(),
        }
    }

    /// Map a configured label to an encoding. `ansi` is the Windows code page name.
    pub fn lookup(label: &str) -> Option<&'static Encoding> {
        match label.trim().to_ascii_lowercase().as_str() {
            "ansi" => Some(WINDOWS_1252),
            other => Encoding::for_label(other.as_bytes()),
        }
    }

    /// Read `path` and return the text under the first candidate that decodes
    /// without malformed sequences and yields a parseable header row.
    pub fn resolve(&self, path: &Path) -> Result<DecodedSource> {
        let bytes = fs::read(path).map_err(|e| {
            ImportError::UnreadableSource(format!("Failed to open {}: {}", path.display(), e))
        })?;
        self.resolve_bytes(&bytes).map_err(|err| match err {
            ImportError::UnreadableSource(msg) => {
                ImportError::UnreadableSource(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    pub fn resolve_bytes(&self, bytes: &[u8]) -> Result<DecodedSource> {
        let parser = CsvParser::new();

        for label in &self.candidates {
            let Some(encoding) = Self::lookup(label) else {
                warn!(encoding = %label, "Unknown encoding label, skipping");
                continue;
            };

            info!(encoding = %label, "Trying to decode source");
            let Some(text) = decode_strict(encoding, bytes) else {
                warn!(encoding = %label, "Decoding failed, trying next encoding");
                continue;
            };

            match parser.parse_headers(&text) {
                Ok(_) => {
                    info!(encoding = %label, resolved = encoding.name(), "Source decoded");
                    return Ok(DecodedSource {
                        encoding,
                        label: label.clone(),
                        text,
                    });
                }
                Err(e) => {
                    warn!(encoding = %label, error = %e, "Header row unusable, trying next encoding");
                }
            }
        }

        Err(ImportError::UnreadableSource(format!(
            "no candidate encoding could decode the file (tried: {})",
            self.candidates.join(", ")
        )))
    }
}

fn decode_strict(encoding: &'static Encoding, bytes: &[u8]) -> Option<String> {
    let bytes = strip_bom(encoding, bytes);
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(|text| text.into_owned())
}

fn strip_bom<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> &'a [u8] {
    match Encoding::for_bom(bytes) {
        Some((bom_encoding, len)) if bom_encoding == encoding => &bytes[len..],
        _ => bytes,
    }
}
