use std::fmt;

#[derive(Debug)]
pub enum ImportError {
    Config(String),
    UnreadableSource(String),
    ParseError(String),
    DatabaseError(String),
    IoError(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Config(msg) => write!(f, "Configuration error: {}", msg),
            ImportError::UnreadableSource(msg) => write!(f, "Unreadable source: {}", msg),
            ImportError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ImportError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ImportError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for ImportError {}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::IoError(err.to_string())
    }
}

impl From<sqlx::Error> for ImportError {
    fn from(err: sqlx::Error) -> Self {
        ImportError::DatabaseError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::ParseError(err.to_string())
    }
}

impl From<figment::Error> for ImportError {
    fn from(err: figment::Error) -> Self {
        ImportError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for ImportError {
    fn from(err: validator::ValidationErrors) -> Self {
        ImportError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ImportError>;
