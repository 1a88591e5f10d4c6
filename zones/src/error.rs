use thiserror::Error;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ZoneError {
    #[error("File not found")]
    NotFound(String),

    #[error("record {name} is not valid JSON: {source}")]
    CorruptRecord {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid record name: {0:?}")]
    InvalidName(String),

    #[error("zones must not be null")]
    EmptyZones,

    #[error("record names with prefix {0} are exhausted")]
    NamesExhausted(String),

    #[error("zone store i/o error: {0}")]
    Io(#[from] std::io::Error),
}
