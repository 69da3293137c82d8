use thiserror::Error;

/// Schema errors raised while constructing a commodity record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ISIN must be 12 alphanumeric characters: '{value}'")]
    Format { value: String },
    #[error("ISIN must start with a 2-letter country code: '{value}'")]
    CountryCode { value: String },
    #[error("invalid ISIN checksum for {value}")]
    Checksum { value: String },

    #[error("currency must be a 3-letter uppercase ISO code: '{value}'")]
    CurrencyFormat { value: String },
    #[error("commodity name must match ^[A-Z][A-Z0-9._-]*$: '{value}'")]
    NameFormat { value: String },

    #[error("date must be formatted as YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },

    #[error("provider id cannot be empty")]
    EmptyProvider,
    #[error("duplicate ticker entry for provider '{provider}'")]
    DuplicateTicker { provider: String },

    #[error("unknown {kind} '{value}', expected one of: {expected}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        expected: String,
    },
}

/// Failure to load a single data file. Recorded per file, never fatal to a load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("{0}")]
    Parse(serde_yaml::Error),

    #[error("{0}")]
    Schema(serde_yaml::Error),
}

/// Failure while writing a record back to disk.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_yaml::Error),

    #[error("cannot update '{path}': existing document is not valid YAML: {source}")]
    ExistingDocument {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("cannot write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("commodity '{0}' not found")]
    UnknownCommodity(String),
}
