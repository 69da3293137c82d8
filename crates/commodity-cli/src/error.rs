use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] commodity_core::ValidationError),

    #[error(transparent)]
    Core(#[from] commodity_core::CoreError),

    #[error(transparent)]
    Write(#[from] commodity_core::WriteError),

    #[error("{0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Core(_) | Self::Write(_) | Self::Command(_) => 1,
            Self::Serialization(_) => 4,
        }
    }
}
