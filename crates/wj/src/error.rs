//! CLI error types.

use wj_config::ConfigError;
use wj_site::BuildError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("Invalid argument list")]
    InvalidArguments,

    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Build(#[from] BuildError),
}

impl CliError {
    /// Process exit code for this error.
    pub(crate) fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidArguments
            | Self::Config(_)
            | Self::Build(BuildError::OutputIsSource(_)) => 1,
            Self::Build(BuildError::InvalidSourceDir(_)) => 2,
            Self::Build(BuildError::CreateDir { .. }) => 3,
        }
    }
}
