//! CLI error types.

use mdink_config::ConfigError;
use mdink_renderer::ProcessError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Process(#[from] ProcessError),

    #[error("PDF conversion failed: {0}")]
    Pdf(String),
}
