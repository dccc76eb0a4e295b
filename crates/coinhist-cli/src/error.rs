use coinhist_core::{HttpError, ScrapeError, ScrapeErrorKind, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    #[error("http client setup failed: {0}")]
    Http(#[from] HttpError),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) | Self::Command(_) => 2,
            Self::Scrape(error) => match error.kind() {
                ScrapeErrorKind::InvalidParameters => 2,
                ScrapeErrorKind::InvalidCoinCode => 3,
                ScrapeErrorKind::Upstream => 4,
                ScrapeErrorKind::Transport => 5,
                ScrapeErrorKind::Export => 10,
            },
            Self::Http(_) => 5,
            Self::Serialization(_) => 6,
            Self::Io(_) => 10,
        }
    }
}
