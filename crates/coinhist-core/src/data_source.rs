//! Data source trait and the types that cross it.
//!
//! A [`DataSource`] is one provider API generation. It resolves symbols, and it
//! retrieves a [`RawPayload`] for a [`FetchWindow`]; turning that payload into a
//! [`crate::Series`] is the job of [`crate::normalize`], which dispatches on
//! the payload variant.
//!
//! | Operation | Request | Response |
//! |-----------|---------|----------|
//! | Symbol map | [`CoinSymbol`] | `Vec<CoinCandidate>` |
//! | Id lookup | `u64` | [`CoinCandidate`] |
//! | History | [`FetchWindow`] | [`RawPayload`] |
//! | Trending | - | `Vec<CoinCandidate>` |

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::range::DateRange;
use crate::{CoinCandidate, CoinKey, CoinSymbol, ExportError, ProviderId, ValidationError};

/// Optional operations a source may support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub id_lookup: bool,
    pub trending: bool,
}

impl CapabilitySet {
    pub const fn new(id_lookup: bool, trending: bool) -> Self {
        Self {
            id_lookup,
            trending,
        }
    }

    pub const fn full() -> Self {
        Self::new(true, true)
    }
}

/// Error classification across the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeErrorKind {
    /// Malformed or contradictory input, detected before network access.
    InvalidParameters,
    /// The symbol has no upstream match.
    InvalidCoinCode,
    /// Provider reported an error status or returned an unusable payload.
    Upstream,
    /// Network or I/O failure talking to the provider.
    Transport,
    /// Writing or serializing an export failed.
    Export,
}

/// Structured pipeline error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeError {
    kind: ScrapeErrorKind,
    message: String,
}

impl ScrapeError {
    pub fn invalid_parameters(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::InvalidParameters, message)
    }

    pub fn invalid_coin_code(symbol: &str) -> Self {
        Self::new(
            ScrapeErrorKind::InvalidCoinCode,
            format!("'{symbol}' coin code is unavailable on the provider"),
        )
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::Upstream, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::Transport, message)
    }

    pub fn export(message: impl Into<String>) -> Self {
        Self::new(ScrapeErrorKind::Export, message)
    }

    pub fn unsupported(provider: ProviderId, operation: &str) -> Self {
        Self::invalid_parameters(format!(
            "{operation} is not supported by the '{provider}' provider"
        ))
    }

    /// Same kind, with `context` prepended to the message.
    pub fn with_context(self, context: impl Display) -> Self {
        Self {
            kind: self.kind,
            message: format!("{context}: {}", self.message),
        }
    }

    fn new(kind: ScrapeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> ScrapeErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            ScrapeErrorKind::InvalidParameters => "scrape.invalid_parameters",
            ScrapeErrorKind::InvalidCoinCode => "scrape.invalid_coin_code",
            ScrapeErrorKind::Upstream => "scrape.upstream",
            ScrapeErrorKind::Transport => "scrape.transport",
            ScrapeErrorKind::Export => "scrape.export",
        }
    }
}

impl Display for ScrapeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for ScrapeError {}

impl From<ValidationError> for ScrapeError {
    fn from(error: ValidationError) -> Self {
        Self::invalid_parameters(error.to_string())
    }
}

impl From<ExportError> for ScrapeError {
    fn from(error: ExportError) -> Self {
        Self::export(error.to_string())
    }
}

/// History query addressed to one coin over an inclusive day range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchWindow {
    pub key: CoinKey,
    pub range: DateRange,
    pub fiat: String,
}

impl FetchWindow {
    pub fn new(key: CoinKey, range: DateRange, fiat: impl Into<String>) -> Self {
        Self {
            key,
            range,
            fiat: fiat.into(),
        }
    }

    /// Start instant, shifted one day earlier so the first day is never truncated.
    pub fn time_start(&self) -> i64 {
        self.range.start.previous_day().midnight_unix_timestamp()
    }

    pub fn time_end(&self) -> i64 {
        self.range.end.midnight_unix_timestamp()
    }

    /// Human-readable description used in error messages.
    pub fn describe(&self) -> String {
        format!(
            "'{}' between {} and {}",
            self.key, self.range.start, self.range.end
        )
    }
}

/// Undecoded provider response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPayload {
    /// Structured records, one per day, quote block keyed by fiat code.
    Json(String),
    /// Markup page holding a historical-data table.
    Html(String),
}

impl RawPayload {
    pub fn body(&self) -> &str {
        match self {
            Self::Json(body) | Self::Html(body) => body,
        }
    }
}

/// Provider adapter contract.
///
/// Each call performs at most one network round trip and never retries.
pub trait DataSource: Send + Sync {
    fn id(&self) -> ProviderId;

    fn capabilities(&self) -> CapabilitySet;

    /// Every coin the provider lists under `symbol`, in provider order.
    ///
    /// # Errors
    ///
    /// `InvalidCoinCode` when the provider knows no coin with that symbol.
    fn lookup_symbol(&self, symbol: &CoinSymbol) -> Result<Vec<CoinCandidate>, ScrapeError>;

    /// Canonical name and symbol for a numeric id.
    fn lookup_id(&self, id: u64) -> Result<CoinCandidate, ScrapeError>;

    /// Retrieve the raw history payload for `window`.
    fn fetch(&self, window: &FetchWindow) -> Result<RawPayload, ScrapeError>;

    /// Coins currently trending on the provider.
    fn trending(&self) -> Result<Vec<CoinCandidate>, ScrapeError>;
}
