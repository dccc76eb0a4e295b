//! # Coinhist Core
//!
//! Historical cryptocurrency price retrieval: identifier resolution, range
//! defaulting, one-shot retrieval, normalization and export.
//!
//! ## Overview
//!
//! - **Identity resolution** from a ticker symbol (plus optional coin name) or
//!   an authoritative numeric id, with non-fatal advisories
//! - **Provider adapters** for the structured JSON API and the legacy HTML
//!   pages, behind one [`DataSource`] trait
//! - **Normalization** of either payload form into a canonical [`Series`]
//! - **Memoized store** per request with forced refresh
//! - **Export** to CSV, TSV, JSON, YAML and XLSX, or to an in-memory [`Table`]
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | Web API and legacy HTML adapters |
//! | [`config`] | Provider base URLs, timeout and user agent |
//! | [`data_source`] | Data source trait, fetch window and structured errors |
//! | [`domain`] | Domain models (CalendarDate, Quote, Series, ...) |
//! | [`error`] | Validation and export errors |
//! | [`export`] | Format rendering, file export and tabular view |
//! | [`http_client`] | Blocking HTTP client abstraction |
//! | [`normalize`] | Raw payload to canonical series |
//! | [`pipeline`] | End-to-end scraper for one request |
//! | [`range`] | Date range defaulting |
//! | [`request`] | Request construction and validation |
//! | [`resolver`] | Symbol / id resolution and advisories |
//! | [`source`] | Provider identifiers |
//! | [`store`] | Memoized series store |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//!
//! use coinhist_core::{
//!     ExportFormat, HistoricalScraper, ProviderConfig, ScrapeRequest, WebApiAdapter,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProviderConfig::from_env();
//!     let adapter = WebApiAdapter::new(&config, Arc::new(config.http_client()?));
//!
//!     let request = ScrapeRequest::builder()
//!         .symbol("BTC")
//!         .start_date("15-10-2017")
//!         .end_date("25-10-2017")
//!         .build()?;
//!
//!     let mut scraper = HistoricalScraper::new(request, Arc::new(adapter));
//!     let path = scraper.export(ExportFormat::Csv, None, None, false)?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Pipeline operations return [`ScrapeError`], classified by kind:
//!
//! ```rust
//! use coinhist_core::{ScrapeError, ScrapeErrorKind};
//!
//! fn describe(error: &ScrapeError) -> &'static str {
//!     match error.kind() {
//!         ScrapeErrorKind::InvalidParameters => "fix the request",
//!         ScrapeErrorKind::InvalidCoinCode => "unknown coin",
//!         ScrapeErrorKind::Upstream | ScrapeErrorKind::Transport => "try again later",
//!         ScrapeErrorKind::Export => "check the output path",
//!     }
//! }
//! ```

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
pub mod export;
pub mod http_client;
pub mod normalize;
pub mod pipeline;
pub mod range;
pub mod request;
pub mod resolver;
pub mod source;
pub mod store;

// Adapter implementations
pub use adapters::{source_for, LegacyHtmlAdapter, WebApiAdapter};

// Configuration
pub use config::ProviderConfig;

// Data source trait and types
pub use data_source::{
    CapabilitySet, DataSource, FetchWindow, RawPayload, ScrapeError, ScrapeErrorKind,
};

// Domain models
pub use domain::{
    validate_fiat_code, CalendarDate, CoinCandidate, CoinKey, CoinSymbol, Quote,
    ResolvedIdentity, Series, UtcDateTime, BASE_HEADERS, INTRADAY_HEADERS,
};

// Error types
pub use error::{ExportError, ValidationError};

// Export
pub use export::{ExportFormat, Exporter, Table, TableValue, SHEET_NAME};

// HTTP client types
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};

// Pipeline stages
pub use normalize::{normalize, Cell, Normalized};
pub use pipeline::HistoricalScraper;
pub use range::{DateRange, RangeResolver, EARLIEST_DATE};
pub use request::{ScrapeRequest, ScrapeRequestBuilder, DEFAULT_FIAT};
pub use resolver::{Advisory, IdentifierResolver, Resolution};
pub use store::{SeriesStore, StoreState};

// Source identifiers
pub use source::ProviderId;
