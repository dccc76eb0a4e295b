//! # Domain Models
//!
//! Canonical types shared by every pipeline stage.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CalendarDate`] | Day exchanged as `dd-mm-yyyy` text |
//! | [`UtcDateTime`] | RFC3339 UTC instant (intraday timestamps) |
//! | [`CoinSymbol`] | Normalized ticker symbol |
//! | [`CoinKey`] | Provider-stable id or slug |
//! | [`CoinCandidate`] | Symbol map entry |
//! | [`ResolvedIdentity`] | Identity a request resolved to |
//! | [`Quote`] | One day of OHLCV and market cap |
//! | [`Series`] | Ordered, date-unique quotes |

mod date;
mod models;
mod symbol;
mod timestamp;

pub use date::CalendarDate;
pub use models::{
    validate_fiat_code, CoinCandidate, CoinKey, Quote, ResolvedIdentity, Series, BASE_HEADERS,
    INTRADAY_HEADERS,
};
pub use symbol::CoinSymbol;
pub use timestamp::UtcDateTime;
