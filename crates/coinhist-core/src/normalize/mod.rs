//! Raw payload → canonical [`Series`].
//!
//! Both payload forms reduce to the same [`Quote`](crate::Quote) shape. Dates
//! are read in any supported upstream convention and re-emitted as
//! `dd-mm-yyyy`; free-text numbers go through [`Cell::coerce`]. The result is
//! always oldest first regardless of provider order.

mod cell;
mod html;
mod json;

pub use cell::{Cell, STRIPPED_CHARS};

use crate::data_source::{RawPayload, ScrapeError};
use crate::{CoinCandidate, Series};

/// Normalized series plus the coin identity the payload itself reports, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub series: Series,
    pub reported_identity: Option<CoinCandidate>,
}

/// Parse `payload` into a canonical series, picking the `fiat` quote block when
/// the payload carries several.
pub fn normalize(payload: &RawPayload, fiat: &str) -> Result<Normalized, ScrapeError> {
    let (quotes, reported_identity) = match payload {
        RawPayload::Json(body) => json::parse_history(body, fiat)?,
        RawPayload::Html(body) => (html::parse_history(body)?, None),
    };

    let received = quotes.len();
    let series = Series::from_quotes(quotes);
    if series.len() < received {
        tracing::warn!(
            received,
            kept = series.len(),
            "payload repeated some dates; kept the first row for each"
        );
    }

    tracing::debug!(
        rows = series.len(),
        first = ?series.first_date().map(|d| d.to_string()),
        last = ?series.last_date().map(|d| d.to_string()),
        "normalized payload"
    );

    Ok(Normalized {
        series,
        reported_identity,
    })
}
