use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{CalendarDate, UtcDateTime, ValidationError};

/// Column names of a daily quote row.
pub const BASE_HEADERS: [&str; 7] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Market Cap",
];

/// Extra columns present when the provider supplies intraday timestamps.
pub const INTRADAY_HEADERS: [&str; 4] = ["Time Open", "Time High", "Time Low", "Time Close"];

/// Provider-stable coin identifier used to address the history endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoinKey {
    Id(u64),
    Slug(String),
}

impl Display for CoinKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Slug(slug) => f.write_str(slug),
        }
    }
}

/// One entry of the provider's symbol map. Several coins may share a symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinCandidate {
    pub id: Option<u64>,
    pub name: String,
    pub symbol: String,
    pub slug: String,
}

impl CoinCandidate {
    /// Preferred history key: numeric id when known, slug otherwise.
    pub fn key(&self) -> CoinKey {
        match self.id {
            Some(id) => CoinKey::Id(id),
            None => CoinKey::Slug(self.slug.clone()),
        }
    }
}

/// Identity a request was resolved to. Produced once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedIdentity {
    pub canonical_id: CoinKey,
    pub matched_symbol: String,
    pub matched_name: String,
}

impl ResolvedIdentity {
    pub fn from_candidate(candidate: &CoinCandidate) -> Self {
        Self {
            canonical_id: candidate.key(),
            matched_symbol: candidate.symbol.clone(),
            matched_name: candidate.name.clone(),
        }
    }
}

/// Price and volume observation for one calendar day.
///
/// Numeric fields are `None` when the provider supplied a placeholder instead
/// of a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub date: CalendarDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_open: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_high: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_low: Option<UtcDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_close: Option<UtcDateTime>,
}

impl Quote {
    pub fn daily(
        date: CalendarDate,
        open: Option<f64>,
        high: Option<f64>,
        low: Option<f64>,
        close: Option<f64>,
        volume: Option<f64>,
        market_cap: Option<f64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
            market_cap,
            time_open: None,
            time_high: None,
            time_low: None,
            time_close: None,
        }
    }

    pub fn with_intraday(
        mut self,
        time_open: Option<UtcDateTime>,
        time_high: Option<UtcDateTime>,
        time_low: Option<UtcDateTime>,
        time_close: Option<UtcDateTime>,
    ) -> Self {
        self.time_open = time_open;
        self.time_high = time_high;
        self.time_low = time_low;
        self.time_close = time_close;
        self
    }

    pub fn has_intraday(&self) -> bool {
        self.time_open.is_some()
            || self.time_high.is_some()
            || self.time_low.is_some()
            || self.time_close.is_some()
    }
}

/// Quotes of one resolved request, unique by date and stored oldest first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Series {
    headers: Vec<String>,
    quotes: Vec<Quote>,
}

impl Series {
    /// Build a series from quotes in any order.
    ///
    /// Quotes are sorted oldest first; when a date repeats, the first occurrence
    /// in input order is kept.
    pub fn from_quotes(mut quotes: Vec<Quote>) -> Self {
        quotes.sort_by_key(|quote| quote.date);
        quotes.dedup_by_key(|quote| quote.date);

        let mut headers = BASE_HEADERS.iter().map(|h| (*h).to_owned()).collect::<Vec<_>>();
        if quotes.iter().any(Quote::has_intraday) {
            headers.extend(INTRADAY_HEADERS.iter().map(|h| (*h).to_owned()));
        }

        Self { headers, quotes }
    }

    pub fn empty() -> Self {
        Self::from_quotes(Vec::new())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_intraday_columns(&self) -> bool {
        self.headers.len() > BASE_HEADERS.len()
    }

    /// Quotes in canonical (oldest first) order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn first_date(&self) -> Option<CalendarDate> {
        self.quotes.first().map(|quote| quote.date)
    }

    pub fn last_date(&self) -> Option<CalendarDate> {
        self.quotes.last().map(|quote| quote.date)
    }

    /// Quotes oldest first when `ascending`, newest first otherwise.
    pub fn ordered(&self, ascending: bool) -> Vec<&Quote> {
        if ascending {
            self.quotes.iter().collect()
        } else {
            self.quotes.iter().rev().collect()
        }
    }
}

/// Validate and normalize a fiat code to an uppercase 3-letter code.
pub fn validate_fiat_code(input: &str) -> Result<String, ValidationError> {
    let normalized = input.trim().to_ascii_uppercase();
    let is_valid = normalized.len() == 3 && normalized.chars().all(|ch| ch.is_ascii_alphabetic());

    if !is_valid {
        return Err(ValidationError::InvalidFiat {
            value: input.to_owned(),
        });
    }

    Ok(normalized)
}
