use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use super::Cell;
use crate::data_source::ScrapeError;
use crate::{CalendarDate, CoinCandidate, Quote, UtcDateTime};

/// Reads a history document into quotes (payload order) plus the identity it reports.
pub(super) fn parse_history(
    body: &str,
    fiat: &str,
) -> Result<(Vec<Quote>, Option<CoinCandidate>), ScrapeError> {
    if body.trim().is_empty() {
        return Ok((Vec::new(), None));
    }

    let document: HistoryDocument = serde_json::from_str(body)
        .map_err(|e| ScrapeError::upstream(format!("failed to parse history payload: {e}")))?;

    let Some(data) = document.data else {
        return Ok((Vec::new(), None));
    };

    let reported = data.reported_identity();
    let quotes = data
        .quotes
        .into_iter()
        .map(|record| record.into_quote(fiat))
        .collect::<Result<Vec<_>, _>>()?;

    Ok((quotes, reported))
}

#[derive(Debug, Deserialize)]
struct HistoryDocument {
    #[serde(default)]
    data: Option<HistoryData>,
}

#[derive(Debug, Deserialize)]
struct HistoryData {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symbol: Option<String>,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    quotes: Vec<QuoteRecord>,
}

impl HistoryData {
    fn reported_identity(&self) -> Option<CoinCandidate> {
        let name = self.name.clone()?;
        let symbol = self.symbol.clone()?;
        Some(CoinCandidate {
            id: self.id,
            slug: self.slug.clone().unwrap_or_default(),
            name,
            symbol,
        })
    }
}

#[derive(Debug, Deserialize)]
struct QuoteRecord {
    #[serde(default, alias = "timeOpen")]
    time_open: Option<String>,
    #[serde(default, alias = "timeHigh")]
    time_high: Option<String>,
    #[serde(default, alias = "timeLow")]
    time_low: Option<String>,
    #[serde(default, alias = "timeClose")]
    time_close: Option<String>,
    quote: QuoteBlock,
}

/// Older generations nest the values under the fiat code; newer ones inline them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuoteBlock {
    Inline(QuoteValues),
    ByFiat(BTreeMap<String, QuoteValues>),
}

#[derive(Debug, Deserialize)]
struct QuoteValues {
    timestamp: String,
    #[serde(default)]
    open: Value,
    #[serde(default)]
    high: Value,
    #[serde(default)]
    low: Value,
    #[serde(default)]
    close: Value,
    #[serde(default)]
    volume: Value,
    #[serde(default, alias = "marketCap")]
    market_cap: Value,
}

impl QuoteRecord {
    fn into_quote(self, fiat: &str) -> Result<Quote, ScrapeError> {
        let values = match self.quote {
            QuoteBlock::Inline(values) => values,
            QuoteBlock::ByFiat(mut by_fiat) => {
                let key = by_fiat
                    .keys()
                    .find(|key| key.eq_ignore_ascii_case(fiat))
                    .cloned()
                    .ok_or_else(|| {
                        ScrapeError::upstream(format!(
                            "payload has no {} quotes (available: {})",
                            fiat.to_ascii_uppercase(),
                            by_fiat.keys().cloned().collect::<Vec<_>>().join(", ")
                        ))
                    })?;
                by_fiat
                    .remove(&key)
                    .ok_or_else(|| ScrapeError::upstream("quote record has no fiat block"))?
            }
        };

        let date = CalendarDate::parse_upstream(&values.timestamp).map_err(|_| {
            ScrapeError::upstream(format!(
                "unrecognized quote timestamp '{}'",
                values.timestamp
            ))
        })?;

        Ok(Quote::daily(
            date,
            number(&values.open),
            number(&values.high),
            number(&values.low),
            number(&values.close),
            number(&values.volume),
            number(&values.market_cap),
        )
        .with_intraday(
            instant(self.time_open.as_deref()),
            instant(self.time_high.as_deref()),
            instant(self.time_low.as_deref()),
            instant(self.time_close.as_deref()),
        ))
    }
}

/// JSON numbers pass through; strings go through cell coercion; anything else is missing.
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|v| v.is_finite()),
        Value::String(text) => Cell::coerce(text).as_f64(),
        _ => None,
    }
}

fn instant(value: Option<&str>) -> Option<UtcDateTime> {
    let text = value?;
    match UtcDateTime::parse(text) {
        Ok(instant) => Some(instant),
        Err(error) => {
            tracing::warn!(%error, "dropping unparseable intraday timestamp");
            None
        }
    }
}
