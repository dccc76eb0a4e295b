//! Request construction and validation.
//!
//! All checks here run before any network access. A request names exactly one
//! authoritative identity channel: the numeric id when present, the symbol
//! (optionally narrowed by a coin name) otherwise.

use crate::{validate_fiat_code, CalendarDate, CoinSymbol, ValidationError};

pub const DEFAULT_FIAT: &str = "USD";

/// Validated historical price request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeRequest {
    symbol: Option<CoinSymbol>,
    disambiguating_name: Option<String>,
    numeric_id: Option<u64>,
    start_date: Option<CalendarDate>,
    end_date: Option<CalendarDate>,
    all_time: bool,
    fiat: String,
    ascending: bool,
}

impl ScrapeRequest {
    pub fn builder() -> ScrapeRequestBuilder {
        ScrapeRequestBuilder::default()
    }

    /// Symbol-only request over the whole available history.
    pub fn for_symbol(symbol: &str) -> Result<Self, ValidationError> {
        Self::builder().symbol(symbol).build()
    }

    pub fn symbol(&self) -> Option<&CoinSymbol> {
        self.symbol.as_ref()
    }

    pub fn disambiguating_name(&self) -> Option<&str> {
        self.disambiguating_name.as_deref()
    }

    pub fn numeric_id(&self) -> Option<u64> {
        self.numeric_id
    }

    pub fn start_date(&self) -> Option<CalendarDate> {
        self.start_date
    }

    pub fn end_date(&self) -> Option<CalendarDate> {
        self.end_date
    }

    pub fn all_time(&self) -> bool {
        self.all_time
    }

    pub fn fiat(&self) -> &str {
        &self.fiat
    }

    pub fn ascending(&self) -> bool {
        self.ascending
    }

    pub fn set_ascending(&mut self, ascending: bool) {
        self.ascending = ascending;
    }

    /// Dates handed to range resolution; `all_time` discards explicit dates.
    pub fn requested_range(&self) -> (Option<CalendarDate>, Option<CalendarDate>) {
        if self.all_time {
            (None, None)
        } else {
            (self.start_date, self.end_date)
        }
    }

    /// Overwrite the request range with the dates actually present in a fetched series.
    pub(crate) fn record_observed_range(&mut self, start: CalendarDate, end: CalendarDate) {
        self.start_date = Some(start);
        self.end_date = Some(end);
    }
}

/// Builder collecting raw user input for [`ScrapeRequest`].
#[derive(Debug, Clone, Default)]
pub struct ScrapeRequestBuilder {
    symbol: Option<String>,
    disambiguating_name: Option<String>,
    numeric_id: Option<u64>,
    start_date: Option<String>,
    end_date: Option<String>,
    all_time: bool,
    fiat: Option<String>,
    ascending: bool,
}

impl ScrapeRequestBuilder {
    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn disambiguating_name(mut self, name: impl Into<String>) -> Self {
        self.disambiguating_name = Some(name.into());
        self
    }

    pub fn numeric_id(mut self, id: u64) -> Self {
        self.numeric_id = Some(id);
        self
    }

    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = Some(date.into());
        self
    }

    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = Some(date.into());
        self
    }

    pub fn all_time(mut self, all_time: bool) -> Self {
        self.all_time = all_time;
        self
    }

    pub fn fiat(mut self, fiat: impl Into<String>) -> Self {
        self.fiat = Some(fiat.into());
        self
    }

    pub fn ascending(mut self, ascending: bool) -> Self {
        self.ascending = ascending;
        self
    }

    pub fn build(self) -> Result<ScrapeRequest, ValidationError> {
        let symbol = self
            .symbol
            .as_deref()
            .filter(|value| !value.trim().is_empty())
            .map(CoinSymbol::parse)
            .transpose()?;

        if self.numeric_id == Some(0) {
            return Err(ValidationError::InvalidNumericId);
        }
        if symbol.is_none() && self.numeric_id.is_none() {
            return Err(ValidationError::MissingIdentity);
        }

        let disambiguating_name = self
            .disambiguating_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());

        let start_date = self
            .start_date
            .as_deref()
            .map(CalendarDate::parse)
            .transpose()?;
        let end_date = self.end_date.as_deref().map(CalendarDate::parse).transpose()?;

        let mut all_time = self.all_time;
        if start_date.is_none() && end_date.is_none() {
            all_time = true;
        }
        if !all_time && (start_date.is_none() || end_date.is_none()) {
            return Err(ValidationError::MissingDate);
        }

        if let (false, Some(start), Some(end)) = (all_time, start_date, end_date) {
            if start > end {
                return Err(ValidationError::InvertedRange {
                    start: start.to_string(),
                    end: end.to_string(),
                });
            }
        }

        let fiat = validate_fiat_code(self.fiat.as_deref().unwrap_or(DEFAULT_FIAT))?;

        Ok(ScrapeRequest {
            symbol,
            disambiguating_name,
            numeric_id: self.numeric_id,
            start_date,
            end_date,
            all_time,
            fiat,
            ascending: self.ascending,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_dates_unset_enables_all_time() {
        let request = ScrapeRequest::for_symbol("btc").expect("valid");
        assert!(request.all_time());
        assert_eq!(request.fiat(), "USD");
        assert_eq!(request.requested_range(), (None, None));
    }

    #[test]
    fn exactly_one_date_is_rejected() {
        let only_start = ScrapeRequest::builder()
            .symbol("btc")
            .start_date("15-10-2017")
            .build();
        let only_end = ScrapeRequest::builder()
            .symbol("btc")
            .end_date("25-10-2017")
            .build();

        assert_eq!(only_start, Err(ValidationError::MissingDate));
        assert_eq!(only_end, Err(ValidationError::MissingDate));
    }

    #[test]
    fn explicit_all_time_ignores_partial_dates() {
        let request = ScrapeRequest::builder()
            .symbol("btc")
            .start_date("15-10-2017")
            .all_time(true)
            .build()
            .expect("all_time makes a single date acceptable");
        assert_eq!(request.requested_range(), (None, None));
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = ScrapeRequest::builder()
            .symbol("btc")
            .start_date("25-10-2017")
            .end_date("15-10-2017")
            .build()
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvertedRange { .. }));
    }

    #[test]
    fn malformed_date_is_rejected() {
        let err = ScrapeRequest::builder()
            .symbol("btc")
            .start_date("2017-10-15")
            .end_date("25-10-2017")
            .build()
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn numeric_id_alone_is_enough() {
        let request = ScrapeRequest::builder()
            .numeric_id(5426)
            .fiat("eur")
            .build()
            .expect("valid");
        assert_eq!(request.numeric_id(), Some(5426));
        assert_eq!(request.symbol(), None);
        assert_eq!(request.fiat(), "EUR");
    }

    #[test]
    fn identity_is_required() {
        let err = ScrapeRequest::builder().build().expect_err("must fail");
        assert_eq!(err, ValidationError::MissingIdentity);
    }
}
