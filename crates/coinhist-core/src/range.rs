use time::{Date, Month};

use crate::{CalendarDate, ValidationError};

/// Earliest day the provider has history for (28-04-2013).
pub const EARLIEST_DATE: CalendarDate = match Date::from_calendar_date(2013, Month::April, 28) {
    Ok(date) => CalendarDate::from_date(date),
    Err(_) => panic!("earliest provider date is a valid calendar date"),
};

/// Inclusive effective date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: CalendarDate,
    pub end: CalendarDate,
}

/// Fills in missing range bounds with provider defaults.
#[derive(Debug, Clone, Copy)]
pub struct RangeResolver {
    earliest: CalendarDate,
    today: CalendarDate,
}

impl Default for RangeResolver {
    fn default() -> Self {
        Self::new(CalendarDate::today())
    }
}

impl RangeResolver {
    /// Resolver evaluating "yesterday" relative to `today`.
    pub fn new(today: CalendarDate) -> Self {
        Self {
            earliest: EARLIEST_DATE,
            today,
        }
    }

    /// Missing start becomes [`EARLIEST_DATE`]; missing end becomes the day before
    /// today, since the current day is still incomplete upstream.
    pub fn resolve(&self, start: Option<CalendarDate>, end: Option<CalendarDate>) -> DateRange {
        DateRange {
            start: start.unwrap_or(self.earliest),
            end: end.unwrap_or_else(|| self.today.previous_day()),
        }
    }

    /// Same as [`resolve`](Self::resolve), validating raw `dd-mm-yyyy` text first.
    pub fn resolve_text(
        &self,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<DateRange, ValidationError> {
        let start = start.map(CalendarDate::parse).transpose()?;
        let end = end.map(CalendarDate::parse).transpose()?;
        Ok(self.resolve(start, end))
    }
}
