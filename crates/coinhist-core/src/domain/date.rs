use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime, Time};

use crate::ValidationError;

/// Accepts both `1-1-2017` and `01-01-2017`.
const DMY_INPUT: &[BorrowedFormatItem<'_>] =
    format_description!("[day padding:none]-[month padding:none]-[year]");
const DMY_OUTPUT: &[BorrowedFormatItem<'_>] = format_description!("[day]-[month]-[year]");
/// Legacy table dates, e.g. `Aug 24 2017`.
const MON_DAY_YEAR: &[BorrowedFormatItem<'_>] =
    format_description!("[month repr:short] [day padding:none] [year]");
const ISO_DATE: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");
const COMPACT: &[BorrowedFormatItem<'_>] = format_description!("[year][month][day]");

/// Calendar day exchanged between components as `dd-mm-yyyy` text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CalendarDate(Date);

impl CalendarDate {
    /// Parse user input in `dd-mm-yyyy` form.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        Date::parse(input.trim(), DMY_INPUT)
            .map(Self)
            .map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })
    }

    /// Parse any of the textual date conventions seen in provider payloads.
    ///
    /// Tried in order: `Mon DD YYYY` (commas ignored), RFC3339 timestamp,
    /// ISO `yyyy-mm-dd`, then `dd-mm-yyyy`.
    pub fn parse_upstream(input: &str) -> Result<Self, ValidationError> {
        let trimmed = input.trim();
        let without_commas = trimmed.replace(',', "");

        if let Ok(date) = Date::parse(&without_commas, MON_DAY_YEAR) {
            return Ok(Self(date));
        }
        if let Ok(instant) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(Self(instant.date()));
        }
        if let Ok(date) = Date::parse(trimmed, ISO_DATE) {
            return Ok(Self(date));
        }
        Self::parse(trimmed)
    }

    pub const fn from_date(date: Date) -> Self {
        Self(date)
    }

    pub const fn into_inner(self) -> Date {
        self.0
    }

    /// Today's date in local time, falling back to UTC when the offset is unknown.
    pub fn today() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        Self(now.date())
    }

    pub fn previous_day(self) -> Self {
        Self(self.0.saturating_sub(Duration::days(1)))
    }

    /// Unix timestamp of this day's midnight, UTC.
    pub fn midnight_unix_timestamp(self) -> i64 {
        self.0.with_time(Time::MIDNIGHT).assume_utc().unix_timestamp()
    }

    /// `yyyymmdd`, as used in legacy page query strings.
    pub fn format_compact(self) -> String {
        self.0
            .format(COMPACT)
            .unwrap_or_else(|_| self.format_dmy())
    }

    pub fn format_dmy(self) -> String {
        self.0.format(DMY_OUTPUT).unwrap_or_else(|_| {
            format!(
                "{:02}-{:02}-{:04}",
                self.0.day(),
                u8::from(self.0.month()),
                self.0.year()
            )
        })
    }
}

impl Display for CalendarDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format_dmy())
    }
}

impl TryFrom<String> for CalendarDate {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for CalendarDate {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<CalendarDate> for String {
    fn from(value: CalendarDate) -> Self {
        value.format_dmy()
    }
}
