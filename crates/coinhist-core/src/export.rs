//! Series export.
//!
//! CSV is the reference format: every non-numeric field (header, date,
//! timestamp, missing value) is quoted and numbers are written bare. TSV uses
//! the same layout with tab separators. JSON and YAML emit one object per row
//! keyed by header name. XLSX writes the same table to a single worksheet;
//! dates stay `dd-mm-yyyy` text cells and missing values stay blank.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use csv::{QuoteStyle, WriterBuilder};
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use time::Date;

use crate::{CalendarDate, ExportError, Quote, Series, ValidationError};

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Tsv,
    Json,
    Yaml,
    Xlsx,
}

/// Worksheet holding an XLSX export.
pub const SHEET_NAME: &str = "prices";

impl ExportFormat {
    pub const ALL: [Self; 5] = [Self::Csv, Self::Tsv, Self::Json, Self::Yaml, Self::Xlsx];

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Tsv => "tsv",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Xlsx => "xlsx",
        }
    }

    /// Binary formats can only be written to a file.
    pub const fn is_binary(self) -> bool {
        matches!(self, Self::Xlsx)
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "tsv" => Ok(Self::Tsv),
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "xlsx" | "excel" => Ok(Self::Xlsx),
            _ => Err(ValidationError::UnsupportedFormat {
                value: value.to_owned(),
            }),
        }
    }
}

/// One cell of a tabular row.
#[derive(Debug, Clone, PartialEq)]
pub enum TableValue {
    Date(Date),
    Number(f64),
    Text(String),
    Missing,
}

impl Display for TableValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", CalendarDate::from_date(*date)),
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(text) => f.write_str(text),
            Self::Missing => Ok(()),
        }
    }
}

/// In-memory table, the dataframe-style view of a series.
///
/// With a date index the `Date` column is moved out of `columns`/`rows` into
/// `index`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub index: Option<Vec<Date>>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<TableValue>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|column| column.eq_ignore_ascii_case(name))
    }
}

/// Renders and writes series in any [`ExportFormat`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    /// `{symbol}_{fiat}_{start}_{end}`, dates as `dd-mm-yyyy`.
    pub fn default_file_stem(
        symbol: &str,
        fiat: &str,
        start: Option<CalendarDate>,
        end: Option<CalendarDate>,
    ) -> String {
        let date = |value: Option<CalendarDate>| {
            value.map_or_else(|| String::from("all"), |date| date.to_string())
        };
        format!("{symbol}_{fiat}_{}_{}", date(start), date(end))
    }

    /// Target path: an explicit name wins over `default_stem`, and the format
    /// extension is appended when the name does not already end with it.
    pub fn target_path(
        directory: Option<&Path>,
        name: Option<&str>,
        default_stem: &str,
        format: ExportFormat,
    ) -> PathBuf {
        let base = name
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(default_stem);

        let suffix = format!(".{}", format.extension());
        let file_name = if base.to_ascii_lowercase().ends_with(&suffix) {
            base.to_owned()
        } else {
            format!("{base}{suffix}")
        };

        match directory {
            Some(directory) => directory.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Render `series` to text in `format`.
    pub fn render(
        &self,
        series: &Series,
        ascending: bool,
        format: ExportFormat,
    ) -> Result<String, ExportError> {
        match format {
            ExportFormat::Csv => render_delimited(series, ascending, b','),
            ExportFormat::Tsv => render_delimited(series, ascending, b'\t'),
            ExportFormat::Json => Ok(serde_json::to_string_pretty(&records(series, ascending))?),
            ExportFormat::Yaml => Ok(serde_yaml::to_string(&records(series, ascending))?),
            ExportFormat::Xlsx => Err(ExportError::Binary { format }),
        }
    }

    /// Render `series` to the bytes of a file in `format`.
    pub fn render_bytes(
        &self,
        series: &Series,
        ascending: bool,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ExportError> {
        match format {
            ExportFormat::Xlsx => render_workbook(series, ascending),
            _ => self.render(series, ascending, format).map(String::into_bytes),
        }
    }

    /// Render and write `series` to `path` as a whole file.
    ///
    /// The content goes to a sibling temporary file first and is renamed over
    /// `path`, so a failed write leaves any existing file untouched.
    pub fn export(
        &self,
        series: &Series,
        ascending: bool,
        format: ExportFormat,
        path: &Path,
    ) -> Result<PathBuf, ExportError> {
        let content = self.render_bytes(series, ascending, format)?;
        write_whole_file(path, &content)?;

        tracing::info!(
            path = %path.display(),
            format = %format,
            rows = series.len(),
            "exported series"
        );
        Ok(path.to_path_buf())
    }

    /// Tabular view; `date_as_index` moves dates into the index.
    pub fn table(&self, series: &Series, ascending: bool, date_as_index: bool) -> Table {
        let mut columns = series.headers().to_vec();
        let mut rows = rows(series, ascending);

        if !date_as_index {
            return Table {
                index: None,
                columns,
                rows,
            };
        }

        columns.remove(0);
        let index = series
            .ordered(ascending)
            .into_iter()
            .map(|quote| quote.date.into_inner())
            .collect();
        for row in &mut rows {
            row.remove(0);
        }

        Table {
            index: Some(index),
            columns,
            rows,
        }
    }
}

/// Every row of `series` in the requested order, one value per header.
pub fn rows(series: &Series, ascending: bool) -> Vec<Vec<TableValue>> {
    let intraday = series.has_intraday_columns();
    series
        .ordered(ascending)
        .into_iter()
        .map(|quote| row_values(quote, intraday))
        .collect()
}

fn row_values(quote: &Quote, intraday: bool) -> Vec<TableValue> {
    let number = |value: Option<f64>| value.map_or(TableValue::Missing, TableValue::Number);

    let mut row = vec![
        TableValue::Date(quote.date.into_inner()),
        number(quote.open),
        number(quote.high),
        number(quote.low),
        number(quote.close),
        number(quote.volume),
        number(quote.market_cap),
    ];

    if intraday {
        row.extend(
            [
                quote.time_open,
                quote.time_high,
                quote.time_low,
                quote.time_close,
            ]
            .into_iter()
            .map(|instant| {
                instant.map_or(TableValue::Missing, |instant| {
                    TableValue::Text(instant.format_rfc3339())
                })
            }),
        );
    }
    row
}

fn render_delimited(series: &Series, ascending: bool, delimiter: u8) -> Result<String, ExportError> {
    let mut writer = WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::NonNumeric)
        .from_writer(Vec::new());

    writer.write_record(series.headers())?;
    for row in rows(series, ascending) {
        writer.write_record(row.iter().map(ToString::to_string))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Csv(csv::Error::from(error.into_error())))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render_workbook(series: &Series, ascending: bool) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, header) in (0u16..).zip(series.headers()) {
        sheet.write_string(0, col, header.as_str())?;
    }
    for (row, values) in (1u32..).zip(rows(series, ascending)) {
        for (col, value) in (0u16..).zip(&values) {
            match value {
                TableValue::Number(number) => {
                    sheet.write_number(row, col, *number)?;
                }
                TableValue::Missing => {}
                other => {
                    sheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[derive(Debug, Serialize)]
struct Record {
    #[serde(rename = "Date")]
    date: CalendarDate,
    #[serde(rename = "Open")]
    open: Option<f64>,
    #[serde(rename = "High")]
    high: Option<f64>,
    #[serde(rename = "Low")]
    low: Option<f64>,
    #[serde(rename = "Close")]
    close: Option<f64>,
    #[serde(rename = "Volume")]
    volume: Option<f64>,
    #[serde(rename = "Market Cap")]
    market_cap: Option<f64>,
    #[serde(flatten)]
    intraday: Option<IntradayRecord>,
}

#[derive(Debug, Serialize)]
struct IntradayRecord {
    #[serde(rename = "Time Open")]
    time_open: Option<String>,
    #[serde(rename = "Time High")]
    time_high: Option<String>,
    #[serde(rename = "Time Low")]
    time_low: Option<String>,
    #[serde(rename = "Time Close")]
    time_close: Option<String>,
}

fn records(series: &Series, ascending: bool) -> Vec<Record> {
    let intraday = series.has_intraday_columns();
    series
        .ordered(ascending)
        .into_iter()
        .map(|quote| Record {
            date: quote.date,
            open: quote.open,
            high: quote.high,
            low: quote.low,
            close: quote.close,
            volume: quote.volume,
            market_cap: quote.market_cap,
            intraday: intraday.then(|| IntradayRecord {
                time_open: quote.time_open.map(|t| t.format_rfc3339()),
                time_high: quote.time_high.map(|t| t.format_rfc3339()),
                time_low: quote.time_low.map(|t| t.format_rfc3339()),
                time_close: quote.time_close.map(|t| t.format_rfc3339()),
            }),
        })
        .collect()
}

fn write_whole_file(path: &Path, content: &[u8]) -> Result<(), ExportError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let staging = path.with_file_name(format!(".{file_name}.partial"));

    if let Err(source) = fs::write(&staging, content) {
        let _ = fs::remove_file(&staging);
        return Err(ExportError::io(path, source));
    }
    if let Err(source) = fs::rename(&staging, path) {
        let _ = fs::remove_file(&staging);
        return Err(ExportError::io(path, source));
    }
    Ok(())
}
