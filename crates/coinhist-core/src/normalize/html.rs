use scraper::{ElementRef, Html, Selector};

use super::Cell;
use crate::data_source::ScrapeError;
use crate::{CalendarDate, Quote, BASE_HEADERS};

const HISTORY_TABLE: &str = ".cmc-tab-historical-data table";
const ANY_TABLE: &str = "table";

/// Column positions of the canonical fields inside a scraped table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: Option<usize>,
    volume: Option<usize>,
    market_cap: Option<usize>,
}

impl ColumnMap {
    /// Positional layout used when the table has no header row.
    const POSITIONAL: Self = Self {
        date: 0,
        open: Some(1),
        high: Some(2),
        low: Some(3),
        close: Some(4),
        volume: Some(5),
        market_cap: Some(6),
    };

    fn from_headers(headers: &[String]) -> Result<Self, ScrapeError> {
        if headers.is_empty() {
            return Ok(Self::POSITIONAL);
        }

        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header.eq_ignore_ascii_case(name))
        };

        let date = find(BASE_HEADERS[0]).ok_or_else(|| {
            ScrapeError::upstream(format!(
                "historical table has no Date column (headers: {})",
                headers.join(", ")
            ))
        })?;

        Ok(Self {
            date,
            open: find(BASE_HEADERS[1]),
            high: find(BASE_HEADERS[2]),
            low: find(BASE_HEADERS[3]),
            close: find(BASE_HEADERS[4]),
            volume: find(BASE_HEADERS[5]),
            market_cap: find(BASE_HEADERS[6]),
        })
    }
}

/// Reads the historical-data table of a legacy page into quotes (page order).
pub(super) fn parse_history(body: &str) -> Result<Vec<Quote>, ScrapeError> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document = Html::parse_document(body);
    let table = match document.select(&selector(HISTORY_TABLE)?).next() {
        Some(table) => table,
        None => match document.select(&selector(ANY_TABLE)?).next() {
            Some(table) => table,
            None => return Ok(Vec::new()),
        },
    };

    let headers = table_headers(table)?;
    let columns = ColumnMap::from_headers(&headers)?;

    let row_selector = selector("tbody > tr")?;
    let cell_selector = selector("td")?;

    let mut quotes = Vec::new();
    for row in table.select(&row_selector) {
        let cells = row
            .select(&cell_selector)
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect::<Vec<_>>();

        if cells.iter().all(String::is_empty) {
            continue;
        }

        quotes.push(row_to_quote(&cells, columns)?);
    }

    Ok(quotes)
}

/// Header texts of the table, with footnote asterisks stripped.
fn table_headers(table: ElementRef<'_>) -> Result<Vec<String>, ScrapeError> {
    let header_selector = selector("thead > tr > th")?;
    Ok(table
        .select(&header_selector)
        .map(|th| {
            th.text()
                .collect::<String>()
                .trim()
                .trim_matches('*')
                .trim()
                .to_owned()
        })
        .collect())
}

fn row_to_quote(cells: &[String], columns: ColumnMap) -> Result<Quote, ScrapeError> {
    let date_text = cells
        .get(columns.date)
        .ok_or_else(|| ScrapeError::upstream("historical table row has no date cell"))?;
    let date = CalendarDate::parse_upstream(date_text).map_err(|_| {
        ScrapeError::upstream(format!("unrecognized date '{date_text}' in historical table"))
    })?;

    let number = |index: Option<usize>| -> Option<f64> {
        let raw = cells.get(index?)?;
        let cell = Cell::coerce(raw);
        if !cell.is_numeric() {
            tracing::debug!(%date, raw = %raw, "placeholder cell treated as missing");
        }
        cell.as_f64()
    };

    Ok(Quote::daily(
        date,
        number(columns.open),
        number(columns.high),
        number(columns.low),
        number(columns.close),
        number(columns.volume),
        number(columns.market_cap),
    ))
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css)
        .map_err(|error| ScrapeError::upstream(format!("invalid selector '{css}': {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
        <div class="cmc-tab-historical-data">
          <table>
            <thead><tr>
              <th>Date</th><th>Open*</th><th>High</th><th>Low</th><th>Close**</th>
              <th>Volume</th><th>Market Cap</th>
            </tr></thead>
            <tbody>
              <tr><td>Aug 25 2017</td><td>4,332.82</td><td>4,455.70</td><td>4,307.35</td>
                  <td>4,371.98</td><td>1,727,970,000</td><td>71,595,200,000</td></tr>
              <tr><td>Aug 24 2017</td><td>4,137.60</td><td>4,376.39</td><td>4,130.26</td>
                  <td>4,334.68</td><td>-</td><td>68,370,600,000</td></tr>
            </tbody>
          </table>
        </div>
        </body></html>
    "#;

    #[test]
    fn scrapes_rows_with_placeholders() {
        let quotes = parse_history(PAGE).expect("must parse");
        assert_eq!(quotes.len(), 2);

        assert_eq!(quotes[0].date.to_string(), "25-08-2017");
        assert_eq!(quotes[0].open, Some(4332.82));
        assert_eq!(quotes[0].volume, Some(1_727_970_000.0));

        assert_eq!(quotes[1].date.to_string(), "24-08-2017");
        assert_eq!(quotes[1].volume, None);
        assert_eq!(quotes[1].market_cap, Some(68_370_600_000.0));
    }

    #[test]
    fn maps_columns_by_header_name() {
        let page = r#"<table>
            <thead><tr><th>Close**</th><th>Date</th><th>Open*</th></tr></thead>
            <tbody><tr><td>2.5</td><td>Jan 02 2018</td><td>2.0</td></tr></tbody>
        </table>"#;

        let quotes = parse_history(page).expect("must parse");
        assert_eq!(quotes[0].date.to_string(), "02-01-2018");
        assert_eq!(quotes[0].open, Some(2.0));
        assert_eq!(quotes[0].close, Some(2.5));
        assert_eq!(quotes[0].high, None);
    }

    #[test]
    fn table_without_date_column_is_rejected() {
        let page = r#"<table><thead><tr><th>Open</th></tr></thead>
            <tbody><tr><td>1</td></tr></tbody></table>"#;
        let error = parse_history(page).expect_err("must fail");
        assert!(error.message().contains("Date"));
    }

    #[test]
    fn page_without_table_yields_no_rows() {
        let quotes = parse_history("<html><body><p>nothing</p></body></html>").expect("ok");
        assert!(quotes.is_empty());
    }
}
