//! End-to-end scraper for one request.
//!
//! Stages run strictly in sequence on the caller's thread:
//!
//! 1. identity resolution (once per scraper)
//! 2. range defaulting
//! 3. one fetch round trip
//! 4. normalization
//! 5. memoization in the [`SeriesStore`]
//!
//! Export and rendering read from the store, so a failed export can be retried
//! without fetching again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::data_source::{DataSource, FetchWindow, ScrapeError};
use crate::export::{self, ExportFormat, Exporter, Table, TableValue};
use crate::normalize::normalize;
use crate::range::RangeResolver;
use crate::resolver::{check_reported_identity, Advisory, IdentifierResolver};
use crate::store::SeriesStore;
use crate::{ResolvedIdentity, ScrapeRequest, Series};

pub struct HistoricalScraper {
    request: ScrapeRequest,
    source: Arc<dyn DataSource>,
    resolver: IdentifierResolver,
    ranges: RangeResolver,
    exporter: Exporter,
    identity: Option<ResolvedIdentity>,
    advisories: Vec<Advisory>,
    store: SeriesStore,
}

impl HistoricalScraper {
    pub fn new(request: ScrapeRequest, source: Arc<dyn DataSource>) -> Self {
        Self {
            request,
            source,
            resolver: IdentifierResolver::new(),
            ranges: RangeResolver::default(),
            exporter: Exporter::new(),
            identity: None,
            advisories: Vec::new(),
            store: SeriesStore::new(),
        }
    }

    /// Replace the range resolver, e.g. to pin "today".
    pub fn with_range_resolver(mut self, ranges: RangeResolver) -> Self {
        self.ranges = ranges;
        self
    }

    pub fn request(&self) -> &ScrapeRequest {
        &self.request
    }

    pub fn source(&self) -> &dyn DataSource {
        self.source.as_ref()
    }

    pub fn identity(&self) -> Option<&ResolvedIdentity> {
        self.identity.as_ref()
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    pub fn set_ascending(&mut self, ascending: bool) {
        self.request.set_ascending(ascending);
    }

    /// Resolve the request identity; later calls reuse the first result.
    pub fn resolve_identity(&mut self) -> Result<&ResolvedIdentity, ScrapeError> {
        if self.identity.is_none() {
            let resolution = self
                .resolver
                .resolve_request(self.source.as_ref(), &self.request)?;
            self.advisories.extend(resolution.advisories);
            self.identity = Some(resolution.identity);
        }

        self.identity
            .as_ref()
            .ok_or_else(|| ScrapeError::upstream("identity resolution produced no result"))
    }

    /// Series for the request, fetched on first use or when `forced`.
    pub fn get_data(&mut self, forced: bool) -> Result<&Series, ScrapeError> {
        let identity = self.resolve_identity()?.clone();
        let source = Arc::clone(&self.source);
        let ranges = self.ranges;
        let advisories = &mut self.advisories;

        self.store.get(&mut self.request, forced, |request| {
            fetch_series(source.as_ref(), &ranges, &identity, request, advisories)
        })
    }

    /// Rows in request order, one value per header.
    pub fn rows(&mut self, forced: bool) -> Result<Vec<Vec<TableValue>>, ScrapeError> {
        let ascending = self.request.ascending();
        let series = self.get_data(forced)?;
        Ok(export::rows(series, ascending))
    }

    /// Header line followed by one line per row, values joined by `", "`.
    pub fn render_verbose(&mut self, forced: bool) -> Result<String, ScrapeError> {
        let ascending = self.request.ascending();
        let series = self.get_data(forced)?;

        let mut lines = Vec::with_capacity(series.len() + 1);
        lines.push(series.headers().join(", "));
        for row in export::rows(series, ascending) {
            lines.push(
                row.iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", "),
            );
        }
        Ok(lines.join("\n"))
    }

    /// Series rendered in memory.
    pub fn render(&mut self, format: ExportFormat, forced: bool) -> Result<String, ScrapeError> {
        let ascending = self.request.ascending();
        let exporter = self.exporter;
        let series = self.get_data(forced)?;
        Ok(exporter.render(series, ascending, format)?)
    }

    /// Write the series to `directory/name.ext`, or to the default file name.
    pub fn export(
        &mut self,
        format: ExportFormat,
        name: Option<&str>,
        directory: Option<&Path>,
        forced: bool,
    ) -> Result<PathBuf, ScrapeError> {
        self.get_data(forced)?;

        let path = Exporter::target_path(directory, name, &self.default_file_stem(), format);
        let series = self
            .store
            .series()
            .ok_or_else(|| ScrapeError::upstream("no series available to export"))?;

        self.exporter
            .export(series, self.request.ascending(), format, &path)
            .map_err(|error| {
                tracing::error!(path = %path.display(), %error, "export failed");
                ScrapeError::from(error)
            })
    }

    pub fn table(&mut self, date_as_index: bool, forced: bool) -> Result<Table, ScrapeError> {
        let ascending = self.request.ascending();
        let exporter = self.exporter;
        let series = self.get_data(forced)?;
        Ok(exporter.table(series, ascending, date_as_index))
    }

    /// `{symbol}_{fiat}_{start}_{end}` from the current request state.
    ///
    /// A request by numeric id is named after the symbol the provider reports
    /// for that id, not the symbol the caller typed.
    pub fn default_file_stem(&self) -> String {
        let resolved_symbol = || {
            self.identity
                .as_ref()
                .map(|identity| identity.matched_symbol.clone())
        };
        let requested_symbol = || {
            self.request
                .symbol()
                .map(|symbol| symbol.as_str().to_owned())
        };

        let symbol = if self.request.numeric_id().is_some() {
            resolved_symbol().or_else(requested_symbol)
        } else {
            requested_symbol().or_else(resolved_symbol)
        }
        .or_else(|| self.request.numeric_id().map(|id| id.to_string()))
        .unwrap_or_else(|| String::from("coin"));

        Exporter::default_file_stem(
            &symbol,
            self.request.fiat(),
            self.request.start_date(),
            self.request.end_date(),
        )
    }
}

fn fetch_series(
    source: &dyn DataSource,
    ranges: &RangeResolver,
    identity: &ResolvedIdentity,
    request: &ScrapeRequest,
    advisories: &mut Vec<Advisory>,
) -> Result<Series, ScrapeError> {
    let (start, end) = request.requested_range();
    let range = ranges.resolve(start, end);
    if range.start > range.end {
        return Err(ScrapeError::invalid_parameters(format!(
            "effective range {} to {} is empty",
            range.start, range.end
        )));
    }

    let window = FetchWindow::new(identity.canonical_id.clone(), range, request.fiat());
    tracing::info!(
        provider = %source.id(),
        window = %window.describe(),
        "fetching price history"
    );

    let payload = source.fetch(&window)?;
    let normalized = normalize(&payload, request.fiat())?;

    if let Some(advisory) = normalized
        .reported_identity
        .as_ref()
        .and_then(|reported| check_reported_identity(identity, reported))
    {
        tracing::warn!(provider = %source.id(), "{advisory}");
        if !advisories.contains(&advisory) {
            advisories.push(advisory);
        }
    }

    Ok(normalized.series)
}
