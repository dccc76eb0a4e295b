use crate::data_source::ScrapeError;
use crate::{ScrapeRequest, Series};

/// Lifecycle of a [`SeriesStore`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum StoreState {
    #[default]
    Empty,
    Populated(Series),
}

/// Holds the series of one resolved request.
///
/// Populated by the first successful fetch and returned unchanged afterwards
/// unless a refresh is forced. A failed fetch leaves the previous contents in
/// place.
#[derive(Debug, Clone, Default)]
pub struct SeriesStore {
    state: StoreState,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn is_populated(&self) -> bool {
        matches!(self.state, StoreState::Populated(_))
    }

    pub fn series(&self) -> Option<&Series> {
        match &self.state {
            StoreState::Empty => None,
            StoreState::Populated(series) => Some(series),
        }
    }

    /// Return the memoized series, or run `fetch` when empty or `forced`.
    ///
    /// On success the store is replaced as a whole and, if the new series has
    /// rows, the request range is overwritten with the dates actually present.
    pub fn get<F>(
        &mut self,
        request: &mut ScrapeRequest,
        forced: bool,
        fetch: F,
    ) -> Result<&Series, ScrapeError>
    where
        F: FnOnce(&ScrapeRequest) -> Result<Series, ScrapeError>,
    {
        if forced || !self.is_populated() {
            let series = fetch(request)?;
            if let (Some(first), Some(last)) = (series.first_date(), series.last_date()) {
                request.record_observed_range(first, last);
            }
            self.state = StoreState::Populated(series);
        }

        match &self.state {
            StoreState::Populated(series) => Ok(series),
            StoreState::Empty => Err(ScrapeError::upstream("series store was not populated")),
        }
    }

    pub fn invalidate(&mut self) {
        self.state = StoreState::Empty;
    }
}
