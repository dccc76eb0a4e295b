use std::sync::Arc;

use scraper::{Html, Selector};

use super::execute_get;
use crate::data_source::{CapabilitySet, DataSource, FetchWindow, RawPayload, ScrapeError};
use crate::http_client::{HttpClient, NoopHttpClient};
use crate::{CoinCandidate, CoinKey, CoinSymbol, ProviderConfig, ProviderId};

const LISTING_PATH: &str = "/all/views/all/";
const CURRENCY_PREFIX: &str = "/currencies/";

/// Markup scraping adapter for the legacy site generation.
///
/// Symbols resolve to slugs through the all-coins listing page, and history
/// comes from the per-coin historical-data page. There is no id lookup and no
/// trending list on this generation.
#[derive(Clone)]
pub struct LegacyHtmlAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl Default for LegacyHtmlAdapter {
    fn default() -> Self {
        Self::new(&ProviderConfig::default(), Arc::new(NoopHttpClient))
    }
}

impl LegacyHtmlAdapter {
    pub fn new(config: &ProviderConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: config.legacy_base.trim_end_matches('/').to_owned(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(&ProviderConfig::default(), http_client)
    }

    fn get_page(&self, path_and_query: &str, what: &str) -> Result<String, ScrapeError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        let response = execute_get(
            self.http_client.as_ref(),
            ProviderId::Legacy,
            &url,
            self.timeout_ms,
            "text/html",
        )?;

        if !response.is_success() {
            return Err(ScrapeError::upstream(format!(
                "{what} page returned status {}",
                response.status
            )));
        }
        Ok(response.body)
    }
}

impl DataSource for LegacyHtmlAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Legacy
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::new(false, false)
    }

    fn lookup_symbol(&self, symbol: &CoinSymbol) -> Result<Vec<CoinCandidate>, ScrapeError> {
        let page = self.get_page(LISTING_PATH, "coin listing")?;
        let candidates = parse_listing(&page)?
            .into_iter()
            .filter(|candidate| symbol.matches(&candidate.symbol))
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            return Err(ScrapeError::invalid_coin_code(symbol.as_str()));
        }
        Ok(candidates)
    }

    fn lookup_id(&self, _id: u64) -> Result<CoinCandidate, ScrapeError> {
        Err(ScrapeError::unsupported(self.id(), "numeric id lookup"))
    }

    fn fetch(&self, window: &FetchWindow) -> Result<RawPayload, ScrapeError> {
        let CoinKey::Slug(slug) = &window.key else {
            return Err(ScrapeError::unsupported(self.id(), "history by numeric id"));
        };

        // The page takes inclusive calendar days, so no start shift here.
        let path = format!(
            "{CURRENCY_PREFIX}{}/historical-data/?start={}&end={}",
            urlencoding::encode(slug),
            window.range.start.format_compact(),
            window.range.end.format_compact()
        );

        self.get_page(&path, "historical data")
            .map(RawPayload::Html)
            .map_err(|error| {
                error.with_context(format!("error fetching price data for {}", window.describe()))
            })
    }

    fn trending(&self) -> Result<Vec<CoinCandidate>, ScrapeError> {
        Err(ScrapeError::unsupported(self.id(), "trending"))
    }
}

/// Every row of the listing table as a candidate, in page order.
fn parse_listing(body: &str) -> Result<Vec<CoinCandidate>, ScrapeError> {
    let document = Html::parse_document(body);
    let rows = selector("tbody > tr")?;
    let cells = selector("td")?;
    let links = selector("a")?;

    let mut candidates = Vec::new();
    for row in document.select(&rows) {
        let row_cells = row.select(&cells).collect::<Vec<_>>();
        let (Some(name_cell), Some(symbol_cell)) = (row_cells.get(1), row_cells.get(2)) else {
            continue;
        };

        let Some(link) = name_cell.select(&links).find(|link| {
            link.value()
                .attr("href")
                .is_some_and(|href| href.contains(CURRENCY_PREFIX))
        }) else {
            continue;
        };
        let Some(slug) = link.value().attr("href").and_then(slug_from_href) else {
            continue;
        };

        let name = link.text().collect::<String>().trim().to_owned();
        let symbol = symbol_cell.text().collect::<String>().trim().to_owned();
        if symbol.is_empty() {
            continue;
        }

        candidates.push(CoinCandidate {
            id: None,
            name: if name.is_empty() { slug.clone() } else { name },
            symbol,
            slug,
        });
    }

    Ok(candidates)
}

/// `/currencies/bitcoin/` (relative or absolute) to `bitcoin`.
fn slug_from_href(href: &str) -> Option<String> {
    let (_, rest) = href.split_once(CURRENCY_PREFIX)?;
    let slug = rest.split('/').next()?.trim();
    (!slug.is_empty()).then(|| slug.to_owned())
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css)
        .map_err(|error| ScrapeError::upstream(format!("invalid selector '{css}': {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::test_support::RoutedHttpClient;
    use crate::http_client::HttpResponse;
    use crate::range::DateRange;
    use crate::{CalendarDate, ScrapeErrorKind};

    const LISTING: &str = r#"<html><body><table><tbody>
        <tr><td>1</td><td><a class="cmc-link" href="/currencies/bitcoin/">Bitcoin</a></td><td>BTC</td></tr>
        <tr><td>2</td><td><a class="cmc-link" href="/currencies/ethereum/">Ethereum</a></td><td>ETH</td></tr>
        <tr><td>3</td><td><a class="cmc-link" href="https://coinmarketcap.com/currencies/bitcoin-cash/">Bitcoin Cash</a></td><td>BCH</td></tr>
        <tr><td>4</td><td><a class="cmc-link" href="/currencies/bitgem/">BitGem</a></td><td>btc</td></tr>
    </tbody></table></body></html>"#;

    fn adapter(client: RoutedHttpClient) -> (LegacyHtmlAdapter, Arc<RoutedHttpClient>) {
        let client = Arc::new(client);
        (LegacyHtmlAdapter::with_http_client(client.clone()), client)
    }

    #[test]
    fn listing_resolves_symbol_to_slugs() {
        let (adapter, client) =
            adapter(RoutedHttpClient::default().route(LISTING_PATH, HttpResponse::ok(LISTING)));

        let candidates = adapter
            .lookup_symbol(&CoinSymbol::parse("BTC").expect("valid"))
            .expect("lookup");

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].slug, "bitcoin");
        assert_eq!(candidates[0].name, "Bitcoin");
        assert_eq!(candidates[0].key(), CoinKey::Slug(String::from("bitcoin")));
        assert_eq!(candidates[1].slug, "bitgem");
        assert_eq!(client.urls(), vec!["https://coinmarketcap.com/all/views/all/"]);
    }

    #[test]
    fn unknown_symbol_is_an_invalid_coin_code() {
        let (adapter, _) =
            adapter(RoutedHttpClient::default().route(LISTING_PATH, HttpResponse::ok(LISTING)));

        let error = adapter
            .lookup_symbol(&CoinSymbol::parse("ZZZ").expect("valid"))
            .expect_err("must fail");
        assert_eq!(error.kind(), ScrapeErrorKind::InvalidCoinCode);
    }

    #[test]
    fn history_page_uses_compact_inclusive_dates() {
        let (adapter, client) = adapter(
            RoutedHttpClient::default()
                .route("/historical-data/", HttpResponse::ok("<table></table>")),
        );
        let window = FetchWindow::new(
            CoinKey::Slug(String::from("bitcoin")),
            DateRange {
                start: CalendarDate::parse("15-10-2017").expect("valid"),
                end: CalendarDate::parse("25-10-2017").expect("valid"),
            },
            "USD",
        );

        let payload = adapter.fetch(&window).expect("fetch");
        assert!(matches!(payload, RawPayload::Html(_)));
        assert_eq!(
            client.urls(),
            vec!["https://coinmarketcap.com/currencies/bitcoin/historical-data/?start=20171015&end=20171025"]
        );
    }

    #[test]
    fn failed_history_page_names_the_window() {
        let (adapter, _) = adapter(
            RoutedHttpClient::default()
                .route("/historical-data/", HttpResponse::with_status(503, "busy")),
        );
        let window = FetchWindow::new(
            CoinKey::Slug(String::from("bitcoin")),
            DateRange {
                start: CalendarDate::parse("15-10-2017").expect("valid"),
                end: CalendarDate::parse("25-10-2017").expect("valid"),
            },
            "USD",
        );

        let error = adapter.fetch(&window).expect_err("must fail");
        assert_eq!(error.kind(), ScrapeErrorKind::Upstream);
        assert!(error.message().contains("'bitcoin' between 15-10-2017 and 25-10-2017"));
    }

    #[test]
    fn id_lookup_and_trending_are_unsupported() {
        let adapter = LegacyHtmlAdapter::default();
        assert!(!adapter.capabilities().id_lookup);
        assert_eq!(
            adapter.lookup_id(1).expect_err("unsupported").kind(),
            ScrapeErrorKind::InvalidParameters
        );
        assert_eq!(
            adapter.trending().expect_err("unsupported").kind(),
            ScrapeErrorKind::InvalidParameters
        );
    }

    #[test]
    fn slug_is_taken_from_relative_and_absolute_links() {
        assert_eq!(slug_from_href("/currencies/bitcoin/").as_deref(), Some("bitcoin"));
        assert_eq!(
            slug_from_href("https://coinmarketcap.com/currencies/bitcoin-cash/").as_deref(),
            Some("bitcoin-cash")
        );
        assert_eq!(slug_from_href("/exchanges/binance/"), None);
    }
}
