//! Contract tests every provider adapter must satisfy.
//!
//! Each case serves the same coins and price window in the provider's own
//! payload form; after normalization the results must agree.

#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;

use coinhist_core::{
    normalize, CalendarDate, CoinSymbol, DataSource, DateRange, FetchWindow, ProviderId,
    ScrapeErrorKind, BASE_HEADERS,
};

use support::{
    close_on, history_body, history_page, invalid_symbol_body, legacy, listing_page, map_body, web_api,
    FakeHttpClient, HISTORICAL_PAGE, HISTORY_PATH, LISTING_PATH, MAP_PATH, TRENDING_PATH,
};

struct ProviderCase {
    id: ProviderId,
    source: Arc<dyn DataSource>,
    supports_id_lookup: bool,
    supports_trending: bool,
}

fn provider_cases() -> Vec<ProviderCase> {
    let coins = [
        (1, "Bitcoin", "BTC", "bitcoin"),
        (9022, "Bitcoin Plus", "BTC", "bitcoin-plus"),
    ];
    let client = Arc::new(
        FakeHttpClient::new()
            .route(MAP_PATH, map_body(&coins))
            .route(TRENDING_PATH, map_body(&coins[..1]))
            .route(HISTORY_PATH, history_body(1, "Bitcoin", "BTC", 15, 25))
            .route(
                LISTING_PATH,
                listing_page(&[
                    ("Bitcoin", "BTC", "bitcoin"),
                    ("Ethereum", "ETH", "ethereum"),
                    ("Bitcoin Plus", "BTC", "bitcoin-plus"),
                ]),
            )
            .route(HISTORICAL_PAGE, history_page(15, 25)),
    );

    vec![
        ProviderCase {
            id: ProviderId::WebApi,
            source: web_api(&client),
            supports_id_lookup: true,
            supports_trending: true,
        },
        ProviderCase {
            id: ProviderId::Legacy,
            source: legacy(&client),
            supports_id_lookup: false,
            supports_trending: false,
        },
    ]
}

fn window_range() -> DateRange {
    DateRange {
        start: CalendarDate::parse("15-10-2017").expect("valid date"),
        end: CalendarDate::parse("25-10-2017").expect("valid date"),
    }
}

#[test]
fn symbol_lookup_returns_every_coin_sharing_the_symbol() {
    let symbol = CoinSymbol::parse("btc").expect("valid symbol");

    for case in provider_cases() {
        assert_eq!(case.source.id(), case.id);
        let candidates = case.source.lookup_symbol(&symbol).unwrap_or_else(|error| {
            panic!("provider '{}' lookup failed: {error}", case.id)
        });

        let slugs = candidates
            .iter()
            .map(|candidate| candidate.slug.as_str())
            .collect::<Vec<_>>();
        assert_eq!(
            slugs,
            ["bitcoin", "bitcoin-plus"],
            "provider '{}': candidates in provider order",
            case.id
        );
        assert!(
            candidates.iter().all(|candidate| candidate.symbol == "BTC"),
            "provider '{}': symbols",
            case.id
        );
    }
}

#[test]
fn fetched_window_normalizes_to_the_same_series() {
    let symbol = CoinSymbol::parse("BTC").expect("valid symbol");

    for case in provider_cases() {
        let candidates = case.source.lookup_symbol(&symbol).expect("lookup");
        let window = FetchWindow::new(candidates[0].key(), window_range(), "USD");

        let payload = case.source.fetch(&window).unwrap_or_else(|error| {
            panic!("provider '{}' fetch failed: {error}", case.id)
        });
        let series = normalize(&payload, "USD")
            .unwrap_or_else(|error| panic!("provider '{}' normalize failed: {error}", case.id))
            .series;

        assert_eq!(series.len(), 11, "provider '{}': row count", case.id);
        assert_eq!(
            series.first_date().map(|date| date.to_string()).as_deref(),
            Some("15-10-2017"),
            "provider '{}': oldest first",
            case.id
        );
        assert_eq!(
            series.quotes()[10].close,
            Some(close_on(25)),
            "provider '{}': close",
            case.id
        );
        assert_eq!(series.headers()[..7], BASE_HEADERS, "provider '{}'", case.id);
    }
}

#[test]
fn capabilities_gate_optional_operations() {
    for case in provider_cases() {
        let capabilities = case.source.capabilities();
        assert_eq!(capabilities.id_lookup, case.supports_id_lookup, "{}", case.id);
        assert_eq!(capabilities.trending, case.supports_trending, "{}", case.id);

        if !case.supports_id_lookup {
            let error = case.source.lookup_id(1).expect_err("id lookup unsupported");
            assert_eq!(error.kind(), ScrapeErrorKind::InvalidParameters, "{}", case.id);
        }

        match case.source.trending() {
            Ok(coins) => {
                assert!(case.supports_trending, "{}", case.id);
                assert_eq!(coins.len(), 1);
                assert_eq!(coins[0].name, "Bitcoin");
            }
            Err(error) => {
                assert!(!case.supports_trending, "{}", case.id);
                assert_eq!(error.kind(), ScrapeErrorKind::InvalidParameters, "{}", case.id);
            }
        }
    }
}

#[test]
fn unknown_symbol_is_an_invalid_coin_code() {
    let symbol = CoinSymbol::parse("ZZZ").expect("valid symbol");
    let client = Arc::new(
        FakeHttpClient::new()
            .route(MAP_PATH, invalid_symbol_body("ZZZ"))
            .route(LISTING_PATH, listing_page(&[("Bitcoin", "BTC", "bitcoin")])),
    );

    for source in [web_api(&client), legacy(&client)] {
        let error = source.lookup_symbol(&symbol).expect_err("unknown symbol");
        assert_eq!(error.kind(), ScrapeErrorKind::InvalidCoinCode, "{}", source.id());
        assert!(error.message().contains("ZZZ"), "{}", source.id());
    }
    assert_eq!(client.count(HISTORY_PATH), 0);
}
