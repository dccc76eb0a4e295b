//! Shared fixtures for behaviour tests: an in-memory HTTP client routed by URL
//! fragment, and provider payload builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use coinhist_core::{
    CalendarDate, DataSource, HttpClient, HttpError, HttpRequest, HttpResponse, LegacyHtmlAdapter,
    RangeResolver, WebApiAdapter,
};
use serde_json::json;

/// Routes requests by URL substring and records every request it sees.
/// The first matching route answers; one-shot routes are dropped after use.
/// Unrouted URLs answer 404 with an empty body.
#[derive(Debug, Default)]
pub struct FakeHttpClient {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<HttpRequest>>,
}

#[derive(Debug, Clone)]
struct Route {
    fragment: String,
    response: Result<HttpResponse, HttpError>,
    once: bool,
}

impl FakeHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, fragment: &str, body: impl Into<String>) -> Self {
        self.push(fragment, Ok(HttpResponse::ok(body)), false)
    }

    pub fn route_once(self, fragment: &str, body: impl Into<String>) -> Self {
        self.push(fragment, Ok(HttpResponse::ok(body)), true)
    }

    pub fn route_status(self, fragment: &str, status: u16, body: impl Into<String>) -> Self {
        self.push(fragment, Ok(HttpResponse::with_status(status, body)), false)
    }

    pub fn fail(self, fragment: &str, message: &str) -> Self {
        self.push(fragment, Err(HttpError::new(message)), false)
    }

    fn push(
        mut self,
        fragment: &str,
        response: Result<HttpResponse, HttpError>,
        once: bool,
    ) -> Self {
        self.routes.get_mut().expect("route table lock").push(Route {
            fragment: fragment.to_owned(),
            response,
            once,
        });
        self
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .expect("request log lock")
            .iter()
            .map(|request| request.url.clone())
            .collect()
    }

    pub fn count(&self, fragment: &str) -> usize {
        self.urls()
            .iter()
            .filter(|url| url.contains(fragment))
            .count()
    }
}

impl HttpClient for FakeHttpClient {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        let url = request.url.clone();
        self.requests
            .lock()
            .expect("request log lock")
            .push(request);

        let mut routes = self.routes.lock().expect("route table lock");
        let Some(position) = routes
            .iter()
            .position(|route| url.contains(route.fragment.as_str()))
        else {
            return Ok(HttpResponse::with_status(404, ""));
        };

        if routes[position].once {
            routes.remove(position).response
        } else {
            routes[position].response.clone()
        }
    }
}

pub const MAP_PATH: &str = "/v1/cryptocurrency/map?";
pub const INFO_PATH: &str = "/v1/cryptocurrency/info?";
pub const HISTORY_PATH: &str = "/v1/cryptocurrency/ohlcv/historical?";
pub const TRENDING_PATH: &str = "/v1/cryptocurrency/trending/latest";
pub const LISTING_PATH: &str = "/all/views/all/";
pub const HISTORICAL_PAGE: &str = "/historical-data/";

/// Fixed "today" so default ranges are reproducible.
pub fn today() -> CalendarDate {
    CalendarDate::parse("19-10-2026").expect("valid date")
}

pub fn ranges() -> RangeResolver {
    RangeResolver::new(today())
}

pub fn web_api(client: &Arc<FakeHttpClient>) -> Arc<dyn DataSource> {
    Arc::new(WebApiAdapter::with_http_client(client.clone()))
}

pub fn legacy(client: &Arc<FakeHttpClient>) -> Arc<dyn DataSource> {
    Arc::new(LegacyHtmlAdapter::with_http_client(client.clone()))
}

/// Symbol map body listing `(id, name, symbol, slug)` entries in order.
pub fn map_body(entries: &[(u64, &str, &str, &str)]) -> String {
    let data = entries
        .iter()
        .map(|(id, name, symbol, slug)| {
            json!({"id": id, "name": name, "symbol": symbol, "slug": slug, "is_active": 1})
        })
        .collect::<Vec<_>>();
    json!({"status": {"error_code": 0, "error_message": null}, "data": data}).to_string()
}

pub fn invalid_symbol_body(symbol: &str) -> String {
    json!({
        "status": {
            "error_code": 400,
            "error_message": format!("Invalid value for \"symbol\": \"{symbol}\"")
        }
    })
    .to_string()
}

pub fn info_body(id: u64, name: &str, symbol: &str, slug: &str) -> String {
    json!({
        "status": {"error_code": 0, "error_message": null},
        "data": {id.to_string(): {"id": id, "name": name, "symbol": symbol, "slug": slug}}
    })
    .to_string()
}

/// Close price used for October 2017 fixture day `day`.
pub fn close_on(day: u32) -> f64 {
    5000.0 + f64::from(day) * 10.5
}

/// Daily history for October 2017 days `first..=last`, newest first as the
/// provider sends it, quotes keyed by USD.
pub fn history_body(id: u64, name: &str, symbol: &str, first: u32, last: u32) -> String {
    let quotes = (first..=last)
        .rev()
        .map(|day| {
            json!({
                "time_open": format!("2017-10-{day:02}T00:00:00.000Z"),
                "time_close": format!("2017-10-{day:02}T23:59:59.999Z"),
                "time_high": format!("2017-10-{day:02}T12:00:00.000Z"),
                "time_low": format!("2017-10-{day:02}T03:30:00.000Z"),
                "quote": {"USD": {
                    "open": close_on(day) - 20.0,
                    "high": close_on(day) + 100.0,
                    "low": close_on(day) - 150.0,
                    "close": close_on(day),
                    "volume": 1_000_000_000u64 + u64::from(day),
                    "market_cap": 90_000_000_000u64 + u64::from(day) * 1000,
                    "timestamp": format!("2017-10-{day:02}T23:59:59.999Z")
                }}
            })
        })
        .collect::<Vec<_>>();

    json!({
        "status": {"error_code": 0, "error_message": null},
        "data": {"id": id, "name": name, "symbol": symbol, "quotes": quotes}
    })
    .to_string()
}

pub fn empty_history_body() -> String {
    json!({"status": {"error_code": 0}, "data": {"quotes": []}}).to_string()
}

pub fn listing_page(entries: &[(&str, &str, &str)]) -> String {
    let rows = entries
        .iter()
        .enumerate()
        .map(|(rank, (name, symbol, slug))| {
            format!(
                "<tr><td>{}</td><td><a class=\"cmc-link\" href=\"/currencies/{slug}/\">{name}</a></td><td>{symbol}</td><td>$1.00</td></tr>",
                rank + 1
            )
        })
        .collect::<String>();
    format!("<html><body><table><thead><tr><th>#</th><th>Name</th><th>Symbol</th><th>Price</th></tr></thead><tbody>{rows}</tbody></table></body></html>")
}

/// Legacy historical-data page for October 2017 days `first..=last`, newest first.
pub fn history_page(first: u32, last: u32) -> String {
    let rows = (first..=last)
        .rev()
        .map(|day| {
            format!(
                "<tr><td>Oct {day:02}, 2017</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                close_on(day) - 20.0,
                close_on(day) + 100.0,
                close_on(day) - 150.0,
                close_on(day),
                1_000_000_000u64 + u64::from(day),
                90_000_000_000u64 + u64::from(day) * 1000,
            )
        })
        .collect::<String>();
    format!(
        "<html><body><div class=\"cmc-tab-historical-data\"><table>\
         <thead><tr><th>Date</th><th>Open*</th><th>High</th><th>Low</th><th>Close**</th>\
         <th>Volume</th><th>Market Cap</th></tr></thead><tbody>{rows}</tbody></table></div></body></html>"
    )
}
