use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::execute_get;
use crate::data_source::{CapabilitySet, DataSource, FetchWindow, RawPayload, ScrapeError};
use crate::http_client::{HttpClient, HttpResponse, NoopHttpClient};
use crate::{CoinCandidate, CoinKey, CoinSymbol, ProviderConfig, ProviderId};

/// Status code the provider uses for an unknown symbol or id.
const BAD_REQUEST_CODE: i64 = 400;

/// Structured JSON API adapter.
#[derive(Clone)]
pub struct WebApiAdapter {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    timeout_ms: Option<u64>,
}

impl Default for WebApiAdapter {
    fn default() -> Self {
        Self::new(&ProviderConfig::default(), Arc::new(NoopHttpClient))
    }
}

impl WebApiAdapter {
    pub fn new(config: &ProviderConfig, http_client: Arc<dyn HttpClient>) -> Self {
        Self {
            http_client,
            base_url: config.web_api_base.trim_end_matches('/').to_owned(),
            timeout_ms: config.timeout_ms,
        }
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>) -> Self {
        Self::new(&ProviderConfig::default(), http_client)
    }

    fn get(&self, path_and_query: &str) -> Result<HttpResponse, ScrapeError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        execute_get(
            self.http_client.as_ref(),
            ProviderId::WebApi,
            &url,
            self.timeout_ms,
            "application/json",
        )
    }

    fn history_url(window: &FetchWindow) -> String {
        let key = match &window.key {
            CoinKey::Id(id) => format!("id={id}"),
            CoinKey::Slug(slug) => format!("slug={}", urlencoding::encode(slug)),
        };
        format!(
            "/v1/cryptocurrency/ohlcv/historical?convert={}&{}&time_end={}&time_start={}",
            urlencoding::encode(&window.fiat),
            key,
            window.time_end(),
            window.time_start()
        )
    }
}

impl DataSource for WebApiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::WebApi
    }

    fn capabilities(&self) -> CapabilitySet {
        CapabilitySet::full()
    }

    fn lookup_symbol(&self, symbol: &CoinSymbol) -> Result<Vec<CoinCandidate>, ScrapeError> {
        let response = self.get(&format!(
            "/v1/cryptocurrency/map?symbol={}",
            urlencoding::encode(symbol.as_str())
        ))?;

        let envelope: ApiEnvelope<Vec<MapEntry>> = decode(&response, "symbol map")?;
        if envelope.error_code() == BAD_REQUEST_CODE {
            return Err(ScrapeError::invalid_coin_code(symbol.as_str()));
        }
        envelope.ensure_success(&response, "symbol map")?;

        let candidates = envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(MapEntry::into_candidate)
            .collect::<Vec<_>>();

        if candidates.is_empty() {
            return Err(ScrapeError::invalid_coin_code(symbol.as_str()));
        }
        Ok(candidates)
    }

    fn lookup_id(&self, id: u64) -> Result<CoinCandidate, ScrapeError> {
        let response = self.get(&format!("/v1/cryptocurrency/info?id={id}"))?;

        let envelope: ApiEnvelope<BTreeMap<String, MapEntry>> = decode(&response, "coin info")?;
        if envelope.error_code() == BAD_REQUEST_CODE {
            return Err(ScrapeError::invalid_coin_code(&id.to_string()));
        }
        envelope.ensure_success(&response, "coin info")?;

        envelope
            .data
            .unwrap_or_default()
            .into_values()
            .map(MapEntry::into_candidate)
            .find(|candidate| candidate.id == Some(id))
            .ok_or_else(|| ScrapeError::invalid_coin_code(&id.to_string()))
    }

    fn fetch(&self, window: &FetchWindow) -> Result<RawPayload, ScrapeError> {
        let context = || format!("error fetching price data for {}", window.describe());

        let response = self
            .get(&Self::history_url(window))
            .map_err(|error| error.with_context(context()))?;
        let envelope: ApiEnvelope<Value> =
            decode(&response, "price history").map_err(|error| error.with_context(context()))?;
        envelope
            .ensure_success(&response, "price history")
            .map_err(|error| error.with_context(context()))?;

        Ok(RawPayload::Json(response.body))
    }

    fn trending(&self) -> Result<Vec<CoinCandidate>, ScrapeError> {
        let response = self.get("/v1/cryptocurrency/trending/latest")?;
        let envelope: ApiEnvelope<Vec<MapEntry>> = decode(&response, "trending")?;
        envelope.ensure_success(&response, "trending")?;

        Ok(envelope
            .data
            .unwrap_or_default()
            .into_iter()
            .map(MapEntry::into_candidate)
            .collect())
    }
}

/// Decode a JSON envelope; an undecodable body on a failed status reports the status.
fn decode<T: DeserializeOwned>(
    response: &HttpResponse,
    what: &str,
) -> Result<ApiEnvelope<T>, ScrapeError> {
    serde_json::from_str(&response.body).map_err(|error| {
        if response.is_success() {
            ScrapeError::upstream(format!("failed to parse {what} response: {error}"))
        } else {
            ScrapeError::upstream(format!(
                "{what} request returned status {}",
                response.status
            ))
        }
    })
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: Option<ApiStatus>,
    data: Option<T>,
}

#[derive(Debug, Deserialize)]
struct ApiStatus {
    /// Number in older generations, numeric string in newer ones.
    #[serde(default)]
    error_code: Value,
    #[serde(default)]
    error_message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    fn error_code(&self) -> i64 {
        let Some(status) = &self.status else {
            return 0;
        };
        match &status.error_code {
            Value::Number(number) => number.as_i64().unwrap_or(-1),
            Value::String(text) => text.trim().parse().unwrap_or(-1),
            _ => 0,
        }
    }

    /// An embedded error code wins; otherwise any non-success status fails.
    fn ensure_success(&self, response: &HttpResponse, what: &str) -> Result<(), ScrapeError> {
        let code = self.error_code();
        if code == 0 {
            if response.is_success() {
                return Ok(());
            }
            return Err(ScrapeError::upstream(format!(
                "{what} request returned status {}",
                response.status
            )));
        }

        let message = self
            .status
            .as_ref()
            .and_then(|status| status.error_message.clone())
            .unwrap_or_else(|| String::from("no message"));
        Err(ScrapeError::upstream(format!(
            "{what} request failed with code {code}: {message}"
        )))
    }
}

#[derive(Debug, Deserialize)]
struct MapEntry {
    #[serde(default)]
    id: Option<u64>,
    name: String,
    symbol: String,
    #[serde(default)]
    slug: String,
}

impl MapEntry {
    fn into_candidate(self) -> CoinCandidate {
        CoinCandidate {
            id: self.id,
            name: self.name,
            symbol: self.symbol,
            slug: self.slug,
        }
    }
}
