//! Provider adapters, one per API generation.

mod legacy_html;
mod web_api;

use std::sync::Arc;

pub use legacy_html::LegacyHtmlAdapter;
pub use web_api::WebApiAdapter;

use crate::data_source::{DataSource, ScrapeError};
use crate::http_client::{HttpClient, HttpRequest, HttpResponse};
use crate::{ProviderConfig, ProviderId};

/// Build the adapter for `provider` on top of `http_client`.
pub fn source_for(
    provider: ProviderId,
    config: &ProviderConfig,
    http_client: Arc<dyn HttpClient>,
) -> Arc<dyn DataSource> {
    match provider {
        ProviderId::WebApi => Arc::new(WebApiAdapter::new(config, http_client)),
        ProviderId::Legacy => Arc::new(LegacyHtmlAdapter::new(config, http_client)),
    }
}

/// One GET round trip. Transport failures become `Transport` errors; the
/// status code is left for the caller to judge.
fn execute_get(
    http_client: &dyn HttpClient,
    provider: ProviderId,
    url: &str,
    timeout_ms: Option<u64>,
    accept: &str,
) -> Result<HttpResponse, ScrapeError> {
    let request = HttpRequest::get(url)
        .with_header("accept", accept)
        .with_timeout_ms(timeout_ms);

    http_client.execute(request).map_err(|error| {
        ScrapeError::transport(format!("{provider} transport error: {}", error.message()))
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Mutex;

    use crate::http_client::{HttpClient, HttpError, HttpRequest, HttpResponse};

    /// Answers by URL substring, recording every request.
    #[derive(Debug, Default)]
    pub struct RoutedHttpClient {
        routes: Vec<(String, Result<HttpResponse, HttpError>)>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl RoutedHttpClient {
        pub fn route(mut self, fragment: &str, response: HttpResponse) -> Self {
            self.routes.push((fragment.to_owned(), Ok(response)));
            self
        }

        pub fn fail(mut self, fragment: &str, message: &str) -> Self {
            self.routes
                .push((fragment.to_owned(), Err(HttpError::new(message))));
            self
        }

        pub fn urls(&self) -> Vec<String> {
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .iter()
                .map(|request| request.url.clone())
                .collect()
        }
    }

    impl HttpClient for RoutedHttpClient {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
            let url = request.url.clone();
            self.requests
                .lock()
                .expect("request store should not be poisoned")
                .push(request);

            self.routes
                .iter()
                .find(|(fragment, _)| url.contains(fragment.as_str()))
                .map(|(_, response)| response.clone())
                .unwrap_or_else(|| Ok(HttpResponse::with_status(404, "")))
        }
    }
}
