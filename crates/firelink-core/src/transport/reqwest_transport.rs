//! `reqwest`-backed transport

use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
use crate::config::TimeoutConfig;
use crate::error::{FirelinkError, FirelinkResult};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, instrument};

/// Transport over a single shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Build a client with the given timeouts and `Accept: application/json`
    pub fn new(timeouts: &TimeoutConfig) -> FirelinkResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .connect_timeout(timeouts.connection_timeout())
            .timeout(timeouts.request_timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| {
                FirelinkError::config_with_context(
                    format!("Failed to create HTTP client: {}", e),
                    "Building reqwest transport",
                )
            })?;

        debug!(
            "Created HTTP transport with timeouts: connection={}s, request={}s",
            timeouts.connect_timeout_secs, timeouts.request_timeout_secs
        );

        Ok(Self { client })
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method), level = "trace")]
    async fn send(&self, request: HttpRequest) -> FirelinkResult<HttpResponse> {
        let mut builder = self
            .client
            .request(Self::method(request.method), request.url.as_str());

        for (name, value) in &request.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| FirelinkError::invalid_field("header", e.to_string()))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| FirelinkError::invalid_field("header", e.to_string()))?;
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        // The query may carry the auth token, keep it out of errors
        let location = without_query(&request.url);
        let failed = |e: reqwest::Error| {
            FirelinkError::http_with_url(e.without_url().to_string(), location)
        };
        let response = builder.send().await.map_err(failed)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(failed)?;

        Ok(HttpResponse { status, body })
    }
}

fn without_query(url: &str) -> &str {
    url.split_once('?').map_or(url, |(location, _)| location)
}
