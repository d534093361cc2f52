//! HTTP client for the backend proxy

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::Fetcher;
use crate::config::DashboardConfig;
use crate::error::{FetchError, Result};
use crate::query::ResourceRequest;

/// Characters of a non-JSON error body kept in the error detail
const ERROR_BODY_PREVIEW: usize = 200;

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: Client,
    base_url: Url,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn from_config(config: &DashboardConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.request_timeout)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `<base>/<path>?<query>`, keeping any path prefix on the base
    /// (`/api/v1` is not replaced the way `Url::join` would).
    pub fn url_for(&self, request: &ResourceRequest) -> Result<Url> {
        let raw = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            request.path.trim_start_matches('/')
        );
        let mut url = Url::parse(&raw).map_err(|e| FetchError::InvalidRequest {
            path: request.path.clone(),
            reason: e.to_string(),
        })?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.query);
        }
        Ok(url)
    }

    fn transport_error(&self, error: reqwest::Error) -> FetchError {
        if error.is_timeout() {
            FetchError::Timeout(self.timeout)
        } else {
            FetchError::Network(error.to_string())
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn get_json(&self, request: &ResourceRequest) -> Result<Value> {
        let url = self.url_for(request)?;
        debug!(%url, "GET");

        let response = self
            .http
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                detail: error_detail(&text),
            });
        }

        serde_json::from_str(&text).map_err(FetchError::from)
    }
}

/// FastAPI puts the reason in `detail`; anything else is previewed verbatim
fn error_detail(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        ["detail", "error", "message"]
            .iter()
            .find_map(|field| v.get(*field).and_then(Value::as_str).map(str::to_string))
    });
    from_json.unwrap_or_else(|| body.chars().take(ERROR_BODY_PREVIEW).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(base: &str) -> HttpFetcher {
        HttpFetcher::new(Url::parse(base).unwrap(), Duration::from_secs(30)).unwrap()
    }

    #[test]
    fn test_url_keeps_base_prefix() {
        let f = fetcher("http://localhost:8000/api/v1");
        let url = f.url_for(&ResourceRequest::get("/cep/01001000")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/cep/01001000");

        let trailing = fetcher("http://localhost:8000/api/v1/");
        let url = trailing.url_for(&ResourceRequest::get("countries/")).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/countries/");
    }

    #[test]
    fn test_query_is_encoded() {
        let f = fetcher("http://localhost:8000/api/v1");
        let url = f
            .url_for(
                &ResourceRequest::get("/books/search")
                    .param("q", "the lord & rings")
                    .param("limit", 10),
            )
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/books/search?q=the+lord+%26+rings&limit=10"
        );
    }

    #[test]
    fn test_error_detail() {
        assert_eq!(error_detail(r#"{"detail":"CEP não encontrado"}"#), "CEP não encontrado");
        assert_eq!(error_detail("Bad Gateway"), "Bad Gateway");
        let long = "x".repeat(500);
        assert_eq!(error_detail(&long).len(), ERROR_BODY_PREVIEW);
    }
}
