use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{BrowseError, Result};
use crate::types::Page;

pub const DEFAULT_ENDPOINT: &str = "https://rickandmortyapi.com/api/character/";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Thin HTTP client for the character collection.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
}

/// Body the upstream sends alongside non-2xx statuses.
#[derive(Deserialize)]
struct ApiErrorBody {
    error: String,
}

impl ApiClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self { http })
    }

    /// Fetch and decode one page. `url` is used verbatim, `next`/`prev`
    /// links from earlier responses are never rebuilt.
    pub async fn fetch_page(&self, url: &str) -> Result<Page> {
        let parsed = Url::parse(url).map_err(|e| BrowseError::InvalidUrl(format!("{url}: {e}")))?;

        log::debug!("GET {parsed}");
        let response = self
            .http
            .get(parsed)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<failed to read response body>".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(BrowseError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| BrowseError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Build the filtered endpoint `base?name=<query>`.
pub fn search_url(base: &str, query: &str) -> Result<String> {
    let mut url = Url::parse(base).map_err(|e| BrowseError::InvalidUrl(format!("{base}: {e}")))?;
    url.query_pairs_mut().clear().append_pair("name", query);
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_appends_name() {
        let url = search_url(DEFAULT_ENDPOINT, "rick").unwrap();
        assert_eq!(url, "https://rickandmortyapi.com/api/character/?name=rick");
    }

    #[test]
    fn test_search_url_encodes_query() {
        let url = search_url("http://localhost:8080/api/character", "mr. poopy butthole").unwrap();
        assert_eq!(
            url,
            "http://localhost:8080/api/character?name=mr.+poopy+butthole"
        );
    }

    #[test]
    fn test_search_url_replaces_existing_query() {
        let url = search_url("https://example.com/api/character/?page=3", "morty").unwrap();
        assert_eq!(url, "https://example.com/api/character/?name=morty");
    }

    #[test]
    fn test_search_url_rejects_relative_base() {
        assert!(matches!(
            search_url("api/character", "rick"),
            Err(BrowseError::InvalidUrl(_))
        ));
    }
}
