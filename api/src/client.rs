use crate::config::DEFAULT_BASE_URL;
use crate::nrl::GameListResponse;
use crate::season::Attempt;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, ORIGIN, REFERER};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

// The public site rejects requests that don't look like they came from its own draw page.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
const NRL_REFERER: &str = "https://www.nrl.com/draw/";
const NRL_ORIGIN: &str = "https://www.nrl.com";

/// NRL API client backed by the public nrl.com endpoints.
#[derive(Debug, Clone)]
pub struct NrlApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for NrlApi {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, Duration::from_secs(5))
    }
}

#[derive(Debug)]
pub enum ApiError {
    /// Connection failure or timeout.
    Network(reqwest::Error, String),
    /// Non-2xx response.
    HttpStatus(StatusCode, String),
    /// Body is not JSON, or not the envelope we expect.
    Decode(serde_json::Error, String),
    /// One match entry could not be turned into a record.
    RecordShape(String),
    /// Nothing usable upstream and placeholders are disabled.
    NoData(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::HttpStatus(code, url) => write!(f, "HTTP {code} for {url}"),
            ApiError::Decode(e, url) => write!(f, "Decode error for {url}: {e}"),
            ApiError::RecordShape(msg) => write!(f, "Unusable match record: {msg}"),
            ApiError::NoData(msg) => write!(f, "No match data: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl NrlApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .user_agent(BROWSER_USER_AGENT)
                .default_headers(browser_headers())
                .build()
                .unwrap_or_default(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            timeout,
        }
    }

    /// Fetch one season from one endpoint and unwrap the `games`/`fixtures`
    /// envelope. An envelope with neither list is a decode error.
    pub async fn fetch_game_list(&self, attempt: &Attempt) -> ApiResult<Vec<Value>> {
        let url = attempt.url(&self.base_url);
        let raw = self.get_json(&url).await?;
        let envelope: GameListResponse =
            serde_json::from_value(raw).map_err(|e| ApiError::Decode(e, url.clone()))?;
        if !envelope.has_entries() {
            return Err(ApiError::Decode(
                serde::de::Error::custom("response has neither `games` nor `fixtures`"),
                url,
            ));
        }
        Ok(envelope.into_entries())
    }

    /// One GET, no retries. Every failure comes back as a value.
    pub async fn get_json(&self, url: &str) -> ApiResult<Value> {
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status, url.to_owned()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode(e, url.to_owned()))
    }
}

fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(REFERER, HeaderValue::from_static(NRL_REFERER));
    headers.insert(ORIGIN, HeaderValue::from_static(NRL_ORIGIN));
    headers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nrl::Endpoint;

    fn api(server: &mockito::ServerGuard) -> NrlApi {
        NrlApi::new(&server.url(), Duration::from_secs(2))
    }

    #[tokio::test]
    async fn get_json_sends_browser_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/ping")
            .match_header("accept", "application/json")
            .match_header("referer", NRL_REFERER)
            .match_header("origin", NRL_ORIGIN)
            .match_header("user-agent", mockito::Matcher::Regex("Chrome".into()))
            .with_status(200)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let value = api(&server).get_json(&format!("{}/ping", server.url())).await.unwrap();
        assert_eq!(value["ok"], Value::Bool(true));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_2xx_is_an_http_status_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/missing").with_status(404).create_async().await;

        let err = api(&server)
            .get_json(&format!("{}/missing", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpStatus(code, _) if code == StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server.mock("GET", "/bad").with_status(200).with_body("<html>").create_async().await;

        let err = api(&server).get_json(&format!("{}/bad", server.url())).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(..)), "got {err}");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let api = NrlApi::new("http://127.0.0.1:1", Duration::from_millis(500));
        let err = api.get_json("http://127.0.0.1:1/x").await.unwrap_err();
        assert!(matches!(err, ApiError::Network(..)), "got {err}");
    }

    #[tokio::test]
    async fn fetch_game_list_rejects_unexpected_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"rounds":[]}"#)
            .create_async()
            .await;

        let attempt = Attempt { season: 2026, endpoint: Endpoint::Draw };
        let err = api(&server).fetch_game_list(&attempt).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(..)), "got {err}");
    }

    #[tokio::test]
    async fn fetch_game_list_returns_fixtures() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", mockito::Matcher::Regex("^/draw/data".into()))
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("competition".into(), "111".into()),
                mockito::Matcher::UrlEncoded("season".into(), "2026".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"fixtures":[{"matchState":"Upcoming"},{"matchState":"FullTime"}]}"#)
            .create_async()
            .await;

        let attempt = Attempt { season: 2026, endpoint: Endpoint::Draw };
        let entries = api(&server).fetch_game_list(&attempt).await.unwrap();
        assert_eq!(entries.len(), 2);
        mock.assert_async().await;
    }
}
