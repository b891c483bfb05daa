//! HTTP client for the trading backend
//!
//! A preconfigured sender (base URL, timeout, JSON headers) plus one thin
//! function per backend endpoint. A non-2xx status becomes an
//! [`ApiError::Status`] carrying the backend's body. Transport errors pass
//! through as reqwest reports them. Nothing is retried.

use crate::constants::{DEFAULT_API_BASE_URL, DEFAULT_REQUEST_TIMEOUT_SECS};
use crate::types::AmountPayload;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

pub const ACCOUNTS_PATH: &str = "accounts/";
pub const TRADING_PATH: &str = "trading/";

pub fn deposit_path(account_id: u64) -> String {
    format!("accounts/{}/deposit/", account_id)
}

pub fn withdraw_path(account_id: u64) -> String {
    format!("accounts/{}/withdraw/", account_id)
}

/// HTTP basic auth credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Not sent unless set
    pub credentials: Option<Credentials>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            credentials: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("API base URL '{0}' cannot be used as a base")]
    CannotBeABase(String),
    #[error("failed to build the HTTP client")]
    Build(#[from] reqwest::Error),
}

/// Outcome of a call that did not produce a 2xx response
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP {status} from {url}")]
    Status {
        status: StatusCode,
        url: String,
        /// Response body as sent by the backend, empty if it could not be read
        body: String,
    },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status(),
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } if !body.is_empty() => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let base_url = parse_base_url(&config.base_url)?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;

        debug!(
            base_url = %base_url,
            timeout_ms = config.timeout.as_millis() as u64,
            auth = config.credentials.is_some(),
            "API client configured"
        );

        Ok(Self {
            http,
            base_url,
            credentials: config.credentials.clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // Base always ends with '/', paths never start with one
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.endpoint(path));
        match &self.credentials {
            Some(c) => builder.basic_auth(&c.username, Some(&c.password)),
            None => builder,
        }
    }

    pub fn fetch_accounts_request(&self) -> RequestBuilder {
        self.request(Method::GET, ACCOUNTS_PATH)
    }

    pub fn deposit_request(&self, account_id: u64, amount: f64) -> RequestBuilder {
        self.request(Method::POST, &deposit_path(account_id))
            .json(&AmountPayload { amount })
    }

    pub fn withdraw_request(&self, account_id: u64, amount: f64) -> RequestBuilder {
        self.request(Method::POST, &withdraw_path(account_id))
            .json(&AmountPayload { amount })
    }

    pub fn execute_trade_request<T: Serialize + ?Sized>(&self, trade: &T) -> RequestBuilder {
        self.request(Method::POST, TRADING_PATH).json(trade)
    }

    /// `GET accounts/`
    pub async fn fetch_accounts(&self) -> Result<Response, ApiError> {
        send(self.fetch_accounts_request()).await
    }

    /// `POST accounts/{id}/deposit/` with `{"amount": ...}`
    pub async fn deposit(&self, account_id: u64, amount: f64) -> Result<Response, ApiError> {
        send(self.deposit_request(account_id, amount)).await
    }

    /// `POST accounts/{id}/withdraw/` with `{"amount": ...}`
    pub async fn withdraw(&self, account_id: u64, amount: f64) -> Result<Response, ApiError> {
        send(self.withdraw_request(account_id, amount)).await
    }

    /// `POST trading/` with the trade object as the body
    pub async fn execute_trade<T: Serialize + ?Sized>(&self, trade: &T) -> Result<Response, ApiError> {
        send(self.execute_trade_request(trade)).await
    }
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let url = response.url().to_string();
    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, %url, "Failed to read error response body");
            String::new()
        }
    };
    Err(ApiError::Status { status, url, body })
}

fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let normalized = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    };
    let url = Url::parse(&normalized).map_err(|e| ClientError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(ClientError::CannotBeABase(raw.to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stub_server, BAD_REQUEST_INSUFFICIENT_FUNDS, OK_EMPTY_LIST};
    use crate::types::{TradeDirection, TradeRequest};
    use tokio::net::TcpListener;

    fn client() -> ApiClient {
        ApiClient::new(&ApiConfig::default()).unwrap()
    }

    fn body_json(request: &reqwest::Request) -> serde_json::Value {
        let bytes = request.body().and_then(|b| b.as_bytes()).unwrap();
        serde_json::from_slice(bytes).unwrap()
    }

    fn client_for(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: base.to_string(),
            ..ApiConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn base_url_defaults_to_local_backend() {
        assert_eq!(client().base_url().as_str(), "http://localhost:8000/api/");
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let api = client_for("http://example.test/api");
        assert_eq!(api.base_url().as_str(), "http://example.test/api/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = ApiClient::new(&ApiConfig {
            base_url: "not a url".into(),
            ..ApiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));

        let err = ApiClient::new(&ApiConfig {
            base_url: "mailto:desk@example.test".into(),
            ..ApiConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::CannotBeABase(_)));
    }

    #[test]
    fn fetch_accounts_is_get_without_body() {
        let request = client().fetch_accounts_request().build().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/accounts/");
        assert!(request.body().is_none());
    }

    #[test]
    fn deposit_posts_amount() {
        let request = client().deposit_request(42, 1000.0).build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/accounts/42/deposit/"
        );
        assert_eq!(body_json(&request), serde_json::json!({ "amount": 1000.0 }));
        assert_eq!(request.headers()[CONTENT_TYPE], "application/json");
    }

    #[test]
    fn withdraw_posts_amount() {
        let request = client().withdraw_request(7, 12.5).build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/accounts/7/withdraw/"
        );
        assert_eq!(body_json(&request), serde_json::json!({ "amount": 12.5 }));
    }

    #[test]
    fn execute_trade_posts_trade_object() {
        let trade = TradeRequest {
            account_id: 1,
            instrument_symbol: "EURUSD".into(),
            direction: TradeDirection::Buy,
            volume: 100.0,
            price_limit: 1.1,
        };
        let request = client().execute_trade_request(&trade).build().unwrap();
        assert_eq!(request.method(), Method::POST);
        assert_eq!(request.url().as_str(), "http://localhost:8000/api/trading/");
        assert_eq!(
            body_json(&request),
            serde_json::json!({
                "account_id": 1,
                "instrument_symbol": "EURUSD",
                "direction": "buy",
                "volume": 100.0,
                "price_limit": 1.1
            })
        );
    }

    #[test]
    fn execute_trade_accepts_arbitrary_objects() {
        let raw = serde_json::json!({ "instrument_symbol": "BTCUSD", "note": "manual" });
        let request = client().execute_trade_request(&raw).build().unwrap();
        assert_eq!(body_json(&request), raw);
    }

    #[test]
    fn no_auth_header_by_default() {
        let request = client().fetch_accounts_request().build().unwrap();
        assert!(request.headers().get(reqwest::header::AUTHORIZATION).is_none());
    }

    #[test]
    fn basic_auth_when_configured() {
        let api = ApiClient::new(&ApiConfig {
            credentials: Some(Credentials {
                username: "admin".into(),
                password: "admin".into(),
            }),
            ..ApiConfig::default()
        })
        .unwrap();
        let request = api.fetch_accounts_request().build().unwrap();
        assert_eq!(
            request.headers()[reqwest::header::AUTHORIZATION],
            "Basic YWRtaW46YWRtaW4="
        );
    }

    #[tokio::test]
    async fn sends_json_headers_to_backend() {
        let (base, server) = stub_server(OK_EMPTY_LIST).await;
        let response = client_for(&base).fetch_accounts().await.unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "[]");

        let raw = server.await.unwrap().to_ascii_lowercase();
        assert!(raw.starts_with("get /api/accounts/ http/1.1"));
        assert!(raw.contains("accept: application/json"));
        assert!(raw.contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn deposit_reaches_backend_with_body() {
        let (base, server) = stub_server(OK_EMPTY_LIST).await;
        client_for(&base).deposit(3, 250.0).await.unwrap();

        let raw = server.await.unwrap();
        assert!(raw.starts_with("POST /api/accounts/3/deposit/ HTTP/1.1"));
        assert!(raw.ends_with(r#"{"amount":250.0}"#));
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let (base, server) = stub_server(
            "HTTP/1.1 404 Not Found\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
        )
        .await;
        let err = client_for(&base).withdraw(99, 10.0).await.unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body(), None);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn rejection_body_reaches_caller() {
        let (base, server) = stub_server(BAD_REQUEST_INSUFFICIENT_FUNDS).await;
        let err = client_for(&base).withdraw(1, 1_000_000.0).await.unwrap_err();
        match &err {
            ApiError::Status { status, url, body } => {
                assert_eq!(*status, StatusCode::BAD_REQUEST);
                assert!(url.ends_with("/api/accounts/1/withdraw/"));
                assert_eq!(body, r#"{"error":"Insufficient funds"}"#);
            }
            other => panic!("expected a status error, got {:?}", other),
        }
        assert_eq!(err.body(), Some(r#"{"error":"Insufficient funds"}"#));
        assert!(err.to_string().starts_with("HTTP 400 Bad Request from "));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn slow_backend_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api/", listener.local_addr().unwrap());
        // Accept and hold the socket open without answering
        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let api = ApiClient::new(&ApiConfig {
            base_url: base,
            timeout: Duration::from_millis(200),
            credentials: None,
        })
        .unwrap();
        let err = api.fetch_accounts().await.unwrap_err();
        assert!(matches!(&err, ApiError::Transport(e) if e.is_timeout()));
        server.abort();
    }

    #[tokio::test]
    async fn unreachable_backend_is_an_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api/", listener.local_addr().unwrap());
        drop(listener);

        let err = client_for(&base).fetch_accounts().await.unwrap_err();
        assert!(matches!(&err, ApiError::Transport(e) if e.is_connect() || e.is_request()));
        assert_eq!(err.status(), None);
    }
}
