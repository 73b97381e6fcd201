use crate::config::ProxyConfig;
use crate::error::RequestError;
use crate::traits::HttpTransport;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::fmt;

pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Safari/605.1.15",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) Firefox/102.0",
];

const BROWSER_HEADERS: [(&str, &str); 13] = [
    ("accept", "*/*"),
    ("accept-language", "en-US,en;q=0.9,id;q=0.8"),
    ("cache-control", "no-cache"),
    ("origin", "https://testnet.x1ecochain.com"),
    ("pragma", "no-cache"),
    ("priority", "u=1, i"),
    ("referer", "https://testnet.x1ecochain.com/"),
    ("sec-ch-ua", "\"Chromium\";v=\"134\", \"Not:A-Brand\";v=\"24\", \"Google Chrome\";v=\"134\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"Windows\""),
    ("sec-fetch-dest", "empty"),
    ("sec-fetch-mode", "cors"),
    ("sec-fetch-site", "cross-site"),
];

pub fn random_user_agent() -> &'static str {
    USER_AGENTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(USER_AGENTS[0])
}

/// Fresh header set for a single request. The user agent is re-rolled on every call.
///
/// A token that is not a valid header value is an error rather than a silently
/// unauthenticated request.
pub fn request_headers(token: Option<&str>) -> Result<HeaderMap, RequestError> {
    let mut headers = HeaderMap::new();
    for (name, value) in BROWSER_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(random_user_agent()));
    if let Some(token) = token {
        let value = HeaderValue::from_str(token)
            .map_err(|e| RequestError::network(format!("Invalid authorization token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
    }
    Ok(headers)
}

/// The two verbs the client speaks. POST always carries a JSON body.
#[derive(Debug, Clone, PartialEq)]
pub enum HttpMethod {
    Get,
    Post(serde_json::Value),
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post(_) => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub token: Option<String>,
    /// Treat 4xx responses as answers rather than failures.
    pub accept_client_errors: bool,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            token: None,
            accept_client_errors: false,
        }
    }

    pub fn post(url: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            method: HttpMethod::Post(payload),
            url: url.into(),
            token: None,
            accept_client_errors: false,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn accepting_client_errors(mut self) -> Self {
        self.accept_client_errors = true;
        self
    }

    /// Whether a response with `status` ends the call successfully.
    pub fn accepts(&self, status: u16) -> bool {
        (200..300).contains(&status) || (self.accept_client_errors && (400..500).contains(&status))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, RequestError> {
        serde_json::from_str(&self.body).map_err(|e| RequestError {
            status: Some(self.status),
            body: Some(self.body.clone()),
            message: format!("Invalid JSON response: {}", e),
        })
    }
}

/// reqwest-backed transport, direct or tunneled through one proxy.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    proxy: Option<ProxyConfig>,
}

impl ReqwestTransport {
    pub(crate) fn new(client: Client, proxy: Option<ProxyConfig>) -> Self {
        Self { client, proxy }
    }

    /// Underlying client, reusable for RPC traffic over the same route.
    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn is_direct(&self) -> bool {
        self.proxy.is_none()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, RequestError> {
        let headers = request_headers(request.token.as_deref())?;
        let builder = match &request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post(payload) => self.client.post(&request.url).json(payload),
        };

        let response = builder
            .headers(headers)
            .send()
            .await
            .map_err(|e| RequestError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| RequestError::network(format!("Failed to read response body: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}
