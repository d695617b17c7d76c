use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use crate::errors::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A pending request as seen by either transport.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl RequestDescriptor {
    pub fn new(method: Method, path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.into(),
            body,
            bearer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }
}

#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// No response at all: refused connection, DNS failure, reset.
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    /// The other side answered with an error status.
    #[error(transparent)]
    Rejected(ApiError),
}

impl TransportError {
    pub fn into_api_error(self) -> ApiError {
        match self {
            TransportError::Rejected(e) => e,
            TransportError::Timeout => ApiError::connectivity("Request timed out"),
            TransportError::Network(msg) => ApiError::connectivity(msg),
        }
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError>;
}

/// Live backend over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteTransport {
    http: Client,
    base_url: String,
}

impl RemoteTransport {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let http = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .user_agent(concat!("dayone/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Transport for RemoteTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<ApiResponse, TransportError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self.http.request(request.method.into(), &url);
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let res = builder.send().await.map_err(map_reqwest_error)?;
        let status = res.status().as_u16();
        let text = res.text().await.map_err(map_reqwest_error)?;
        let body = parse_body(&text);

        if (200..300).contains(&status) {
            Ok(ApiResponse { status, body })
        } else {
            Err(TransportError::Rejected(ApiError::from_response(status, &body)))
        }
    }
}

fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(e.to_string())
    }
}
