pub mod auth;
pub mod error;
pub mod records;

use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;

use crate::config::Config;

pub use error::ApiError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_SEGMENT: &str = "/api";

/// Resolve the effective backend base URL. Falls back to the development
/// default and always ends in exactly one `/api` segment.
pub fn normalize_base_url(configured: Option<&str>) -> String {
    let raw = configured
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL);
    let trimmed = raw.trim_end_matches('/');

    if trimmed.ends_with(API_SEGMENT) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{API_SEGMENT}")
    }
}

/// Where outgoing requests find the bearer token. Consulted on every send.
pub trait TokenSource {
    fn bearer_token(&self) -> Option<String>;
}

/// No credentials, for the login call.
pub struct Anonymous;

impl TokenSource for Anonymous {
    fn bearer_token(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.api_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.api_url.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Bind the client to a session so each request carries its token.
    pub fn with_session<'a, T: TokenSource>(&'a self, tokens: &'a T) -> Api<'a, T> {
        Api {
            client: self,
            tokens,
        }
    }
}

/// An [`ApiClient`] bound to one session's token source.
pub struct Api<'a, T> {
    client: &'a ApiClient,
    tokens: &'a T,
}

impl<T: TokenSource> Api<'_, T> {
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.http.request(method, self.client.url(path));
        match self.tokens.bearer_token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        send(self.request(Method::GET, path)).await
    }

    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        send(self.request(Method::POST, path).json(body)).await
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        send(self.request(Method::PUT, path).json(body)).await
    }

    pub async fn send_multipart(
        &self,
        method: Method,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Value, ApiError> {
        send(self.request(method, path).multipart(form)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        send(self.request(Method::DELETE, path)).await
    }
}

async fn send(req: RequestBuilder) -> Result<Value, ApiError> {
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.text().await?;

    if !status.is_success() {
        tracing::warn!(%status, "Backend rejected request");
        return Err(ApiError::from_response(status, &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&body)?)
}
