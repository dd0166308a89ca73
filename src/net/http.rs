//! HTTP call primitives shared by the session store and the
//! authenticated-fetch wrapper.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side (SSR): the transport reports itself unavailable, since
//! these endpoints are only meaningful in the browser.
//!
//! Requests and responses are plain, clonable values so the retry path
//! can rebuild a request and tests can script a transport without a
//! network.

#![allow(clippy::unused_async)]

#[cfg(test)]
#[path = "http_test.rs"]
mod http_test;

use serde_json::Value;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// An outgoing request. Clonable so a 401-triggered retry can reissue the
/// same call with a fresh `Authorization` header.
#[derive(Clone, Debug)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, url)
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set `Authorization: Bearer <token>`, replacing any authorization
    /// header the caller supplied while leaving all other headers intact.
    pub fn set_bearer(&mut self, token: &str) {
        self.headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("authorization"));
        self.headers
            .push(("Authorization".to_owned(), format!("Bearer {token}")));
    }

    pub fn authorization(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
            .map(|(_, value)| value.as_str())
    }
}

/// A completed response: status plus the body decoded as JSON, or
/// `Value::Null` when the body was empty or not JSON.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Human-readable failure message probed from the body
    /// (`message`, then `detail`, then `error`).
    pub fn message(&self) -> String {
        ["message", "detail", "error"]
            .iter()
            .filter_map(|key| self.body.get(key).and_then(Value::as_str))
            .find(|text| !text.is_empty())
            .map_or_else(|| format!("request failed with status {}", self.status), ToOwned::to_owned)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("http transport not available outside the browser")]
    Unsupported,
}

/// The underlying HTTP call primitive. One implementation per runtime:
/// `gloo-net` in the browser, scripted fakes in tests.
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError>;
}

/// Browser transport over `gloo-net`.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooTransport;

impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        #[cfg(feature = "hydrate")]
        {
            let method = match request.method {
                HttpMethod::Get => gloo_net::http::Method::GET,
                HttpMethod::Post => gloo_net::http::Method::POST,
                HttpMethod::Put => gloo_net::http::Method::PUT,
                HttpMethod::Patch => gloo_net::http::Method::PATCH,
                HttpMethod::Delete => gloo_net::http::Method::DELETE,
            };

            let mut builder =
                gloo_net::http::RequestBuilder::new(&request.url).method(method);
            for (name, value) in &request.headers {
                builder = builder.header(name, value);
            }

            let ready = match &request.body {
                Some(body) => builder.json(body),
                None => builder.build(),
            }
            .map_err(|error| HttpError::Network(error.to_string()))?;

            let response = ready
                .send()
                .await
                .map_err(|error| HttpError::Network(error.to_string()))?;

            let status = response.status();
            let body = response
                .json::<Value>()
                .await
                .unwrap_or(Value::Null);
            Ok(HttpResponse { status, body })
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = request;
            Err(HttpError::Unsupported)
        }
    }
}
