//! HTTP seam between the poller and the network.
//!
//! The poller only needs three request shapes (authenticated JSON POST,
//! authenticated GET, plain GET), so the [`Transport`] trait exposes just
//! those. [`HttpTransport`] is the `reqwest` implementation used in
//! production; tests substitute a scripted one.

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

/// Status code and raw body of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, for error messages
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The request never produced a response
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

pub trait Transport {
    /// POST `body` as JSON with a bearer credential.
    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &Value,
    ) -> Result<HttpResponse, TransportError>;

    /// GET `url`, optionally authenticated.
    fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError>;
}

/// Blocking `reqwest` client with a per-request timeout
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    fn read(response: reqwest::blocking::Response) -> Result<HttpResponse, TransportError> {
        let status = response.status().as_u16();
        let body = response.bytes()?.to_vec();
        Ok(HttpResponse { status, body })
    }
}

impl Transport for HttpTransport {
    fn post_json(
        &self,
        url: &str,
        bearer: &str,
        body: &Value,
    ) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()?;

        Self::read(response)
    }

    fn get(&self, url: &str, bearer: Option<&str>) -> Result<HttpResponse, TransportError> {
        let mut request = self.client.get(url);
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        Self::read(request.send()?)
    }
}
