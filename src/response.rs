//! HTTP response produced by the parser.

use std::sync::Arc;

use bytes::Bytes;

use crate::error::{Error, Result};
use crate::headers::Headers;
use crate::request::RequestMessage;
use crate::version::HttpVersion;

/// Fully decoded HTTP response.
///
/// The body has already been de-chunked and decompressed.
#[derive(Debug, Clone)]
pub struct ResponseMessage {
    version: HttpVersion,
    status: u16,
    reason: String,
    headers: Headers,
    body: Bytes,
    request: Option<Arc<RequestMessage>>,
}

impl ResponseMessage {
    pub fn new(
        version: HttpVersion,
        status: u16,
        reason: String,
        headers: Headers,
        body: Bytes,
    ) -> Self {
        Self {
            version,
            status,
            reason,
            headers,
            body,
            request: None,
        }
    }

    /// Associate the request that produced this response.
    pub fn with_request(mut self, request: Arc<RequestMessage>) -> Self {
        self.request = Some(request);
        self
    }

    pub fn version(&self) -> HttpVersion {
        self.version
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn header_or<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.headers.get_or(name, default)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_body(self) -> Bytes {
        self.body
    }

    /// Body as UTF-8; invalid sequences become U+FFFD.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn request(&self) -> Option<&Arc<RequestMessage>> {
        self.request.as_ref()
    }

    /// `name=value` pairs from `Set-Cookie`, attributes stripped.
    ///
    /// Repeated headers collapse to the last one, so this yields at most one pair.
    pub fn set_cookies(&self) -> Vec<(String, String)> {
        self.headers
            .get("Set-Cookie")
            .and_then(|value| {
                let pair = value.split(';').next()?;
                let (name, value) = pair.split_once('=')?;
                Some((name.trim().to_string(), value.trim().to_string()))
            })
            .into_iter()
            .collect()
    }
}
