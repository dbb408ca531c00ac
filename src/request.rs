//! Structured request description handed to the serializer.

use bytes::Bytes;
use http::{Method, Uri};
use serde::Serialize;

use crate::client::DEFAULT_PORT;
use crate::encoding::Decompression;
use crate::error::{Error, Result};

/// One HTTP/1.1 request, built by the caller for a single exchange.
///
/// Header order and duplicates are preserved exactly as added.
#[derive(Debug, Clone)]
pub struct RequestMessage {
    method: Method,
    target: String,
    host: String,
    port: Option<u16>,
    headers: Vec<(String, String)>,
    content_headers: Vec<(String, String)>,
    body: Option<Bytes>,
    accepted_encodings: Option<Decompression>,
}

impl RequestMessage {
    /// Create a request for `target` (path plus optional query) on `host`.
    pub fn new(method: Method, target: impl Into<String>, host: impl Into<String>) -> Self {
        let mut target = target.into();
        if target.is_empty() {
            target.push('/');
        }
        Self {
            method,
            target,
            host: host.into(),
            port: None,
            headers: Vec::new(),
            content_headers: Vec::new(),
            body: None,
            accepted_encodings: None,
        }
    }

    /// Create a request from an absolute URI.
    pub fn from_uri(method: Method, uri: &Uri) -> Result<Self> {
        let host = uri
            .host()
            .ok_or_else(|| Error::InvalidRequest(format!("URI has no host: {}", uri)))?;
        let target = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");
        let mut request = Self::new(method, target, host);
        request.port = uri.port_u16();
        Ok(request)
    }

    pub fn get(target: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Method::GET, target, host)
    }

    pub fn post(target: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Method::POST, target, host)
    }

    pub fn put(target: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Method::PUT, target, host)
    }

    pub fn patch(target: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Method::PATCH, target, host)
    }

    pub fn delete(target: impl Into<String>, host: impl Into<String>) -> Self {
        Self::new(Method::DELETE, target, host)
    }

    /// Connect to `port` instead of the client's. Non-443 ports appear in `Host`.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Append a header. Repeating a name adds another line.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn headers<I, N, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(n, v)| (n.into(), v.into())));
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the body's `Content-Type`. Only written when a body is present.
    pub fn content_type(mut self, value: impl Into<String>) -> Self {
        self.content_headers
            .retain(|(name, _)| !name.eq_ignore_ascii_case("content-type"));
        self.content_headers
            .push(("Content-Type".to_string(), value.into()));
        self
    }

    /// Serialize `value` as the JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self> {
        let body = serde_json::to_vec(value)?;
        Ok(self
            .content_type("application/json; charset=utf-8")
            .body(body))
    }

    /// Add a single `Cookie` header from `name=value` pairs.
    pub fn cookies<I, N, V>(self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let joined = cookies
            .into_iter()
            .map(|(n, v)| format!("{}={}", n.as_ref(), v.as_ref()))
            .collect::<Vec<_>>()
            .join("; ");
        if joined.is_empty() {
            self
        } else {
            self.header("Cookie", joined)
        }
    }

    /// Encodings to advertise in `Accept-Encoding`, overriding the client default.
    pub fn accept_encoding(mut self, encodings: Decompression) -> Self {
        self.accepted_encodings = Some(encodings);
        self
    }

    pub(crate) fn accept_encoding_or(mut self, default: Decompression) -> Self {
        if self.accepted_encodings.is_none() {
            self.accepted_encodings = Some(default);
        }
        self
    }

    pub(crate) fn port_or(mut self, default: u16) -> Self {
        if self.port.is_none() {
            self.port = Some(default);
        }
        self
    }

    pub(crate) fn prepend_headers(mut self, defaults: &[(String, String)]) -> Self {
        if !defaults.is_empty() {
            let mut headers = defaults.to_vec();
            headers.append(&mut self.headers);
            self.headers = headers;
        }
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn header_list(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn content_headers(&self) -> &[(String, String)] {
        &self.content_headers
    }

    pub fn body_bytes(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    pub fn accepted_encodings(&self) -> Decompression {
        self.accepted_encodings.unwrap_or_default()
    }
}
