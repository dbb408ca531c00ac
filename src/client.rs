//! Exchange orchestrator: one request, one TLS connection, one response.

use std::sync::Arc;

use bytes::Bytes;
use http::{Method, Uri};
use serde::Serialize;

use crate::encoding::Decompression;
use crate::error::{Error, Result};
use crate::fingerprint::{FingerprintProfile, TlsProfile};
use crate::request::RequestMessage;
use crate::response::ResponseMessage;
use crate::transport::connector::TlsConnector;
use crate::transport::h1;

/// Default HTTPS port.
pub const DEFAULT_PORT: u16 = 443;

/// HTTP/1.1 client presenting a fixed TLS fingerprint.
///
/// Cloning is cheap; clones share the same read-only profile. Each call to
/// [`Client::execute`] opens and tears down its own connection, so
/// concurrent exchanges share no mutable state.
#[derive(Debug, Clone)]
pub struct Client {
    connector: TlsConnector,
    decompression: Decompression,
    default_headers: Arc<Vec<(String, String)>>,
    port: u16,
}

/// Builder for creating clients.
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    profile: Arc<TlsProfile>,
    decompression: Decompression,
    default_headers: Vec<(String, String)>,
    port: u16,
}

/// Builder for a single request sent through a [`Client`].
pub struct RequestBuilder<'a> {
    client: &'a Client,
    request: Result<RequestMessage>,
}

impl Client {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub fn profile(&self) -> &TlsProfile {
        self.connector.profile()
    }

    pub fn decompression(&self) -> Decompression {
        self.decompression
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn get(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::GET, url)
    }

    pub fn post(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::POST, url)
    }

    pub fn put(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::PUT, url)
    }

    pub fn patch(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::PATCH, url)
    }

    pub fn delete(&self, url: &str) -> RequestBuilder<'_> {
        self.request(Method::DELETE, url)
    }

    /// Start a request for an absolute `https://` URL.
    ///
    /// A port in the URL overrides the client's port.
    pub fn request(&self, method: Method, url: &str) -> RequestBuilder<'_> {
        let request = url
            .parse::<Uri>()
            .map_err(|e| Error::InvalidRequest(format!("Invalid URI {:?}: {}", url, e)))
            .and_then(|uri| RequestMessage::from_uri(method, &uri));
        RequestBuilder {
            client: self,
            request,
        }
    }

    /// Run one exchange: connect, send, read to end of stream, parse.
    ///
    /// Failures of any stage abort the exchange; nothing is retried.
    pub async fn execute(&self, request: RequestMessage) -> Result<ResponseMessage> {
        let request = request
            .accept_encoding_or(self.decompression)
            .port_or(self.port)
            .prepend_headers(&self.default_headers);
        let wire = h1::serialize_request(&request)?;

        tracing::debug!(
            "{} https://{}:{}{}",
            request.method(),
            request.host(),
            request.port(),
            request.target()
        );

        let mut stream = self.connector.connect(request.host(), request.port()).await?;
        stream.send(&wire).await?;
        tracing::trace!("Wrote {} request bytes", wire.len());

        let raw = stream.read_to_end().await?;
        tracing::trace!("Read {} response bytes", raw.len());

        let response = h1::parse_response(&raw)?;
        tracing::debug!(
            "{} {} from {}",
            response.status(),
            response.reason(),
            request.host()
        );
        Ok(response.with_request(Arc::new(request)))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self {
            connector: TlsConnector::new(Arc::new(TlsProfile::default())),
            decompression: Decompression::NONE,
            default_headers: Arc::new(Vec::new()),
            port: DEFAULT_PORT,
        }
    }
}

impl<'a> RequestBuilder<'a> {
    fn map(mut self, f: impl FnOnce(RequestMessage) -> Result<RequestMessage>) -> Self {
        self.request = self.request.and_then(f);
        self
    }

    pub fn header(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.map(|req| Ok(req.header(name, value)))
    }

    pub fn body(self, body: impl Into<Bytes>) -> Self {
        self.map(|req| Ok(req.body(body)))
    }

    pub fn content_type(self, value: impl Into<String>) -> Self {
        self.map(|req| Ok(req.content_type(value)))
    }

    /// Serialize `value` as a JSON body.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Self {
        self.map(|req| req.json(value))
    }

    pub fn cookies<I, N, V>(self, cookies: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        self.map(|req| Ok(req.cookies(cookies)))
    }

    pub fn accept_encoding(self, encodings: Decompression) -> Self {
        self.map(|req| Ok(req.accept_encoding(encodings)))
    }

    /// Send the request and return the response.
    pub async fn send(self) -> Result<ResponseMessage> {
        let request = self.request?;
        self.client.execute(request).await
    }
}

impl ClientBuilder {
    /// Create a new client builder with default settings.
    pub fn new() -> Self {
        Self {
            profile: Arc::new(TlsProfile::default()),
            decompression: Decompression::NONE,
            default_headers: Vec::new(),
            port: DEFAULT_PORT,
        }
    }

    /// Use an explicit TLS profile.
    pub fn profile(mut self, profile: TlsProfile) -> Self {
        self.profile = Arc::new(profile);
        self
    }

    /// Share an existing TLS profile.
    pub fn shared_profile(mut self, profile: Arc<TlsProfile>) -> Self {
        self.profile = profile;
        self
    }

    /// Use a named fingerprint preset.
    pub fn fingerprint(self, fingerprint: FingerprintProfile) -> Self {
        self.profile(fingerprint.tls_profile())
    }

    /// Encodings advertised when a request does not choose its own.
    pub fn decompression(mut self, decompression: Decompression) -> Self {
        self.decompression = decompression;
        self
    }

    /// Header sent on every request, ahead of the request's own headers.
    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// Remote port for URLs without one. Always TLS regardless of the value.
    ///
    /// Ports other than 443 are written into the `Host` header as `host:port`.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<Client> {
        self.profile.validate()?;
        Ok(Client {
            connector: TlsConnector::new(self.profile),
            decompression: self.decompression,
            default_headers: Arc::new(self.default_headers),
            port: self.port,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
