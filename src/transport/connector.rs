//! BoringSSL TLS connector driven by a [`TlsProfile`].
//!
//! Certificate verification is disabled and no client certificate is
//! offered: the connector exists to control the ClientHello, not to
//! authenticate the peer. Do not reuse it where server identity matters.

use std::fmt;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use boring::ssl::{ErrorCode, SslConnector, SslMethod, SslVerifyMode, SslVersion};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, ReadBuf};
use tokio::net::TcpStream;
use tokio_boring::SslStream;

use crate::error::{Error, Result};
use crate::fingerprint::tls::{HandshakeConfig, ProtocolVersion, TlsProfile};

const READ_BUF_SIZE: usize = 8192;

/// How a stream reached end-of-data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamEnd {
    /// Orderly end reported by the engine.
    Clean,
    /// Peer closed the TCP connection without sending close_notify.
    /// Bytes already read are complete and valid.
    MissingCloseNotify,
}

/// Outcome of a single read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadEvent {
    Data(usize),
    End(StreamEnd),
}

/// Opens TLS connections that present the profile's fingerprint.
#[derive(Debug, Clone)]
pub struct TlsConnector {
    profile: Arc<TlsProfile>,
}

impl TlsConnector {
    pub fn new(profile: Arc<TlsProfile>) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &TlsProfile {
        &self.profile
    }

    fn configure_ssl(&self, config: &HandshakeConfig) -> Result<SslConnector> {
        let mut builder = SslConnector::builder(SslMethod::tls_client())
            .map_err(|e| Error::tls_config(format!("Failed to create SSL connector: {}", e)))?;

        // Any server certificate is accepted; see module docs.
        builder.set_verify(SslVerifyMode::NONE);

        // TLS 1.3 suites are fixed by BoringSSL; the list only orders TLS 1.2.
        if !config.cipher_list.is_empty() {
            builder
                .set_cipher_list(&config.cipher_list)
                .map_err(|e| Error::tls_config(format!("Failed to set cipher list: {}", e)))?;
        }

        builder
            .set_curves_list(&config.curves_list)
            .map_err(|e| Error::tls_config(format!("Failed to set curves: {}", e)))?;

        builder
            .set_sigalgs_list(&config.sigalgs_list)
            .map_err(|e| Error::tls_config(format!("Failed to set signature algorithms: {}", e)))?;

        builder.set_grease_enabled(config.grease);

        builder
            .set_min_proto_version(Some(ssl_version(config.min_version)))
            .map_err(|e| Error::tls_config(format!("Failed to set min TLS version: {}", e)))?;
        builder
            .set_max_proto_version(Some(ssl_version(config.max_version)))
            .map_err(|e| Error::tls_config(format!("Failed to set max TLS version: {}", e)))?;

        Ok(builder.build())
    }

    /// Connect to `host:port` and complete the TLS handshake.
    pub async fn connect(&self, host: &str, port: u16) -> Result<SecureStream> {
        let config = self.profile.handshake_config(host)?;
        if !config.dropped_groups.is_empty() {
            tracing::debug!(
                "Groups not supported by the TLS engine, not offered: {:?}",
                config.dropped_groups
            );
        }
        tracing::trace!("Handshake config for {}: {:?}", host, config);

        let ssl_connector = self.configure_ssl(&config)?;

        let addr = format!("{}:{}", host, port);
        let tcp_stream = TcpStream::connect(&addr)
            .await
            .map_err(|e| Error::connect(format!("Failed to connect to {}: {}", addr, e)))?;
        tracing::debug!("TCP connected to {}", addr);

        let mut ssl_config = ssl_connector
            .configure()
            .map_err(|e| Error::tls_config(format!("Failed to configure SSL: {}", e)))?;
        ssl_config.set_verify_hostname(false);

        let domain = match &config.server_name {
            Some(name) => name.as_str(),
            None => {
                ssl_config.set_use_server_name_indication(false);
                host
            }
        };

        let ssl_stream = tokio_boring::connect(ssl_config, domain, tcp_stream)
            .await
            .map_err(|e| Error::handshake(format!("{}: {}", addr, e)))?;

        let stream = SecureStream { inner: ssl_stream };
        tracing::debug!(
            "TLS established with {} ({}, {})",
            addr,
            stream.negotiated_version(),
            stream.negotiated_cipher().unwrap_or("unknown cipher")
        );
        Ok(stream)
    }
}

fn ssl_version(version: ProtocolVersion) -> SslVersion {
    match version {
        ProtocolVersion::Tls10 => SslVersion::TLS1,
        ProtocolVersion::Tls11 => SslVersion::TLS1_1,
        ProtocolVersion::Tls12 => SslVersion::TLS1_2,
        ProtocolVersion::Tls13 => SslVersion::TLS1_3,
    }
}

/// Decrypted duplex byte stream over one TLS connection.
pub struct SecureStream {
    inner: SslStream<TcpStream>,
}

impl fmt::Debug for SecureStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureStream")
            .field("version", &self.negotiated_version())
            .field("cipher", &self.negotiated_cipher())
            .finish()
    }
}

impl SecureStream {
    /// Negotiated protocol, e.g. `TLSv1.3`.
    pub fn negotiated_version(&self) -> &str {
        self.inner.ssl().version_str()
    }

    pub fn negotiated_cipher(&self) -> Option<&str> {
        self.inner.ssl().current_cipher().map(|c| c.name())
    }

    /// Write all of `buf` and flush it to the peer.
    pub async fn send(&mut self, buf: &[u8]) -> Result<()> {
        self.inner.write_all(buf).await?;
        self.inner.flush().await?;
        Ok(())
    }

    /// Read once, reporting end-of-stream as an event rather than an error.
    pub async fn read_event(&mut self, buf: &mut [u8]) -> Result<ReadEvent> {
        read_event(&mut self.inner, buf).await
    }

    /// Read until the peer closes the connection.
    pub async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        let (data, end) = read_until_end(&mut self.inner).await?;
        if end == StreamEnd::MissingCloseNotify {
            tracing::debug!(
                "Peer closed without close_notify after {} bytes; treating as end of stream",
                data.len()
            );
        }
        Ok(data)
    }
}

impl AsyncRead for SecureStream {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_read(cx, buf)
    }
}

impl AsyncWrite for SecureStream {
    fn poll_write(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.inner).poll_write(cx, buf)
    }

    fn poll_flush(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_flush(cx)
    }

    fn poll_shutdown(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Pin::new(&mut self.inner).poll_shutdown(cx)
    }
}

async fn read_event<R: AsyncRead + Unpin>(reader: &mut R, buf: &mut [u8]) -> Result<ReadEvent> {
    match reader.read(buf).await {
        Ok(0) => Ok(ReadEvent::End(StreamEnd::Clean)),
        Ok(n) => Ok(ReadEvent::Data(n)),
        Err(e) => Ok(ReadEvent::End(classify_read_error(e)?)),
    }
}

async fn read_until_end<R: AsyncRead + Unpin>(reader: &mut R) -> Result<(Vec<u8>, StreamEnd)> {
    let mut data = Vec::new();
    let mut read_buf = vec![0u8; READ_BUF_SIZE];
    loop {
        match read_event(reader, &mut read_buf).await? {
            ReadEvent::Data(n) => data.extend_from_slice(&read_buf[..n]),
            ReadEvent::End(end) => return Ok((data, end)),
        }
    }
}

/// Separate end-of-stream conditions from genuine I/O failures.
fn classify_read_error(err: io::Error) -> Result<StreamEnd> {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        return Ok(StreamEnd::MissingCloseNotify);
    }
    if let Some(ssl_err) = err
        .get_ref()
        .and_then(|inner| inner.downcast_ref::<boring::ssl::Error>())
    {
        match ssl_err.code() {
            ErrorCode::ZERO_RETURN => return Ok(StreamEnd::Clean),
            // Transport EOF with no underlying OS error: the close_notify never came.
            ErrorCode::SYSCALL if ssl_err.io_error().is_none() => {
                return Ok(StreamEnd::MissingCloseNotify)
            }
            _ => {}
        }
    }
    Err(Error::Io(err))
}
