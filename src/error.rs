//! Error types for shroud crate.

use std::io;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during a single exchange.
///
/// Every variant is terminal for the exchange: there is no partial response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// TCP connection could not be established.
    #[error("Connect error: {0}")]
    Connect(String),

    /// TLS negotiation failed.
    #[error("TLS handshake failed: {0}")]
    Handshake(String),

    /// The TLS engine rejected the fingerprint profile.
    #[error("TLS configuration error: {0}")]
    TlsConfig(String),

    /// No header/body delimiter in the received bytes.
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Status line is not `HTTP/x.y code reason`.
    #[error("Malformed status line: {0:?}")]
    MalformedStatusLine(String),

    /// Chunked body framing is inconsistent.
    #[error("Chunk decode error: {0}")]
    ChunkDecode(String),

    /// Content-Encoding token we cannot decode.
    #[error("Unsupported Content-Encoding: {0}")]
    UnsupportedEncoding(String),

    /// Body claimed an encoding but did not decompress.
    #[error("Decompression error: {0}")]
    Decompression(String),

    /// Request header that cannot be written on the wire.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request is missing something the exchange needs.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Transport I/O failure after the handshake.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Create a connect error.
    pub fn connect(message: impl Into<String>) -> Self {
        Self::Connect(message.into())
    }

    /// Create a handshake error.
    pub fn handshake(message: impl Into<String>) -> Self {
        Self::Handshake(message.into())
    }

    /// Create a TLS configuration error.
    pub fn tls_config(message: impl Into<String>) -> Self {
        Self::TlsConfig(message.into())
    }

    /// Create a malformed response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Create a chunk decode error.
    pub fn chunk_decode(message: impl Into<String>) -> Self {
        Self::ChunkDecode(message.into())
    }

    /// Create an invalid header error.
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }
}
