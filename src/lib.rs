//! # Shroud
//!
//! HTTP/1.1 client with full control over the TLS ClientHello.
//!
//! Shroud negotiates TLS with BoringSSL using an explicit, ordered
//! [`TlsProfile`] (versions, cipher suites, groups, signature algorithms,
//! SNI) and then writes and parses HTTP/1.1 by hand over the encrypted
//! stream. Every exchange uses its own connection with `Connection: close`.
//!
//! ```no_run
//! # async fn run() -> shroud::Result<()> {
//! use shroud::{Client, Decompression};
//!
//! let client = Client::builder()
//!     .decompression(Decompression::ALL)
//!     .default_header("User-Agent", "shroud/0.1")
//!     .build()?;
//!
//! let resp = client
//!     .post("https://auth.example.com/api/v1/authorization")
//!     .json(&serde_json::json!({ "type": "auth" }))
//!     .send()
//!     .await?;
//! println!("{} {}", resp.status(), resp.text());
//! # Ok(())
//! # }
//! ```
//!
//! Server certificates are not verified. The crate controls how the
//! handshake looks; it does not establish who the peer is.

pub mod client;
pub mod encoding;
pub mod error;
pub mod fingerprint;
pub mod headers;
pub mod request;
pub mod response;
pub mod transport;
pub mod version;

// Re-exports
pub use client::{Client, ClientBuilder, RequestBuilder};
pub use encoding::{ContentCoding, Decompression};
pub use error::{Error, Result};
pub use fingerprint::{FingerprintProfile, SniPolicy, TlsProfile};
pub use headers::Headers;
pub use request::RequestMessage;
pub use response::ResponseMessage;
pub use version::HttpVersion;
