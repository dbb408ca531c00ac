//! Transport layer.
//!
//! - TLS connections with a controlled ClientHello via tokio-boring
//! - Hand-written HTTP/1.1 framing on top of the decrypted stream

pub mod connector;
pub mod h1;

pub use connector::{ReadEvent, SecureStream, StreamEnd, TlsConnector};
