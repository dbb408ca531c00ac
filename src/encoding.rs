//! Content-Encoding negotiation and decoding.

use std::fmt;
use std::io::Read;
use std::ops::{BitOr, BitOrAssign};

use bytes::Bytes;

use crate::error::{Error, Result};

/// Content codings the response parser can undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Gzip,
    Deflate,
    Brotli,
}

impl ContentCoding {
    /// Parse a `Content-Encoding` token. Tokens are matched exactly.
    pub fn from_token(token: &str) -> Result<Self> {
        match token {
            "gzip" => Ok(Self::Gzip),
            "deflate" => Ok(Self::Deflate),
            "br" => Ok(Self::Brotli),
            other => Err(Error::UnsupportedEncoding(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Deflate => "deflate",
            Self::Brotli => "br",
        }
    }

    /// Decompress `data`.
    pub fn decode(self, data: &[u8]) -> Result<Bytes> {
        match self {
            Self::Gzip => decode_gzip(data),
            Self::Deflate => decode_deflate(data),
            Self::Brotli => decode_brotli(data),
        }
    }
}

/// Set of encodings a caller is willing to receive (drives `Accept-Encoding`).
#[derive(Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Decompression(u8);

impl Decompression {
    pub const NONE: Self = Self(0);
    pub const GZIP: Self = Self(1);
    pub const DEFLATE: Self = Self(1 << 1);
    pub const BROTLI: Self = Self(1 << 2);
    /// Anything the server likes; advertised as `*`.
    pub const ALL: Self = Self(1 << 3);

    const FLAGS: [Self; 4] = [Self::GZIP, Self::DEFLATE, Self::BROTLI, Self::ALL];

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn contains(self, other: Self) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }

    /// Enabled single flags, in declaration order.
    pub fn iter(self) -> impl Iterator<Item = Decompression> {
        Self::FLAGS.into_iter().filter(move |flag| self.contains(*flag))
    }

    /// Wire tokens for the enabled flags.
    pub fn tokens(self) -> Vec<&'static str> {
        self.iter()
            .filter_map(|flag| match flag {
                Self::GZIP => Some("gzip"),
                Self::DEFLATE => Some("deflate"),
                Self::BROTLI => Some("br"),
                Self::ALL => Some("*"),
                _ => None,
            })
            .collect()
    }

    /// `Accept-Encoding` value, or `None` when nothing is enabled.
    pub fn header_value(self) -> Option<String> {
        let tokens = self.tokens();
        if tokens.is_empty() {
            None
        } else {
            Some(tokens.join(", "))
        }
    }
}

impl BitOr for Decompression {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Decompression {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Decompression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decompression({:?})", self.tokens())
    }
}

fn decode_gzip(data: &[u8]) -> Result<Bytes> {
    let mut decoder = flate2::read::GzDecoder::new(data);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(|e| Error::Decompression(format!("gzip: {}", e)))?;
    Ok(Bytes::from(decoded))
}

/// `deflate` is zlib-wrapped per RFC 9110, but raw deflate is common in the wild.
fn decode_deflate(data: &[u8]) -> Result<Bytes> {
    let mut decoded = Vec::new();
    if flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut decoded)
        .is_ok()
    {
        return Ok(Bytes::from(decoded));
    }
    decoded.clear();
    flate2::read::DeflateDecoder::new(data)
        .read_to_end(&mut decoded)
        .map_err(|e| Error::Decompression(format!("deflate: {}", e)))?;
    Ok(Bytes::from(decoded))
}

fn decode_brotli(data: &[u8]) -> Result<Bytes> {
    let mut decoder = brotli::Decompressor::new(data, 4096);
    let mut decoded = Vec::new();
    decoder
        .read_to_end(&mut decoded)
        .map_err(|e| Error::Decompression(format!("brotli: {}", e)))?;
    Ok(Bytes::from(decoded))
}
