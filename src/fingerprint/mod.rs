//! TLS fingerprinting configuration.

pub mod profiles;
pub mod tls;

pub use profiles::FingerprintProfile;
pub use tls::{
    CipherSuite, HandshakeConfig, NamedGroup, ProtocolVersion, SignatureScheme, SniPolicy,
    TlsProfile,
};
