//! Named fingerprint presets.

use super::tls::TlsProfile;

/// Fingerprint preset for impersonation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FingerprintProfile {
    /// The authentication client fingerprint: TLS 1.3/1.2, 17 suites with
    /// CHACHA20 first, x25519..x448, SHA-1 RSA signatures still offered.
    #[default]
    AuthClient,
    /// Chrome 131 cipher suites, curves and sigalgs with GREASE.
    /// Chrome permutes extension order per connection, so this only matches
    /// JA4-style (sorted) fingerprints.
    Chrome131,
}

impl FingerprintProfile {
    /// Get the TLS profile for this preset.
    pub fn tls_profile(&self) -> TlsProfile {
        match self {
            Self::AuthClient => TlsProfile::default(),
            Self::Chrome131 => TlsProfile::chrome_131(),
        }
    }
}
