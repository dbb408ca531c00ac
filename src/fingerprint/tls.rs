//! TLS fingerprint configuration.
//!
//! A [`TlsProfile`] is the ordered set of parameters offered in the
//! ClientHello. The order of every list is part of the fingerprint, so
//! nothing in this module sorts, dedups or otherwise reorders caller input.
//! [`TlsProfile::handshake_config`] resolves the profile into the strings and
//! bounds the TLS engine actually consumes.

use std::fmt;

use crate::error::{Error, Result};

/// TLS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    Tls10,
    Tls11,
    Tls12,
    Tls13,
}

impl ProtocolVersion {
    /// Wire value of the version.
    pub fn code(self) -> u16 {
        match self {
            Self::Tls10 => 0x0301,
            Self::Tls11 => 0x0302,
            Self::Tls12 => 0x0303,
            Self::Tls13 => 0x0304,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Tls10 => "TLSv1.0",
            Self::Tls11 => "TLSv1.1",
            Self::Tls12 => "TLSv1.2",
            Self::Tls13 => "TLSv1.3",
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cipher suites the profile can offer, named after their IANA registration.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CipherSuite {
    TLS_AES_128_GCM_SHA256,
    TLS_AES_256_GCM_SHA384,
    TLS_CHACHA20_POLY1305_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
    TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
    TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA,
    TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
    TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA,
    TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA,
    TLS_RSA_WITH_AES_128_GCM_SHA256,
    TLS_RSA_WITH_AES_256_GCM_SHA384,
    TLS_RSA_WITH_AES_128_CBC_SHA,
    TLS_RSA_WITH_AES_256_CBC_SHA,
}

impl CipherSuite {
    /// IANA code point.
    pub fn code(self) -> u16 {
        match self {
            Self::TLS_AES_128_GCM_SHA256 => 0x1301,
            Self::TLS_AES_256_GCM_SHA384 => 0x1302,
            Self::TLS_CHACHA20_POLY1305_SHA256 => 0x1303,
            Self::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 => 0xc02b,
            Self::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256 => 0xc02f,
            Self::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384 => 0xc02c,
            Self::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384 => 0xc030,
            Self::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256 => 0xcca9,
            Self::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256 => 0xcca8,
            Self::TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA => 0xc009,
            Self::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA => 0xc013,
            Self::TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA => 0xc00a,
            Self::TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA => 0xc014,
            Self::TLS_RSA_WITH_AES_128_GCM_SHA256 => 0x009c,
            Self::TLS_RSA_WITH_AES_256_GCM_SHA384 => 0x009d,
            Self::TLS_RSA_WITH_AES_128_CBC_SHA => 0x002f,
            Self::TLS_RSA_WITH_AES_256_CBC_SHA => 0x0035,
        }
    }

    /// TLS 1.3 suites are negotiated independently of the TLS 1.2 cipher list.
    pub fn is_tls13(self) -> bool {
        matches!(
            self,
            Self::TLS_AES_128_GCM_SHA256
                | Self::TLS_AES_256_GCM_SHA384
                | Self::TLS_CHACHA20_POLY1305_SHA256
        )
    }

    /// Name accepted by BoringSSL's cipher list parser.
    ///
    /// `None` for TLS 1.3 suites: BoringSSL does not expose their order.
    pub fn engine_name(self) -> Option<&'static str> {
        let name = match self {
            Self::TLS_AES_128_GCM_SHA256
            | Self::TLS_AES_256_GCM_SHA384
            | Self::TLS_CHACHA20_POLY1305_SHA256 => return None,
            Self::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 => "ECDHE-ECDSA-AES128-GCM-SHA256",
            Self::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256 => "ECDHE-RSA-AES128-GCM-SHA256",
            Self::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384 => "ECDHE-ECDSA-AES256-GCM-SHA384",
            Self::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384 => "ECDHE-RSA-AES256-GCM-SHA384",
            Self::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256 => "ECDHE-ECDSA-CHACHA20-POLY1305",
            Self::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256 => "ECDHE-RSA-CHACHA20-POLY1305",
            Self::TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA => "ECDHE-ECDSA-AES128-SHA",
            Self::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA => "ECDHE-RSA-AES128-SHA",
            Self::TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA => "ECDHE-ECDSA-AES256-SHA",
            Self::TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA => "ECDHE-RSA-AES256-SHA",
            Self::TLS_RSA_WITH_AES_128_GCM_SHA256 => "AES128-GCM-SHA256",
            Self::TLS_RSA_WITH_AES_256_GCM_SHA384 => "AES256-GCM-SHA384",
            Self::TLS_RSA_WITH_AES_128_CBC_SHA => "AES128-SHA",
            Self::TLS_RSA_WITH_AES_256_CBC_SHA => "AES256-SHA",
        };
        Some(name)
    }
}

/// Key exchange groups (supported_groups extension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedGroup {
    X25519,
    Secp256r1,
    Secp384r1,
    Secp521r1,
    X448,
}

impl NamedGroup {
    pub fn code(self) -> u16 {
        match self {
            Self::Secp256r1 => 0x0017,
            Self::Secp384r1 => 0x0018,
            Self::Secp521r1 => 0x0019,
            Self::X25519 => 0x001d,
            Self::X448 => 0x001e,
        }
    }

    /// Curve name understood by the engine, or `None` if it cannot offer the group.
    pub fn engine_name(self) -> Option<&'static str> {
        match self {
            Self::X25519 => Some("X25519"),
            Self::Secp256r1 => Some("P-256"),
            Self::Secp384r1 => Some("P-384"),
            Self::Secp521r1 => Some("P-521"),
            Self::X448 => None,
        }
    }
}

/// Signature schemes (signature_algorithms extension).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    rsa_pkcs1_sha1,
    rsa_pkcs1_sha256,
    rsa_pkcs1_sha384,
    rsa_pkcs1_sha512,
    ecdsa_secp256r1_sha256,
    ecdsa_secp384r1_sha384,
    ecdsa_secp521r1_sha512,
    rsa_pss_rsae_sha256,
    rsa_pss_rsae_sha384,
    rsa_pss_rsae_sha512,
}

impl SignatureScheme {
    pub fn code(self) -> u16 {
        match self {
            Self::rsa_pkcs1_sha1 => 0x0201,
            Self::rsa_pkcs1_sha256 => 0x0401,
            Self::rsa_pkcs1_sha384 => 0x0501,
            Self::rsa_pkcs1_sha512 => 0x0601,
            Self::ecdsa_secp256r1_sha256 => 0x0403,
            Self::ecdsa_secp384r1_sha384 => 0x0503,
            Self::ecdsa_secp521r1_sha512 => 0x0603,
            Self::rsa_pss_rsae_sha256 => 0x0804,
            Self::rsa_pss_rsae_sha384 => 0x0805,
            Self::rsa_pss_rsae_sha512 => 0x0806,
        }
    }

    /// TLS 1.2 `SignatureAndHashAlgorithm` pair: (hash, signature).
    pub fn hash_and_signature(self) -> (u8, u8) {
        let code = self.code();
        ((code >> 8) as u8, (code & 0xff) as u8)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::rsa_pkcs1_sha1 => "rsa_pkcs1_sha1",
            Self::rsa_pkcs1_sha256 => "rsa_pkcs1_sha256",
            Self::rsa_pkcs1_sha384 => "rsa_pkcs1_sha384",
            Self::rsa_pkcs1_sha512 => "rsa_pkcs1_sha512",
            Self::ecdsa_secp256r1_sha256 => "ecdsa_secp256r1_sha256",
            Self::ecdsa_secp384r1_sha384 => "ecdsa_secp384r1_sha384",
            Self::ecdsa_secp521r1_sha512 => "ecdsa_secp521r1_sha512",
            Self::rsa_pss_rsae_sha256 => "rsa_pss_rsae_sha256",
            Self::rsa_pss_rsae_sha384 => "rsa_pss_rsae_sha384",
            Self::rsa_pss_rsae_sha512 => "rsa_pss_rsae_sha512",
        }
    }
}

/// Default protocol versions, highest preference first.
pub const DEFAULT_VERSIONS: &[ProtocolVersion] = &[ProtocolVersion::Tls13, ProtocolVersion::Tls12];

/// Default cipher suite order: AEAD suites first, CBC and static-RSA last.
pub const DEFAULT_CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite::TLS_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_AES_128_GCM_SHA256,
    CipherSuite::TLS_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA,
    CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_RSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
    CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA,
];

/// Default supported groups.
pub const DEFAULT_NAMED_GROUPS: &[NamedGroup] = &[
    NamedGroup::X25519,
    NamedGroup::Secp256r1,
    NamedGroup::Secp384r1,
    NamedGroup::Secp521r1,
    NamedGroup::X448,
];

/// Default signature algorithms.
pub const DEFAULT_SIGNATURE_ALGORITHMS: &[SignatureScheme] = &[
    SignatureScheme::ecdsa_secp256r1_sha256,
    SignatureScheme::rsa_pss_rsae_sha256,
    SignatureScheme::rsa_pkcs1_sha256,
    SignatureScheme::ecdsa_secp384r1_sha384,
    SignatureScheme::rsa_pss_rsae_sha384,
    SignatureScheme::rsa_pkcs1_sha384,
    SignatureScheme::rsa_pss_rsae_sha512,
    SignatureScheme::rsa_pkcs1_sha512,
    SignatureScheme::rsa_pkcs1_sha1,
];

/// Chrome 131 cipher suites in exact order.
pub const CHROME_131_CIPHER_SUITES: &[CipherSuite] = &[
    CipherSuite::TLS_AES_128_GCM_SHA256,
    CipherSuite::TLS_AES_256_GCM_SHA384,
    CipherSuite::TLS_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA,
    CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA,
    CipherSuite::TLS_RSA_WITH_AES_128_GCM_SHA256,
    CipherSuite::TLS_RSA_WITH_AES_256_GCM_SHA384,
    CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
    CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA,
];

/// Chrome 131 signature algorithms.
pub const CHROME_131_SIGNATURE_ALGORITHMS: &[SignatureScheme] = &[
    SignatureScheme::ecdsa_secp256r1_sha256,
    SignatureScheme::rsa_pss_rsae_sha256,
    SignatureScheme::rsa_pkcs1_sha256,
    SignatureScheme::ecdsa_secp384r1_sha384,
    SignatureScheme::rsa_pss_rsae_sha384,
    SignatureScheme::rsa_pkcs1_sha384,
    SignatureScheme::rsa_pss_rsae_sha512,
    SignatureScheme::rsa_pkcs1_sha512,
];

/// Chrome 131 supported curves.
pub const CHROME_131_NAMED_GROUPS: &[NamedGroup] =
    &[NamedGroup::X25519, NamedGroup::Secp256r1, NamedGroup::Secp384r1];

/// Which host name, if any, goes into the server_name extension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SniPolicy {
    /// Send the host being connected to.
    #[default]
    Host,
    /// Send these names. The engine carries a single host_name, so only the
    /// first one reaches the wire.
    Names(Vec<String>),
    /// Omit the extension.
    Disabled,
}

/// Ordered handshake negotiation preferences.
///
/// Shared read-only between exchanges; build a new one instead of mutating a
/// profile other exchanges are using.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsProfile {
    versions: Vec<ProtocolVersion>,
    cipher_suites: Vec<CipherSuite>,
    named_groups: Vec<NamedGroup>,
    signature_algorithms: Vec<SignatureScheme>,
    sni: SniPolicy,
    grease: bool,
}

impl Default for TlsProfile {
    fn default() -> Self {
        Self {
            versions: DEFAULT_VERSIONS.to_vec(),
            cipher_suites: DEFAULT_CIPHER_SUITES.to_vec(),
            named_groups: DEFAULT_NAMED_GROUPS.to_vec(),
            signature_algorithms: DEFAULT_SIGNATURE_ALGORITHMS.to_vec(),
            sni: SniPolicy::Host,
            grease: false,
        }
    }
}

impl TlsProfile {
    /// Create a TLS profile for Chrome 131.
    pub fn chrome_131() -> Self {
        Self {
            versions: DEFAULT_VERSIONS.to_vec(),
            cipher_suites: CHROME_131_CIPHER_SUITES.to_vec(),
            named_groups: CHROME_131_NAMED_GROUPS.to_vec(),
            signature_algorithms: CHROME_131_SIGNATURE_ALGORITHMS.to_vec(),
            sni: SniPolicy::Host,
            grease: true,
        }
    }

    pub fn with_versions(mut self, versions: Vec<ProtocolVersion>) -> Self {
        self.versions = versions;
        self
    }

    pub fn with_cipher_suites(mut self, suites: Vec<CipherSuite>) -> Self {
        self.cipher_suites = suites;
        self
    }

    pub fn with_named_groups(mut self, groups: Vec<NamedGroup>) -> Self {
        self.named_groups = groups;
        self
    }

    pub fn with_signature_algorithms(mut self, algs: Vec<SignatureScheme>) -> Self {
        self.signature_algorithms = algs;
        self
    }

    /// Send exactly these names as SNI; `None` omits the extension.
    pub fn with_server_names(mut self, names: Option<Vec<String>>) -> Self {
        self.sni = match names {
            Some(names) => SniPolicy::Names(names),
            None => SniPolicy::Disabled,
        };
        self
    }

    pub fn with_sni(mut self, sni: SniPolicy) -> Self {
        self.sni = sni;
        self
    }

    pub fn with_grease(mut self, grease: bool) -> Self {
        self.grease = grease;
        self
    }

    pub fn versions(&self) -> &[ProtocolVersion] {
        &self.versions
    }

    pub fn cipher_suites(&self) -> &[CipherSuite] {
        &self.cipher_suites
    }

    pub fn named_groups(&self) -> &[NamedGroup] {
        &self.named_groups
    }

    pub fn signature_algorithms(&self) -> &[SignatureScheme] {
        &self.signature_algorithms
    }

    pub fn sni(&self) -> &SniPolicy {
        &self.sni
    }

    pub fn grease(&self) -> bool {
        self.grease
    }

    /// Server names sent for a connection to `host`.
    pub fn server_names(&self, host: &str) -> Option<Vec<String>> {
        match &self.sni {
            SniPolicy::Host => Some(vec![host.to_string()]),
            SniPolicy::Names(names) if !names.is_empty() => Some(names.clone()),
            SniPolicy::Names(_) | SniPolicy::Disabled => None,
        }
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<()> {
        if self.versions.is_empty() {
            return Err(Error::tls_config("profile has no protocol versions"));
        }
        if self.cipher_suites.is_empty() {
            return Err(Error::tls_config("profile has no cipher suites"));
        }
        if self.named_groups.is_empty() {
            return Err(Error::tls_config("profile has no named groups"));
        }
        if self.signature_algorithms.is_empty() {
            return Err(Error::tls_config("profile has no signature algorithms"));
        }

        // The engine takes a [min, max] range, so the set must not have holes.
        let mut codes: Vec<u16> = self.versions.iter().map(|v| v.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        if codes.windows(2).any(|w| w[1] != w[0] + 1) {
            return Err(Error::tls_config(format!(
                "protocol versions must be contiguous: {:?}",
                self.versions
            )));
        }
        Ok(())
    }

    /// Resolve the profile into what the engine is configured with for `host`.
    pub fn handshake_config(&self, host: &str) -> Result<HandshakeConfig> {
        self.validate()?;

        let min_version = self
            .versions
            .iter()
            .copied()
            .min_by_key(|v| v.code())
            .ok_or_else(|| Error::tls_config("profile has no protocol versions"))?;
        let max_version = self
            .versions
            .iter()
            .copied()
            .max_by_key(|v| v.code())
            .ok_or_else(|| Error::tls_config("profile has no protocol versions"))?;

        let (named_groups, dropped_groups): (Vec<NamedGroup>, Vec<NamedGroup>) = self
            .named_groups
            .iter()
            .copied()
            .partition(|g| g.engine_name().is_some());
        if named_groups.is_empty() {
            return Err(Error::tls_config(
                "none of the profile's named groups is supported by the TLS engine",
            ));
        }

        let cipher_list = self
            .cipher_suites
            .iter()
            .filter_map(|c| c.engine_name())
            .collect::<Vec<_>>()
            .join(":");
        if cipher_list.is_empty() && min_version != ProtocolVersion::Tls13 {
            return Err(Error::tls_config(
                "profile allows TLS 1.2 or lower but has no TLS 1.2 cipher suites",
            ));
        }

        let server_name = self
            .server_names(host)
            .and_then(|names| names.into_iter().next());

        Ok(HandshakeConfig {
            min_version,
            max_version,
            cipher_suites: self.cipher_suites.clone(),
            cipher_list,
            curves_list: named_groups
                .iter()
                .filter_map(|g| g.engine_name())
                .collect::<Vec<_>>()
                .join(":"),
            named_groups,
            dropped_groups,
            signature_algorithms: self.signature_algorithms.clone(),
            sigalgs_list: self
                .signature_algorithms
                .iter()
                .map(|s| s.as_str())
                .collect::<Vec<_>>()
                .join(":"),
            server_name,
            grease: self.grease,
        })
    }
}

/// The capability set handed to the TLS engine for one connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeConfig {
    pub min_version: ProtocolVersion,
    pub max_version: ProtocolVersion,
    /// Full offered order, TLS 1.3 suites included.
    pub cipher_suites: Vec<CipherSuite>,
    /// TLS 1.2 portion of `cipher_suites`, in engine syntax.
    pub cipher_list: String,
    /// Groups the engine can offer, in profile order.
    pub named_groups: Vec<NamedGroup>,
    /// Groups silently left out because the engine cannot offer them.
    pub dropped_groups: Vec<NamedGroup>,
    pub curves_list: String,
    pub signature_algorithms: Vec<SignatureScheme>,
    pub sigalgs_list: String,
    /// Host name for the server_name extension; `None` omits it.
    pub server_name: Option<String>,
    pub grease: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_shape() {
        let profile = TlsProfile::default();
        assert_eq!(
            profile.versions(),
            &[ProtocolVersion::Tls13, ProtocolVersion::Tls12]
        );
        assert_eq!(profile.cipher_suites().len(), 17);
        assert_eq!(profile.named_groups().len(), 5);
        assert_eq!(profile.named_groups()[0], NamedGroup::X25519);
        assert_eq!(profile.signature_algorithms().len(), 9);
        assert!(!profile.grease());
        assert!(profile.validate().is_ok());

        // AEAD first, static-RSA CBC last
        assert!(profile.cipher_suites()[0].is_tls13());
        assert_eq!(
            profile.cipher_suites()[16],
            CipherSuite::TLS_RSA_WITH_AES_256_CBC_SHA
        );
    }

    #[test]
    fn test_handshake_config_preserves_order() {
        let suites = vec![
            CipherSuite::TLS_RSA_WITH_AES_128_CBC_SHA,
            CipherSuite::TLS_AES_256_GCM_SHA384,
            CipherSuite::TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384,
            CipherSuite::TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256,
        ];
        let groups = vec![NamedGroup::Secp384r1, NamedGroup::X25519];
        let sigalgs = vec![
            SignatureScheme::rsa_pkcs1_sha1,
            SignatureScheme::ecdsa_secp256r1_sha256,
        ];
        let profile = TlsProfile::default()
            .with_cipher_suites(suites.clone())
            .with_named_groups(groups.clone())
            .with_signature_algorithms(sigalgs.clone());

        let config = profile.handshake_config("example.com").unwrap();
        assert_eq!(config.cipher_suites, suites);
        assert_eq!(
            config.cipher_list,
            "AES128-SHA:ECDHE-RSA-AES256-GCM-SHA384:ECDHE-ECDSA-AES128-GCM-SHA256"
        );
        assert_eq!(config.named_groups, groups);
        assert_eq!(config.curves_list, "P-384:X25519");
        assert_eq!(config.signature_algorithms, sigalgs);
        assert_eq!(config.sigalgs_list, "rsa_pkcs1_sha1:ecdsa_secp256r1_sha256");
    }

    #[test]
    fn test_unsupported_groups_are_dropped() {
        let config = TlsProfile::default().handshake_config("example.com").unwrap();
        assert_eq!(config.dropped_groups, vec![NamedGroup::X448]);
        assert_eq!(config.curves_list, "X25519:P-256:P-384:P-521");
    }

    #[test]
    fn test_only_unsupported_groups_is_error() {
        let profile = TlsProfile::default().with_named_groups(vec![NamedGroup::X448]);
        assert!(matches!(
            profile.handshake_config("example.com"),
            Err(Error::TlsConfig(_))
        ));
    }

    #[test]
    fn test_version_bounds() {
        let config = TlsProfile::default().handshake_config("example.com").unwrap();
        assert_eq!(config.min_version, ProtocolVersion::Tls12);
        assert_eq!(config.max_version, ProtocolVersion::Tls13);
    }

    #[test]
    fn test_validate_rejects_empty_and_gapped() {
        assert!(TlsProfile::default().with_versions(vec![]).validate().is_err());
        assert!(TlsProfile::default().with_cipher_suites(vec![]).validate().is_err());
        assert!(TlsProfile::default()
            .with_signature_algorithms(vec![])
            .validate()
            .is_err());
        assert!(TlsProfile::default()
            .with_versions(vec![ProtocolVersion::Tls13, ProtocolVersion::Tls11])
            .validate()
            .is_err());
    }

    #[test]
    fn test_tls13_only_suites_need_tls13_only_versions() {
        let suites = vec![CipherSuite::TLS_AES_128_GCM_SHA256];
        let profile = TlsProfile::default().with_cipher_suites(suites.clone());
        assert!(profile.handshake_config("example.com").is_err());

        let profile = profile.with_versions(vec![ProtocolVersion::Tls13]);
        let config = profile.handshake_config("example.com").unwrap();
        assert!(config.cipher_list.is_empty());
        assert_eq!(config.cipher_suites, suites);
    }

    #[test]
    fn test_sni_policies() {
        let profile = TlsProfile::default();
        assert_eq!(
            profile.handshake_config("example.com").unwrap().server_name,
            Some("example.com".to_string())
        );

        let profile = profile.with_server_names(None);
        assert_eq!(profile.handshake_config("example.com").unwrap().server_name, None);

        let profile = profile.with_server_names(Some(vec![
            "front.example.net".to_string(),
            "other.example.net".to_string(),
        ]));
        assert_eq!(
            profile.handshake_config("example.com").unwrap().server_name,
            Some("front.example.net".to_string())
        );
    }

    #[test]
    fn test_signature_scheme_pairs() {
        assert_eq!(
            SignatureScheme::ecdsa_secp256r1_sha256.hash_and_signature(),
            (4, 3)
        );
        assert_eq!(SignatureScheme::rsa_pkcs1_sha1.hash_and_signature(), (2, 1));
        assert_eq!(
            SignatureScheme::rsa_pss_rsae_sha512.hash_and_signature(),
            (8, 6)
        );
    }

    #[test]
    fn test_chrome_131_profile() {
        let profile = TlsProfile::chrome_131();
        assert_eq!(profile.cipher_suites().len(), 15);
        assert_eq!(profile.named_groups(), CHROME_131_NAMED_GROUPS);
        assert!(profile.grease());
    }
}
