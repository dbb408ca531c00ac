use std::time::Duration;

use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::time::timeout;

use shroud::fingerprint::TlsProfile;
use shroud::transport::TlsConnector;

pub const EXT_SERVER_NAME: u16 = 0x0000;
pub const EXT_SUPPORTED_GROUPS: u16 = 0x000a;
pub const EXT_SIGNATURE_ALGORITHMS: u16 = 0x000d;
pub const EXT_SUPPORTED_VERSIONS: u16 = 0x002b;

/// Fields of a ClientHello as sent on the wire.
#[derive(Debug, Clone)]
pub struct ClientHello {
    pub cipher_suites: Vec<u16>,
    pub extensions: Vec<(u16, Vec<u8>)>,
}

/// GREASE values have the form 0x?A?A (RFC 8701).
pub fn is_grease(value: u16) -> bool {
    value & 0x0f0f == 0x0a0a && value >> 8 == value & 0xff
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn bytes(&mut self, n: usize) -> &'a [u8] {
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        out
    }

    fn u8(&mut self) -> u8 {
        self.bytes(1)[0]
    }

    fn u16(&mut self) -> u16 {
        let b = self.bytes(2);
        u16::from_be_bytes([b[0], b[1]])
    }

    fn u24(&mut self) -> usize {
        let b = self.bytes(3);
        (b[0] as usize) << 16 | (b[1] as usize) << 8 | b[2] as usize
    }

    fn u16_list(data: &[u8]) -> Vec<u16> {
        data.chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect()
    }

    fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }
}

impl ClientHello {
    /// Parse a ClientHello handshake message (without the record header).
    pub fn parse(handshake: &[u8]) -> Self {
        let mut r = Reader::new(handshake);
        assert_eq!(r.u8(), 0x01, "not a ClientHello");
        let len = r.u24();
        let mut r = Reader::new(r.bytes(len));

        r.bytes(2); // legacy_version
        r.bytes(32); // random
        let session_id_len = r.u8() as usize;
        r.bytes(session_id_len);
        let suites_len = r.u16() as usize;
        let cipher_suites = Reader::u16_list(r.bytes(suites_len));
        let compression_len = r.u8() as usize;
        r.bytes(compression_len);

        let mut extensions = Vec::new();
        if !r.is_empty() {
            let ext_len = r.u16() as usize;
            let mut ext = Reader::new(r.bytes(ext_len));
            while !ext.is_empty() {
                let ty = ext.u16();
                let len = ext.u16() as usize;
                extensions.push((ty, ext.bytes(len).to_vec()));
            }
        }

        Self {
            cipher_suites,
            extensions,
        }
    }

    pub fn extension(&self, ty: u16) -> Option<&[u8]> {
        self.extensions
            .iter()
            .find(|(t, _)| *t == ty)
            .map(|(_, data)| data.as_slice())
    }

    /// Cipher suites with GREASE values removed.
    pub fn real_cipher_suites(&self) -> Vec<u16> {
        self.cipher_suites
            .iter()
            .copied()
            .filter(|c| !is_grease(*c))
            .collect()
    }

    pub fn supported_groups(&self) -> Vec<u16> {
        self.extension(EXT_SUPPORTED_GROUPS)
            .map(|data| Reader::u16_list(&data[2..]))
            .unwrap_or_default()
            .into_iter()
            .filter(|g| !is_grease(*g))
            .collect()
    }

    pub fn signature_algorithms(&self) -> Vec<u16> {
        self.extension(EXT_SIGNATURE_ALGORITHMS)
            .map(|data| Reader::u16_list(&data[2..]))
            .unwrap_or_default()
    }

    pub fn supported_versions(&self) -> Vec<u16> {
        self.extension(EXT_SUPPORTED_VERSIONS)
            .map(|data| Reader::u16_list(&data[1..]))
            .unwrap_or_default()
            .into_iter()
            .filter(|v| !is_grease(*v))
            .collect()
    }

    /// First host_name in the server_name extension.
    pub fn server_name(&self) -> Option<String> {
        let data = self.extension(EXT_SERVER_NAME)?;
        let mut r = Reader::new(data);
        r.u16(); // server_name_list length
        assert_eq!(r.u8(), 0, "expected host_name entry");
        let len = r.u16() as usize;
        Some(String::from_utf8_lossy(r.bytes(len)).into_owned())
    }
}

/// Connect with `profile` to a plain TCP listener and capture the ClientHello.
///
/// The listener never answers, so the client's handshake fails once the
/// socket is dropped; only the first flight matters here.
pub async fn capture_client_hello(profile: TlsProfile, host: &str) -> ClientHello {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let host = host.to_string();
    let client = tokio::spawn(async move {
        let connector = TlsConnector::new(std::sync::Arc::new(profile));
        let _ = connector.connect(&host, port).await;
    });

    let (mut tcp, _) = timeout(Duration::from_secs(5), listener.accept())
        .await
        .expect("client never connected")
        .unwrap();

    let mut handshake = Vec::new();
    // Read records until the whole handshake message is buffered.
    loop {
        let mut header = [0u8; 5];
        tcp.read_exact(&mut header).await.unwrap();
        assert_eq!(header[0], 0x16, "expected a handshake record");
        let len = u16::from_be_bytes([header[3], header[4]]) as usize;
        let mut record = vec![0u8; len];
        tcp.read_exact(&mut record).await.unwrap();
        handshake.extend_from_slice(&record);

        if handshake.len() >= 4 {
            let msg_len = (handshake[1] as usize) << 16
                | (handshake[2] as usize) << 8
                | handshake[3] as usize;
            if handshake.len() >= 4 + msg_len {
                break;
            }
        }
    }

    drop(tcp);
    let _ = client.await;
    ClientHello::parse(&handshake)
}
