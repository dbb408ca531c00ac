use std::sync::Arc;
use std::time::Duration;

use boring::ssl::SslAcceptor;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::time::timeout;

/// How the server ends each connection after writing its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseMode {
    /// Send close_notify, then close TCP.
    CloseNotify,
    /// Close TCP without close_notify.
    Abrupt,
}

/// One-request-per-connection HTTPS mock server.
pub struct MockTlsServer {
    listener: TcpListener,
    port: u16,
}

impl MockTlsServer {
    /// Create a new mock server bound to a random port.
    pub async fn new() -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let port = listener.local_addr()?.port();
        Ok(Self { listener, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// URL for `path` on this server. The port is configured on the client.
    pub fn url(&self, path: &str) -> String {
        format!("https://127.0.0.1{}", path)
    }

    /// Serve a single connection with a canned response.
    ///
    /// Resolves to the raw request bytes the server received.
    pub fn serve_once(
        self,
        acceptor: SslAcceptor,
        response: Vec<u8>,
        close: CloseMode,
    ) -> tokio::task::JoinHandle<Vec<u8>> {
        tokio::spawn(async move {
            let mut requests = self
                .serve_with(acceptor, 1, close, move |_| response.clone())
                .await
                .expect("serve task panicked");
            requests.pop().unwrap_or_default()
        })
    }

    /// Serve `connections` connections, building each response from its request.
    ///
    /// Resolves to the raw requests in completion order.
    pub fn serve_with<F>(
        self,
        acceptor: SslAcceptor,
        connections: usize,
        close: CloseMode,
        handler: F,
    ) -> tokio::task::JoinHandle<Vec<Vec<u8>>>
    where
        F: Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    {
        let acceptor = Arc::new(acceptor);
        let handler = Arc::new(handler);
        tokio::spawn(async move {
            let mut tasks = Vec::with_capacity(connections);
            for _ in 0..connections {
                let (tcp, _) = match self.listener.accept().await {
                    Ok(conn) => conn,
                    Err(e) => {
                        tracing::error!("Accept error: {}", e);
                        break;
                    }
                };
                let acceptor = Arc::clone(&acceptor);
                let handler = Arc::clone(&handler);
                tasks.push(tokio::spawn(async move {
                    let mut stream = match tokio_boring::accept(&acceptor, tcp).await {
                        Ok(stream) => stream,
                        Err(e) => {
                            tracing::debug!("Server handshake failed: {}", e);
                            return Vec::new();
                        }
                    };

                    let request = match timeout(Duration::from_secs(5), read_request(&mut stream))
                        .await
                    {
                        Ok(Ok(request)) => request,
                        _ => return Vec::new(),
                    };

                    let response = handler(&request);
                    if stream.write_all(&response).await.is_err() {
                        return request;
                    }
                    let _ = stream.flush().await;

                    match close {
                        CloseMode::CloseNotify => {
                            let _ = stream.shutdown().await;
                        }
                        CloseMode::Abrupt => {
                            let _ = stream.get_mut().shutdown().await;
                        }
                    }
                    request
                }));
            }

            let mut requests = Vec::with_capacity(tasks.len());
            for task in tasks {
                requests.push(task.await.unwrap_or_default());
            }
            requests
        })
    }
}

/// Read one request: headers, then `Content-Length` bytes of body.
async fn read_request<S: AsyncRead + Unpin>(stream: &mut S) -> std::io::Result<Vec<u8>> {
    let mut data = Vec::new();
    let mut buf = [0u8; 4096];
    loop {
        if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&data[..end]).to_string();
            let content_length = head
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    if name.eq_ignore_ascii_case("content-length") {
                        value.trim().parse::<usize>().ok()
                    } else {
                        None
                    }
                })
                .unwrap_or(0);
            if data.len() >= end + 4 + content_length {
                return Ok(data);
            }
        }

        let n = stream.read(&mut buf).await?;
        if n == 0 {
            return Ok(data);
        }
        data.extend_from_slice(&buf[..n]);
    }
}

/// A `Content-Length` framed response.
pub fn response_with_body(status_line: &str, headers: &[(&str, &str)], body: &[u8]) -> Vec<u8> {
    let mut out = format!("{}\r\n", status_line).into_bytes();
    for (name, value) in headers {
        out.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
    }
    out.extend_from_slice(format!("Content-Length: {}\r\n\r\n", body.len()).as_bytes());
    out.extend_from_slice(body);
    out
}

/// Split `body` into chunks of `chunk_size` with chunked framing.
pub fn chunked(body: &[u8], chunk_size: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for chunk in body.chunks(chunk_size) {
        out.extend_from_slice(format!("{:X}\r\n", chunk.len()).as_bytes());
        out.extend_from_slice(chunk);
        out.extend_from_slice(b"\r\n");
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}
