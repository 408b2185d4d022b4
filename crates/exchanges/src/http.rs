//! HTTP transport
//!
//! Adapters only need `send(request) -> {status, body}`. [`HttpTransport`] is
//! that capability; [`MonoioHttpsClient`] implements it over monoio TCP and
//! rustls, one connection per request (`Connection: close`).

use crate::errors::{ExchangeError, Result};
use async_trait::async_trait;
use monoio::io::{AsyncReadRent, AsyncWriteRentExt};
use monoio::net::TcpStream;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection};
use std::io::{Read, Write};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully built request, ready for the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Outbound HTTP capability consumed by the exchange adapters.
///
/// Implementations report connection-level failures as
/// [`ExchangeError::Transport`] and hand back every HTTP response, whatever
/// its status; interpreting the status is the adapter's job.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// monoio-native HTTPS client
pub struct MonoioHttpsClient {
    tls_config: Arc<ClientConfig>,
}

impl MonoioHttpsClient {
    pub fn new() -> Self {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();

        Self {
            tls_config: Arc::new(tls_config),
        }
    }

    async fn connect(&self, host: &str, port: u16) -> Result<TlsStream> {
        let tcp_stream = TcpStream::connect(format!("{host}:{port}"))
            .await
            .map_err(|e| ExchangeError::Transport(format!("TCP connect to {host}:{port} failed: {e}")))?;

        let server_name = ServerName::try_from(host.to_string())
            .map_err(|e| ExchangeError::Transport(format!("Invalid server name {host}: {e:?}")))?;

        let tls_conn = ClientConnection::new(self.tls_config.clone(), server_name)
            .map_err(|e| ExchangeError::Transport(format!("TLS setup failed: {e}")))?;

        Ok(TlsStream::new(tcp_stream, tls_conn))
    }
}

impl Default for MonoioHttpsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MonoioHttpsClient {
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let target = HttpsTarget::parse(&request.url)?;
        let (host, path_and_query) = (target.host.as_str(), target.path_and_query.as_str());

        let mut tls_stream = self.connect(host, target.port).await?;

        let body = request.body.as_deref().unwrap_or("");
        let mut wire = format!(
            "{method} {path_and_query} HTTP/1.1\r\n\
             Host: {host}\r\n\
             User-Agent: bestex/0.1\r\n\
             Accept: application/json\r\n\
             Connection: close\r\n\
             Content-Length: {length}\r\n",
            method = request.method,
            length = body.len(),
        );
        for (key, value) in &request.headers {
            wire.push_str(&format!("{key}: {value}\r\n"));
        }
        wire.push_str("\r\n");
        wire.push_str(body);

        tls_stream.write_all(wire.as_bytes()).await?;
        let raw = tls_stream.read_to_end().await?;

        parse_http_response(&raw)
    }
}

/// Where a request goes on the wire. Only `https` is spoken.
#[derive(Debug, PartialEq)]
struct HttpsTarget {
    host: String,
    port: u16,
    path_and_query: String,
}

impl HttpsTarget {
    fn parse(raw: &str) -> Result<Self> {
        let url = url::Url::parse(raw)?;
        if url.scheme() != "https" {
            return Err(ExchangeError::InvalidUrl(format!("{raw}: only https is supported")));
        }
        let host = url
            .host_str()
            .ok_or_else(|| ExchangeError::InvalidUrl(format!("No host in {raw}")))?
            .to_string();
        let port = url.port_or_known_default().unwrap_or(443);

        let mut path_and_query = url.path().to_string();
        if path_and_query.is_empty() {
            path_and_query.push('/');
        }
        if let Some(query) = url.query() {
            path_and_query.push('?');
            path_and_query.push_str(query);
        }

        Ok(Self { host, port, path_and_query })
    }
}

/// Parse a complete HTTP/1.1 response read until connection close
pub fn parse_http_response(data: &[u8]) -> Result<HttpResponse> {
    let header_end = find_subslice(data, b"\r\n\r\n")
        .ok_or_else(|| ExchangeError::Transport("Invalid HTTP response: no header terminator".to_string()))?;

    let header_part = String::from_utf8_lossy(&data[..header_end]);
    let body_bytes = &data[header_end + 4..];

    let mut lines = header_part.lines();
    let status_line = lines
        .next()
        .ok_or_else(|| ExchangeError::Transport("Empty HTTP response".to_string()))?;
    let status = status_line
        .split_whitespace()
        .nth(1)
        .and_then(|s| s.parse::<u16>().ok())
        .ok_or_else(|| ExchangeError::Transport(format!("Invalid status line: {status_line}")))?;

    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let chunked = headers.iter().any(|(k, v)| {
        k.eq_ignore_ascii_case("transfer-encoding") && v.to_ascii_lowercase().contains("chunked")
    });
    let body = if chunked {
        decode_chunked(body_bytes)?
    } else {
        body_bytes.to_vec()
    };

    Ok(HttpResponse {
        status,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(data.len());
    loop {
        let line_end = find_subslice(data, b"\r\n")
            .ok_or_else(|| ExchangeError::Transport("Truncated chunk size line".to_string()))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        // Chunk extensions follow a ';'
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| ExchangeError::Transport(format!("Invalid chunk size: {size_hex}")))?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(out);
        }
        if data.len() < size {
            return Err(ExchangeError::Transport("Truncated chunk body".to_string()));
        }
        out.extend_from_slice(&data[..size]);
        data = data.get(size + 2..).unwrap_or(&[]);
    }
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// rustls connection driven over a monoio TCP stream
struct TlsStream {
    stream: TcpStream,
    tls_conn: ClientConnection,
    write_buf: Vec<u8>,
    handshake_complete: bool,
}

impl TlsStream {
    fn new(stream: TcpStream, tls_conn: ClientConnection) -> Self {
        Self {
            stream,
            tls_conn,
            write_buf: Vec::with_capacity(8192),
            handshake_complete: false,
        }
    }

    async fn flush_tls(&mut self) -> Result<()> {
        while self.tls_conn.wants_write() {
            self.write_buf.clear();
            self.tls_conn
                .write_tls(&mut self.write_buf)
                .map_err(|e| ExchangeError::Transport(format!("TLS write failed: {e}")))?;

            if !self.write_buf.is_empty() {
                let (result, _) = self.stream.write_all(self.write_buf.clone()).await;
                result.map_err(|e| ExchangeError::Transport(format!("TCP write failed: {e}")))?;
            }
        }
        Ok(())
    }

    /// Read one TCP segment into rustls. Returns false on EOF.
    async fn fill_tls(&mut self) -> Result<bool> {
        let buffer = vec![0u8; 4096];
        let (result, buf) = self.stream.read(buffer).await;
        let bytes_read = result.map_err(|e| ExchangeError::Transport(format!("TCP read failed: {e}")))?;
        if bytes_read == 0 {
            return Ok(false);
        }

        self.tls_conn
            .read_tls(&mut std::io::Cursor::new(&buf[..bytes_read]))
            .map_err(|e| ExchangeError::Transport(format!("TLS read failed: {e}")))?;
        self.tls_conn
            .process_new_packets()
            .map_err(|e| ExchangeError::Transport(format!("TLS process failed: {e}")))?;
        Ok(true)
    }

    async fn complete_handshake(&mut self) -> Result<()> {
        if self.handshake_complete {
            return Ok(());
        }

        loop {
            self.flush_tls().await?;

            if !self.tls_conn.is_handshaking() {
                self.handshake_complete = true;
                return Ok(());
            }

            if self.tls_conn.wants_read() {
                if !self.fill_tls().await? {
                    return Err(ExchangeError::Transport("Connection closed during TLS handshake".to_string()));
                }
            } else if !self.tls_conn.wants_write() {
                return Err(ExchangeError::Transport("TLS handshake stalled".to_string()));
            }
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> Result<()> {
        self.complete_handshake().await?;

        self.tls_conn
            .writer()
            .write_all(data)
            .map_err(|e| ExchangeError::Transport(format!("TLS application write failed: {e}")))?;

        self.flush_tls().await
    }

    async fn read_to_end(&mut self) -> Result<Vec<u8>> {
        self.complete_handshake().await?;

        let mut response = Vec::new();
        let mut plain = vec![0u8; 4096];

        loop {
            match self.tls_conn.reader().read(&mut plain) {
                Ok(0) => {}
                Ok(n) => {
                    response.extend_from_slice(&plain[..n]);
                    continue;
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {}
                // Peer closed TCP without close_notify; keep what arrived
                Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => break,
                Err(e) => return Err(ExchangeError::Transport(format!("TLS read failed: {e}"))),
            }

            if !self.fill_tls().await? {
                break;
            }
        }

        Ok(response)
    }
}

#[cfg(any(test, feature = "testing"))]
pub mod mock {
    //! Scripted transport for tests: canned responses keyed by method and URL fragment

    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Clone)]
    enum Reply {
        Respond(HttpResponse),
        Fail(String),
    }

    #[derive(Default)]
    pub struct ScriptedTransport {
        routes: Mutex<Vec<(HttpMethod, String, Reply)>>,
        requests: Mutex<Vec<HttpRequest>>,
    }

    impl ScriptedTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Answer requests whose URL contains `fragment` with `status` and `body`.
        /// Later scripts for the same fragment take precedence.
        pub fn respond(&self, method: HttpMethod, fragment: &str, status: u16, body: &str) {
            let response = HttpResponse {
                status,
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: body.to_string(),
            };
            self.push(method, fragment, Reply::Respond(response));
        }

        pub fn respond_json(&self, method: HttpMethod, fragment: &str, status: u16, body: serde_json::Value) {
            self.respond(method, fragment, status, &body.to_string());
        }

        /// Fail requests whose URL contains `fragment` at the connection level
        pub fn fail(&self, method: HttpMethod, fragment: &str, message: &str) {
            self.push(method, fragment, Reply::Fail(message.to_string()));
        }

        /// Every request sent so far, in order
        pub fn requests(&self) -> Vec<HttpRequest> {
            self.requests.lock().map(|r| r.clone()).unwrap_or_default()
        }

        pub fn requests_matching(&self, method: HttpMethod, fragment: &str) -> Vec<HttpRequest> {
            self.requests()
                .into_iter()
                .filter(|r| r.method == method && r.url.contains(fragment))
                .collect()
        }

        fn push(&self, method: HttpMethod, fragment: &str, reply: Reply) {
            if let Ok(mut routes) = self.routes.lock() {
                routes.insert(0, (method, fragment.to_string(), reply));
            }
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
            if let Ok(mut requests) = self.requests.lock() {
                requests.push(request.clone());
            }

            let reply = self.routes.lock().ok().and_then(|routes| {
                routes
                    .iter()
                    .find(|(method, fragment, _)| *method == request.method && request.url.contains(fragment.as_str()))
                    .map(|(_, _, reply)| reply.clone())
            });

            match reply {
                Some(Reply::Respond(response)) => Ok(response),
                Some(Reply::Fail(message)) => Err(ExchangeError::Transport(message)),
                None => Err(ExchangeError::Transport(format!(
                    "no scripted response for {} {}",
                    request.method, request.url
                ))),
            }
        }
    }
}
