//! src/crawler/http.rs
//!
//! The fetch engine: IPv4 DNS resolution, a fresh-connection HTTP/1.0
//! client, and the bounded response reader.
//!
//! Every socket await (connect, send, read) is raced against a 10-second
//! sleep, and the reader additionally enforces a byte cap and a 10-second
//! wall-clock cap for the whole response. The network is adversarial:
//! slow peers, tarpits, and multi-gigabyte bodies all have to fail the
//! URL without stalling the worker for more than the bounds allow.

use memchr::{memchr, memmem};
use std::io;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, lookup_host};
use tokio::time::sleep;

/// Download cap for the `HEAD /robots.txt` probe.
pub const ROBOTS_BYTE_LIMIT: usize = 16 * 1024;
/// Download cap for the page fetch.
pub const PAGE_BYTE_LIMIT: usize = 2 * 1024 * 1024;

/// Bound applied to each connect/send/read await.
const IO_TIMEOUT: Duration = Duration::from_secs(10);
/// Wall-clock cap for receiving one whole response.
const TOTAL_TIMEOUT: Duration = Duration::from_secs(10);

const INITIAL_BUF_SIZE: usize = 1024;
const GROW_THRESHOLD: usize = 128;

/// Resolve `host` to its first IPv4 address via the OS resolver.
///
/// IPv6 results are skipped; a host with no A record is an error (and
/// therefore a discard for the calling worker).
pub async fn resolve_ipv4(host: &str, port: u16) -> io::Result<Ipv4Addr> {
    lookup_host((host, port))
        .await?
        .find_map(|addr| match addr {
            SocketAddr::V4(v4) => Some(*v4.ip()),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no IPv4 address"))
}

/// One fully received HTTP response.
pub struct Response {
    raw: Vec<u8>,
    status: u16,
}

impl Response {
    /// Status-line code, or 0 when the response was not parseable.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Total bytes received, headers included.
    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// The bytes after the end of the response headers (`\r\n\r\n`), or
    /// `None` when no header terminator was received.
    pub fn body(&self) -> Option<&[u8]> {
        memmem::find(&self.raw, b"\r\n\r\n").map(|idx| &self.raw[idx + 4..])
    }
}

/// The status code is the integer between the first and second space of
/// the response; anything that doesn't parse that way is 0.
fn extract_status(raw: &[u8]) -> u16 {
    let Some(first) = memchr(b' ', raw) else {
        return 0;
    };
    let rest = &raw[first + 1..];
    let Some(second) = memchr(b' ', rest) else {
        return 0;
    };
    std::str::from_utf8(&rest[..second])
        .ok()
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Growable receive buffer.
///
/// Starts at 1 KiB and doubles whenever free space falls below 128
/// bytes. One byte of capacity is always held back from recv sizing
/// (headroom the original wire format reserved for a terminator); the
/// received bytes themselves are consumed as a length-delimited slice.
struct RecvBuffer {
    buf: Vec<u8>,
    pos: usize,
}

impl RecvBuffer {
    fn new() -> Self {
        Self {
            buf: vec![0u8; INITIAL_BUF_SIZE],
            pos: 0,
        }
    }

    fn reset(&mut self) {
        self.pos = 0;
    }

    fn grow(&mut self) {
        let new_size = self.buf.len() * 2;
        self.buf.resize(new_size, 0);
    }

    /// Writable room, excluding the held-back byte.
    fn free_space(&self) -> usize {
        self.buf.len() - self.pos - 1
    }

    fn filled(&self) -> &[u8] {
        &self.buf[..self.pos]
    }
}

/// HTTP/1.0 client owned by one worker.
///
/// Holds at most one TCP connection at a time; `connect` drops the
/// previous one, so the robots probe and the page fetch each run on a
/// fresh connection (the request carries `Connection: close` and the
/// response ends at EOF).
pub struct HttpClient {
    stream: Option<TcpStream>,
    buf: RecvBuffer,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            stream: None,
            buf: RecvBuffer::new(),
        }
    }

    /// Open a connection to the pre-resolved address, bounded by the I/O
    /// timeout. Any previously held connection is closed first.
    pub async fn connect(&mut self, ip: Ipv4Addr, port: u16) -> io::Result<()> {
        self.stream = None;

        let addr = SocketAddr::V4(SocketAddrV4::new(ip, port));
        let stream = tokio::select! {
            biased;

            result = TcpStream::connect(addr) => result?,
            _ = sleep(IO_TIMEOUT) => {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "connect timeout"));
            }
        };

        self.stream = Some(stream);
        Ok(())
    }

    /// Transmit the fixed-form HTTP/1.0 request:
    ///
    /// ```text
    /// <METHOD> <path> HTTP/1.0\r\n
    /// Host: <host>\r\n
    /// Connection: close\r\n
    /// User-agent: ahmadCrawler/1.3\r\n
    /// \r\n
    /// ```
    pub async fn send(&mut self, host: &str, path: &str, method: &str) -> io::Result<()> {
        let request = format!(
            "{method} {path} HTTP/1.0\r\nHost: {host}\r\nConnection: close\r\nUser-agent: ahmadCrawler/1.3\r\n\r\n"
        );

        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "send before connect"))?;

        tokio::select! {
            biased;

            result = stream.write_all(request.as_bytes()) => result,
            _ = sleep(IO_TIMEOUT) => {
                Err(io::Error::new(io::ErrorKind::TimedOut, "write timeout"))
            }
        }
    }

    /// Read the whole response (until peer EOF) through the bounded
    /// reader, then extract the status code.
    ///
    /// Fails when:
    ///   - accumulated bytes exceed `limit`,
    ///   - a single read waits longer than 10 seconds,
    ///   - the whole download takes longer than 10 seconds,
    ///   - or the transport reports any error.
    pub async fn receive(&mut self, limit: usize) -> io::Result<Response> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "receive before connect"))?;

        self.buf.reset();
        let start = Instant::now();

        loop {
            // Ensure there is writable room beyond the held-back byte.
            if self.buf.free_space() == 0 {
                self.buf.grow();
            }

            let free_end = self.buf.buf.len() - 1;
            let n = tokio::select! {
                biased;

                result = stream.read(&mut self.buf.buf[self.buf.pos..free_end]) => result?,
                _ = sleep(IO_TIMEOUT) => {
                    return Err(io::Error::new(io::ErrorKind::TimedOut, "read timeout"));
                }
            };

            if n == 0 {
                // Peer closed the connection: normal end of an HTTP/1.0
                // response.
                break;
            }
            self.buf.pos += n;

            if self.buf.pos > limit {
                return Err(io::Error::other("response exceeded byte limit"));
            }

            if start.elapsed() > TOTAL_TIMEOUT {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "slow download"));
            }

            if self.buf.free_space() < GROW_THRESHOLD {
                self.buf.grow();
            }
        }

        let raw = self.buf.filled().to_vec();
        let status = extract_status(&raw);
        Ok(Response { raw, status })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;
    use tokio::sync::oneshot;

    const LOCALHOST: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);

    /// Serve exactly one connection: write `response`, then close. The
    /// request, if any, is left unread so the client never blocks on us.
    async fn serve_once(response: Vec<u8>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            sock.write_all(&response).await.unwrap();
        });
        port
    }

    /// Serve one connection: capture the request up to the blank line,
    /// hand it to the test through `tx`, then respond 200 and close.
    async fn serve_echoing_request(tx: oneshot::Sender<Vec<u8>>) -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        tokio::spawn(async move {
            let (mut sock, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 512];
            while memmem::find(&request, b"\r\n\r\n").is_none() {
                let n = sock.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            tx.send(request).unwrap();
            sock.write_all(b"HTTP/1.0 200 OK\r\n\r\n").await.unwrap();
        });
        port
    }

    #[tokio::test]
    async fn receives_status_and_body() {
        let payload = b"HTTP/1.0 200 OK\r\nContent-Type: text/html\r\n\r\nhi";
        let port = serve_once(payload.to_vec()).await;

        let mut client = HttpClient::new();
        client.connect(LOCALHOST, port).await.unwrap();
        let response = client.receive(PAGE_BYTE_LIMIT).await.unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), Some(&b"hi"[..]));
        assert_eq!(response.len(), payload.len());
    }

    #[tokio::test]
    async fn missing_header_terminator_has_no_body() {
        let port = serve_once(b"HTTP/1.0 204 No Content\r\n".to_vec()).await;

        let mut client = HttpClient::new();
        client.connect(LOCALHOST, port).await.unwrap();
        let response = client.receive(PAGE_BYTE_LIMIT).await.unwrap();

        assert_eq!(response.status(), 204);
        assert_eq!(response.body(), None);
    }

    #[tokio::test]
    async fn malformed_status_line_yields_zero() {
        for bytes in [
            &b"garbage with no structure"[..],
            &b"HTTP/1.0 abc OK\r\n\r\n"[..],
            &b"one-token-only"[..],
            &b""[..],
        ] {
            let port = serve_once(bytes.to_vec()).await;
            let mut client = HttpClient::new();
            client.connect(LOCALHOST, port).await.unwrap();
            let response = client.receive(PAGE_BYTE_LIMIT).await.unwrap();
            assert_eq!(response.status(), 0, "input: {:?}", bytes);
        }
    }

    #[tokio::test]
    async fn oversized_response_is_rejected() {
        let mut big = b"HTTP/1.0 200 OK\r\n\r\n".to_vec();
        big.extend(std::iter::repeat_n(b'x', 4096));
        let port = serve_once(big).await;

        let mut client = HttpClient::new();
        client.connect(LOCALHOST, port).await.unwrap();
        assert!(client.receive(1024).await.is_err());
    }

    #[tokio::test]
    async fn buffer_grows_past_initial_capacity() {
        let mut long = b"HTTP/1.0 200 OK\r\n\r\n".to_vec();
        long.extend(std::iter::repeat_n(b'a', 64 * 1024));
        let expected_len = long.len();
        let port = serve_once(long).await;

        let mut client = HttpClient::new();
        client.connect(LOCALHOST, port).await.unwrap();
        let response = client.receive(PAGE_BYTE_LIMIT).await.unwrap();
        assert_eq!(response.len(), expected_len);
    }

    #[tokio::test]
    async fn request_is_verbatim_http_10() {
        let (tx, rx) = oneshot::channel();
        let port = serve_echoing_request(tx).await;

        let mut client = HttpClient::new();
        client.connect(LOCALHOST, port).await.unwrap();
        client.send("example.test", "/robots.txt", "HEAD").await.unwrap();
        let response = client.receive(ROBOTS_BYTE_LIMIT).await.unwrap();
        assert_eq!(response.status(), 200);

        let request = rx.await.unwrap();
        assert_eq!(
            request,
            b"HEAD /robots.txt HTTP/1.0\r\nHost: example.test\r\nConnection: close\r\nUser-agent: ahmadCrawler/1.3\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn refused_connection_is_an_error() {
        // Grab a free port, then close the listener before connecting.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut client = HttpClient::new();
        assert!(client.connect(LOCALHOST, port).await.is_err());
    }

    #[tokio::test]
    async fn send_without_connect_fails() {
        let mut client = HttpClient::new();
        assert!(client.send("h", "/", "GET").await.is_err());
    }

    #[tokio::test]
    async fn resolves_loopback_to_ipv4() {
        let ip = resolve_ipv4("127.0.0.1", 80).await.unwrap();
        assert_eq!(ip, LOCALHOST);
    }

    #[tokio::test]
    async fn unresolvable_host_is_an_error() {
        assert!(resolve_ipv4("definitely-not-a-real-host.invalid", 80).await.is_err());
    }

    #[test]
    fn status_extraction_uses_second_token() {
        assert_eq!(extract_status(b"HTTP/1.0 200 OK\r\n"), 200);
        assert_eq!(extract_status(b"HTTP/1.1 301 Moved Permanently\r\n"), 301);
        assert_eq!(extract_status(b"HTTP/1.0 200\r\n"), 0); // no second space
        assert_eq!(extract_status(b"HTTP/1.0  200 OK\r\n"), 0); // empty token
        assert_eq!(extract_status(b"junk"), 0);
    }
}
