use crate::network::error::ConnError;
use crate::network::{Connection, Read, Write};
use heapless::Vec;

/// Largest request [`Request::encode`] will frame.
pub const MAX_REQUEST_LEN: usize = 2048;
/// Size of the fixed buffer each read fills before it is appended to the
/// response.
pub const READ_CHUNK_LEN: usize = 4096;

const MAX_HEADERS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
        }
    }
}

/// A request line plus the `Host` header. `Connection: close` is always sent
/// and no other headers are added.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'a> {
    pub method: Method,
    pub path: &'a str,
    pub host: &'a str,
}

impl<'a> Request<'a> {
    pub fn get(path: &'a str, host: &'a str) -> Self {
        Self {
            method: Method::Get,
            path,
            host,
        }
    }

    /// Frames the request into its wire bytes.
    ///
    /// Fails with [`ConnError::ProtocolError`] if the path or host contains a
    /// line break, or if the request would exceed [`MAX_REQUEST_LEN`].
    pub fn encode(&self) -> Result<Vec<u8, MAX_REQUEST_LEN>, ConnError> {
        if has_line_break(self.path) || has_line_break(self.host) {
            return Err(ConnError::ProtocolError);
        }

        let mut buf: Vec<u8, MAX_REQUEST_LEN> = Vec::new();
        for part in [
            self.method.as_str(),
            " ",
            self.path,
            " HTTP/1.1\r\nHost: ",
            self.host,
            "\r\nConnection: close\r\n\r\n",
        ] {
            buf.extend_from_slice(part.as_bytes())
                .map_err(|_| ConnError::ProtocolError)?;
        }
        Ok(buf)
    }
}

fn has_line_break(s: &str) -> bool {
    s.bytes().any(|b| b == b'\r' || b == b'\n')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

/// A parsed view over raw response bytes.
#[derive(Debug)]
pub struct Response<'a> {
    pub status_code: u16,
    pub headers: Vec<Header<'a>, MAX_HEADERS>,
    pub body: &'a [u8],
}

impl<'a> Response<'a> {
    /// Splits raw bytes into status, headers and body.
    ///
    /// The body is everything after the blank line; transfer encodings are
    /// not decoded.
    pub fn parse(data: &'a [u8]) -> Result<Self, ConnError> {
        let header_end = find_slice(data, b"\r\n\r\n").ok_or(ConnError::ProtocolError)?;
        let header_str =
            core::str::from_utf8(&data[..header_end]).map_err(|_| ConnError::ProtocolError)?;
        let body = &data[header_end + 4..];

        let mut lines = header_str.split("\r\n");

        let status_line = lines.next().ok_or(ConnError::ProtocolError)?;
        let mut status_parts = status_line.splitn(3, ' ');
        let version = status_parts.next().ok_or(ConnError::ProtocolError)?;
        if !version.starts_with("HTTP/") {
            return Err(ConnError::ProtocolError);
        }
        let status_code = status_parts
            .next()
            .ok_or(ConnError::ProtocolError)?
            .parse::<u16>()
            .map_err(|_| ConnError::ProtocolError)?;

        let mut headers: Vec<Header<'a>, MAX_HEADERS> = Vec::new();
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (name, value) = line.split_once(':').ok_or(ConnError::ProtocolError)?;
            headers
                .push(Header {
                    name: name.trim(),
                    value: value.trim(),
                })
                .map_err(|_| ConnError::ProtocolError)?;
        }

        Ok(Self {
            status_code,
            headers,
            body,
        })
    }

    /// Case-insensitive header lookup. Returns the first match.
    pub fn header(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value)
    }

    pub fn content_length(&self) -> Option<usize> {
        self.header("Content-Length")?.parse().ok()
    }
}

/// Drives one request/response exchange over a connection.
#[derive(Debug)]
pub struct Client<C: Connection> {
    connection: C,
    strict_reads: bool,
}

impl<C> Client<C>
where
    C: Connection,
    <C as Read>::Error: Into<ConnError>,
    <C as Write>::Error: Into<ConnError>,
{
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            strict_reads: false,
        }
    }

    /// Surface read failures as errors instead of treating them as the end
    /// of the response. Deadline expiry is reported either way.
    pub fn strict_reads(mut self, strict: bool) -> Self {
        self.strict_reads = strict;
        self
    }

    /// Writes the framed request and flushes it.
    pub fn send(&mut self, request: &Request) -> Result<(), ConnError> {
        let bytes = request.encode()?;
        let mut written = 0;
        while written < bytes.len() {
            match self
                .connection
                .write(&bytes[written..])
                .map_err(Into::<ConnError>::into)?
            {
                0 => return Err(ConnError::IoError),
                n => written += n,
            }
        }
        self.connection.flush().map_err(Into::into)
    }

    /// Sends `request` and collects the response until the peer closes.
    #[cfg(feature = "std")]
    pub fn get(&mut self, request: &Request) -> Result<std::vec::Vec<u8>, ConnError> {
        self.send(request)?;
        let mut response = std::vec::Vec::new();
        read_to_end(&mut self.connection, &mut response, self.strict_reads)?;
        Ok(response)
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn into_inner(self) -> C {
        self.connection
    }
}

/// Appends everything `reader` yields to `out` until a zero-length read.
///
/// A failed read ends the stream just like a zero-length read and is not
/// reported, unless `strict` is set. An expired read deadline is always
/// reported as [`ConnError::Timeout`]. Returns the number of bytes appended.
#[cfg(feature = "std")]
pub fn read_to_end<R>(
    reader: &mut R,
    out: &mut std::vec::Vec<u8>,
    strict: bool,
) -> Result<usize, ConnError>
where
    R: Read,
    R::Error: Into<ConnError>,
{
    let mut chunk = [0u8; READ_CHUNK_LEN];
    let start = out.len();
    loop {
        match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => out.extend_from_slice(&chunk[..n]),
            Err(e) => {
                let err: ConnError = e.into();
                if err == ConnError::Timeout || strict {
                    return Err(err);
                }
                tracing::warn!(
                    error = %err,
                    bytes = out.len() - start,
                    "read failed, treating as end of stream"
                );
                break;
            }
        }
    }
    Ok(out.len() - start)
}

/// Finds the first occurrence of a slice in another slice and returns its starting position.
fn find_slice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::network::Close;

    #[test]
    fn encodes_exact_wire_format() {
        let req = Request::get("/", "93.184.216.34");
        let bytes = req.encode().unwrap();
        assert_eq!(
            bytes.as_slice(),
            b"GET / HTTP/1.1\r\nHost: 93.184.216.34\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn rejects_header_injection() {
        let req = Request::get("/\r\nX-Evil: 1", "127.0.0.1");
        assert_eq!(req.encode(), Err(ConnError::ProtocolError));
    }

    #[test]
    fn rejects_oversized_request() {
        let path = [b'a'; MAX_REQUEST_LEN];
        let path = core::str::from_utf8(&path).unwrap();
        assert_eq!(
            Request::get(path, "127.0.0.1").encode(),
            Err(ConnError::ProtocolError)
        );
    }

    #[test]
    fn parses_status_headers_and_body() {
        let raw = b"HTTP/1.1 404 Not Found\r\nContent-Length: 3\r\nX-Trace: abc\r\n\r\nnop";
        let resp = Response::parse(raw).unwrap();
        assert_eq!(resp.status_code, 404);
        assert_eq!(resp.headers.len(), 2);
        assert_eq!(resp.header("x-trace"), Some("abc"));
        assert_eq!(resp.content_length(), Some(3));
        assert_eq!(resp.body, b"nop");
    }

    #[test]
    fn parses_response_without_headers() {
        let resp = Response::parse(b"HTTP/1.1 200 OK\r\n\r\nhello").unwrap();
        assert_eq!(resp.status_code, 200);
        assert!(resp.headers.is_empty());
        assert_eq!(resp.body, b"hello");
    }

    #[test]
    fn rejects_malformed_response() {
        assert!(Response::parse(b"HTTP/1.1 200 OK\r\n").is_err());
        assert!(Response::parse(b"SSH-2.0-OpenSSH\r\n\r\n").is_err());
        assert!(Response::parse(b"HTTP/1.1 abc OK\r\n\r\n").is_err());
        assert!(Response::parse(b"HTTP/1.1 200 OK\r\nbroken header\r\n\r\n").is_err());
    }

    /// Replays a script of read results and records writes.
    #[derive(Debug, Default)]
    struct ScriptedConnection {
        reads: std::collections::VecDeque<Result<std::vec::Vec<u8>, ConnError>>,
        written: std::vec::Vec<u8>,
        write_limit: Option<usize>,
    }

    impl ScriptedConnection {
        fn with_reads(reads: &[Result<&[u8], ConnError>]) -> Self {
            Self {
                reads: reads.iter().map(|r| r.map(|b| b.to_vec())).collect(),
                ..Self::default()
            }
        }
    }

    impl Read for ScriptedConnection {
        type Error = ConnError;

        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            match self.reads.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(data)) => {
                    let n = data.len().min(buf.len());
                    buf[..n].copy_from_slice(&data[..n]);
                    Ok(n)
                }
            }
        }
    }

    impl Write for ScriptedConnection {
        type Error = ConnError;

        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            let n = self.write_limit.map_or(buf.len(), |limit| limit.min(buf.len()));
            self.written.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl Close for ScriptedConnection {
        type Error = ConnError;

        fn close(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    impl Connection for ScriptedConnection {}

    #[test]
    fn send_handles_short_writes() {
        let mut conn = ScriptedConnection::default();
        conn.write_limit = Some(7);
        let mut client = Client::new(conn);
        client.send(&Request::get("/x", "127.0.0.1")).unwrap();
        assert_eq!(
            client.connection().written,
            b"GET /x HTTP/1.1\r\nHost: 127.0.0.1\r\nConnection: close\r\n\r\n"
        );
    }

    #[test]
    fn get_concatenates_reads_in_order() {
        let conn = ScriptedConnection::with_reads(&[
            Ok(&b"HTTP/1.1 200 OK\r\n"[..]),
            Ok(&b"\r\n"[..]),
            Ok(&b"hel"[..]),
            Ok(&b"lo"[..]),
        ]);
        let mut client = Client::new(conn);
        let bytes = client.get(&Request::get("/", "127.0.0.1")).unwrap();
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\n\r\nhello");
    }

    #[test]
    fn read_failure_ends_stream_by_default() {
        let mut conn = ScriptedConnection::with_reads(&[
            Ok(&b"partial"[..]),
            Err(ConnError::IoError),
            Ok(&b"lost"[..]),
        ]);
        let mut out = std::vec::Vec::new();
        let n = read_to_end(&mut conn, &mut out, false).unwrap();
        assert_eq!(n, 7);
        assert_eq!(out, b"partial");
    }

    #[test]
    fn read_failure_surfaces_when_strict() {
        let conn =
            ScriptedConnection::with_reads(&[Ok(&b"partial"[..]), Err(ConnError::IoError)]);
        let mut client = Client::new(conn).strict_reads(true);
        assert_eq!(
            client.get(&Request::get("/", "127.0.0.1")),
            Err(ConnError::IoError)
        );
    }

    #[test]
    fn read_timeout_always_surfaces() {
        let mut conn = ScriptedConnection::with_reads(&[Ok(&b"head"[..]), Err(ConnError::Timeout)]);
        let mut out = std::vec::Vec::new();
        assert_eq!(read_to_end(&mut conn, &mut out, false), Err(ConnError::Timeout));
    }

    #[test]
    fn read_to_end_appends_after_existing_bytes() {
        let mut conn = ScriptedConnection::with_reads(&[Ok(&b"world"[..])]);
        let mut out = b"hello ".to_vec();
        assert_eq!(read_to_end(&mut conn, &mut out, false), Ok(5));
        assert_eq!(out, b"hello world");
    }
}
