use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Largest request head (request line and headers) accepted.
const MAX_HEAD_LENGTH: usize = 8 * 1024;

/// The parts of an HTTP request the responder routes on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: String,
    path: String,
}

impl Request {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Returns the request path without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the `METHOD /path` pair used for routing.
    pub fn route(&self) -> String {
        format!("{} {}", self.method, self.path)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok = 200,
    BadRequest = 400,
    NotFound = 404,
    RequestTimeout = 408,
    InternalServerError = 500,
}

impl Status {
    fn reason(&self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::BadRequest => "Bad Request",
            Status::NotFound => "Not Found",
            Status::RequestTimeout => "Request Timeout",
            Status::InternalServerError => "Internal Server Error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: Status,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Response {
    /// Creates a response with the given status and an empty body.
    pub fn new(status: Status) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self::new(Status::Ok)
            .with_header("Content-Type", content_type)
            .with_body(body)
    }

    pub fn not_found() -> Self {
        Self::new(Status::NotFound)
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

/// Frames an HTTP/1.1 connection into [`Request`] heads and encodes [`Response`]s.
///
/// Only what the static responder needs is supported: request bodies are not read, and
/// every response closes the connection.
pub struct HttpFramer;

impl Decoder for HttpFramer {
    type Item = Request;
    type Error = std::io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(end) = src.windows(4).position(|window| window == b"\r\n\r\n") else {
            // Refuse to buffer an unbounded head.
            if src.len() > MAX_HEAD_LENGTH {
                return Err(invalid_data(format!(
                    "Decoding: Request head longer than {} bytes.",
                    MAX_HEAD_LENGTH
                )));
            }
            return Ok(None);
        };

        let head = std::str::from_utf8(&src[..end])
            .map_err(|_| invalid_data("Decoding: Request head is not UTF-8.".to_string()))?;
        let request_line = head.lines().next().unwrap_or_default();
        let mut parts = request_line.split_whitespace();
        let (Some(method), Some(target), Some(version)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid_data(format!(
                "Decoding: Malformed request line {:?}.",
                request_line
            )));
        };
        if !version.starts_with("HTTP/1.") {
            return Err(invalid_data(format!(
                "Decoding: Unsupported version {}.",
                version
            )));
        }
        let path = target.split(['?', '#']).next().unwrap_or_default();
        let request = Request::new(method, path);

        src.advance(end + 4);
        Ok(Some(request))
    }
}

impl Encoder<Response> for HttpFramer {
    type Error = std::io::Error;

    fn encode(&mut self, item: Response, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let mut head = format!(
            "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nConnection: close\r\n",
            item.status as u16,
            item.status.reason(),
            item.body.len()
        );
        for (name, value) in &item.headers {
            head.push_str(&format!("{}: {}\r\n", name, value));
        }
        head.push_str("\r\n");

        dst.reserve(head.len() + item.body.len());
        dst.extend_from_slice(head.as_bytes());
        dst.extend_from_slice(&item.body);
        Ok(())
    }
}

fn invalid_data(message: String) -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::InvalidData, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_waits_for_full_head() {
        let mut buf = BytesMut::from(&b"GET /server HTTP/1.1\r\nHost: x\r\n"[..]);
        assert_eq!(HttpFramer.decode(&mut buf).unwrap(), None);
        buf.extend_from_slice(b"\r\n");
        let request = HttpFramer.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.route(), "GET /server");
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_strips_query() {
        let mut buf = BytesMut::from(&b"GET /index.js?v=3 HTTP/1.0\r\n\r\n"[..]);
        let request = HttpFramer.decode(&mut buf).unwrap().unwrap();
        assert_eq!(request.method(), "GET");
        assert_eq!(request.path(), "/index.js");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let mut buf = BytesMut::from(&b"hello\r\n\r\n"[..]);
        assert!(HttpFramer.decode(&mut buf).is_err());
    }

    #[test]
    fn test_decode_rejects_oversized_head() {
        let mut buf = BytesMut::from(vec![b'a'; MAX_HEAD_LENGTH + 1].as_slice());
        assert!(HttpFramer.decode(&mut buf).is_err());
    }

    #[test]
    fn test_encode() {
        let mut buf = BytesMut::new();
        HttpFramer
            .encode(Response::ok("text/plain", "OK"), &mut buf)
            .unwrap();
        assert_eq!(
            &buf[..],
            &b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\nContent-Type: text/plain\r\n\r\nOK"[..]
        );
    }

    #[test]
    fn test_encode_not_found() {
        let mut buf = BytesMut::new();
        HttpFramer.encode(Response::not_found(), &mut buf).unwrap();
        assert!(buf.starts_with(b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n"));
    }
}
