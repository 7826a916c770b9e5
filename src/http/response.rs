use std::io;

use crate::http::encoding::{self, CONTENT_ENCODING, Negotiation};
use crate::http::headers::HttpHeaders;
use crate::http::status::HttpStatus;

pub const HTTP_VERSION: &str = "1.1";

pub const CONTENT_LENGTH: &str = "Content-Length";
pub const CONTENT_TYPE: &str = "Content-Type";

/// A response under construction.
///
/// `Content-Length` is seeded from the raw body when one is attached, but the
/// value actually sent is always recomputed by [`HttpResponse::into_bytes`] from
/// the body that goes on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: HttpStatus,
    pub headers: HttpHeaders,
    pub body: Vec<u8>,

    /// Gzip the body at serialization time.
    pub compress: bool,
}

impl HttpResponse {
    pub fn new(status: HttpStatus) -> Self {
        Self {
            status,
            headers: HttpHeaders::new(),
            body: Vec::new(),
            compress: false,
        }
    }

    pub fn ok() -> Self {
        Self::new(HttpStatus::OK)
    }

    pub fn created() -> Self {
        Self::new(HttpStatus::CREATED)
    }

    pub fn not_found() -> Self {
        Self::new(HttpStatus::NOT_FOUND)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self.headers.set(CONTENT_LENGTH, &self.body.len().to_string());
        self
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn with_headers(mut self, headers: HttpHeaders) -> Self {
        self.headers.merge(headers);
        self
    }

    pub fn with_compression(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// Applies the outcome of content negotiation: sets `Content-Encoding` and
    /// marks the body for compression, or leaves the response untouched.
    pub fn with_negotiation(mut self, negotiation: &Negotiation) -> Self {
        if let Some(value) = negotiation.content_encoding() {
            self.headers.set(CONTENT_ENCODING, &value);
            self.compress = true;
        }
        self
    }

    pub fn status_line(&self) -> String {
        format!("HTTP/{} {}\r\n", HTTP_VERSION, self.status)
    }

    /// Serializes the response, compressing the body first when requested.
    ///
    /// HTTP/<version> <status> <reason>\r\n
    /// <header_name>: <header_value>\r\n
    /// ...
    /// \r\n
    /// <body>
    pub fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let body = if self.compress {
            encoding::gzip(&self.body)?
        } else {
            std::mem::take(&mut self.body)
        };
        self.headers.set(CONTENT_LENGTH, &body.len().to_string());

        let head = format!("{}{}\r\n", self.status_line(), self.headers.stringify());

        let mut bytes = Vec::with_capacity(head.len() + body.len());
        bytes.extend_from_slice(head.as_bytes());
        bytes.extend_from_slice(&body);
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;

    fn split_wire(bytes: &[u8]) -> (String, Vec<u8>) {
        let i = bytes.windows(4).position(|w| w == b"\r\n\r\n").unwrap();
        (
            String::from_utf8(bytes[..i + 4].to_vec()).unwrap(),
            bytes[i + 4..].to_vec(),
        )
    }

    #[test]
    fn ok_with_body_serializes_exactly() {
        let bytes = HttpResponse::ok().with_body("hi").into_bytes().unwrap();
        assert_eq!(bytes, b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi");
    }

    #[test]
    fn bare_not_found_still_carries_zero_length() {
        let bytes = HttpResponse::not_found().into_bytes().unwrap();
        assert_eq!(bytes, b"HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n");
    }

    #[test]
    fn caller_headers_win_and_keep_insertion_order() {
        let bytes = HttpResponse::ok()
            .with_body("abc")
            .with_header(CONTENT_TYPE, "text/plain")
            .with_header(CONTENT_LENGTH, "999")
            .into_bytes()
            .unwrap();

        // the stale caller value is overwritten at serialization time
        assert_eq!(
            bytes,
            b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\nContent-Type: text/plain\r\n\r\nabc"
        );
    }

    #[test]
    fn merged_headers_override_seeded_ones_in_place() {
        let bytes = HttpResponse::ok()
            .with_body("{}")
            .with_header(CONTENT_TYPE, "text/plain")
            .with_header("X-Trace", "1")
            .with_headers(
                [(CONTENT_TYPE, "application/json"), ("Cache-Control", "no-store")]
                    .into_iter()
                    .collect(),
            )
            .into_bytes()
            .unwrap();

        assert_eq!(
            bytes,
            b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\nContent-Type: application/json\r\nX-Trace: 1\r\nCache-Control: no-store\r\n\r\n{}"
        );
    }

    #[test]
    fn construction_seeds_uncompressed_length() {
        let res = HttpResponse::ok().with_body("hello").with_compression(true);
        assert_eq!(res.headers.get(CONTENT_LENGTH), Some("5"));
    }

    #[test]
    fn compressed_body_length_is_recomputed() {
        let bytes = HttpResponse::ok()
            .with_body("abc")
            .with_negotiation(&Negotiation::from_header(Some("br, gzip")))
            .into_bytes()
            .unwrap();
        let (head, body) = split_wire(&bytes);

        assert!(head.contains("Content-Encoding: br, gzip\r\n"));
        assert!(head.contains(&format!("Content-Length: {}\r\n", body.len())));
        assert_eq!(body, encoding::gzip(b"abc").unwrap());

        let mut decoded = String::new();
        GzDecoder::new(body.as_slice()).read_to_string(&mut decoded).unwrap();
        assert_eq!(decoded, "abc");
    }

    #[test]
    fn negotiation_without_gzip_leaves_response_plain() {
        let res = HttpResponse::ok()
            .with_body("abc")
            .with_negotiation(&Negotiation::from_header(Some("deflate")));
        assert!(!res.compress);
        assert_eq!(res.headers.get(CONTENT_ENCODING), None);
    }

    #[test]
    fn serialization_is_repeatable() {
        let build = || {
            HttpResponse::ok()
                .with_body("repeat me")
                .with_negotiation(&Negotiation::from_header(Some("gzip")))
                .into_bytes()
                .unwrap()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn unknown_status_uses_fallback_phrase() {
        let bytes = HttpResponse::new(HttpStatus(299)).into_bytes().unwrap();
        assert!(bytes.starts_with(b"HTTP/1.1 299 Unknown\r\n"));
    }
}
