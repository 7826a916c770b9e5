//! Content-coding negotiation and the gzip body transform.
//!
//! The server recognises five codings but only gzip is actually applied to a
//! body. A response therefore advertises codings only when gzip is among them;
//! in that case every recognised coding offered by the client is listed in
//! `Content-Encoding`, in the order the client sent them.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{self, Write};

use crate::http::request::HttpRequest;

pub const ACCEPT_ENCODING: &str = "Accept-Encoding";
pub const CONTENT_ENCODING: &str = "Content-Encoding";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentCoding {
    Gzip,
    Deflate,
    Br,
    Zstd,
    Compress,
}

impl ContentCoding {
    pub const RECOGNISED: [ContentCoding; 5] = [
        ContentCoding::Gzip,
        ContentCoding::Deflate,
        ContentCoding::Br,
        ContentCoding::Zstd,
        ContentCoding::Compress,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentCoding::Gzip => "gzip",
            ContentCoding::Deflate => "deflate",
            ContentCoding::Br => "br",
            ContentCoding::Zstd => "zstd",
            ContentCoding::Compress => "compress",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::RECOGNISED.into_iter().find(|c| c.as_str() == token)
    }
}

/// Outcome of negotiating a request's `Accept-Encoding` header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Negotiation {
    /// Recognised codings offered by the client, in request order.
    pub offered: Vec<ContentCoding>,
}

impl Negotiation {
    pub fn from_header(accept_encoding: Option<&str>) -> Self {
        let offered = accept_encoding
            .map(|value| {
                value
                    .split(',')
                    .filter_map(|token| ContentCoding::from_token(token.trim()))
                    .collect()
            })
            .unwrap_or_default();

        Self { offered }
    }

    pub fn for_request(req: &HttpRequest) -> Self {
        Self::from_header(req.header(ACCEPT_ENCODING))
    }

    /// True when the body will be gzip-compressed.
    pub fn compress(&self) -> bool {
        self.offered.contains(&ContentCoding::Gzip)
    }

    /// Value for the `Content-Encoding` header, `None` when nothing is applied.
    pub fn content_encoding(&self) -> Option<String> {
        if !self.compress() {
            return None;
        }

        let names: Vec<&str> = self.offered.iter().map(ContentCoding::as_str).collect();
        Some(names.join(", "))
    }
}

/// Compresses the whole body in one go.
pub fn gzip(body: &[u8]) -> io::Result<Vec<u8>> {
    let mut e = GzEncoder::new(Vec::new(), Compression::default());
    e.write_all(body)?;
    e.finish()
}
