//! Request parser.
//!
//! Turns the bytes of a single socket read into an [`HttpRequest`]. The grammar is
//! scanned by hand: split on delimiters, then check indexes. Apart from an unknown
//! method, malformed input never fails; it degrades to defaults instead
//! (`GET`, path `/`, no headers, empty body).

use thiserror::Error;

use crate::http::headers::HttpHeaders;
use crate::http::request::HttpRequest;
use crate::http::*;

pub const ROOT_PATH: &str = "/";

const HEAD_DELIMITER: &[u8] = b"\r\n\r\n";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParserError {
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),
}

pub fn parse(raw: &[u8]) -> Result<HttpRequest, ParserError> {
    let (head, body) = split_head(raw);
    let head = String::from_utf8_lossy(head);

    // Request line: METHOD PATH HTTP/VERSION
    let request_line = head.split('\n').next().unwrap_or_default();
    let request_line = request_line.strip_suffix('\r').unwrap_or(request_line);

    let method = parse_method(request_line)?;
    let mut req = HttpRequest::new(method, parse_path(request_line));
    parse_headers(&head, &mut req.headers);
    req.body = body.to_vec();

    Ok(req)
}

/// Splits at the first `\r\n\r\n`. Without one the whole input is head.
fn split_head(raw: &[u8]) -> (&[u8], &[u8]) {
    match raw
        .windows(HEAD_DELIMITER.len())
        .position(|w| w == HEAD_DELIMITER)
    {
        Some(i) => (&raw[..i], &raw[i + HEAD_DELIMITER.len()..]),
        None => (raw, &[]),
    }
}

/// A leading run of uppercase letters followed by whitespace is a method token
/// and must be a known verb. A line that does not start that way defaults to `GET`.
fn parse_method(request_line: &str) -> Result<HttpMethod, ParserError> {
    let token_len = request_line
        .bytes()
        .take_while(u8::is_ascii_uppercase)
        .count();
    let (token, rest) = request_line.split_at(token_len);

    if token.is_empty() || !rest.starts_with(char::is_whitespace) {
        return Ok(HttpMethod::Get);
    }

    http_method_from_str(token).ok_or_else(|| ParserError::UnsupportedMethod(token.to_string()))
}

fn parse_path(request_line: &str) -> &str {
    request_line.split(' ').nth(1).unwrap_or(ROOT_PATH)
}

fn parse_headers(head: &str, headers: &mut HttpHeaders) {
    for line in head.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.is_empty() {
            break;
        }

        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if !is_header_name(name) {
            continue;
        }

        let value = value.trim_start();
        if value.is_empty() {
            continue;
        }

        // last occurrence wins
        headers.set(name, value);
    }
}

fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_complete_request() {
        let raw = b"POST /files/a.txt HTTP/1.1\r\nHost: localhost:4221\r\nContent-Length: 5\r\n\r\nhello";
        let req = parse(raw).unwrap();

        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/files/a.txt");
        assert_eq!(req.header("Host"), Some("localhost:4221"));
        assert_eq!(req.header("Content-Length"), Some("5"));
        assert_eq!(req.body, b"hello");
        assert!(req.path_params.is_empty());
    }

    #[test]
    fn empty_input_degrades_to_defaults() {
        let req = parse(b"").unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/");
        assert!(req.headers.is_empty());
        assert!(req.body.is_empty());
    }

    #[test]
    fn unknown_method_token_is_rejected() {
        let err = parse(b"BREW /pot HTTP/1.1\r\n\r\n").unwrap_err();
        assert_eq!(err, ParserError::UnsupportedMethod("BREW".to_string()));
    }

    #[test]
    fn line_without_method_token_defaults_to_get() {
        assert_eq!(parse(b"get /x HTTP/1.1\r\n\r\n").unwrap().method, HttpMethod::Get);
        assert_eq!(parse(b"/x\r\n\r\n").unwrap().method, HttpMethod::Get);
    }

    #[test]
    fn every_known_method_is_recognised() {
        for method in HttpMethod::ALL {
            let raw = format!("{method} / HTTP/1.1\r\n\r\n");
            assert_eq!(parse(raw.as_bytes()).unwrap().method, method);
        }
    }

    #[test]
    fn request_line_with_one_token_defaults_to_root_path() {
        let req = parse(b"GET\r\n\r\n").unwrap();
        assert_eq!(req.path, "/");
    }

    #[test]
    fn path_keeps_query_string() {
        let req = parse(b"GET /echo/abc?x=1 HTTP/1.1\r\n\r\n").unwrap();
        assert_eq!(req.path, "/echo/abc?x=1");
    }

    #[test]
    fn missing_delimiter_yields_empty_body() {
        let req = parse(b"GET /user-agent HTTP/1.1\r\nUser-Agent: curl/8.0\r\n").unwrap();
        assert_eq!(req.header("User-Agent"), Some("curl/8.0"));
        assert!(req.body.is_empty());
    }

    #[test]
    fn duplicate_header_last_wins() {
        let req = parse(b"GET / HTTP/1.1\r\nX-Id: 1\r\nX-Id: 2\r\n\r\n").unwrap();
        assert_eq!(req.header("X-Id"), Some("2"));
    }

    #[test]
    fn headers_end_at_first_blank_line() {
        let req = parse(b"POST /files/x HTTP/1.1\r\nA: 1\r\n\r\nB: 2\r\n\r\nrest").unwrap();
        assert_eq!(req.header("A"), Some("1"));
        assert_eq!(req.header("B"), None);
        assert_eq!(req.body, b"B: 2\r\n\r\nrest");
    }

    #[test]
    fn malformed_header_lines_are_skipped() {
        let req = parse(b"GET / HTTP/1.1\r\nBad Name: x\r\nEmpty:\r\nok_name: y\r\n\r\n").unwrap();
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header("ok_name"), Some("y"));
    }

    #[test]
    fn header_value_is_split_at_first_colon() {
        let req = parse(b"GET / HTTP/1.1\r\nReferer: http://a:1/b\r\n\r\n").unwrap();
        assert_eq!(req.header("Referer"), Some("http://a:1/b"));
    }
}
