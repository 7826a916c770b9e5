use std::fmt;

pub mod encoding;
pub mod headers;
pub mod parser;
pub mod request;
pub mod response;
pub mod status;

/// HTTP verbs understood by the request parser and the router.
#[derive(PartialEq, Eq, Debug, Clone, Copy, Hash)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Connect,
    Options,
    Trace,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 9] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Head,
        HttpMethod::Options,
        HttpMethod::Trace,
        HttpMethod::Connect,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Connect => "CONNECT",
            HttpMethod::Options => "OPTIONS",
            HttpMethod::Trace => "TRACE",
        }
    }
}

/// Case-sensitive lookup of a method token, `None` for anything unknown.
pub fn http_method_from_str(method: &str) -> Option<HttpMethod> {
    HttpMethod::ALL.into_iter().find(|m| m.as_str() == method)
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_methods_round_trip_through_their_token() {
        for method in HttpMethod::ALL {
            assert_eq!(http_method_from_str(method.as_str()), Some(method));
        }
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(http_method_from_str("get"), None);
        assert_eq!(http_method_from_str("BREW"), None);
    }
}
