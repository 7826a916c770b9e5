use indexmap::IndexMap;

use crate::http::HttpMethod;
use crate::http::headers::HttpHeaders;

/// A parsed request.
///
/// Built once per connection by [`parser::parse`](crate::http::parser::parse).
/// `path_params` stays empty until the router has matched the request, at which
/// point it holds one entry per `{name}` placeholder of the matched template,
/// in template order.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,

    /// Raw request target, the query string is not separated.
    pub path: String,

    pub headers: HttpHeaders,
    pub body: Vec<u8>,
    pub path_params: IndexMap<String, String>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            headers: HttpHeaders::new(),
            body: Vec::new(),
            path_params: IndexMap::new(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    pub fn with_path_params(mut self, params: IndexMap<String, String>) -> Self {
        self.path_params = params;
        self
    }
}
