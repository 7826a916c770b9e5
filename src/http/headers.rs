//! HTTP headers abstraction for [`HttpRequest`](crate::http::request::HttpRequest) and
//! [`HttpResponse`](crate::http::response::HttpResponse)
//!
//! Headers are stored in an ordered map to preserve insertion order, which is
//! also the order used when a response is serialized. Names are case-sensitive
//! and a name can only hold one value: setting it again replaces the value but
//! keeps the position of the first insertion.

use indexmap::IndexMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpHeaders {
    headers: IndexMap<String, String>,
}

impl HttpHeaders {
    pub fn new() -> Self {
        Self {
            headers: IndexMap::new(),
        }
    }

    pub fn set(&mut self, name: &str, value: &str) {
        self.headers.insert(name.to_string(), value.to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copies every header of `other` on top of `self`; `other` wins on conflicts.
    pub fn merge(&mut self, other: HttpHeaders) {
        self.headers.extend(other.headers);
    }

    /// `Name: value\r\n` for every header, in insertion order.
    pub fn stringify(&self) -> String {
        let mut result = String::new();
        for (name, value) in &self.headers {
            result.push_str(name);
            result.push_str(": ");
            result.push_str(value);
            result.push_str("\r\n");
        }
        result
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for HttpHeaders {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            headers: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinserting_keeps_position_and_replaces_value() {
        let mut headers = HttpHeaders::new();
        headers.set("Content-Length", "3");
        headers.set("Content-Type", "text/plain");
        headers.set("Content-Length", "20");

        assert_eq!(headers.stringify(), "Content-Length: 20\r\nContent-Type: text/plain\r\n");
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut headers = HttpHeaders::new();
        headers.set("User-Agent", "curl");
        assert_eq!(headers.get("User-Agent"), Some("curl"));
        assert_eq!(headers.get("user-agent"), None);
    }

    #[test]
    fn merge_lets_the_other_side_win() {
        let mut headers: HttpHeaders = [("A", "1"), ("B", "2")].into_iter().collect();
        headers.merge([("B", "3"), ("C", "4")].into_iter().collect());

        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(pairs, vec![("A", "1"), ("B", "3"), ("C", "4")]);
    }
}
