//! Incoming HTTP request type.

use crate::method::Method;

/// An incoming HTTP request, as seen by a handler.
///
/// None of the routes read a body, so only the request line and headers are
/// carried over from hyper.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>, headers: Vec<(String, String)>) -> Self {
        Self { method, path: path.into(), headers }
    }

    /// Copies method, path and headers out of a hyper request head.
    ///
    /// Header values that are not visible ASCII are skipped.
    pub(crate) fn from_parts(method: Method, parts: &http::request::Parts) -> Self {
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        Self::new(method, parts.uri.path(), headers)
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(
            Method::Get,
            "/info",
            vec![("User-Agent".to_owned(), "kube-probe/1.30".to_owned())],
        );
        assert_eq!(req.header("user-agent"), Some("kube-probe/1.30"));
        assert_eq!(req.header("accept"), None);
    }

    #[test]
    fn from_parts_keeps_path_without_query() {
        let (parts, ()) = http::Request::builder()
            .uri("/info?verbose=1")
            .header("host", "localhost")
            .body(())
            .unwrap()
            .into_parts();
        let req = Request::from_parts(Method::Get, &parts);
        assert_eq!(req.path(), "/info");
        assert_eq!(req.header("Host"), Some("localhost"));
    }
}
