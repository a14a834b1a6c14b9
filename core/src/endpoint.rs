//! Endpoint descriptors.
//!
//! An [`Endpoint`] names the method, the path (with path parameters already
//! substituted), optional query parameters, the per-call timeout and, for
//! calls that answer without a body, the status that stands for success.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::http::HttpMethod;

/// Timeout for single-resource operations.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for bulk operations.
pub const BULK_TIMEOUT: Duration = Duration::from_secs(20);

pub const V1_PREFIX: &str = "/api/v1/public";
pub const V2_PREFIX: &str = "/api/v2";

/// Describes one HTTP call. Built fresh per call site and never mutated
/// after it is handed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    method: HttpMethod,
    path: String,
    query: Vec<(String, String)>,
    timeout: Duration,
    no_content_status: Option<u16>,
}

impl Endpoint {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            no_content_status: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Appends a query parameter when `value` is present.
    pub fn query_opt<V: ToString>(mut self, name: &str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.query.push((name.to_owned(), value.to_string()));
        }
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Declares that `status` means success with an empty body.
    pub fn expect_no_content(mut self, status: u16) -> Self {
        self.no_content_status = Some(status);
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    pub fn timeout_duration(&self) -> Duration {
        self.timeout
    }

    pub fn no_content_status(&self) -> Option<u16> {
        self.no_content_status
    }

    /// Appends the path to the path of `base` and encodes the query string.
    ///
    /// A path prefix on `base` (a proxy or self-hosted mount point) is kept.
    pub fn url(&self, base: &url::Url) -> Result<url::Url, url::ParseError> {
        if base.cannot_be_a_base() {
            return Err(url::ParseError::RelativeUrlWithCannotBeABaseBase);
        }
        let mut url = base.clone();
        let prefix = base.path().trim_end_matches('/');
        let path = self.path.trim_start_matches('/');
        url.set_path(&format!("{prefix}/{path}"));
        url.set_query(None);
        url.set_fragment(None);
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        Ok(url)
    }
}

/// Characters escaped inside a path segment: everything but RFC 3986
/// unreserved characters.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Percent-encodes a caller-supplied identifier for use as one path segment.
pub fn segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}
