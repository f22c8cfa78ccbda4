//! `ApiRequest` - per-call request descriptor.

/// Describes a single TVSS request: path suffix, call-sign scoping, and query.
///
/// Built by the endpoint operations, consumed once by the client.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub struct ApiRequest {
    /// Path segments after the base URL (and after the call sign, if scoped).
    segments: Vec<String>,
    /// Whether the path is prefixed with the station call sign.
    include_call_sign: bool,
    /// Query parameters.
    query: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a call-sign-scoped request for the given leading segment.
    #[must_use]
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
            include_call_sign: true,
            query: Vec::new(),
        }
    }

    /// Parses a slash-separated endpoint (`"upcoming/show/abc"`) into segments.
    ///
    /// Empty segments are dropped, so `"/today/"` is equivalent to `"today"`.
    #[must_use]
    pub fn from_path(endpoint: &str) -> Self {
        Self {
            segments: endpoint
                .split('/')
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            include_call_sign: true,
            query: Vec::new(),
        }
    }

    /// Appends a path segment. A `/` inside `segment` is percent-encoded on send.
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Sets whether the station call sign prefixes the path (default: `true`).
    #[must_use]
    pub const fn include_call_sign(mut self, include: bool) -> Self {
        self.include_call_sign = include;
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Returns `true` if the request must be scoped by the station call sign.
    #[must_use]
    pub const fn requires_call_sign(&self) -> bool {
        self.include_call_sign
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the query parameters.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Renders the unscoped path suffix (e.g. `"day/20190704/kids"`).
    #[must_use]
    pub fn path(&self) -> String {
        self.segments.join("/")
    }
}
