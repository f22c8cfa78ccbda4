//! `TvssClient` - TV Schedules Service API client implementation.

use std::fmt;
use std::time::Duration;

use chrono::NaiveDate;
use hyper::ext::ReasonPhrase;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::instrument;
use url::Url;

use super::api::TvssApi;
use super::error::{Result, TvssError};
use super::params::{ListingsOptions, SearchOptions, format_listing_date};
use super::request::ApiRequest;
use super::types::{Feed, Headend, Program, ProgramUpcoming, SearchResults, Show, ShowUpcoming};

/// Production base URL for the TV Schedules Service.
pub const TVSS_BASE_URL: &str = "https://services.pbs.org/tvss/";

/// Header carrying the API key.
const API_KEY_HEADER: &str = "X-PBSAUTH";

/// Default User-Agent.
const DEFAULT_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// TV Schedules Service API client.
///
/// The API key and call sign are fixed at construction, so a client can be
/// shared between tasks without locking.
#[allow(clippy::module_name_repetitions)]
pub struct TvssClient {
    /// HTTP client (reqwest, gzip enabled).
    http_client: Client,
    /// Base URL for API requests.
    base_url: Url,
    /// API key sent as `X-PBSAUTH`.
    api_key: Option<String>,
    /// Station call sign, lower-cased.
    call_sign: Option<String>,
}

impl fmt::Debug for TvssClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TvssClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("call_sign", &self.call_sign)
            .finish_non_exhaustive()
    }
}

/// Builder for `TvssClient`.
#[derive(Debug, Default)]
#[allow(clippy::module_name_repetitions)]
pub struct TvssClientBuilder {
    base_url: Option<Url>,
    api_key: Option<String>,
    call_sign: Option<String>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl TvssClientBuilder {
    /// Creates a new builder.
    const fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            call_sign: None,
            user_agent: None,
            timeout: None,
        }
    }

    /// Overrides the base URL (for wiremock in tests).
    #[must_use]
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the API key. An empty key is treated as unset.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the station call sign. Stored lower-cased; empty is treated as unset.
    #[must_use]
    pub fn call_sign(mut self, call_sign: impl Into<String>) -> Self {
        self.call_sign = Some(call_sign.into());
        self
    }

    /// Sets the User-Agent (default: `tvss-api/<version>`).
    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the total request timeout passed to the HTTP client (default: none).
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// - The default base URL fails to parse.
    /// - The base URL cannot carry path segments (e.g. `mailto:`).
    /// - `reqwest::Client` build fails.
    pub fn build(self) -> Result<TvssClient> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(TVSS_BASE_URL)?,
        };
        if base_url.cannot_be_a_base() {
            return Err(TvssError::InvalidArgument(format!(
                "base URL cannot carry a path: {base_url}"
            )));
        }

        let api_key = self
            .api_key
            .map(|k| k.trim().to_owned())
            .filter(|k| !k.is_empty());
        let call_sign = self
            .call_sign
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());

        let mut http = Client::builder()
            .user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .gzip(true);
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http_client = http.build().map_err(TvssError::Build)?;

        Ok(TvssClient {
            http_client,
            base_url,
            api_key,
            call_sign,
        })
    }
}

impl TvssClient {
    /// Creates a new builder.
    #[must_use]
    pub const fn builder() -> TvssClientBuilder {
        TvssClientBuilder::new()
    }

    /// Returns the configured call sign (lower-cased).
    #[must_use]
    pub fn call_sign(&self) -> Option<&str> {
        self.call_sign.as_deref()
    }

    /// Returns `true` if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET for a slash-separated endpoint and returns the decoded JSON.
    ///
    /// With `include_call_sign`, the path becomes `<call_sign>/<endpoint>`.
    ///
    /// # Errors
    ///
    /// - `CallSignRequired` if scoping is requested but no call sign is set.
    /// - `ApiKeyRequired` on HTTP 403.
    /// - `UnexpectedResponse` on any other status than 200.
    /// - `RequestFailed` on transport failure, `Decode` on invalid JSON.
    pub async fn request(
        &self,
        endpoint: &str,
        include_call_sign: bool,
        query: &[(&str, String)],
    ) -> Result<Value> {
        let request = query.iter().fold(
            ApiRequest::from_path(endpoint).include_call_sign(include_call_sign),
            |req, (key, value)| req.query(*key, value.as_str()),
        );
        self.send(&request).await
    }

    /// Sends a prepared request and returns the decoded JSON.
    ///
    /// # Errors
    ///
    /// Same as [`TvssClient::request`].
    pub async fn send(&self, request: &ApiRequest) -> Result<Value> {
        self.dispatch(request).await.map(|(_, value)| value)
    }

    /// Resolves the scoped path segments of a request.
    fn scoped_segments<'a>(&'a self, request: &'a ApiRequest) -> Result<Vec<&'a str>> {
        let mut segments = Vec::with_capacity(request.segments().len().saturating_add(1));
        if request.requires_call_sign() {
            let call_sign = self
                .call_sign
                .as_deref()
                .ok_or(TvssError::CallSignRequired)?;
            segments.push(call_sign);
        }
        segments.extend(request.segments().iter().map(String::as_str));
        Ok(segments)
    }

    /// Appends path segments to the base URL, percent-encoding each one.
    fn build_url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TvssError::InvalidArgument(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Performs the round trip and classifies the outcome.
    /// Returns the scoped path alongside the decoded body.
    #[instrument(skip_all)]
    async fn dispatch(&self, request: &ApiRequest) -> Result<(String, Value)> {
        let segments = self.scoped_segments(request)?;
        let path = segments.join("/");
        let url = self.build_url(&segments)?;

        let mut builder = self.http_client.get(url).query(request.query_params());
        if let Some(ref key) = self.api_key {
            builder = builder.header(API_KEY_HEADER, key);
        }

        tracing::debug!(%path, query = ?request.query_params(), "TVSS API request");

        let response = match builder.send().await {
            Ok(r) => r,
            Err(e) => return Err(Self::classify_transport_error(path, e)),
        };

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            tracing::warn!(%path, code = status.as_u16(), "TVSS API rejected the API key");
            return Err(TvssError::ApiKeyRequired);
        }
        if status != StatusCode::OK {
            let reason = Self::reason_phrase(&response);
            tracing::warn!(%path, code = status.as_u16(), %reason, "TVSS API unexpected response");
            return Err(TvssError::UnexpectedResponse {
                status: status.as_u16(),
                reason,
            });
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(source) => {
                return Err(TvssError::RequestFailed {
                    path,
                    status: Some(status.as_u16()),
                    source,
                });
            }
        };
        tracing::debug!(%path, body_len = body.len(), "Response body received");

        match serde_json::from_str(&body) {
            Ok(value) => Ok((path, value)),
            Err(source) => Err(TvssError::Decode { path, source }),
        }
    }

    /// Reason phrase as sent on the wire, else the canonical one for the status.
    fn reason_phrase(response: &reqwest::Response) -> String {
        response
            .extensions()
            .get::<ReasonPhrase>()
            .and_then(|phrase| std::str::from_utf8(phrase.as_bytes()).ok())
            .or_else(|| response.status().canonical_reason())
            .unwrap_or_default()
            .to_owned()
    }

    /// Maps a reqwest error to `ApiKeyRequired` (403) or `RequestFailed`.
    fn classify_transport_error(path: String, error: reqwest::Error) -> TvssError {
        let status = error.status();
        if status == Some(StatusCode::FORBIDDEN) {
            return TvssError::ApiKeyRequired;
        }
        tracing::warn!(%path, error = %error, "TVSS API request failed");
        TvssError::RequestFailed {
            path,
            status: status.map(|s| s.as_u16()),
            source: error,
        }
    }

    /// Sends a request and decodes the whole body as `T`.
    async fn fetch<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let (path, value) = self.dispatch(request).await?;
        serde_json::from_value(value).map_err(|source| TvssError::Decode { path, source })
    }

    /// Sends a request and decodes the top-level `field` as `T`.
    async fn fetch_field<T: DeserializeOwned>(
        &self,
        request: &ApiRequest,
        field: &'static str,
    ) -> Result<T> {
        let (path, value) = self.dispatch(request).await?;
        Self::take_field(path, value, field)
    }

    /// Removes `field` from a decoded object and decodes it as `T`.
    pub(crate) fn take_field<T: DeserializeOwned>(
        path: String,
        value: Value,
        field: &'static str,
    ) -> Result<T> {
        let inner = match value {
            Value::Object(mut map) => map.remove(field),
            _ => None,
        };
        let Some(inner) = inner else {
            return Err(TvssError::MissingField { path, field });
        };
        serde_json::from_value(inner).map_err(|source| TvssError::Decode { path, source })
    }

    /// Applies listings options to a `day/<date>` or `today` request.
    fn listings_request(request: ApiRequest, options: ListingsOptions) -> ApiRequest {
        let request = if options.kids_only {
            request.segment("kids")
        } else {
            request
        };
        if options.fetch_images {
            request.query("fetch-images", "true")
        } else {
            request
        }
    }

    /// Rejects empty path parameters before any request is sent.
    fn require_non_empty<'a>(name: &str, value: &'a str) -> Result<&'a str> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TvssError::InvalidArgument(format!("{name} must not be empty")));
        }
        Ok(trimmed)
    }
}

impl TvssApi for TvssClient {
    #[instrument(skip_all)]
    async fn get_listings(&self, date: NaiveDate, options: ListingsOptions) -> Result<Vec<Feed>> {
        let request = Self::listings_request(
            ApiRequest::new("day").segment(format_listing_date(date)),
            options,
        );
        self.fetch_field(&request, "feeds").await
    }

    #[instrument(skip_all)]
    async fn get_today(&self, options: ListingsOptions) -> Result<Vec<Feed>> {
        let request = Self::listings_request(ApiRequest::new("today"), options);
        self.fetch_field(&request, "feeds").await
    }

    #[instrument(skip_all)]
    async fn get_show(&self, show_id: &str) -> Result<ShowUpcoming> {
        let show_id = Self::require_non_empty("show_id", show_id)?;
        let request = ApiRequest::new("upcoming").segment("show").segment(show_id);
        self.fetch(&request).await
    }

    #[instrument(skip_all)]
    async fn get_program(&self, program_id: &str) -> Result<ProgramUpcoming> {
        let program_id = Self::require_non_empty("program_id", program_id)?;
        let request = ApiRequest::new("upcoming")
            .segment("program")
            .segment(program_id);
        self.fetch(&request).await
    }

    #[instrument(skip_all)]
    async fn get_programs(&self) -> Result<Vec<Program>> {
        let request = ApiRequest::new("programs").include_call_sign(false);
        self.fetch_field(&request, "programs").await
    }

    #[instrument(skip_all)]
    async fn search(&self, term: &str, options: SearchOptions) -> Result<SearchResults> {
        options.validate()?;
        let term = Self::require_non_empty("search term", term)?;
        let endpoint = if options.kids_only {
            "search-kids"
        } else {
            "search"
        };
        let request = ApiRequest::new(endpoint)
            .segment(term)
            .include_call_sign(options.include_call_sign);
        self.fetch(&request).await
    }

    #[instrument(skip_all)]
    async fn search_programs(&self, term: &str, options: SearchOptions) -> Result<Vec<Program>> {
        self.search(term, options)
            .await
            .map(|results| results.program_results)
    }

    #[instrument(skip_all)]
    async fn search_shows(&self, term: &str, options: SearchOptions) -> Result<Vec<Show>> {
        self.search(term, options)
            .await
            .map(|results| results.show_results)
    }

    #[instrument(skip_all)]
    async fn get_channels(&self, zip: Option<&str>) -> Result<Vec<Headend>> {
        let request = match zip.map(str::trim).filter(|z| !z.is_empty()) {
            Some(zip) => ApiRequest::new("channels").segment("zip").segment(zip),
            None => ApiRequest::new("channels"),
        };
        self.fetch_field(&request, "headends").await
    }

    #[instrument(skip_all)]
    async fn get_feeds(&self) -> Result<Vec<Feed>> {
        let request = ApiRequest::new("today");
        let mut feeds: Vec<Feed> = self.fetch_field(&request, "feeds").await?;
        for feed in &mut feeds {
            feed.strip_listings();
        }
        Ok(feeds)
    }
}
