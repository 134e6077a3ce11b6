//! HTTP client wrapper - builds, sends and classifies backend requests

use std::time::{Duration, Instant};

use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::constants::{APP_NAME, APP_VERSION};
use crate::error::{ApiError, ApiResult};
use crate::models::{Header, HttpMethod};
use crate::network::retry::RetryPolicy;

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::GET => reqwest::Method::GET,
            HttpMethod::POST => reqwest::Method::POST,
            HttpMethod::PUT => reqwest::Method::PUT,
            HttpMethod::PATCH => reqwest::Method::PATCH,
            HttpMethod::DELETE => reqwest::Method::DELETE,
        }
    }
}

/// Per-call request settings supplied by the endpoint wrappers
#[derive(Clone, Debug, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Vec<Header>,
    pub query: Vec<(String, String)>,
    /// Sent as-is; use [`RequestOptions::json`] to serialize a value
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        RequestOptions::new(HttpMethod::GET)
    }
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        RequestOptions {
            method,
            headers: Vec::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get() -> Self {
        Self::new(HttpMethod::GET)
    }

    pub fn post() -> Self {
        Self::new(HttpMethod::POST)
    }

    pub fn put() -> Self {
        Self::new(HttpMethod::PUT)
    }

    pub fn delete() -> Self {
        Self::new(HttpMethod::DELETE)
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(Header::new(key, value));
        self
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn query_opt<V: ToString>(self, key: &str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.query(key, v),
            None => self,
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> ApiResult<Self> {
        let body = serde_json::to_string(value)?;
        Ok(self.body(body))
    }
}

/// A fully resolved request: absolute URL and merged headers
#[derive(Clone, Debug, PartialEq)]
pub struct PreparedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<Header>,
    pub body: Option<String>,
}

impl PreparedRequest {
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.key.eq_ignore_ascii_case(key))
            .map(|h| h.value.as_str())
    }
}

/// Defaults first, then caller headers replace any default with the same name.
fn merge_headers(token: Option<&str>, overrides: &[Header]) -> Vec<Header> {
    let mut merged = vec![Header::new("Content-Type", "application/json")];
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        merged.push(Header::new("Authorization", format!("Bearer {}", token)));
    }

    for header in overrides {
        match merged
            .iter_mut()
            .find(|existing| existing.key.eq_ignore_ascii_case(&header.key))
        {
            Some(existing) => existing.value = header.value.clone(),
            None => merged.push(header.clone()),
        }
    }
    merged
}

/// Percent-encode a single path segment (e.g. a destination or an email).
///
/// Empty, `.` and `..` segments are rejected: URL normalisation would drop
/// them and the request would reach a different resource.
pub fn encode_path_segment(segment: &str) -> ApiResult<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(ApiError::InvalidRequest(format!(
            "invalid path segment {:?}",
            segment
        )));
    }
    let mut url = Url::parse("http://localhost/")
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidRequest("url cannot take path segments".into()))?
        .clear()
        .push(segment);
    Ok(url.path().trim_start_matches('/').to_string())
}

/// Create an HTTP client with default configuration
fn create_client() -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(format!("{}/{}", APP_NAME, APP_VERSION))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Typed JSON client for the itinerary backend
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::from_config(&ClientConfig {
            base_url: base_url.into(),
            ..ClientConfig::default()
        })
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        ApiClient {
            http: create_client(),
            base_url: config.normalized_base_url().to_string(),
            timeout: config.timeout(),
            retry: config.retry_policy(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL with a trailing `/api` removed; actuator endpoints live there.
    pub fn origin(&self) -> &str {
        self.base_url
            .strip_suffix("/api")
            .unwrap_or(&self.base_url)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Resolve `endpoint` against the base URL without sending anything.
    pub fn prepare(
        &self,
        endpoint: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> ApiResult<PreparedRequest> {
        self.prepare_url(&format!("{}{}", self.base_url, endpoint), options, token)
    }

    pub fn prepare_url(
        &self,
        url: &str,
        options: &RequestOptions,
        token: Option<&str>,
    ) -> ApiResult<PreparedRequest> {
        let mut url = Url::parse(url)
            .map_err(|e| ApiError::InvalidRequest(format!("invalid url {}: {}", url, e)))?;
        if !options.query.is_empty() {
            url.query_pairs_mut().extend_pairs(options.query.iter());
        }

        Ok(PreparedRequest {
            method: options.method,
            url: url.to_string(),
            headers: merge_headers(token, &options.headers),
            body: options.body.clone(),
        })
    }

    /// Send with the client's retry budget.
    pub async fn request<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
        token: Option<&str>,
    ) -> ApiResult<T> {
        let prepared = self.prepare(endpoint, &options, token)?;
        self.execute(&prepared, self.retry).await
    }

    /// Send with an explicit attempt budget for this call only.
    pub async fn request_with_retries<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
        token: Option<&str>,
        retries: u32,
    ) -> ApiResult<T> {
        let prepared = self.prepare(endpoint, &options, token)?;
        self.execute(&prepared, self.retry.with_attempts(retries))
            .await
    }

    /// Attempt loop: retryable failures sleep and go again until the budget runs out.
    pub async fn execute<T: DeserializeOwned>(
        &self,
        prepared: &PreparedRequest,
        policy: RetryPolicy,
    ) -> ApiResult<T> {
        let max_attempts = policy.max_attempts();
        let mut attempt = 1;

        loop {
            tracing::debug!(
                method = prepared.method.as_str(),
                url = %prepared.url,
                attempt,
                max_attempts,
                "Sending request"
            );

            match self.attempt(prepared).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = policy.delay_for(attempt);
                    tracing::warn!(
                        url = %prepared.url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "Retryable failure, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    tracing::debug!(url = %prepared.url, attempt, error = %err, "Request failed");
                    return Err(err);
                }
            }
        }
    }

    async fn attempt<T: DeserializeOwned>(&self, prepared: &PreparedRequest) -> ApiResult<T> {
        let start = Instant::now();
        let builder = self.build_request(prepared);

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let body = response.bytes().await?;
            Ok::<_, ApiError>((status, body))
        };

        // Dropping the exchange on timeout aborts the in-flight attempt.
        let (status, body) = tokio::time::timeout(self.timeout, exchange)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))??;

        let elapsed = start.elapsed().as_millis() as u64;
        tracing::info!(
            method = prepared.method.as_str(),
            url = %prepared.url,
            status,
            time_ms = elapsed,
            "Request completed"
        );

        if !(200..300).contains(&status) {
            let text = String::from_utf8_lossy(&body).into_owned();
            return Err(ApiError::from_status(status, text));
        }

        parse_body(&body)
    }

    fn build_request(&self, prepared: &PreparedRequest) -> reqwest::RequestBuilder {
        let mut req_builder = self.http.request(prepared.method.into(), &prepared.url);

        for header in &prepared.headers {
            req_builder = req_builder.header(header.key.as_str(), header.value.as_str());
        }

        if let Some(body) = &prepared.body {
            req_builder = req_builder.body(body.clone());
        }

        req_builder
    }
}

/// Empty bodies (204 responses) read as JSON `null`.
fn parse_body<T: DeserializeOwned>(body: &[u8]) -> ApiResult<T> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::from_slice(b"null")?);
    }
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8080/api/")
    }

    #[test]
    fn test_prepare_joins_base_and_endpoint() {
        let prepared = client()
            .prepare("/itineraries/my", &RequestOptions::get(), None)
            .unwrap();
        assert_eq!(prepared.url, "http://localhost:8080/api/itineraries/my");
        assert_eq!(prepared.header("content-type"), Some("application/json"));
        assert_eq!(prepared.header("Authorization"), None);
    }

    #[test]
    fn test_prepare_attaches_bearer_token() {
        let prepared = client()
            .prepare("/itineraries/my", &RequestOptions::get(), Some("tok-123"))
            .unwrap();
        assert_eq!(prepared.header("authorization"), Some("Bearer tok-123"));

        let empty = client()
            .prepare("/itineraries/my", &RequestOptions::get(), Some(""))
            .unwrap();
        assert_eq!(empty.header("authorization"), None);
    }

    #[test]
    fn test_caller_headers_win() {
        let options = RequestOptions::post()
            .header("content-type", "text/plain")
            .header("Authorization", "Bearer override")
            .header("X-Trace", "abc");
        let prepared = client().prepare("/users", &options, Some("tok")).unwrap();

        assert_eq!(prepared.headers.len(), 3);
        assert_eq!(prepared.header("Content-Type"), Some("text/plain"));
        assert_eq!(prepared.header("Authorization"), Some("Bearer override"));
        assert_eq!(prepared.header("x-trace"), Some("abc"));
    }

    #[test]
    fn test_query_is_encoded() {
        let options = RequestOptions::get()
            .query("destination", "São Paulo & Rio")
            .query_opt("category", None::<&str>)
            .query("limit", 5);
        let prepared = client().prepare("/activities/search", &options, None).unwrap();
        assert_eq!(
            prepared.url,
            "http://localhost:8080/api/activities/search?destination=S%C3%A3o+Paulo+%26+Rio&limit=5"
        );
    }

    #[test]
    fn test_encode_path_segment() {
        assert_eq!(encode_path_segment("Paris").unwrap(), "Paris");
        assert_eq!(encode_path_segment("New York").unwrap(), "New%20York");
        assert_eq!(encode_path_segment("a/b?c").unwrap(), "a%2Fb%3Fc");
        assert_eq!(encode_path_segment("...").unwrap(), "...");
    }

    #[test]
    fn test_dot_and_empty_segments_are_rejected() {
        for segment in ["", ".", ".."] {
            assert!(matches!(
                encode_path_segment(segment),
                Err(ApiError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_origin_strips_api_suffix() {
        assert_eq!(client().origin(), "http://localhost:8080");
        assert_eq!(ApiClient::new("http://host:9000").origin(), "http://host:9000");
    }

    #[test]
    fn test_json_body() {
        let options = RequestOptions::put()
            .json(&serde_json::json!({ "title": "Rome" }))
            .unwrap();
        assert_eq!(options.body.as_deref(), Some(r#"{"title":"Rome"}"#));
    }

    #[test]
    fn test_parse_body_empty_is_null() {
        let unit: () = parse_body(b"").unwrap();
        assert_eq!(unit, ());
        let none: Option<u32> = parse_body(b"  \n").unwrap();
        assert_eq!(none, None);
        assert!(matches!(parse_body::<u32>(b"{oops"), Err(ApiError::Parse(_))));
    }
}
