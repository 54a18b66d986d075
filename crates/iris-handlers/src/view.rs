//! Boundary views over the host framework's request and response types.
//!
//! The host adapts its own request/response/client objects into these
//! views once; handlers only ever see the views. This keeps the handler
//! contract independent of any particular server or client library while
//! staying on `http` vocabulary types.

use crate::cookie::SetCookie;
use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode, Uri};
use std::collections::HashMap;
use std::sync::Mutex;

/// Read-only view of the inbound request.
///
/// Built once per request from the host's request object. Cookies are
/// parsed from the `cookie` header at construction; query parameters are
/// parsed from the URI. Path variables and claims start empty and are
/// filled in by the host once routing and authentication have run —
/// before that point the corresponding lookups simply return `None`.
///
/// # Example
///
/// ```rust
/// use iris_handlers::RequestView;
/// use http::{Method, Uri};
///
/// let view = RequestView::builder()
///     .method(Method::GET)
///     .uri(Uri::from_static("/orders/42?channel=web"))
///     .header("x-request-id", "abc-123")
///     .header("cookie", "session=s1; theme=dark")
///     .path_param("order_id", "42")
///     .claim("sub", "user-7")
///     .build();
///
/// assert_eq!(view.header("x-request-id"), Some("abc-123"));
/// assert_eq!(view.cookie("session"), Some("s1"));
/// assert_eq!(view.query_param("channel"), Some("web"));
/// assert_eq!(view.path_param("order_id"), Some("42"));
/// assert_eq!(view.claim("sub"), Some("user-7"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestView {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    query: HashMap<String, String>,
    path_params: HashMap<String, String>,
    claims: HashMap<String, String>,
}

impl RequestView {
    /// Starts building a request view.
    #[must_use]
    pub fn builder() -> RequestViewBuilder {
        RequestViewBuilder::default()
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the path portion of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a cookie value by name.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// Returns a query parameter by name.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Returns a resolved path variable by name.
    ///
    /// Empty until the host has run routing and supplied the variables.
    #[must_use]
    pub fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name).map(String::as_str)
    }

    /// Returns a claim on the authenticated principal by name.
    ///
    /// Empty until the host has run authentication and supplied the
    /// claims. Claims are read from validated authentication state, never
    /// from the wire.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims.get(name).map(String::as_str)
    }

    /// Supplies resolved path variables (called by the host after
    /// routing).
    pub fn set_path_params(&mut self, params: HashMap<String, String>) {
        self.path_params = params;
    }

    /// Supplies principal claims (called by the host after
    /// authentication).
    pub fn set_claims(&mut self, claims: HashMap<String, String>) {
        self.claims = claims;
    }

    fn parse_cookies(headers: &HeaderMap) -> HashMap<String, String> {
        let mut cookies = HashMap::new();
        for value in headers.get_all(http::header::COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            for cookie in value.split(';') {
                if let Some((name, value)) = cookie.trim().split_once('=') {
                    cookies.insert(
                        name.trim().to_string(),
                        value.trim().trim_matches('"').to_string(),
                    );
                }
            }
        }
        cookies
    }

    fn parse_query(uri: &Uri) -> HashMap<String, String> {
        let Some(query) = uri.query() else {
            return HashMap::new();
        };
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_str(query).unwrap_or_default();
        let mut map = HashMap::with_capacity(pairs.len());
        for (name, value) in pairs {
            // First occurrence wins, matching common server behavior.
            map.entry(name).or_insert(value);
        }
        map
    }
}

/// Builder for [`RequestView`].
#[derive(Debug, Default)]
pub struct RequestViewBuilder {
    method: Option<Method>,
    uri: Option<Uri>,
    headers: HeaderMap,
    path_params: HashMap<String, String>,
    claims: HashMap<String, String>,
}

impl RequestViewBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.uri = Some(uri);
        self
    }

    /// Sets the full header map.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Adds a single header.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(value) = value.parse() {
            self.headers.append(name, value);
        }
        self
    }

    /// Adds a resolved path variable.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Adds a principal claim.
    #[must_use]
    pub fn claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.claims.insert(name.into(), value.into());
        self
    }

    /// Builds the view. Method defaults to GET and URI to `/` when unset.
    #[must_use]
    pub fn build(self) -> RequestView {
        let uri = self.uri.unwrap_or_else(|| Uri::from_static("/"));
        RequestView {
            method: self.method.unwrap_or(Method::GET),
            cookies: RequestView::parse_cookies(&self.headers),
            query: RequestView::parse_query(&uri),
            uri,
            headers: self.headers,
            path_params: self.path_params,
            claims: self.claims,
        }
    }
}

/// Mutation buffer for the outbound response.
///
/// The pipeline writes enrichment headers and cookies here; the host
/// applies them to its concrete response object just before sending.
#[derive(Debug, Default)]
pub struct ResponseView {
    headers: HeaderMap,
    cookies: Vec<SetCookie>,
}

impl ResponseView {
    /// Creates an empty response view.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a response header.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            name.parse::<http::header::HeaderName>(),
            value.parse::<http::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
    }

    /// Adds a response cookie.
    pub fn add_cookie(&mut self, cookie: SetCookie) {
        self.cookies.push(cookie);
    }

    /// Returns the enrichment headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the cookies to set.
    #[must_use]
    pub fn cookies(&self) -> &[SetCookie] {
        &self.cookies
    }
}

/// Mutation buffer for one outgoing downstream request.
///
/// The pipeline writes propagation headers and query parameters here;
/// the host copies them onto its client request before sending.
#[derive(Debug, Default)]
pub struct DownstreamRequest {
    headers: HeaderMap,
    query: Vec<(String, String)>,
}

impl DownstreamRequest {
    /// Creates an empty downstream request buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a request header.
    pub fn set_header(&mut self, name: &str, value: &str) {
        if let (Ok(name), Ok(value)) = (
            name.parse::<http::header::HeaderName>(),
            value.parse::<http::header::HeaderValue>(),
        ) {
            self.headers.insert(name, value);
        }
    }

    /// Appends a query parameter.
    pub fn add_query_param(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.query.push((name.into(), value.into()));
    }

    /// Returns the propagation headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the propagation query parameters in insertion order.
    #[must_use]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// Renders the propagation query parameters as a query string.
    #[must_use]
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(&self.query).unwrap_or_default()
    }
}

/// Read access to a downstream response, however its body is held.
///
/// [`DownstreamResponse`] implements this with a single-consumption body;
/// the pipeline's buffering adapter implements it with a repeatable one.
pub trait DownstreamResponseHandle: Send + Sync {
    /// Returns the response status.
    fn status(&self) -> StatusCode;

    /// Returns a header value as a string.
    fn header(&self, name: &str) -> Option<String>;

    /// Returns the body as text.
    ///
    /// Whether a second call succeeds depends on the implementation; on
    /// a raw [`DownstreamResponse`] the body is a single-consumption
    /// stream and only the first call yields it.
    fn body_text(&self) -> Option<String>;
}

/// A downstream call's response as handed over by the host.
///
/// The body behaves like the wire stream it came from: it can be taken
/// exactly once. Code that needs repeated access wraps the response in
/// the pipeline's buffering adapter first.
///
/// # Example
///
/// ```rust
/// use iris_handlers::{DownstreamResponse, DownstreamResponseHandle};
/// use http::{HeaderMap, StatusCode};
///
/// let response = DownstreamResponse::new(
///     StatusCode::OK,
///     HeaderMap::new(),
///     r#"{"ok":true}"#,
/// );
///
/// assert_eq!(response.body_text().as_deref(), Some(r#"{"ok":true}"#));
/// // The stream is spent.
/// assert_eq!(response.body_text(), None);
/// ```
#[derive(Debug)]
pub struct DownstreamResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Mutex<Option<Bytes>>,
}

impl DownstreamResponse {
    /// Creates a response with the given body.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: Mutex::new(Some(body.into())),
        }
    }

    /// Creates a response with no body.
    #[must_use]
    pub fn empty(status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            status,
            headers,
            body: Mutex::new(None),
        }
    }

    /// Returns the response headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Takes the body bytes, consuming the stream.
    ///
    /// Returns `None` if the body was already taken or never present.
    #[must_use]
    pub fn take_body(&self) -> Option<Bytes> {
        self.body.lock().ok().and_then(|mut body| body.take())
    }
}

impl DownstreamResponseHandle for DownstreamResponse {
    fn status(&self) -> StatusCode {
        self.status
    }

    fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
    }

    fn body_text(&self) -> Option<String> {
        self.take_body()
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_view_builder() {
        let view = RequestView::builder()
            .method(Method::POST)
            .uri(Uri::from_static("/orders?channel=web&channel=app&tenant=acme"))
            .header("x-request-id", "abc-123")
            .header("cookie", "session=s1; theme=\"dark\"")
            .path_param("order_id", "42")
            .claim("sub", "user-7")
            .build();

        assert_eq!(view.method(), &Method::POST);
        assert_eq!(view.path(), "/orders");
        assert_eq!(view.header("x-request-id"), Some("abc-123"));
        assert_eq!(view.header("missing"), None);
        assert_eq!(view.cookie("session"), Some("s1"));
        assert_eq!(view.cookie("theme"), Some("dark"));
        // First occurrence wins for repeated query parameters.
        assert_eq!(view.query_param("channel"), Some("web"));
        assert_eq!(view.query_param("tenant"), Some("acme"));
        assert_eq!(view.path_param("order_id"), Some("42"));
        assert_eq!(view.claim("sub"), Some("user-7"));
    }

    #[test]
    fn test_request_view_late_routing_and_auth() {
        let mut view = RequestView::builder()
            .uri(Uri::from_static("/orders/42"))
            .build();

        assert_eq!(view.path_param("order_id"), None);
        assert_eq!(view.claim("sub"), None);

        view.set_path_params(HashMap::from([("order_id".to_string(), "42".to_string())]));
        view.set_claims(HashMap::from([("sub".to_string(), "user-7".to_string())]));

        assert_eq!(view.path_param("order_id"), Some("42"));
        assert_eq!(view.claim("sub"), Some("user-7"));
    }

    #[test]
    fn test_response_view() {
        let mut response = ResponseView::new();
        response.set_header("x-request-id", "abc-123");
        response.add_cookie(SetCookie::new("session", "s1"));

        assert_eq!(response.header("x-request-id"), Some("abc-123"));
        assert_eq!(response.cookies().len(), 1);
    }

    #[test]
    fn test_downstream_request() {
        let mut request = DownstreamRequest::new();
        request.set_header("x-tenant", "acme");
        request.add_query_param("channel", "web");
        request.add_query_param("flag", "a b");

        assert_eq!(request.header("x-tenant"), Some("acme"));
        assert_eq!(request.query_params().len(), 2);
        assert_eq!(request.query_string(), "channel=web&flag=a+b");
    }

    #[test]
    fn test_downstream_response_single_consumption() {
        let response = DownstreamResponse::new(
            StatusCode::OK,
            HeaderMap::new(),
            r#"{"user":{"id":"42"}}"#,
        );

        assert!(response.body_text().is_some());
        assert!(response.body_text().is_none());
    }

    #[test]
    fn test_downstream_response_empty() {
        let response = DownstreamResponse::empty(StatusCode::NO_CONTENT, HeaderMap::new());
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(response.body_text(), None);
    }
}
