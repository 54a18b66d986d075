//! Cookie source handler and response-cookie builder.
//!
//! Cookies are edge-only: they can be read from the inbound request and
//! set on the outbound response, but they are never forwarded to
//! downstream systems (session-fixation / session-leak prevention) and
//! have no downstream-response analogue.

use crate::handler::{Applied, Handled, SourceHandler};
use crate::view::{RequestView, ResponseView};
use iris_core::SourceKind;
use std::fmt;
use std::time::Duration;

/// A cookie to set on the outbound response.
///
/// # Example
///
/// ```rust
/// use iris_handlers::SetCookie;
/// use std::time::Duration;
///
/// let cookie = SetCookie::new("session", "abc123")
///     .http_only(true)
///     .secure(true)
///     .max_age(Duration::from_secs(3600));
///
/// assert_eq!(
///     cookie.to_string(),
///     "session=abc123; Path=/; Max-Age=3600; Secure; HttpOnly"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    name: String,
    value: String,
    path: String,
    max_age: Option<Duration>,
    secure: bool,
    http_only: bool,
}

impl SetCookie {
    /// Creates a cookie with path `/` and no attributes.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            path: "/".to_string(),
            max_age: None,
            secure: false,
            http_only: false,
        }
    }

    /// Sets the cookie path.
    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Sets the Max-Age attribute.
    #[must_use]
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Sets the Secure attribute.
    #[must_use]
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets the HttpOnly attribute.
    #[must_use]
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = http_only;
        self
    }

    /// Returns the cookie name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the cookie value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for SetCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}; Path={}", self.name, self.value, self.path)?;
        if let Some(max_age) = self.max_age {
            write!(f, "; Max-Age={}", max_age.as_secs())?;
        }
        if self.secure {
            f.write_str("; Secure")?;
        }
        if self.http_only {
            f.write_str("; HttpOnly")?;
        }
        Ok(())
    }
}

/// Handler for [`SourceKind::Cookie`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CookieHandler;

impl SourceHandler for CookieHandler {
    fn kind(&self) -> SourceKind {
        SourceKind::Cookie
    }

    fn extract_inbound(&self, request: &RequestView, selector: &str) -> Handled {
        Handled::from_option(request.cookie(selector).map(ToString::to_string))
    }

    fn enrich_response(&self, response: &mut ResponseView, key: &str, value: &str) -> Applied {
        response.add_cookie(SetCookie::new(key, value));
        Applied::Applied
    }
}
