//! The HTTP session: cookie jar, fixed headers, hook chains and outcome classification.

use crate::middleware::{Hooks, SentRequest};
use crate::rate_limit::RateLimitInfo;
use crate::{Error, Result};
use http::header::{CACHE_CONTROL, ORIGIN, REFERER, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use std::time::Instant;
use url::Url;

/// Header the member site sets while it is down for maintenance.
pub const MAINTENANCE_HEADER: &str = "x-maintenance-mode";

pub(crate) const LOGIN_PAGE_PATH: &str = "/membersite/login.jsp";

const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; rv:78.0) Gecko/20100101 Firefox/78.0";

/// Header and login conventions the client presents to the member site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// Identifies as this library and sends the plain login form.
    #[default]
    Standard,

    /// Presents itself like the member site's own web pages: a browser user
    /// agent, an `X-Requested-With` header, and the `AUTOLOGIN` flag on login.
    LegacyCompat,
}

impl Profile {
    pub fn user_agent(&self) -> &'static str {
        match self {
            Profile::Standard => crate::USER_AGENT,
            Profile::LegacyCompat => BROWSER_USER_AGENT,
        }
    }

    /// Whether the login form carries `AUTOLOGIN=true`.
    pub fn sends_autologin(&self) -> bool {
        matches!(self, Profile::LegacyCompat)
    }

    /// The headers attached to every request made under this profile.
    pub(crate) fn headers(&self, base_url: &Url) -> Result<HeaderMap> {
        let origin = base_url.origin().ascii_serialization();
        let referer = base_url.join(LOGIN_PAGE_PATH)?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(self.user_agent()));
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        headers.insert(ORIGIN, header_value(&origin)?);
        headers.insert(REFERER, header_value(referer.as_str())?);

        if let Profile::LegacyCompat = self {
            headers.insert(
                HeaderName::from_static("x-requested-with"),
                HeaderValue::from_static("XMLHttpRequest"),
            );
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))
}

/// How a response is classified before its body is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Success,
    Maintenance,
    Server,
    RateLimited,
    Rejected,
}

/// Classifies a response by status and headers.
///
/// The maintenance header wins over any status. After that 5xx, then 429,
/// then the remaining 4xx are failures; everything else is a success.
pub(crate) fn classify(status: StatusCode, headers: &HeaderMap) -> Outcome {
    if in_maintenance(headers) {
        Outcome::Maintenance
    } else if status.is_server_error() {
        Outcome::Server
    } else if status == StatusCode::TOO_MANY_REQUESTS {
        Outcome::RateLimited
    } else if status.is_client_error() {
        Outcome::Rejected
    } else {
        Outcome::Success
    }
}

pub(crate) fn in_maintenance(headers: &HeaderMap) -> bool {
    headers
        .get(MAINTENANCE_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim().eq_ignore_ascii_case("true") || v.trim() == "1")
}

/// Turns a failed classification into the matching error, draining the body
/// where the error carries it.
pub(crate) async fn failure(outcome: Outcome, response: reqwest::Response) -> Error {
    let status = response.status();

    match outcome {
        Outcome::Maintenance => {
            tracing::warn!(status = status.as_u16(), "Member site is in maintenance mode");
            Error::Maintenance { status }
        }
        Outcome::RateLimited => {
            let rate_limit_info = RateLimitInfo::from_headers(response.headers());
            tracing::warn!(
                retry_after = ?rate_limit_info.retry_after,
                "Rate limited by the member site"
            );
            Error::RateLimited { rate_limit_info }
        }
        Outcome::Server => {
            let raw_response = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = status.as_u16(),
                response = %raw_response,
                "Server error (5xx)"
            );
            Error::Server {
                status,
                raw_response,
            }
        }
        Outcome::Rejected => {
            let raw_response = response.text().await.unwrap_or_default();
            tracing::error!(
                status = status.as_u16(),
                response = %raw_response,
                "Request rejected (4xx)"
            );
            Error::RequestRejected {
                status,
                raw_response,
            }
        }
        Outcome::Success => Error::UnexpectedResponse { status },
    }
}

/// One cookie-holding HTTP client plus the hooks and headers applied to it.
pub(crate) struct Session {
    http: reqwest::Client,
    base_url: Url,
    headers: HeaderMap,
    hooks: Hooks,
}

impl Session {
    pub(crate) fn new(http: reqwest::Client, base_url: Url, headers: HeaderMap, hooks: Hooks) -> Self {
        Self {
            http,
            base_url,
            headers,
            hooks,
        }
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn hooks_mut(&mut self) -> &mut Hooks {
        &mut self.hooks
    }

    /// Starts a request that already carries the session's fixed headers.
    pub(crate) fn request(&self, method: Method, url: Url) -> reqwest::RequestBuilder {
        self.http.request(method, url).headers(self.headers.clone())
    }

    /// Sends a request through the hooks and classifies the response.
    ///
    /// On success the response is returned with its body unread.
    pub(crate) async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let response = self.dispatch(request, true).await?;

        match classify(response.status(), response.headers()) {
            Outcome::Success => Ok(response),
            outcome => Err(failure(outcome, response).await),
        }
    }

    /// Sends a request without classifying the response.
    ///
    /// With `run_hooks` unset, neither hook chain sees the request.
    pub(crate) async fn dispatch(
        &self,
        mut request: reqwest::Request,
        run_hooks: bool,
    ) -> Result<reqwest::Response> {
        if run_hooks {
            self.hooks.run_before(&mut request)?;
        }

        let sent = run_hooks.then(|| SentRequest::of(&request));

        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            "Executing HTTP request"
        );

        let start = Instant::now();
        let result = self.http.execute(request).await;

        if let Some(sent) = &sent {
            self.hooks.run_after(sent, result.as_ref().ok())?;
        }

        let response = result.map_err(|e| {
            tracing::warn!(error = %e, "Transport error");
            Error::Transport(e)
        })?;

        tracing::info!(
            status = response.status().as_u16(),
            latency_ms = start.elapsed().as_millis(),
            "Received HTTP response"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_static(value));
        }
        map
    }

    #[test]
    fn test_classify_by_status() {
        let none = HeaderMap::new();
        assert_eq!(classify(StatusCode::OK, &none), Outcome::Success);
        assert_eq!(classify(StatusCode::FOUND, &none), Outcome::Success);
        assert_eq!(classify(StatusCode::SERVICE_UNAVAILABLE, &none), Outcome::Server);
        assert_eq!(classify(StatusCode::INTERNAL_SERVER_ERROR, &none), Outcome::Server);
        assert_eq!(classify(StatusCode::TOO_MANY_REQUESTS, &none), Outcome::RateLimited);
        assert_eq!(classify(StatusCode::FORBIDDEN, &none), Outcome::Rejected);
        assert_eq!(classify(StatusCode::NOT_FOUND, &none), Outcome::Rejected);
    }

    #[test]
    fn test_maintenance_overrides_status() {
        let maintenance = headers(&[(MAINTENANCE_HEADER, "true")]);
        for status in [
            StatusCode::OK,
            StatusCode::FOUND,
            StatusCode::FORBIDDEN,
            StatusCode::TOO_MANY_REQUESTS,
            StatusCode::SERVICE_UNAVAILABLE,
        ] {
            assert_eq!(classify(status, &maintenance), Outcome::Maintenance);
        }
    }

    #[test]
    fn test_maintenance_header_must_be_truthy() {
        assert!(in_maintenance(&headers(&[(MAINTENANCE_HEADER, "TRUE")])));
        assert!(in_maintenance(&headers(&[(MAINTENANCE_HEADER, "1")])));
        assert!(!in_maintenance(&headers(&[(MAINTENANCE_HEADER, "false")])));
        assert!(!in_maintenance(&HeaderMap::new()));
    }

    #[test]
    fn test_standard_profile_headers() {
        let base = Url::parse("https://members.iracing.com").unwrap();
        let headers = Profile::Standard.headers(&base).unwrap();

        assert_eq!(headers[USER_AGENT], crate::USER_AGENT);
        assert_eq!(headers[CACHE_CONTROL], "no-cache");
        assert_eq!(headers[ORIGIN], "https://members.iracing.com");
        assert_eq!(
            headers[REFERER],
            "https://members.iracing.com/membersite/login.jsp"
        );
        assert!(headers.get("x-requested-with").is_none());
        assert!(!Profile::Standard.sends_autologin());
    }

    #[test]
    fn test_legacy_profile_headers() {
        let base = Url::parse("https://members.iracing.com").unwrap();
        let headers = Profile::LegacyCompat.headers(&base).unwrap();

        assert_eq!(headers[USER_AGENT], BROWSER_USER_AGENT);
        assert_eq!(headers["x-requested-with"], "XMLHttpRequest");
        assert!(Profile::LegacyCompat.sends_autologin());
    }
}
