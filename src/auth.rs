//! The login handshake.
//!
//! A successful login leaves the session cookies in the client's cookie jar;
//! nothing else is kept. The member site answers a good login with either a
//! 200 or a redirect into the site, and a bad one with a redirect to its
//! failed-login page.

use crate::credentials::CredentialsProvider;
use crate::session::{self, Outcome, Profile, Session};
use crate::{Error, Result};
use http::header::LOCATION;
use http::{HeaderMap, Method, StatusCode};
use url::Url;

pub(crate) const LOGIN_PATH: &str = "/membersite/Login";
pub(crate) const FAILED_LOGIN_PATH: &str = "/membersite/failedlogin.jsp";

/// What a login response means before the body is looked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoginOutcome {
    LoggedIn,
    Rejected,
    Failed(Outcome),
    Unexpected,
}

/// Interprets the status and headers of a login response.
///
/// Maintenance is checked first, then server errors and rate limiting. A 302
/// is a rejection only when it points at `failed_url`; the `Location` header
/// is resolved against `base_url` before comparing, so relative and absolute
/// redirects are treated alike.
pub(crate) fn interpret(
    status: StatusCode,
    headers: &HeaderMap,
    base_url: &Url,
    failed_url: &Url,
) -> LoginOutcome {
    match session::classify(status, headers) {
        outcome @ (Outcome::Maintenance | Outcome::Server | Outcome::RateLimited) => {
            return LoginOutcome::Failed(outcome)
        }
        Outcome::Rejected | Outcome::Success => {}
    }

    match status {
        StatusCode::OK => LoginOutcome::LoggedIn,
        StatusCode::FOUND => {
            let redirect = headers
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|location| base_url.join(location).ok());

            match redirect {
                Some(target) if &target == failed_url => LoginOutcome::Rejected,
                _ => LoginOutcome::LoggedIn,
            }
        }
        _ => LoginOutcome::Unexpected,
    }
}

/// Logs in with credentials fetched from `provider`.
///
/// The request bypasses the hook chains so no hook ever sees the password.
pub(crate) async fn login(
    session: &Session,
    provider: &dyn CredentialsProvider,
    profile: Profile,
) -> Result<()> {
    let base_url = session.base_url();
    let url = base_url.join(LOGIN_PATH)?;
    let failed_url = base_url.join(FAILED_LOGIN_PATH)?;

    let request = {
        let credentials = provider.fetch()?;

        let mut form = vec![
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
            ("utcoffset", "0"),
            ("todaysdate", ""),
        ];
        if profile.sends_autologin() {
            form.push(("AUTOLOGIN", "true"));
        }

        tracing::info!("Logging in to the member site");

        session.request(Method::POST, url).form(&form).build()?
    };

    let response = session.dispatch(request, false).await?;
    let status = response.status();

    match interpret(status, response.headers(), base_url, &failed_url) {
        LoginOutcome::LoggedIn => {
            tracing::info!(status = status.as_u16(), "Logged in");
            Ok(())
        }
        LoginOutcome::Rejected => {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(body = %body, "Login rejected by the member site");
            Err(Error::Authentication)
        }
        LoginOutcome::Failed(outcome) => Err(session::failure(outcome, response).await),
        LoginOutcome::Unexpected => {
            tracing::error!(status = status.as_u16(), "Unexpected response to login");
            Err(Error::UnexpectedResponse { status })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn urls() -> (Url, Url) {
        let base = Url::parse("https://members.iracing.com").unwrap();
        let failed = base.join(FAILED_LOGIN_PATH).unwrap();
        (base, failed)
    }

    fn redirect_to(location: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(LOCATION, HeaderValue::from_static(location));
        headers
    }

    #[test]
    fn test_ok_is_logged_in() {
        let (base, failed) = urls();
        assert_eq!(
            interpret(StatusCode::OK, &HeaderMap::new(), &base, &failed),
            LoginOutcome::LoggedIn
        );
    }

    #[test]
    fn test_redirect_to_failed_login_is_rejected() {
        let (base, failed) = urls();
        let absolute = redirect_to("https://members.iracing.com/membersite/failedlogin.jsp");
        let relative = redirect_to("/membersite/failedlogin.jsp");

        assert_eq!(
            interpret(StatusCode::FOUND, &absolute, &base, &failed),
            LoginOutcome::Rejected
        );
        assert_eq!(
            interpret(StatusCode::FOUND, &relative, &base, &failed),
            LoginOutcome::Rejected
        );
    }

    #[test]
    fn test_redirect_elsewhere_is_logged_in() {
        let (base, failed) = urls();
        let headers = redirect_to("https://members.iracing.com/membersite/member/Home.do");

        assert_eq!(
            interpret(StatusCode::FOUND, &headers, &base, &failed),
            LoginOutcome::LoggedIn
        );
        assert_eq!(
            interpret(StatusCode::FOUND, &HeaderMap::new(), &base, &failed),
            LoginOutcome::LoggedIn
        );
    }

    #[test]
    fn test_maintenance_wins_over_redirect() {
        let (base, failed) = urls();
        let mut headers = redirect_to("/membersite/failedlogin.jsp");
        headers.insert(session::MAINTENANCE_HEADER, HeaderValue::from_static("true"));

        assert_eq!(
            interpret(StatusCode::FOUND, &headers, &base, &failed),
            LoginOutcome::Failed(Outcome::Maintenance)
        );
    }

    #[test]
    fn test_other_statuses() {
        let (base, failed) = urls();
        let none = HeaderMap::new();

        assert_eq!(
            interpret(StatusCode::BAD_GATEWAY, &none, &base, &failed),
            LoginOutcome::Failed(Outcome::Server)
        );
        assert_eq!(
            interpret(StatusCode::TOO_MANY_REQUESTS, &none, &base, &failed),
            LoginOutcome::Failed(Outcome::RateLimited)
        );
        assert_eq!(
            interpret(StatusCode::FORBIDDEN, &none, &base, &failed),
            LoginOutcome::Unexpected
        );
        assert_eq!(
            interpret(StatusCode::NO_CONTENT, &none, &base, &failed),
            LoginOutcome::Unexpected
        );
    }
}
