//! Error types for member site calls.
//!
//! Every failure is returned to the caller as an [`Error`]. Nothing in this crate
//! retries on its own; [`Error::is_retryable`] tells the caller which failures
//! are worth trying again.

use crate::codec::FormatError;
use crate::rate_limit::RateLimitInfo;
use http::StatusCode;

/// The main error type for member site calls.
///
/// # Examples
///
/// ```no_run
/// use irapi::{Client, Error, StaticCredentials};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::builder()
///     .credentials(StaticCredentials::new("driver@example.com", "hunter2"))
///     .build()?;
///
/// match client.login().await {
///     Ok(()) => println!("logged in"),
///     Err(Error::Authentication) => eprintln!("wrong username or password"),
///     Err(Error::Maintenance { .. }) => eprintln!("member site is down for maintenance"),
///     Err(e) => eprintln!("login failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The request never produced a response (connection, DNS, TLS, timeout).
    ///
    /// This wraps the underlying `reqwest::Error` unchanged.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The member site answered with a 5xx status.
    #[error("Server error {status}: {raw_response}")]
    Server {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// The member site answered with 429 Too Many Requests.
    #[error("Rate limited by the member site")]
    RateLimited {
        /// Whatever rate limit headers accompanied the 429
        rate_limit_info: RateLimitInfo,
    },

    /// The member site signalled that it is offline for maintenance.
    ///
    /// This takes precedence over the status code of the response.
    #[error("Member site is offline for maintenance (status {status})")]
    Maintenance {
        /// The HTTP status code the maintenance response came with
        status: StatusCode,
    },

    /// The member site answered with a 4xx status other than 429.
    #[error("Request rejected with status {status}: {raw_response}")]
    RequestRejected {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
    },

    /// The login form was answered with a redirect to the failed-login page.
    #[error("Login rejected: check the username and password")]
    Authentication,

    /// A response did not have the shape the protocol expects.
    #[error("Unexpected response with status {status}")]
    UnexpectedResponse {
        /// The HTTP status code
        status: StatusCode,
    },

    /// A scalar value did not match its wire format.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Failed to deserialize the (un-escaped) response body into the expected type.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    Deserialization {
        /// The response body after un-escaping
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// A credentials provider could not produce credentials.
    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    /// A before-request or after-response hook aborted the call.
    #[error("Middleware aborted the request: {0}")]
    Middleware(String),

    /// Invalid configuration, including search options rejected before sending.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// An invalid URL was provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns `true` if trying the same call again later may succeed.
    ///
    /// Transport failures, 5xx responses, rate limiting and maintenance are
    /// transient. Rejected requests, failed logins and decode failures are not.
    ///
    /// ```
    /// use irapi::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Server {
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     raw_response: String::new(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::RequestRejected {
    ///     status: StatusCode::FORBIDDEN,
    ///     raw_response: String::new(),
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Server { .. } => true,
            Error::RateLimited { .. } => true,
            Error::Maintenance { .. } => true,
            Error::RequestRejected { .. } => false,
            Error::Authentication => false,
            Error::UnexpectedResponse { .. } => false,
            Error::Format(_) => false,
            Error::Deserialization { .. } => false,
            Error::Credentials(_) => false,
            Error::Middleware(_) => false,
            Error::Configuration(_) => false,
            Error::Serialization(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns the HTTP status code if this error has one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Server { status, .. } => Some(*status),
            Error::RateLimited { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            Error::Maintenance { status } => Some(*status),
            Error::RequestRejected { status, .. } => Some(*status),
            Error::UnexpectedResponse { status } => Some(*status),
            Error::Deserialization { status, .. } => Some(*status),
            Error::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Server { raw_response, .. } => Some(raw_response),
            Error::RequestRejected { raw_response, .. } => Some(raw_response),
            Error::Deserialization { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns rate limit information for [`Error::RateLimited`].
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Error::RateLimited { rate_limit_info } => Some(rate_limit_info),
            _ => None,
        }
    }
}

/// A specialized `Result` type for member site calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_of_rate_limited() {
        let err = Error::RateLimited {
            rate_limit_info: RateLimitInfo::default(),
        };
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert!(err.rate_limit_info().is_some());
    }

    #[test]
    fn test_format_error_converts() {
        let err: Error = crate::codec::Laptime::decode("\"x\"").unwrap_err().into();
        assert!(matches!(err, Error::Format(_)));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("laptime"));
    }

    #[test]
    fn test_raw_response_accessor() {
        let err = Error::RequestRejected {
            status: StatusCode::FORBIDDEN,
            raw_response: "nope".to_string(),
        };
        assert_eq!(err.raw_response(), Some("nope"));
        assert_eq!(Error::Authentication.raw_response(), None);
    }
}
