//! The member site client.
//!
//! [`Client`] owns one cookie-holding session. Log in once with
//! [`Client::login`], then call the endpoint methods or the generic
//! [`Client::call`]. Use [`ClientBuilder`] to configure the client.

use crate::codec;
use crate::credentials::{CredentialsProvider, EnvironmentCredentials};
use crate::middleware::{AfterResponse, BeforeRequest, Hooks};
use crate::request::{ApiRequest, Body};
use crate::session::{Profile, Session};
use crate::{auth, Error, Response, Result};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use url::Url;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// A client for the iRacing member site.
///
/// The client holds a single logical session: its cookie jar lives as long as
/// the client, and calls are made one at a time. It is not `Clone`; use one
/// client per concurrent session.
///
/// # Examples
///
/// ```no_run
/// use irapi::{Client, FileCredentials};
///
/// # async fn example() -> Result<(), irapi::Error> {
/// let client = Client::builder()
///     .credentials(FileCredentials::new("credentials.txt"))
///     .build()?;
///
/// client.login().await?;
///
/// let profile = client.get_profile().await?;
/// println!("Logged in as {}", profile.display_name);
/// # Ok(())
/// # }
/// ```
pub struct Client {
    session: Session,
    credentials: Box<dyn CredentialsProvider>,
    profile: Profile,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client for the live member site with the standard profile.
    pub fn new(credentials: impl CredentialsProvider + 'static) -> Result<Self> {
        Self::builder().credentials(credentials).build()
    }

    /// Appends a hook that runs before every request except login.
    pub fn before_request(&mut self, hook: impl BeforeRequest + 'static) {
        self.session.hooks_mut().push_before(Box::new(hook));
    }

    /// Appends a hook that runs after every request except login.
    pub fn after_response(&mut self, hook: impl AfterResponse + 'static) {
        self.session.hooks_mut().push_after(Box::new(hook));
    }

    pub fn base_url(&self) -> &Url {
        self.session.base_url()
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    /// Logs in to the member site.
    ///
    /// Credentials are fetched from the provider on every call and are not
    /// kept afterwards. The hook chains are not run for this request.
    ///
    /// # Errors
    ///
    /// - [`Error::Authentication`] if the member site rejected the credentials
    /// - [`Error::Maintenance`] if the member site is offline
    /// - [`Error::UnexpectedResponse`] for any status other than 200 or 302
    pub async fn login(&self) -> Result<()> {
        auth::login(&self.session, self.credentials.as_ref(), self.profile).await
    }

    /// Sends a request and decodes the response body into `T`.
    ///
    /// The body is URL un-escaped before it is parsed as JSON. Non-success
    /// responses are turned into errors before the body is read.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use irapi::{ApiRequest, Client};
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Member {
    ///     #[serde(rename = "custID")]
    ///     cust_id: u64,
    /// }
    ///
    /// # async fn example(client: Client) -> Result<(), irapi::Error> {
    /// let member = client
    ///     .call::<Member>(ApiRequest::get("/membersite/member/GetMember"))
    ///     .await?;
    /// println!("{}", member.data.cust_id);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call<T>(&self, request: ApiRequest) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        let url = request.url(self.session.base_url())?;

        let mut builder = self
            .session
            .request(request.method, url)
            .header(ACCEPT, "application/json")
            .headers(request.headers);

        builder = match request.body {
            Some(Body::Form(pairs)) => builder.form(&pairs),
            Some(Body::Json(value)) => builder.json(&value),
            Some(Body::Text(text)) => builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(text),
            None => builder,
        };

        let start = Instant::now();
        let response = self.session.send(builder.build()?).await?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        let latency = start.elapsed();

        let raw_body = codec::unescape_body(&body)?;

        match serde_json::from_str::<T>(&raw_body) {
            Ok(data) => Ok(Response::new(data, raw_body, status, headers, latency)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    raw_response = %raw_body,
                    "Failed to deserialize response"
                );

                Err(Error::Deserialization {
                    raw_response: raw_body,
                    serde_error: e.to_string(),
                    status,
                })
            }
        }
    }

    /// Makes a GET request to `path`, which may carry a query string.
    pub async fn get<T>(&self, path: impl Into<String>) -> Result<Response<T>>
    where
        T: DeserializeOwned,
    {
        self.call(ApiRequest::get(path)).await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// Every setting has a default: the live member site, the standard profile,
/// no timeout, and credentials read from `IRACING_USERNAME` and
/// `IRACING_PASSWORD`.
///
/// ```
/// use irapi::{ClientBuilder, Profile, StaticCredentials};
/// use std::time::Duration;
///
/// # fn main() -> irapi::Result<()> {
/// let client = ClientBuilder::new()
///     .base_url("http://localhost:8080")?
///     .profile(Profile::LegacyCompat)
///     .timeout(Duration::from_secs(30))
///     .default_header("x-client", "stats-bot")?
///     .credentials(StaticCredentials::new("driver@example.com", "hunter2"))
///     .build()?;
///
/// assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    profile: Profile,
    timeout: Option<Duration>,
    default_headers: HeaderMap,
    credentials: Option<Box<dyn CredentialsProvider>>,
    hooks: Hooks,
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            profile: Profile::default(),
            timeout: None,
            default_headers: HeaderMap::new(),
            credentials: None,
            hooks: Hooks::default(),
        }
    }

    /// Sets the member site address. Defaults to [`HOST`](crate::HOST).
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    pub fn profile(mut self, profile: Profile) -> Self {
        self.profile = profile;
        self
    }

    /// Sets a timeout for each request. Expiry surfaces as [`Error::Transport`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header sent with every request, on top of the profile's headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    pub fn credentials(mut self, provider: impl CredentialsProvider + 'static) -> Self {
        self.credentials = Some(Box::new(provider));
        self
    }

    pub fn before_request(mut self, hook: impl BeforeRequest + 'static) -> Self {
        self.hooks.push_before(Box::new(hook));
        self
    }

    pub fn after_response(mut self, hook: impl AfterResponse + 'static) -> Self {
        self.hooks.push_after(Box::new(hook));
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(crate::HOST)?,
        };

        let mut headers = self.profile.headers(&base_url)?;
        headers.extend(self.default_headers);

        let mut http = reqwest::Client::builder()
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }
        let http = http.build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        let credentials = self
            .credentials
            .unwrap_or_else(|| Box::new(EnvironmentCredentials::new()));

        Ok(Client {
            session: Session::new(http, base_url, headers, self.hooks),
            credentials,
            profile: self.profile,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let client = Client::builder().build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://members.iracing.com/");
        assert_eq!(client.profile(), Profile::Standard);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Client::builder().base_url("not a url").err().unwrap();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn test_invalid_default_header() {
        let err = Client::builder()
            .default_header("x-ok", "bad\nvalue")
            .err()
            .unwrap();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
