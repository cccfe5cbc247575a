//! Sources of login credentials.
//!
//! The client never stores a username or password itself. It asks its
//! [`CredentialsProvider`] for them each time [`Client::login`](crate::Client::login)
//! runs, and drops them as soon as the login form has been sent.
//!
//! Three providers are included: [`StaticCredentials`], [`FileCredentials`] and
//! [`EnvironmentCredentials`]. Anything else (a secrets manager, a prompt) can be
//! plugged in by implementing the trait, or by passing a closure:
//!
//! ```
//! use irapi::{Client, Credentials};
//!
//! let client = Client::builder()
//!     .credentials(|| -> irapi::Result<Credentials> {
//!         Ok(Credentials::new("driver@example.com", "hunter2"))
//!     })
//!     .build();
//! assert!(client.is_ok());
//! ```

use crate::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Default environment variable holding the username.
pub const USERNAME_VAR: &str = "IRACING_USERNAME";

/// Default environment variable holding the password.
pub const PASSWORD_VAR: &str = "IRACING_PASSWORD";

/// A username and password for the member site login form.
///
/// Both fields are wiped from memory when the value is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Something that can produce [`Credentials`] on demand.
pub trait CredentialsProvider: Send + Sync {
    /// Returns the credentials to log in with.
    fn fetch(&self) -> Result<Credentials>;
}

impl<F> CredentialsProvider for F
where
    F: Fn() -> Result<Credentials> + Send + Sync,
{
    fn fetch(&self) -> Result<Credentials> {
        self()
    }
}

/// Always returns the same in-memory credentials.
#[derive(Clone)]
pub struct StaticCredentials {
    credentials: Credentials,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            credentials: Credentials::new(username, password),
        }
    }
}

impl CredentialsProvider for StaticCredentials {
    fn fetch(&self) -> Result<Credentials> {
        Ok(self.credentials.clone())
    }
}

/// Reads credentials from a file containing `username,password`.
///
/// The file is read on every fetch, so it can be rotated underneath a running
/// client (for example a mounted Kubernetes secret). A trailing line ending is
/// ignored; everything after the first comma is the password.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialsProvider for FileCredentials {
    fn fetch(&self) -> Result<Credentials> {
        let contents = Zeroizing::new(std::fs::read_to_string(&self.path).map_err(|e| {
            Error::Credentials(format!("failed to read {}: {}", self.path.display(), e))
        })?);

        let line = contents.trim_end_matches(['\r', '\n']);
        let (username, password) = line.split_once(',').ok_or_else(|| {
            Error::Credentials(format!(
                "{} is not in the form username,password",
                self.path.display()
            ))
        })?;

        if username.is_empty() {
            return Err(Error::Credentials(format!(
                "no username found in {}",
                self.path.display()
            )));
        }

        Ok(Credentials::new(username, password))
    }
}

/// Reads credentials from two environment variables.
///
/// Defaults to `IRACING_USERNAME` and `IRACING_PASSWORD`.
#[derive(Debug, Clone)]
pub struct EnvironmentCredentials {
    username_var: String,
    password_var: String,
}

impl EnvironmentCredentials {
    pub fn new() -> Self {
        Self::with_vars(USERNAME_VAR, PASSWORD_VAR)
    }

    /// Reads from the given variable names instead of the defaults.
    pub fn with_vars(username_var: impl Into<String>, password_var: impl Into<String>) -> Self {
        Self {
            username_var: username_var.into(),
            password_var: password_var.into(),
        }
    }

    fn read(name: &str, what: &str) -> Result<String> {
        match std::env::var(name) {
            Ok(value) if !value.is_empty() => Ok(value),
            _ => Err(Error::Credentials(format!("no {} found in ${}", what, name))),
        }
    }
}

impl Default for EnvironmentCredentials {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialsProvider for EnvironmentCredentials {
    fn fetch(&self) -> Result<Credentials> {
        let username = Self::read(&self.username_var, "username")?;
        let password = Self::read(&self.password_var, "password")?;
        Ok(Credentials { username, password })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_static_credentials() {
        let creds = StaticCredentials::new("user", "pass").fetch().unwrap();
        assert_eq!(creds.username, "user");
        assert_eq!(creds.password, "pass");
    }

    #[test]
    fn test_debug_redacts_password() {
        let debug = format!("{:?}", Credentials::new("user", "s3cret"));
        assert!(debug.contains("user"));
        assert!(!debug.contains("s3cret"));
    }

    #[test]
    fn test_file_credentials() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "user@example.com,pa,ss").unwrap();

        let creds = FileCredentials::new(file.path()).fetch().unwrap();
        assert_eq!(creds.username, "user@example.com");
        assert_eq!(creds.password, "pa,ss");
    }

    #[test]
    fn test_file_credentials_without_comma() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "just-a-username").unwrap();

        let err = FileCredentials::new(file.path()).fetch().unwrap_err();
        assert!(matches!(err, Error::Credentials(_)));
    }

    #[test]
    fn test_file_credentials_missing_file() {
        let err = FileCredentials::new("/nonexistent/irapi-credentials")
            .fetch()
            .unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_environment_credentials() {
        std::env::set_var("IRAPI_TEST_ENV_USER", "env-user");
        std::env::set_var("IRAPI_TEST_ENV_PASS", "env-pass");

        let creds = EnvironmentCredentials::with_vars("IRAPI_TEST_ENV_USER", "IRAPI_TEST_ENV_PASS")
            .fetch()
            .unwrap();
        assert_eq!(creds.username, "env-user");
        assert_eq!(creds.password, "env-pass");
    }

    #[test]
    fn test_environment_credentials_missing_password() {
        std::env::set_var("IRAPI_TEST_ENV_USER_ONLY", "env-user");
        std::env::remove_var("IRAPI_TEST_ENV_NO_PASS");

        let err = EnvironmentCredentials::with_vars("IRAPI_TEST_ENV_USER_ONLY", "IRAPI_TEST_ENV_NO_PASS")
            .fetch()
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Credentials unavailable: no password found in $IRAPI_TEST_ENV_NO_PASS"
        );
    }

    #[test]
    fn test_closure_provider() {
        let provider = || -> Result<Credentials> { Ok(Credentials::new("a", "b")) };
        assert_eq!(provider.fetch().unwrap().username, "a");
    }
}
