//! # irapi - a client for the iRacing member site
//!
//! `irapi` logs in to the iRacing member site with a cookie session and calls
//! its private JSON endpoints: the member profile, career statistics, seasons,
//! subsession results, result search and lap data.
//!
//! The member site speaks an awkward dialect: bodies are URL-escaped JSON,
//! times arrive as Unix milliseconds or wall-clock strings, counters as
//! comma-separated strings, and ratings may be `"---"`. The [`codec`] module
//! turns each of those into a proper Rust value.
//!
//! ## Quick Start
//!
//! ```no_run
//! use irapi::{Client, EnvironmentCredentials};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), irapi::Error> {
//!     // Reads IRACING_USERNAME and IRACING_PASSWORD
//!     let client = Client::new(EnvironmentCredentials::new())?;
//!     client.login().await?;
//!
//!     for stats in client.get_career_stats(123456).await? {
//!         println!("{}: {} starts, {} wins", stats.category, stats.starts, stats.wins);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Errors
//!
//! Failures are classified from the response before its body is read:
//!
//! ```no_run
//! use irapi::{Client, Error};
//!
//! # async fn example(client: Client) {
//! match client.get_seasons(true).await {
//!     Ok(seasons) => println!("{} active seasons", seasons.len()),
//!     Err(Error::Maintenance { .. }) => eprintln!("member site is down for maintenance"),
//!     Err(Error::RateLimited { rate_limit_info }) => {
//!         eprintln!("slow down, retry after {:?}", rate_limit_info.retry_after)
//!     }
//!     Err(Error::Deserialization { raw_response, serde_error, .. }) => {
//!         eprintln!("unexpected body ({}): {}", serde_error, raw_response)
//!     }
//!     Err(e) => eprintln!("request failed: {}", e),
//! }
//! # }
//! ```
//!
//! Nothing is retried automatically; [`Error::is_retryable`] says which
//! failures are worth trying again.
//!
//! ## Hooks
//!
//! Hooks registered with [`Client::before_request`] and
//! [`Client::after_response`] see every request except the login. See
//! [`middleware`].

mod auth;
mod client;
pub mod codec;
pub mod credentials;
mod error;
pub mod licence;
pub mod member;
pub mod middleware;
pub mod rate_limit;
mod request;
mod response;
pub mod results;
pub mod seasons;
mod session;

pub use client::{Client, ClientBuilder};
pub use codec::{FormatError, Laptime, Milliseconds, Rating, SimTime, StringifiedUint64, Timestamp};
pub use credentials::{
    Credentials, CredentialsProvider, EnvironmentCredentials, FileCredentials, StaticCredentials,
};
pub use error::{Error, Result};
pub use licence::{LicenceCategory, LicenceClass};
pub use request::{ApiRequest, Body};
pub use response::Response;
pub use session::{Profile, MAINTENANCE_HEADER};

pub use reqwest;

/// Address of the live member site.
pub const HOST: &str = "https://members.iracing.com";

/// User agent sent by [`Profile::Standard`].
pub const USER_AGENT: &str = concat!("irapi/", env!("CARGO_PKG_VERSION"));
