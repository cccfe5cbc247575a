//! Hooks that observe or adjust requests as they pass through the client.
//!
//! Hooks run synchronously, in the order they were registered, on every call
//! made through the request pipeline. The login request is deliberately not
//! passed through them so credentials are never exposed to a hook.
//!
//! The first hook that returns an error aborts the call with that error.
//!
//! ```
//! use irapi::middleware::{AfterResponse, SentRequest};
//! use irapi::{Client, Result};
//!
//! struct LogStatus;
//!
//! impl AfterResponse for LogStatus {
//!     fn after_response(&self, sent: &SentRequest, response: Option<&reqwest::Response>) -> Result<()> {
//!         if let Some(response) = response {
//!             println!("{} {} -> {}", sent.method, sent.url, response.status());
//!         }
//!         Ok(())
//!     }
//! }
//!
//! # fn main() -> irapi::Result<()> {
//! let mut client = Client::builder().build()?;
//! client.before_request(|request: &mut reqwest::Request| -> Result<()> {
//!     request.headers_mut().insert("x-trace", "1".parse().unwrap());
//!     Ok(())
//! });
//! client.after_response(LogStatus);
//! # Ok(())
//! # }
//! ```

use crate::Result;
use http::{HeaderMap, Method};
use url::Url;

/// Runs before a request is sent and may modify it.
pub trait BeforeRequest: Send + Sync {
    fn before_request(&self, request: &mut reqwest::Request) -> Result<()>;
}

impl<F> BeforeRequest for F
where
    F: Fn(&mut reqwest::Request) -> Result<()> + Send + Sync,
{
    fn before_request(&self, request: &mut reqwest::Request) -> Result<()> {
        self(request)
    }
}

/// Runs after a request has been sent, whether or not a response came back.
///
/// `response` is `None` when the request failed at the transport level; the
/// transport error is still returned to the caller once the hooks have run.
/// Hooks see the response before its body is read, so they can inspect the
/// status and headers but not consume the body.
pub trait AfterResponse: Send + Sync {
    fn after_response(&self, sent: &SentRequest, response: Option<&reqwest::Response>)
        -> Result<()>;
}

impl<F> AfterResponse for F
where
    F: Fn(&SentRequest, Option<&reqwest::Response>) -> Result<()> + Send + Sync,
{
    fn after_response(&self, sent: &SentRequest, response: Option<&reqwest::Response>) -> Result<()> {
        self(sent, response)
    }
}

/// What was sent, as seen after the before-request hooks ran.
#[derive(Debug, Clone)]
pub struct SentRequest {
    pub method: Method,
    pub url: Url,
    pub headers: HeaderMap,
}

impl SentRequest {
    pub(crate) fn of(request: &reqwest::Request) -> Self {
        Self {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: request.headers().clone(),
        }
    }
}

/// The ordered before/after hook lists of one client.
#[derive(Default)]
pub(crate) struct Hooks {
    before: Vec<Box<dyn BeforeRequest>>,
    after: Vec<Box<dyn AfterResponse>>,
}

impl Hooks {
    pub(crate) fn push_before(&mut self, hook: Box<dyn BeforeRequest>) {
        self.before.push(hook);
    }

    pub(crate) fn push_after(&mut self, hook: Box<dyn AfterResponse>) {
        self.after.push(hook);
    }

    pub(crate) fn run_before(&self, request: &mut reqwest::Request) -> Result<()> {
        self.before
            .iter()
            .try_for_each(|hook| hook.before_request(request))
    }

    pub(crate) fn run_after(
        &self,
        sent: &SentRequest,
        response: Option<&reqwest::Response>,
    ) -> Result<()> {
        self.after
            .iter()
            .try_for_each(|hook| hook.after_response(sent, response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn request() -> reqwest::Request {
        reqwest::Request::new(Method::GET, Url::parse("https://example.com/x").unwrap())
    }

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        fail: bool,
    }

    impl BeforeRequest for Record {
        fn before_request(&self, _request: &mut reqwest::Request) -> Result<()> {
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(Error::Middleware(self.name.to_string()));
            }
            Ok(())
        }
    }

    impl AfterResponse for Record {
        fn after_response(&self, _sent: &SentRequest, response: Option<&reqwest::Response>) -> Result<()> {
            assert!(response.is_none());
            self.log.lock().unwrap().push(self.name);
            if self.fail {
                return Err(Error::Middleware(self.name.to_string()));
            }
            Ok(())
        }
    }

    fn record(name: &'static str, log: &Arc<Mutex<Vec<&'static str>>>, fail: bool) -> Record {
        Record {
            name,
            log: log.clone(),
            fail,
        }
    }

    #[test]
    fn test_before_hooks_run_in_order_and_stop_on_error() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = Hooks::default();
        hooks.push_before(Box::new(record("first", &log, false)));
        hooks.push_before(Box::new(record("second", &log, true)));
        hooks.push_before(Box::new(record("third", &log, false)));

        let err = hooks.run_before(&mut request()).unwrap_err();
        assert!(matches!(err, Error::Middleware(ref name) if name == "second"));
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_after_hooks_see_missing_response() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = Hooks::default();
        hooks.push_after(Box::new(record("a", &log, false)));
        hooks.push_after(Box::new(record("b", &log, false)));

        let sent = SentRequest::of(&request());
        hooks.run_after(&sent, None).unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_closure_hook_can_modify_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let mut hooks = Hooks::default();
        hooks.push_before(Box::new(move |request: &mut reqwest::Request| -> Result<()> {
            seen.fetch_add(1, Ordering::SeqCst);
            request
                .headers_mut()
                .insert("x-hooked", http::HeaderValue::from_static("yes"));
            Ok(())
        }));

        let mut req = request();
        hooks.run_before(&mut req).unwrap();
        assert_eq!(req.headers()["x-hooked"], "yes");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_closure_after_hook() {
        let paths = Arc::new(Mutex::new(Vec::new()));
        let seen = paths.clone();
        let mut hooks = Hooks::default();
        hooks.push_after(Box::new(
            move |sent: &SentRequest, response: Option<&reqwest::Response>| -> Result<()> {
                assert!(response.is_none());
                seen.lock().unwrap().push(sent.url.path().to_string());
                Ok(())
            },
        ));
        hooks.push_after(Box::new(
            |_: &SentRequest, _: Option<&reqwest::Response>| -> Result<()> {
                Err(Error::Middleware("rejected".to_string()))
            },
        ));

        let sent = SentRequest::of(&request());
        let err = hooks.run_after(&sent, None).unwrap_err();
        assert!(matches!(err, Error::Middleware(ref reason) if reason == "rejected"));
        assert_eq!(*paths.lock().unwrap(), vec!["/x".to_string()]);
    }
}
