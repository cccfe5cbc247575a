//! Request values for the envelope call.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use url::Url;

/// Body of a member site request.
#[derive(Debug, Clone)]
pub enum Body {
    /// `application/x-www-form-urlencoded` pairs, in order.
    Form(Vec<(String, String)>),
    /// A JSON document.
    Json(serde_json::Value),
    /// Pre-encoded text, sent as a form body.
    Text(String),
}

/// One call through the request pipeline.
///
/// The path is resolved against the client's base URL and may already carry a
/// query string; parameters added with [`with_query_param`](Self::with_query_param)
/// are appended after it in the order they were added.
///
/// ```
/// use irapi::ApiRequest;
///
/// let request = ApiRequest::get("/membersite/member/GetSeasons?onlyActive=1")
///     .with_query_param("fields", "year,quarter");
///
/// let url = request.url(&"https://members.iracing.com".parse().unwrap()).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "https://members.iracing.com/membersite/member/GetSeasons?onlyActive=1&fields=year%2Cquarter"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, relative to the base URL.
    pub path: String,

    /// Query parameters appended to the path.
    pub query_params: Vec<(String, String)>,

    /// Additional headers for this request.
    pub headers: HeaderMap,

    /// Optional request body.
    pub body: Option<Body>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query_params: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Appends a query parameter.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.push((key.into(), value.into()));
        self
    }

    /// Appends several query parameters, keeping their order.
    pub fn with_query_params(
        mut self,
        params: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        self.query_params.extend(params);
        self
    }

    pub fn with_body(mut self, body: Body) -> Self {
        self.body = Some(body);
        self
    }

    /// Serializes `value` as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`](crate::Error::Serialization) if `value`
    /// cannot be represented as JSON.
    pub fn with_json<T: Serialize>(self, value: &T) -> Result<Self, crate::Error> {
        let json = serde_json::to_value(value)
            .map_err(|e| crate::Error::Serialization(e.to_string()))?;
        Ok(self.with_body(Body::Json(json)))
    }

    /// Resolves the full URL against `base`.
    pub fn url(&self, base: &Url) -> Result<Url, crate::Error> {
        let mut url = base.join(&self.path)?;
        if !self.query_params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.query_params);
        }
        Ok(url)
    }
}

impl Default for ApiRequest {
    fn default() -> Self {
        Self::new(Method::GET, "/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://members.iracing.com").unwrap()
    }

    #[test]
    fn test_query_params_keep_order() {
        let url = ApiRequest::get("/memberstats/member/GetResults")
            .with_query_param("showraces", "1")
            .with_query_param("category[]", "1,2,3,4")
            .with_query_param("format", "json")
            .url(&base())
            .unwrap();

        assert_eq!(
            url.query(),
            Some("showraces=1&category%5B%5D=1%2C2%2C3%2C4&format=json")
        );
    }

    #[test]
    fn test_path_without_query() {
        let url = ApiRequest::get("/membersite/member/GetMember")
            .url(&base())
            .unwrap();
        assert_eq!(url.as_str(), "https://members.iracing.com/membersite/member/GetMember");
    }

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let err = ApiRequest::get("/").with_header("bad header", "x").unwrap_err();
        assert!(matches!(err, crate::Error::Configuration(_)));
    }

    #[test]
    fn test_with_json_body() {
        let request = ApiRequest::post("/x").with_json(&vec![1, 2]).unwrap();
        match request.body {
            Some(Body::Json(value)) => assert_eq!(value, serde_json::json!([1, 2])),
            other => panic!("Expected JSON body, got {:?}", other),
        }
    }
}
