//! Wire-level request types: header names, verbs and the signed envelope
//! built for every call.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::credential::Credentials;
use crate::error::EcError;

/// Versioned root of the EC open platform REST API.
pub const DEFAULT_BASE_URL: &str = "https://open.workec.com/v2/";

/// Content type sent with every request, GET included.
pub const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";

/// Header names expected by the platform
pub mod headers {
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const CORP_ID: &str = "X-Ec-Cid";
    pub const SIGN: &str = "X-Ec-Sign";
    pub const TIMESTAMP: &str = "X-Ec-TimeStamp";
}

/// HTTP verbs used by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Method {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(Self::Get),
            "POST" => Ok(Self::Post),
            other => Err(format!("unsupported method: {}", other)),
        }
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => http::Method::GET,
            Method::Post => http::Method::POST,
        }
    }
}

/// One signed request, built fresh for every call.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub method: Method,
    /// Path relative to the base URL: `/`-separated segments, no leading
    /// slash, no dot segments.
    pub path: String,
    pub headers: Vec<(&'static str, String)>,
    /// JSON-encoded parameters.
    pub body: String,
    /// The timestamp both signed and sent in `X-Ec-TimeStamp`.
    pub timestamp: u64,
}

impl Envelope {
    /// Sign and encode a request for `timestamp`.
    ///
    /// The corp id header is left out when the corp id is empty. The
    /// signature and timestamp headers are always present. Paths that could
    /// leave the base URL are rejected with [`EcError::InvalidUrl`].
    pub fn build<P: Serialize + ?Sized>(
        credentials: &Credentials,
        method: Method,
        path: &str,
        params: &P,
        timestamp: u64,
    ) -> Result<Self, EcError> {
        let path = relative_path(path)?;
        let body = serde_json::to_string(params)?;

        let mut fields = vec![(headers::CONTENT_TYPE, CONTENT_TYPE_JSON.to_string())];
        if !credentials.corp_id().is_empty() {
            fields.push((headers::CORP_ID, credentials.corp_id().to_string()));
        }
        fields.push((headers::SIGN, credentials.sign(timestamp)));
        fields.push((headers::TIMESTAMP, timestamp.to_string()));

        Ok(Self {
            method,
            path,
            headers: fields,
            body,
            timestamp,
        })
    }

    /// Look up a header value, ignoring case like HTTP does.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Normalize a request path so it always resolves under the base URL.
///
/// Leading and repeated slashes are dropped. Absolute URLs, dot segments,
/// backslashes and query or fragment markers are refused.
fn relative_path(raw: &str) -> Result<String, EcError> {
    let trimmed = raw.trim();
    if trimmed.contains("://") || trimmed.contains(['?', '#', '\\']) {
        return Err(EcError::InvalidUrl(format!(
            "{}: path must be relative to the API root",
            trimmed
        )));
    }

    let mut segments = Vec::new();
    for segment in trimmed.split('/').filter(|s| !s.is_empty()) {
        if segment == "." || segment == ".." {
            return Err(EcError::InvalidUrl(format!(
                "{}: dot segments are not allowed",
                trimmed
            )));
        }
        segments.push(segment);
    }
    Ok(segments.join("/"))
}
