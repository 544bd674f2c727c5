//! Responses returned by a provider, plus filtering and mapping helpers.
mod keypath;

#[cfg(test)]
mod tests;

use std::fmt;
use std::ops::RangeBounds;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

use crate::error::{MoyaError, MoyaResult};
use crate::request::UrlRequest;

use keypath::value_at;

/// Status, final URL and headers of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponseHead {
    pub status: u16,
    pub url: Option<Url>,
    pub headers: HeaderMap,
}

impl HttpResponseHead {
    #[must_use]
    pub fn new(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub(crate) fn from_reqwest(response: &reqwest::Response) -> Self {
        Self {
            status: response.status().as_u16(),
            url: Some(response.url().clone()),
            headers: response.headers().clone(),
        }
    }

    /// The `Content-Length` header, when present and numeric.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.headers
            .get(reqwest::header::CONTENT_LENGTH)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
    }
}

/// A response to a provider request.
#[derive(Debug, Clone)]
pub struct Response {
    pub status_code: u16,
    pub data: Bytes,
    /// The request that produced this response.
    pub request: Option<UrlRequest>,
    /// The HTTP head, absent for plain stubbed responses.
    pub response: Option<HttpResponseHead>,
}

impl Response {
    #[must_use]
    pub fn new(status_code: u16, data: impl Into<Bytes>) -> Self {
        Self {
            status_code,
            data: data.into(),
            request: None,
            response: None,
        }
    }

    #[must_use]
    pub fn with_request(mut self, request: Option<UrlRequest>) -> Self {
        self.request = request;
        self
    }

    #[must_use]
    pub fn with_head(mut self, head: Option<HttpResponseHead>) -> Self {
        self.response = head;
        self
    }

    /// Keeps the response when its status code falls within `range`.
    ///
    /// # Errors
    ///
    /// Returns [`MoyaError::StatusCode`] otherwise.
    pub fn filter<R: RangeBounds<u16>>(self, range: R) -> MoyaResult<Self> {
        if range.contains(&self.status_code) {
            Ok(self)
        } else {
            Err(MoyaError::StatusCode(Box::new(self)))
        }
    }

    /// # Errors
    ///
    /// Returns [`MoyaError::StatusCode`] unless the status code equals `status_code`.
    pub fn filter_status_code(self, status_code: u16) -> MoyaResult<Self> {
        self.filter(status_code..=status_code)
    }

    /// # Errors
    ///
    /// Returns [`MoyaError::StatusCode`] outside 200-299.
    pub fn filter_successful_status_codes(self) -> MoyaResult<Self> {
        self.filter(200..=299)
    }

    /// # Errors
    ///
    /// Returns [`MoyaError::StatusCode`] outside 200-399.
    pub fn filter_successful_status_and_redirect_codes(self) -> MoyaResult<Self> {
        self.filter(200..=399)
    }

    /// Parses the body as JSON.
    ///
    /// An empty body yields `null` when `fails_on_empty_data` is false.
    ///
    /// # Errors
    ///
    /// Returns [`MoyaError::JsonMapping`] when the body is not valid JSON.
    pub fn map_json(&self, fails_on_empty_data: bool) -> MoyaResult<Value> {
        match serde_json::from_slice(&self.data) {
            Ok(value) => Ok(value),
            Err(_) if self.data.is_empty() && !fails_on_empty_data => Ok(Value::Null),
            Err(_) => Err(MoyaError::JsonMapping(Box::new(self.clone()))),
        }
    }

    /// Reads the body as UTF-8, or the string found at a dotted key path.
    ///
    /// # Errors
    ///
    /// Returns [`MoyaError::JsonMapping`] when a key path is given and the body
    /// is not JSON, and [`MoyaError::StringMapping`] when no string is found.
    pub fn map_string(&self, key_path: Option<&str>) -> MoyaResult<String> {
        let Some(key_path) = key_path else {
            return std::str::from_utf8(&self.data)
                .map(ToOwned::to_owned)
                .map_err(|_err| MoyaError::StringMapping(Box::new(self.clone())));
        };
        let json = self.map_json(true)?;
        match value_at(&json, key_path) {
            Some(Value::String(text)) => Ok(text.clone()),
            Some(_) | None => Err(MoyaError::StringMapping(Box::new(self.clone()))),
        }
    }

    /// Decodes the body, or the value found at a dotted key path.
    ///
    /// With `fails_on_empty_data` false, an empty body decodes as `{}` or
    /// `[{}]` when the target type accepts either, and a missing key path
    /// falls back to decoding the whole body.
    ///
    /// # Errors
    ///
    /// Returns [`MoyaError::JsonMapping`] when the key path cannot be resolved
    /// and [`MoyaError::ObjectMapping`] when decoding fails.
    pub fn map<D: DeserializeOwned>(
        &self,
        key_path: Option<&str>,
        fails_on_empty_data: bool,
    ) -> MoyaResult<D> {
        if let Some(key_path) = key_path {
            let json = self.map_json(fails_on_empty_data)?;
            match value_at(&json, key_path) {
                Some(value) => {
                    return serde_json::from_value(value.clone())
                        .map_err(|err| self.object_mapping(err));
                }
                None if fails_on_empty_data => {
                    return Err(MoyaError::JsonMapping(Box::new(self.clone())));
                }
                None => {}
            }
        }
        if self.data.is_empty() && !fails_on_empty_data {
            if let Ok(value) = serde_json::from_slice::<D>(b"{}") {
                return Ok(value);
            }
            if let Ok(value) = serde_json::from_slice::<D>(b"[{}]") {
                return Ok(value);
            }
        }
        serde_json::from_slice(&self.data).map_err(|err| self.object_mapping(err))
    }

    fn object_mapping(&self, source: serde_json::Error) -> MoyaError {
        MoyaError::ObjectMapping {
            source: Arc::new(source),
            response: Box::new(self.clone()),
        }
    }
}

impl PartialEq for Response {
    fn eq(&self, other: &Self) -> bool {
        self.status_code == other.status_code
            && self.data == other.data
            && self.response == other.response
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Status Code: {}, Data Length: {}",
            self.status_code,
            self.data.len()
        )
    }
}
