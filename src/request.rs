//! Wire-level request representation handed to plugins and the transport.
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::EncodingError;
use crate::target::{HeaderFields, Method};

/// A fully resolved request: method, URL, headers and body.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UrlRequest {
    pub method: Method,
    pub url: Url,
    headers: HeaderFields,
    pub body: Option<Bytes>,
}

impl UrlRequest {
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderFields::new(),
            body: None,
        }
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderFields {
        &self.headers
    }

    /// Case-insensitive header lookup.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Replaces every header field.
    pub fn set_headers(&mut self, headers: Option<HeaderFields>) {
        self.headers = headers.unwrap_or_default();
    }

    /// Sets a header, replacing any existing value regardless of case.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.remove_header(name);
        self.headers.insert(name.to_owned(), value.into());
    }

    /// Appends a value to a header, comma-separating it from an existing one.
    pub fn add_header(&mut self, name: &str, value: &str) {
        let merged = match self.header(name) {
            Some(existing) => format!("{},{}", existing, value),
            None => value.to_owned(),
        };
        self.set_header(name, merged);
    }

    pub fn remove_header(&mut self, name: &str) {
        self.headers.retain(|key, _| !key.eq_ignore_ascii_case(name));
    }

    /// Renders the request as a `curl` command line.
    #[must_use]
    pub fn curl_description(&self, session_headers: &HeaderFields) -> String {
        let mut components = vec![
            "$ curl -v".to_owned(),
            format!("-X {}", self.method.as_str()),
        ];
        for (key, value) in session_headers {
            if self.header(key).is_none() {
                components.push(format!("-H \"{}: {}\"", key, value));
            }
        }
        for (key, value) in &self.headers {
            components.push(format!("-H \"{}: {}\"", key, value));
        }
        if let Some(body) = self.body.as_ref().filter(|body| !body.is_empty()) {
            let text = String::from_utf8_lossy(body).replace('"', "\\\"");
            components.push(format!("-d \"{}\"", text));
        }
        components.push(format!("\"{}\"", self.url));
        components.join(" \\\n\t")
    }

    pub(crate) fn header_map(&self) -> Result<HeaderMap, EncodingError> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (key, value) in &self.headers {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_err| EncodingError::InvalidHeader { name: key.clone() })?;
            let value = HeaderValue::from_str(value)
                .map_err(|_err| EncodingError::InvalidHeader { name: key.clone() })?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

/// The read-only view of an outgoing request given to [`crate::plugin::Plugin::will_send`].
pub trait RequestType {
    /// The request about to be sent, after every plugin prepared it.
    fn request(&self) -> Option<&UrlRequest>;

    /// Headers the client adds on its own, such as the user agent.
    fn session_headers(&self) -> &HeaderFields;

    fn curl_description(&self) -> String {
        self.request().map_or_else(
            || "$ curl command could not be created".to_owned(),
            |request| request.curl_description(self.session_headers()),
        )
    }
}

pub(crate) struct SentRequest<'req> {
    pub(crate) request: &'req UrlRequest,
    pub(crate) session_headers: &'req HeaderFields,
}

impl RequestType for SentRequest<'_> {
    fn request(&self) -> Option<&UrlRequest> {
        Some(self.request)
    }

    fn session_headers(&self) -> &HeaderFields {
        self.session_headers
    }
}
