use bytes::Bytes;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;

use super::Parameters;
use crate::error::EncodingError;
use crate::request::UrlRequest;

const CONTENT_TYPE: &str = "Content-Type";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";
const JSON_CONTENT_TYPE: &str = "application/json";

/// How parameters are written into a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterEncoding {
    Url(UrlEncoding),
    Json(JsonEncoding),
}

impl Default for ParameterEncoding {
    fn default() -> Self {
        ParameterEncoding::Url(UrlEncoding::default())
    }
}

impl ParameterEncoding {
    #[must_use]
    pub const fn json() -> Self {
        ParameterEncoding::Json(JsonEncoding { pretty: false })
    }

    #[must_use]
    pub const fn query_string() -> Self {
        ParameterEncoding::Url(UrlEncoding::query_string())
    }

    #[must_use]
    pub const fn http_body() -> Self {
        ParameterEncoding::Url(UrlEncoding::http_body())
    }

    pub(crate) fn encode(
        &self,
        request: UrlRequest,
        parameters: &Parameters,
    ) -> Result<UrlRequest, EncodingError> {
        match self {
            ParameterEncoding::Url(encoding) => Ok(encoding.encode(request, parameters)),
            ParameterEncoding::Json(encoding) => encoding.encode(request, parameters),
        }
    }
}

/// Where URL-encoded parameters go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Destination {
    /// Query string for GET, HEAD and DELETE; body otherwise.
    #[default]
    MethodDependent,
    QueryString,
    HttpBody,
}

/// How array values are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayEncoding {
    /// `key[]=value`
    #[default]
    Brackets,
    /// `key=value`
    NoBrackets,
}

/// How booleans are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoolEncoding {
    /// `1` and `0`
    #[default]
    Numeric,
    /// `true` and `false`
    Literal,
}

/// Percent-encoded `key=value` pairs, in the query string or the body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UrlEncoding {
    pub destination: Destination,
    pub array_encoding: ArrayEncoding,
    pub bool_encoding: BoolEncoding,
}

impl UrlEncoding {
    #[must_use]
    pub const fn query_string() -> Self {
        Self {
            destination: Destination::QueryString,
            array_encoding: ArrayEncoding::Brackets,
            bool_encoding: BoolEncoding::Numeric,
        }
    }

    #[must_use]
    pub const fn http_body() -> Self {
        Self {
            destination: Destination::HttpBody,
            array_encoding: ArrayEncoding::Brackets,
            bool_encoding: BoolEncoding::Numeric,
        }
    }

    fn encodes_in_url(self, request: &UrlRequest) -> bool {
        match self.destination {
            Destination::MethodDependent => request.method.encodes_parameters_in_url(),
            Destination::QueryString => true,
            Destination::HttpBody => false,
        }
    }

    pub(crate) fn encode(self, mut request: UrlRequest, parameters: &Parameters) -> UrlRequest {
        if self.encodes_in_url(&request) {
            if parameters.is_empty() {
                return request;
            }
            let query = self.query(parameters);
            let merged = match request.url.query() {
                Some(existing) if !existing.is_empty() => format!("{}&{}", existing, query),
                Some(_) | None => query,
            };
            request.url.set_query(Some(&merged));
        } else {
            if request.header(CONTENT_TYPE).is_none() {
                request.set_header(CONTENT_TYPE, FORM_CONTENT_TYPE);
            }
            request.body = Some(Bytes::from(self.query(parameters)));
        }
        request
    }

    /// Renders parameters as `key=value` pairs joined by `&`, keys sorted.
    #[must_use]
    pub fn query(self, parameters: &Parameters) -> String {
        let mut components = Vec::new();
        for (key, value) in parameters {
            self.query_components(key, value, &mut components);
        }
        components
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    fn query_components(self, key: &str, value: &Value, components: &mut Vec<(String, String)>) {
        match value {
            Value::Object(object) => {
                for (nested_key, nested_value) in object {
                    self.query_components(
                        &format!("{}[{}]", key, nested_key),
                        nested_value,
                        components,
                    );
                }
            }
            Value::Array(values) => {
                let array_key = match self.array_encoding {
                    ArrayEncoding::Brackets => format!("{}[]", key),
                    ArrayEncoding::NoBrackets => key.to_owned(),
                };
                for nested_value in values {
                    self.query_components(&array_key, nested_value, components);
                }
            }
            Value::Bool(flag) => {
                let encoded = match (self.bool_encoding, flag) {
                    (BoolEncoding::Numeric, true) => "1",
                    (BoolEncoding::Numeric, false) => "0",
                    (BoolEncoding::Literal, true) => "true",
                    (BoolEncoding::Literal, false) => "false",
                };
                components.push((escape(key), encoded.to_owned()));
            }
            Value::Number(number) => components.push((escape(key), escape(&number.to_string()))),
            Value::String(text) => components.push((escape(key), escape(text))),
            Value::Null => components.push((escape(key), String::new())),
        }
    }
}

/// Writes parameters as a JSON body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonEncoding {
    pub pretty: bool,
}

impl JsonEncoding {
    pub(crate) fn encode(
        self,
        request: UrlRequest,
        parameters: &Parameters,
    ) -> Result<UrlRequest, EncodingError> {
        let body = if self.pretty {
            serde_json::to_vec_pretty(parameters)?
        } else {
            serde_json::to_vec(parameters)?
        };
        Ok(set_json_body(request, body))
    }
}

pub(crate) fn set_json_body(mut request: UrlRequest, body: Vec<u8>) -> UrlRequest {
    if request.header(CONTENT_TYPE).is_none() {
        request.set_header(CONTENT_TYPE, JSON_CONTENT_TYPE);
    }
    request.body = Some(Bytes::from(body));
    request
}

/// Everything except unreserved characters, `/` and `?` (RFC 3986 section 3.4).
const QUERY_ESCAPED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/')
    .remove(b'?');

pub(crate) fn escape(value: &str) -> String {
    utf8_percent_encode(value, QUERY_ESCAPED).to_string()
}
