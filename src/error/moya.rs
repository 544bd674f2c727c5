use std::sync::Arc;

use thiserror::Error;

use crate::endpoint::StubError;
use crate::response::Response;

pub type MoyaResult<T> = Result<T, MoyaError>;

/// Failures produced while building, sending, or mapping a request.
#[derive(Debug, Clone, Error)]
pub enum MoyaError {
    #[error("Failed to map data to JSON.")]
    JsonMapping(Box<Response>),
    #[error("Failed to map data to a String.")]
    StringMapping(Box<Response>),
    #[error("Failed to map data to a Decodable object: {source}")]
    ObjectMapping {
        #[source]
        source: Arc<serde_json::Error>,
        response: Box<Response>,
    },
    #[error("Failed to encode Encodable object into data: {source}")]
    EncodableMapping {
        #[source]
        source: Arc<serde_json::Error>,
    },
    #[error("Status code didn't fall within the given range.")]
    StatusCode(Box<Response>),
    #[error("{source}")]
    Underlying {
        #[source]
        source: UnderlyingError,
        response: Option<Box<Response>>,
    },
    #[error("Failed to map Endpoint to a URLRequest: {0}")]
    RequestMapping(String),
    #[error("Failed to encode parameters for URLRequest: {0}")]
    ParameterEncoding(#[from] EncodingError),
}

/// Errors raised by the transport or the stub layer underneath the provider.
#[derive(Debug, Clone, Error)]
pub enum UnderlyingError {
    #[error("{0}")]
    Transport(Arc<reqwest::Error>),
    #[error("{0}")]
    Io(Arc<std::io::Error>),
    #[error("The request was cancelled.")]
    Cancelled,
    #[error("Response status code was unacceptable: {status}.")]
    StatusCodeValidation { status: u16 },
    #[error("{0}")]
    Stubbed(StubError),
}

/// Errors raised while encoding a task into a request.
#[derive(Debug, Clone, Error)]
pub enum EncodingError {
    #[error("JSON encoding failed: {0}")]
    Json(Arc<serde_json::Error>),
    #[error("Invalid header '{name}'.")]
    InvalidHeader { name: String },
    #[error(
        "Body parameters only accept URL encoding with the http body destination; use query string encoding for url parameters."
    )]
    UrlEncodingNotHttpBody,
    #[error("{method} does not support multipart form data.")]
    MultipartUnsupportedMethod { method: &'static str },
    #[error("Multipart upload requires at least one body part.")]
    EmptyMultipart,
    #[error("Invalid multipart mime type '{mime_type}'.")]
    InvalidMimeType { mime_type: String },
}

impl MoyaError {
    /// The response attached to this error, when there is one.
    #[must_use]
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::JsonMapping(response)
            | Self::StringMapping(response)
            | Self::StatusCode(response)
            | Self::ObjectMapping { response, .. } => Some(response),
            Self::Underlying { response, .. } => response.as_deref(),
            Self::EncodableMapping { .. } | Self::RequestMapping(_) | Self::ParameterEncoding(_) => {
                None
            }
        }
    }

    pub(crate) fn underlying(source: UnderlyingError, response: Option<Response>) -> Self {
        Self::Underlying {
            source,
            response: response.map(Box::new),
        }
    }

    pub(crate) fn cancelled() -> Self {
        Self::underlying(UnderlyingError::Cancelled, None)
    }

    pub(crate) fn transport(error: reqwest::Error) -> Self {
        Self::underlying(UnderlyingError::Transport(Arc::new(error)), None)
    }

    pub(crate) fn io(error: std::io::Error) -> Self {
        Self::underlying(UnderlyingError::Io(Arc::new(error)), None)
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Underlying {
                source: UnderlyingError::Cancelled,
                ..
            }
        )
    }
}

impl PartialEq for MoyaError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::JsonMapping(lhs), Self::JsonMapping(rhs))
            | (Self::StringMapping(lhs), Self::StringMapping(rhs))
            | (Self::StatusCode(lhs), Self::StatusCode(rhs)) => lhs == rhs,
            (
                Self::ObjectMapping {
                    source: lhs_source,
                    response: lhs_response,
                },
                Self::ObjectMapping {
                    source: rhs_source,
                    response: rhs_response,
                },
            ) => lhs_source.to_string() == rhs_source.to_string() && lhs_response == rhs_response,
            (
                Self::EncodableMapping { source: lhs },
                Self::EncodableMapping { source: rhs },
            ) => lhs.to_string() == rhs.to_string(),
            (
                Self::Underlying {
                    source: lhs_source,
                    response: lhs_response,
                },
                Self::Underlying {
                    source: rhs_source,
                    response: rhs_response,
                },
            ) => lhs_source == rhs_source && lhs_response == rhs_response,
            (Self::RequestMapping(lhs), Self::RequestMapping(rhs)) => lhs == rhs,
            (Self::ParameterEncoding(lhs), Self::ParameterEncoding(rhs)) => {
                lhs.to_string() == rhs.to_string()
            }
            _ => false,
        }
    }
}

impl PartialEq for UnderlyingError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Cancelled, Self::Cancelled) => true,
            (
                Self::StatusCodeValidation { status: lhs },
                Self::StatusCodeValidation { status: rhs },
            ) => lhs == rhs,
            (Self::Stubbed(lhs), Self::Stubbed(rhs)) => lhs == rhs,
            (Self::Transport(lhs), Self::Transport(rhs)) => lhs.to_string() == rhs.to_string(),
            (Self::Io(lhs), Self::Io(rhs)) => {
                lhs.kind() == rhs.kind() && lhs.to_string() == rhs.to_string()
            }
            _ => false,
        }
    }
}

impl From<serde_json::Error> for EncodingError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(Arc::new(value))
    }
}
