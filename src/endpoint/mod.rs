//! Targets resolved into endpoints, and endpoints into wire requests.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use url::Url;

use crate::error::{EncodingError, MoyaError, MoyaResult};
use crate::request::UrlRequest;
use crate::response::HttpResponseHead;
use crate::target::{HeaderFields, Method};
use crate::task::{Destination, ParameterEncoding, Task, UrlEncoding, set_json_body};

/// A canned failure returned by a stubbed endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct StubError {
    pub code: i64,
    pub message: String,
}

impl StubError {
    #[must_use]
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// What a stubbed request answers with.
#[derive(Debug, Clone, PartialEq)]
pub enum EndpointSampleResponse {
    /// A status code and body.
    NetworkResponse(u16, Bytes),
    /// A fully customized response head and body.
    Response(HttpResponseHead, Bytes),
    /// The request failed before a response arrived.
    NetworkError(StubError),
}

type SampleResponseFn = dyn Fn() -> EndpointSampleResponse + Send + Sync;

/// A target enriched with headers and parameters, not yet a wire request.
///
/// Endpoints are changed by copy: [`Endpoint::adding_headers`] and
/// [`Endpoint::replacing_task`] return new values.
#[derive(Clone)]
pub struct Endpoint {
    pub url: String,
    sample_response: Arc<SampleResponseFn>,
    pub method: Method,
    pub task: Task,
    pub http_header_fields: Option<HeaderFields>,
}

impl Endpoint {
    #[must_use]
    pub fn new<F>(
        url: impl Into<String>,
        sample_response: F,
        method: Method,
        task: Task,
        http_header_fields: Option<HeaderFields>,
    ) -> Self
    where
        F: Fn() -> EndpointSampleResponse + Send + Sync + 'static,
    {
        Self {
            url: url.into(),
            sample_response: Arc::new(sample_response),
            method,
            task,
            http_header_fields,
        }
    }

    #[must_use]
    pub fn sample_response(&self) -> EndpointSampleResponse {
        (self.sample_response)()
    }

    /// A copy with the given headers merged in; new values win.
    #[must_use]
    pub fn adding_headers(&self, new_fields: HeaderFields) -> Self {
        let mut endpoint = self.clone();
        if new_fields.is_empty() {
            return endpoint;
        }
        let mut merged = endpoint.http_header_fields.take().unwrap_or_default();
        merged.extend(new_fields);
        endpoint.http_header_fields = Some(merged);
        endpoint
    }

    /// A copy carrying a different task.
    #[must_use]
    pub fn replacing_task(&self, task: Task) -> Self {
        let mut endpoint = self.clone();
        endpoint.task = task;
        endpoint
    }

    /// A copy answering stubs with a different sample response.
    #[must_use]
    pub fn replacing_sample_response<F>(&self, sample_response: F) -> Self
    where
        F: Fn() -> EndpointSampleResponse + Send + Sync + 'static,
    {
        let mut endpoint = self.clone();
        endpoint.sample_response = Arc::new(sample_response);
        endpoint
    }

    /// Converts the endpoint into a wire request.
    ///
    /// # Errors
    ///
    /// Returns [`MoyaError::RequestMapping`] when the URL cannot be parsed,
    /// [`MoyaError::EncodableMapping`] when a JSON-encodable body fails to
    /// serialize, and [`MoyaError::ParameterEncoding`] when parameters cannot
    /// be encoded.
    pub fn url_request(&self) -> MoyaResult<UrlRequest> {
        let url = Url::parse(&self.url).map_err(|_err| MoyaError::RequestMapping(self.url.clone()))?;
        let mut request = UrlRequest::new(self.method, url);
        request.set_headers(self.http_header_fields.clone());

        let query_encoding = UrlEncoding::query_string();
        match &self.task {
            Task::RequestPlain
            | Task::UploadFile(_)
            | Task::UploadMultipart(_)
            | Task::DownloadDestination(_) => Ok(request),
            Task::RequestData(data) => {
                request.body = Some(data.clone());
                Ok(request)
            }
            Task::RequestJsonEncodable(encodable) => {
                let body = encodable.encode().map_err(|err| MoyaError::EncodableMapping {
                    source: Arc::new(err),
                })?;
                Ok(set_json_body(request, body))
            }
            Task::RequestParameters {
                parameters,
                encoding,
            }
            | Task::DownloadParameters {
                parameters,
                encoding,
                ..
            } => Ok(encoding.encode(request, parameters)?),
            Task::RequestCompositeData {
                body_data,
                url_parameters,
            } => {
                request.body = Some(body_data.clone());
                Ok(query_encoding.encode(request, url_parameters))
            }
            Task::RequestCompositeParameters {
                body_parameters,
                body_encoding,
                url_parameters,
            } => {
                if let ParameterEncoding::Url(encoding) = body_encoding
                    && encoding.destination != Destination::HttpBody
                {
                    return Err(EncodingError::UrlEncodingNotHttpBody.into());
                }
                let request = body_encoding.encode(request, body_parameters)?;
                Ok(query_encoding.encode(request, url_parameters))
            }
            Task::UploadCompositeMultipart { url_parameters, .. } => {
                Ok(query_encoding.encode(request, url_parameters))
            }
        }
    }
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("url", &self.url)
            .field("method", &self.method)
            .field("task", &self.task)
            .field("http_header_fields", &self.http_header_fields)
            .finish_non_exhaustive()
    }
}

/// Endpoints are keyed by the request they produce, or by URL when none can be produced.
impl Hash for Endpoint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.url_request() {
            Ok(request) => request.hash(state),
            Err(_) => self.url.hash(state),
        }
    }
}

impl PartialEq for Endpoint {
    fn eq(&self, other: &Self) -> bool {
        let same_request = match (self.url_request(), other.url_request()) {
            (Ok(lhs), Ok(rhs)) => lhs == rhs,
            (Err(_), Err(_)) => self.url == other.url,
            (Ok(_), Err(_)) | (Err(_), Ok(_)) => false,
        };
        same_request && self.same_upload(other)
    }
}

impl Endpoint {
    /// Upload payloads never reach the encoded request, so they are compared separately.
    fn same_upload(&self, other: &Self) -> bool {
        match (&self.task, &other.task) {
            (Task::UploadFile(lhs), Task::UploadFile(rhs)) => lhs == rhs,
            (Task::UploadMultipart(lhs), Task::UploadMultipart(rhs))
            | (
                Task::UploadCompositeMultipart { parts: lhs, .. },
                Task::UploadCompositeMultipart { parts: rhs, .. },
            ) => lhs == rhs,
            (Task::UploadFile(_) | Task::UploadMultipart(_) | Task::UploadCompositeMultipart { .. }, _)
            | (_, Task::UploadFile(_) | Task::UploadMultipart(_) | Task::UploadCompositeMultipart { .. }) => false,
            _ => true,
        }
    }
}

impl Eq for Endpoint {}
