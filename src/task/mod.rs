//! What a request carries: body, parameters, uploads and downloads.
mod download;
mod encoding;
mod multipart;


use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use serde::Serialize;

pub use download::DownloadDestination;
pub use encoding::{
    ArrayEncoding, BoolEncoding, Destination, JsonEncoding, ParameterEncoding, UrlEncoding,
};
pub(crate) use encoding::set_json_body;
pub(crate) use multipart::build_form;
pub use multipart::{FormDataProvider, MultipartFormData};

/// Request parameters, keyed by name.
pub type Parameters = serde_json::Map<String, serde_json::Value>;

/// The kind of HTTP task a target performs.
#[derive(Debug, Clone)]
pub enum Task {
    /// A request with no additional data.
    RequestPlain,
    /// A request body set with data.
    RequestData(Bytes),
    /// A request body set with a serializable value, encoded as JSON.
    RequestJsonEncodable(EncodableBody),
    /// A request body or query set with encoded parameters.
    RequestParameters {
        parameters: Parameters,
        encoding: ParameterEncoding,
    },
    /// A request body set with data, combined with url parameters.
    RequestCompositeData {
        body_data: Bytes,
        url_parameters: Parameters,
    },
    /// A request body set with encoded parameters, combined with url parameters.
    RequestCompositeParameters {
        body_parameters: Parameters,
        body_encoding: ParameterEncoding,
        url_parameters: Parameters,
    },
    /// A file upload task.
    UploadFile(PathBuf),
    /// A `multipart/form-data` upload task.
    UploadMultipart(Vec<MultipartFormData>),
    /// A `multipart/form-data` upload task combined with url parameters.
    UploadCompositeMultipart {
        parts: Vec<MultipartFormData>,
        url_parameters: Parameters,
    },
    /// A file download task to a destination.
    DownloadDestination(DownloadDestination),
    /// A file download task to a destination with extra parameters.
    DownloadParameters {
        parameters: Parameters,
        encoding: ParameterEncoding,
        destination: DownloadDestination,
    },
}

impl Task {
    /// Shorthand for [`Task::RequestJsonEncodable`].
    #[must_use]
    pub fn json_encodable<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Task::RequestJsonEncodable(EncodableBody::new(value))
    }

    #[must_use]
    pub const fn parameters(parameters: Parameters, encoding: ParameterEncoding) -> Self {
        Task::RequestParameters {
            parameters,
            encoding,
        }
    }
}

type EncodeFn = dyn Fn() -> Result<Vec<u8>, serde_json::Error> + Send + Sync;

/// A type-erased serializable value, encoded to JSON when the request is built.
#[derive(Clone)]
pub struct EncodableBody(Arc<EncodeFn>);

impl EncodableBody {
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Serialize + Send + Sync + 'static,
    {
        Self(Arc::new(move || serde_json::to_vec(&value)))
    }

    /// # Errors
    ///
    /// Returns the serializer error when the value cannot be encoded.
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        (self.0)()
    }
}

impl fmt::Debug for EncodableBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncodableBody")
    }
}
