use std::path::Path;

use bytes::{Bytes, BytesMut};
use futures_util::StreamExt as _;
use reqwest::header::HeaderMap;
use tokio::io::AsyncWriteExt as _;
use tracing::debug;

use super::internal::validate;
use super::{MoyaProvider, Progress, ProgressFn, ProgressResponse};
use crate::cancel::CancellableToken;
use crate::endpoint::Endpoint;
use crate::error::{EncodingError, MoyaError, MoyaResult};
use crate::request::UrlRequest;
use crate::response::{HttpResponseHead, Response};
use crate::target::TargetType;
use crate::task::{DownloadDestination, MultipartFormData, Task, build_form};

/// What goes into the reqwest body besides the encoded request body.
#[derive(Clone, Copy)]
enum Payload<'task> {
    Encoded,
    File(&'task Path),
    Multipart(&'task [MultipartFormData]),
    Download(&'task DownloadDestination),
}

impl<'task> Payload<'task> {
    fn for_task(task: &'task Task) -> Self {
        match task {
            Task::RequestPlain
            | Task::RequestData(_)
            | Task::RequestJsonEncodable(_)
            | Task::RequestParameters { .. }
            | Task::RequestCompositeData { .. }
            | Task::RequestCompositeParameters { .. } => Payload::Encoded,
            Task::UploadFile(path) => Payload::File(path.as_path()),
            Task::UploadMultipart(parts) | Task::UploadCompositeMultipart { parts, .. } => {
                Payload::Multipart(parts.as_slice())
            }
            Task::DownloadDestination(destination)
            | Task::DownloadParameters { destination, .. } => Payload::Download(destination),
        }
    }
}

impl<T: TargetType + 'static> MoyaProvider<T> {
    /// Sends the request over the network, honouring cancellation.
    pub(super) async fn send(
        &self,
        target: &T,
        endpoint: &Endpoint,
        request: UrlRequest,
        token: &CancellableToken,
        progress: Option<&ProgressFn<'_>>,
    ) -> MoyaResult<Response> {
        let request = self.prepare(request, target);
        self.will_send(&request, target);
        debug!("Sending {} {}", request.method, request.url);

        let payload = Payload::for_task(&endpoint.task);
        let outcome = tokio::select! {
            biased;
            () = token.cancelled() => None,
            result = self.execute(&request, payload, progress) => Some(result),
        };
        let Some(result) = outcome else {
            return self.cancelled(target);
        };
        let result = result.and_then(|response| validate(response, &target.validation_type()));
        self.did_receive(&result, target);
        result
    }

    async fn execute(
        &self,
        request: &UrlRequest,
        payload: Payload<'_>,
        progress: Option<&ProgressFn<'_>>,
    ) -> MoyaResult<Response> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url.clone())
            .headers(self.wire_headers(request)?);

        match payload {
            Payload::Encoded | Payload::Download(_) => {
                if let Some(body) = &request.body {
                    builder = builder.body(body.clone());
                }
            }
            Payload::File(path) => {
                let contents = tokio::fs::read(path).await.map_err(MoyaError::io)?;
                builder = builder.body(contents);
            }
            Payload::Multipart(parts) => {
                if !request.method.supports_multipart() {
                    return Err(EncodingError::MultipartUnsupportedMethod {
                        method: request.method.as_str(),
                    }
                    .into());
                }
                if parts.is_empty() {
                    return Err(EncodingError::EmptyMultipart.into());
                }
                builder = builder.multipart(build_form(parts.to_vec()).await?);
            }
        }

        let response = builder.send().await.map_err(MoyaError::transport)?;
        let head = HttpResponseHead::from_reqwest(&response);
        let data = match payload {
            Payload::Download(destination) => {
                let path = destination.resolve(&head);
                download(response, &path, head.content_length(), progress).await?;
                Bytes::new()
            }
            Payload::Encoded | Payload::File(_) | Payload::Multipart(_) => {
                read_body(response, head.content_length(), progress).await?
            }
        };
        Ok(Response::new(head.status, data)
            .with_request(Some(request.clone()))
            .with_head(Some(head)))
    }

    /// Request headers, plus session headers the request does not set itself.
    fn wire_headers(&self, request: &UrlRequest) -> MoyaResult<HeaderMap> {
        let mut merged = request.clone();
        for (name, value) in &self.session_headers {
            if request.header(name).is_none() {
                merged.set_header(name, value.clone());
            }
        }
        Ok(merged.header_map()?)
    }
}

async fn read_body(
    response: reqwest::Response,
    total: Option<u64>,
    progress: Option<&ProgressFn<'_>>,
) -> MoyaResult<Bytes> {
    let Some(progress) = progress else {
        return response.bytes().await.map_err(MoyaError::transport);
    };
    let mut body = BytesMut::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(MoyaError::transport)?;
        body.extend_from_slice(&chunk);
        report(progress, byte_count(body.len()), total);
    }
    Ok(body.freeze())
}

async fn download(
    response: reqwest::Response,
    path: &Path,
    total: Option<u64>,
    progress: Option<&ProgressFn<'_>>,
) -> MoyaResult<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(MoyaError::io)?;
    }
    let mut file = tokio::fs::File::create(path)
        .await
        .map_err(MoyaError::io)?;
    let mut completed = 0_u64;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(MoyaError::transport)?;
        file.write_all(&chunk).await.map_err(MoyaError::io)?;
        completed = completed.saturating_add(byte_count(chunk.len()));
        if let Some(progress) = progress {
            report(progress, completed, total);
        }
    }
    file.flush().await.map_err(MoyaError::io)?;
    debug!("Downloaded {} bytes to {}", completed, path.display());
    Ok(())
}

fn report(progress: &ProgressFn<'_>, completed: u64, total: Option<u64>) {
    progress(ProgressResponse::in_progress(Progress { completed, total }));
}

fn byte_count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
