//! The provider: turns targets into requests and runs them through plugins.
mod defaults;
mod inflight;
mod internal;
mod progress;
mod stubbing;
mod transport;


use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt as _, Stream};
use reqwest::Client;
use tokio::sync::mpsc;

use crate::cancel::CancellableToken;
use crate::endpoint::Endpoint;
use crate::error::{MoyaError, MoyaResult};
use crate::plugin::Plugin;
use crate::request::UrlRequest;
use crate::response::Response;
use crate::stub::{StubBehavior, never_stub};
use crate::target::{HeaderFields, TargetType};

pub use defaults::{default_endpoint_mapping, default_request_mapping};
pub use progress::{Progress, ProgressResponse};

use inflight::InflightRequests;

pub(crate) type EndpointClosure<T> = Arc<dyn Fn(&T) -> Endpoint + Send + Sync>;
pub(crate) type RequestClosure =
    Arc<dyn Fn(Endpoint) -> BoxFuture<'static, MoyaResult<UrlRequest>> + Send + Sync>;
pub(crate) type StubClosure<T> = Arc<dyn Fn(&T) -> StubBehavior + Send + Sync>;
pub(crate) type ProgressFn<'progress> = dyn Fn(ProgressResponse) + Send + Sync + 'progress;

/// Default session header carried by every request.
pub const DEFAULT_USER_AGENT: &str = concat!("moya/", env!("CARGO_PKG_VERSION"));

/// Sends requests for targets of type `T`.
pub struct MoyaProvider<T> {
    endpoint_closure: EndpointClosure<T>,
    request_closure: RequestClosure,
    stub_closure: StubClosure<T>,
    client: Client,
    session_headers: HeaderFields,
    plugins: Vec<Arc<dyn Plugin>>,
    track_inflights: bool,
    inflight: InflightRequests,
}

impl<T: TargetType + 'static> MoyaProvider<T> {
    #[must_use]
    pub fn builder() -> MoyaProviderBuilder<T> {
        MoyaProviderBuilder::default()
    }

    /// Resolves the endpoint a target maps to.
    #[must_use]
    pub fn endpoint(&self, target: &T) -> Endpoint {
        (self.endpoint_closure)(target)
    }

    #[must_use]
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    #[must_use]
    pub const fn session_headers(&self) -> &HeaderFields {
        &self.session_headers
    }

    #[must_use]
    pub const fn tracks_inflights(&self) -> bool {
        self.track_inflights
    }

    /// Number of distinct endpoints with a request on the wire.
    #[must_use]
    pub fn inflight_request_count(&self) -> usize {
        self.inflight.len()
    }

    /// Sends the request for `target`.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::MoyaError`] when the request cannot be built, the
    /// transport fails, status validation rejects the response, or a plugin's
    /// `process` turns the result into an error.
    pub async fn request(&self, target: T) -> MoyaResult<Response> {
        self.perform(&target, &CancellableToken::new(), None).await
    }

    /// Sends the request for `target`, reporting download progress as it arrives.
    ///
    /// The callback sees a final [`ProgressResponse`] carrying the response on success.
    ///
    /// # Errors
    ///
    /// Same as [`MoyaProvider::request`].
    pub async fn request_with_progress<F>(&self, target: T, progress: F) -> MoyaResult<Response>
    where
        F: Fn(ProgressResponse) + Send + Sync,
    {
        self.perform(&target, &CancellableToken::new(), Some(&progress))
            .await
    }

    /// Sends the request for `target` until `token` is cancelled.
    ///
    /// # Errors
    ///
    /// Same as [`MoyaProvider::request`], plus a cancelled underlying error
    /// when the token fires first.
    pub async fn request_cancellable(
        &self,
        target: T,
        token: &CancellableToken,
    ) -> MoyaResult<Response> {
        self.perform(&target, token, None).await
    }

    /// Runs the request on the tokio runtime and hands the result to `completion`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn_request<F>(self: &Arc<Self>, target: T, completion: F) -> CancellableToken
    where
        F: FnOnce(MoyaResult<Response>) + Send + 'static,
    {
        let token = CancellableToken::new();
        let provider = Arc::clone(self);
        let request_token = token.clone();
        tokio::spawn(async move {
            let result = provider.perform(&target, &request_token, None).await;
            completion(result);
        });
        token
    }

    /// Streams progress updates followed by the completed response, or an error.
    ///
    /// Dropping the stream cancels the request. Must be called from within a
    /// tokio runtime.
    pub fn request_stream(
        self: &Arc<Self>,
        target: T,
    ) -> impl Stream<Item = MoyaResult<ProgressResponse>> + Send + 'static {
        let (sender, receiver) = mpsc::unbounded_channel();
        let token = CancellableToken::new();
        let cancel_on_drop = token.drop_guard();
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            let progress_sender = sender.clone();
            let forward = move |update: ProgressResponse| {
                if progress_sender.send(Ok(update)).is_err() {
                    tracing::debug!("Progress stream closed");
                }
            };
            if let Err(err) = provider.perform(&target, &token, Some(&forward)).await
                && sender.send(Err(err)).is_err()
            {
                tracing::debug!("Progress stream closed before the error was delivered");
            }
        });
        futures_util::stream::unfold(
            (receiver, cancel_on_drop),
            |(mut receiver, cancel_on_drop)| async move {
                let item = receiver.recv().await?;
                Some((item, (receiver, cancel_on_drop)))
            },
        )
    }
}

/// Configures a [`MoyaProvider`].
pub struct MoyaProviderBuilder<T> {
    endpoint_closure: Option<EndpointClosure<T>>,
    request_closure: Option<RequestClosure>,
    stub_closure: Option<StubClosure<T>>,
    client: Option<Client>,
    session_headers: Option<HeaderFields>,
    plugins: Vec<Arc<dyn Plugin>>,
    track_inflights: bool,
}

impl<T> Default for MoyaProviderBuilder<T> {
    fn default() -> Self {
        Self {
            endpoint_closure: None,
            request_closure: None,
            stub_closure: None,
            client: None,
            session_headers: None,
            plugins: Vec::new(),
            track_inflights: false,
        }
    }
}

impl<T: TargetType + 'static> MoyaProviderBuilder<T> {
    #[must_use]
    pub fn endpoint_closure<F>(mut self, closure: F) -> Self
    where
        F: Fn(&T) -> Endpoint + Send + Sync + 'static,
    {
        self.endpoint_closure = Some(Arc::new(closure));
        self
    }

    /// Replaces the async step that turns an endpoint into a wire request.
    #[must_use]
    pub fn request_closure<F, Fut>(mut self, closure: F) -> Self
    where
        F: Fn(Endpoint) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MoyaResult<UrlRequest>> + Send + 'static,
    {
        self.request_closure = Some(boxed_request_closure(closure));
        self
    }

    #[must_use]
    pub fn stub_closure<F>(mut self, closure: F) -> Self
    where
        F: Fn(&T) -> StubBehavior + Send + Sync + 'static,
    {
        self.stub_closure = Some(Arc::new(closure));
        self
    }

    #[must_use]
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Headers added to every request that does not set them itself.
    ///
    /// Defaults to a `User-Agent` of [`DEFAULT_USER_AGENT`].
    #[must_use]
    pub fn session_headers(mut self, headers: HeaderFields) -> Self {
        self.session_headers = Some(headers);
        self
    }

    #[must_use]
    pub fn plugin<P: Plugin + 'static>(mut self, plugin: P) -> Self {
        self.plugins.push(Arc::new(plugin));
        self
    }

    #[must_use]
    pub fn plugins(mut self, plugins: Vec<Arc<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    #[must_use]
    pub const fn track_inflights(mut self, track_inflights: bool) -> Self {
        self.track_inflights = track_inflights;
        self
    }

    /// # Errors
    ///
    /// Returns [`crate::MoyaError::Underlying`] when no client was supplied and
    /// the default one cannot be built.
    pub fn build(self) -> MoyaResult<MoyaProvider<T>> {
        let client = self.client.map_or_else(default_client, Ok)?;
        let session_headers = self.session_headers.unwrap_or_else(|| {
            HeaderFields::from([("User-Agent".to_owned(), DEFAULT_USER_AGENT.to_owned())])
        });
        Ok(MoyaProvider {
            endpoint_closure: self
                .endpoint_closure
                .unwrap_or_else(|| Arc::new(default_endpoint_mapping::<T>)),
            request_closure: self
                .request_closure
                .unwrap_or_else(|| boxed_request_closure(default_request_mapping)),
            stub_closure: self
                .stub_closure
                .unwrap_or_else(|| Arc::new(never_stub::<T>)),
            client,
            session_headers,
            plugins: self.plugins,
            track_inflights: self.track_inflights,
            inflight: InflightRequests::default(),
        })
    }
}

fn default_client() -> MoyaResult<Client> {
    Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(MoyaError::transport)
}

fn boxed_request_closure<F, Fut>(closure: F) -> RequestClosure
where
    F: Fn(Endpoint) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = MoyaResult<UrlRequest>> + Send + 'static,
{
    Arc::new(move |endpoint: Endpoint| closure(endpoint).boxed())
}
