use tracing::{debug, warn};

use super::inflight::Joined;
use super::{MoyaProvider, ProgressFn, ProgressResponse};
use crate::cancel::CancellableToken;
use crate::endpoint::Endpoint;
use crate::error::{MoyaError, MoyaResult, UnderlyingError};
use crate::request::{SentRequest, UrlRequest};
use crate::response::Response;
use crate::stub::StubBehavior;
use crate::target::{TargetType, ValidationType};

impl<T: TargetType + 'static> MoyaProvider<T> {
    /// Runs one caller's request, sharing the transport call with identical
    /// in-flight requests when tracking is on.
    pub(super) async fn perform(
        &self,
        target: &T,
        token: &CancellableToken,
        progress: Option<&ProgressFn<'_>>,
    ) -> MoyaResult<Response> {
        let endpoint = self.endpoint(target);
        let stub_behavior = self.stub_behavior(target);

        let result = if self.track_inflights {
            match self.inflight.join(&endpoint) {
                Joined::Leader(leader) => {
                    let result = self
                        .dispatch(target, endpoint, stub_behavior, token, progress)
                        .await;
                    leader.complete(&result);
                    result
                }
                Joined::Waiter(receiver) => {
                    tokio::select! {
                        () = token.cancelled() => Err(MoyaError::cancelled()),
                        shared = receiver => shared.unwrap_or_else(|_closed| Err(MoyaError::cancelled())),
                    }
                }
            }
        } else {
            self.dispatch(target, endpoint, stub_behavior, token, progress)
                .await
        };

        let processed = self.process(result, target);
        if let (Ok(response), Some(progress)) = (&processed, progress) {
            progress(ProgressResponse::finished(response.clone()));
        }
        processed
    }

    async fn dispatch(
        &self,
        target: &T,
        endpoint: Endpoint,
        stub_behavior: StubBehavior,
        token: &CancellableToken,
        progress: Option<&ProgressFn<'_>>,
    ) -> MoyaResult<Response> {
        let request = (self.request_closure)(endpoint.clone()).await?;
        if token.is_cancelled() {
            return self.cancelled(target);
        }
        if stub_behavior.is_stubbed() {
            self.stub(target, &endpoint, request, stub_behavior, token)
                .await
        } else {
            self.send(target, &endpoint, request, token, progress).await
        }
    }

    /// The first plugin with an opinion wins, otherwise the stub closure decides.
    pub(super) fn stub_behavior(&self, target: &T) -> StubBehavior {
        self.plugins
            .iter()
            .find_map(|plugin| plugin.stub_behavior(target))
            .unwrap_or_else(|| (self.stub_closure)(target))
    }

    pub(super) fn prepare(&self, request: UrlRequest, target: &T) -> UrlRequest {
        self.plugins
            .iter()
            .fold(request, |request, plugin| plugin.prepare(request, target))
    }

    pub(super) fn will_send(&self, request: &UrlRequest, target: &T) {
        let sent = SentRequest {
            request,
            session_headers: &self.session_headers,
        };
        for plugin in &self.plugins {
            plugin.will_send(&sent, target);
        }
    }

    pub(super) fn did_receive(&self, result: &MoyaResult<Response>, target: &T) {
        for plugin in &self.plugins {
            plugin.did_receive(result, target);
        }
    }

    fn process(&self, result: MoyaResult<Response>, target: &T) -> MoyaResult<Response> {
        self.plugins
            .iter()
            .fold(result, |result, plugin| plugin.process(result, target))
    }

    pub(super) fn cancelled(&self, target: &T) -> MoyaResult<Response> {
        warn!("Request to {} was cancelled", target.path());
        let result = Err(MoyaError::cancelled());
        self.did_receive(&result, target);
        result
    }
}

/// Applies the target's accepted status codes to a response.
pub(super) fn validate(response: Response, validation: &ValidationType) -> MoyaResult<Response> {
    if validation.accepts(response.status_code) {
        debug!("Response accepted: {}", response);
        return Ok(response);
    }
    warn!("Status code {} rejected by validation", response.status_code);
    let status = response.status_code;
    Err(MoyaError::underlying(
        UnderlyingError::StatusCodeValidation { status },
        Some(response),
    ))
}
