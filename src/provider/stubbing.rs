use tracing::debug;

use super::MoyaProvider;
use super::internal::validate;
use crate::cancel::CancellableToken;
use crate::endpoint::{Endpoint, EndpointSampleResponse};
use crate::error::{MoyaError, MoyaResult, UnderlyingError};
use crate::request::UrlRequest;
use crate::response::Response;
use crate::stub::StubBehavior;
use crate::target::TargetType;

impl<T: TargetType + 'static> MoyaProvider<T> {
    /// Answers with the endpoint's sample response instead of touching the network.
    pub(super) async fn stub(
        &self,
        target: &T,
        endpoint: &Endpoint,
        request: UrlRequest,
        behavior: StubBehavior,
        token: &CancellableToken,
    ) -> MoyaResult<Response> {
        let request = self.prepare(request, target);
        self.will_send(&request, target);

        if let StubBehavior::Delayed(delay) = behavior {
            debug!("Delaying stubbed response for {:?}", delay);
            tokio::select! {
                () = token.cancelled() => {}
                () = tokio::time::sleep(delay) => {}
            }
        }
        if token.is_cancelled() {
            return self.cancelled(target);
        }

        let result = match endpoint.sample_response() {
            EndpointSampleResponse::NetworkResponse(status, data) => validate(
                Response::new(status, data).with_request(Some(request)),
                &target.validation_type(),
            ),
            EndpointSampleResponse::Response(head, data) => validate(
                Response::new(head.status, data)
                    .with_request(Some(request))
                    .with_head(Some(head)),
                &target.validation_type(),
            ),
            EndpointSampleResponse::NetworkError(error) => Err(MoyaError::underlying(
                UnderlyingError::Stubbed(error),
                None,
            )),
        };
        self.did_receive(&result, target);
        result
    }
}
