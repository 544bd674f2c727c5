use crate::endpoint::{Endpoint, EndpointSampleResponse};
use crate::error::MoyaResult;
use crate::request::UrlRequest;
use crate::target::{TargetType, target_url};

/// Maps a target to an endpoint answering stubs with `200` and the target's sample data.
#[must_use]
pub fn default_endpoint_mapping<T: TargetType>(target: &T) -> Endpoint {
    let sample_data = target.sample_data();
    Endpoint::new(
        target_url(target),
        move || EndpointSampleResponse::NetworkResponse(200, sample_data.clone()),
        target.method(),
        target.task(),
        target.headers(),
    )
}

/// Builds the wire request straight from the endpoint.
///
/// # Errors
///
/// Returns the error produced by [`Endpoint::url_request`].
pub async fn default_request_mapping(endpoint: Endpoint) -> MoyaResult<UrlRequest> {
    endpoint.url_request()
}
