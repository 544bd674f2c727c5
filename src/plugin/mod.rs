//! Hooks invoked around every request a provider sends.
mod access_token;
mod credentials;
mod network_activity;
mod network_logger;


use crate::error::MoyaResult;
use crate::request::{RequestType, UrlRequest};
use crate::response::Response;
use crate::stub::StubBehavior;
use crate::target::TargetType;

pub use access_token::AccessTokenPlugin;
pub use credentials::{Credential, CredentialsPlugin};
pub use network_activity::{NetworkActivityChange, NetworkActivityPlugin};
pub use network_logger::{
    LoggerConfiguration, NetworkLoggerPlugin, RequestLogOptions, ResponseLogOptions,
};

/// Observes and adjusts requests without changing how the provider dispatches them.
///
/// Every method has a no-op default. Plugins run in registration order.
pub trait Plugin: Send + Sync {
    /// Called to modify a request before it is sent.
    fn prepare(&self, request: UrlRequest, _target: &dyn TargetType) -> UrlRequest {
        request
    }

    /// Called immediately before a request is sent or stubbed.
    fn will_send(&self, _request: &dyn RequestType, _target: &dyn TargetType) {}

    /// Overrides the provider's stub decision; the first plugin returning `Some` wins.
    fn stub_behavior(&self, _target: &dyn TargetType) -> Option<StubBehavior> {
        None
    }

    /// Called after a response or failure arrives, before it is processed.
    fn did_receive(&self, _result: &MoyaResult<Response>, _target: &dyn TargetType) {}

    /// Called to modify a result before the caller sees it.
    ///
    /// # Errors
    ///
    /// Returns the error the plugin maps the result to. The default passes
    /// the result through unchanged.
    fn process(&self, result: MoyaResult<Response>, _target: &dyn TargetType) -> MoyaResult<Response> {
        result
    }
}
