//! Typed, target-driven HTTP requests over `reqwest`.
//!
//! Describe each API call as a value implementing [`TargetType`], then send it
//! through a [`MoyaProvider`]. The provider maps the target to an
//! [`Endpoint`], the endpoint to a [`UrlRequest`], and runs the request
//! through every registered [`Plugin`]. Requests can be stubbed with sample
//! data for tests, cancelled with a [`CancellableToken`], and de-duplicated
//! while identical requests are in flight.
//!
//! ```no_run
//! use moya::{Method, MoyaProvider, Task, TargetType};
//!
//! #[derive(Debug)]
//! enum GitHub {
//!     Zen,
//! }
//!
//! impl TargetType for GitHub {
//!     fn base_url(&self) -> String {
//!         "https://api.github.com".to_owned()
//!     }
//!     fn path(&self) -> String {
//!         "/zen".to_owned()
//!     }
//!     fn method(&self) -> Method {
//!         Method::Get
//!     }
//!     fn task(&self) -> Task {
//!         Task::RequestPlain
//!     }
//! }
//!
//! # async fn run() -> Result<(), moya::MoyaError> {
//! let provider = MoyaProvider::<GitHub>::builder().build()?;
//! let zen = provider.request(GitHub::Zen).await?.map_string(None)?;
//! println!("{}", zen);
//! # Ok(())
//! # }
//! ```
//!
//! The crate also ships the `moya` binary, which reads routes from a TOML or
//! JSON file; [`args`] and [`config`] hold its building blocks.
pub mod args;
pub mod cancel;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod plugin;
pub mod provider;
pub mod request;
pub mod response;
pub mod stub;
pub mod target;
pub mod task;

#[cfg(test)]
mod test_support;

pub use cancel::CancellableToken;
pub use endpoint::{Endpoint, EndpointSampleResponse, StubError};
pub use error::{EncodingError, MoyaError, MoyaResult, UnderlyingError};
pub use plugin::Plugin;
pub use provider::{MoyaProvider, MoyaProviderBuilder, Progress, ProgressResponse};
pub use request::{RequestType, UrlRequest};
pub use response::{HttpResponseHead, Response};
pub use stub::{StubBehavior, delayed_stub, immediately_stub, never_stub};
pub use target::{
    AuthorizationType, HeaderFields, Method, MultiTarget, TargetType, ValidationType, target_url,
};
pub use task::{Parameters, Task};
