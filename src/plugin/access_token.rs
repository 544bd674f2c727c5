use std::sync::Arc;

use super::Plugin;
use crate::request::UrlRequest;
use crate::target::{AuthorizationType, TargetType};

type TokenFn = dyn Fn(&AuthorizationType) -> String + Send + Sync;

/// Adds `Authorization: <type> <token>` to targets that declare an authorization type.
#[derive(Clone)]
pub struct AccessTokenPlugin {
    token: Arc<TokenFn>,
}

impl AccessTokenPlugin {
    #[must_use]
    pub fn new<F>(token: F) -> Self
    where
        F: Fn(&AuthorizationType) -> String + Send + Sync + 'static,
    {
        Self {
            token: Arc::new(token),
        }
    }
}

impl Plugin for AccessTokenPlugin {
    fn prepare(&self, mut request: UrlRequest, target: &dyn TargetType) -> UrlRequest {
        let Some(authorization) = target.authorization_type() else {
            return request;
        };
        let value = format!("{} {}", authorization.value(), (self.token)(&authorization));
        request.add_header("Authorization", &value);
        request
    }
}
