use std::sync::Arc;

use base64::Engine as _;

use super::Plugin;
use crate::request::UrlRequest;
use crate::target::TargetType;

/// A username and password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub user: String,
    pub password: String,
}

impl Credential {
    #[must_use]
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    fn basic_header(&self) -> String {
        let token = format!("{}:{}", self.user, self.password);
        let encoded = base64::engine::general_purpose::STANDARD.encode(token.as_bytes());
        format!("Basic {}", encoded)
    }
}

type CredentialFn = dyn Fn(&dyn TargetType) -> Option<Credential> + Send + Sync;

/// Sends HTTP Basic credentials with every request the closure returns one for.
#[derive(Clone)]
pub struct CredentialsPlugin {
    credentials: Arc<CredentialFn>,
}

impl CredentialsPlugin {
    #[must_use]
    pub fn new<F>(credentials: F) -> Self
    where
        F: Fn(&dyn TargetType) -> Option<Credential> + Send + Sync + 'static,
    {
        Self {
            credentials: Arc::new(credentials),
        }
    }
}

impl Plugin for CredentialsPlugin {
    fn prepare(&self, mut request: UrlRequest, target: &dyn TargetType) -> UrlRequest {
        if let Some(credential) = (self.credentials)(target) {
            request.set_header("Authorization", credential.basic_header());
        }
        request
    }
}
