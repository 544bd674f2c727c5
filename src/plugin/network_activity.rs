use std::sync::Arc;

use super::Plugin;
use crate::error::MoyaResult;
use crate::request::RequestType;
use crate::response::Response;
use crate::target::TargetType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkActivityChange {
    Began,
    Ended,
}

type ActivityFn = dyn Fn(NetworkActivityChange, &dyn TargetType) + Send + Sync;

/// Reports when requests start and finish, e.g. to drive a spinner.
#[derive(Clone)]
pub struct NetworkActivityPlugin {
    on_change: Arc<ActivityFn>,
}

impl NetworkActivityPlugin {
    #[must_use]
    pub fn new<F>(on_change: F) -> Self
    where
        F: Fn(NetworkActivityChange, &dyn TargetType) + Send + Sync + 'static,
    {
        Self {
            on_change: Arc::new(on_change),
        }
    }
}

impl Plugin for NetworkActivityPlugin {
    fn will_send(&self, _request: &dyn RequestType, target: &dyn TargetType) {
        (self.on_change)(NetworkActivityChange::Began, target);
    }

    fn did_receive(&self, _result: &MoyaResult<Response>, target: &dyn TargetType) {
        (self.on_change)(NetworkActivityChange::Ended, target);
    }
}
