use std::sync::Arc;

use bytes::Bytes;

use super::{AuthorizationType, HeaderFields, Method, TargetType, ValidationType};
use crate::task::Task;

/// Lets a single provider serve several target types.
#[derive(Debug, Clone)]
pub struct MultiTarget(Arc<dyn TargetType>);

impl MultiTarget {
    #[must_use]
    pub fn new<T>(target: T) -> Self
    where
        T: TargetType + 'static,
    {
        Self(Arc::new(target))
    }

    /// The embedded target.
    #[must_use]
    pub fn target(&self) -> &dyn TargetType {
        self.0.as_ref()
    }
}

impl TargetType for MultiTarget {
    fn base_url(&self) -> String {
        self.0.base_url()
    }

    fn path(&self) -> String {
        self.0.path()
    }

    fn method(&self) -> Method {
        self.0.method()
    }

    fn task(&self) -> Task {
        self.0.task()
    }

    fn sample_data(&self) -> Bytes {
        self.0.sample_data()
    }

    fn headers(&self) -> Option<HeaderFields> {
        self.0.headers()
    }

    fn validation_type(&self) -> ValidationType {
        self.0.validation_type()
    }

    fn authorization_type(&self) -> Option<AuthorizationType> {
        self.0.authorization_type()
    }
}
