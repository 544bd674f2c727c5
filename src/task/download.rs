use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::response::HttpResponseHead;

type DestinationFn = dyn Fn(&HttpResponseHead) -> PathBuf + Send + Sync;

/// Decides where a downloaded body is written, given the response head.
#[derive(Clone)]
pub struct DownloadDestination(Arc<DestinationFn>);

impl DownloadDestination {
    #[must_use]
    pub fn new<F>(destination: F) -> Self
    where
        F: Fn(&HttpResponseHead) -> PathBuf + Send + Sync + 'static,
    {
        Self(Arc::new(destination))
    }

    /// Always writes to the same path.
    #[must_use]
    pub fn to_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self::new(move |_| path.clone())
    }

    #[must_use]
    pub fn resolve(&self, head: &HttpResponseHead) -> PathBuf {
        (self.0)(head)
    }
}

impl fmt::Debug for DownloadDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DownloadDestination")
    }
}
