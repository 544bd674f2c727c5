use crate::response::Response;

/// Bytes received so far, and the expected total when the server announced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub completed: u64,
    pub total: Option<u64>,
}

impl Progress {
    /// `completed / total`, or `0.0` when the total is unknown.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "Fractions are reported as floating point values"
    )]
    pub fn fraction_completed(&self) -> f64 {
        match self.total {
            Some(total) if total > 0 => {
                let completed = self.completed.min(total);
                completed as f64 / total as f64
            }
            Some(_) | None => 0.0,
        }
    }
}

/// A progress update, or the final response once the request completed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProgressResponse {
    pub progress_object: Option<Progress>,
    pub response: Option<Response>,
}

impl ProgressResponse {
    pub(crate) const fn in_progress(progress: Progress) -> Self {
        Self {
            progress_object: Some(progress),
            response: None,
        }
    }

    pub(crate) const fn finished(response: Response) -> Self {
        Self {
            progress_object: None,
            response: Some(response),
        }
    }

    #[must_use]
    pub const fn completed(&self) -> bool {
        self.response.is_some()
    }

    /// `1.0` once completed, otherwise the fraction of bytes received.
    #[must_use]
    pub fn progress(&self) -> f64 {
        if self.completed() {
            return 1.0;
        }
        self.progress_object
            .map_or(0.0, |progress| progress.fraction_completed())
    }
}
