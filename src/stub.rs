//! Whether a request goes to the network or answers with sample data.
use std::time::Duration;

/// How a provider answers a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StubBehavior {
    /// Send the request over the network.
    #[default]
    Never,
    /// Answer with the endpoint's sample response right away.
    Immediate,
    /// Answer with the endpoint's sample response after a delay.
    Delayed(Duration),
}

impl StubBehavior {
    #[must_use]
    pub const fn is_stubbed(self) -> bool {
        !matches!(self, StubBehavior::Never)
    }
}

/// Stub closure that always sends requests.
#[must_use]
pub const fn never_stub<T: ?Sized>(_target: &T) -> StubBehavior {
    StubBehavior::Never
}

/// Stub closure that always answers immediately.
#[must_use]
pub const fn immediately_stub<T: ?Sized>(_target: &T) -> StubBehavior {
    StubBehavior::Immediate
}

/// Builds a stub closure that answers after `delay`.
#[must_use]
pub fn delayed_stub<T: ?Sized>(
    delay: Duration,
) -> impl Fn(&T) -> StubBehavior + Send + Sync + 'static {
    move |_target| StubBehavior::Delayed(delay)
}
