//! Typed descriptions of API calls.
mod auth;
mod method;
mod multi;
mod validation;

use std::collections::BTreeMap;
use std::fmt::Debug;

use bytes::Bytes;

use crate::task::Task;

pub use auth::AuthorizationType;
pub use method::Method;
pub use multi::MultiTarget;
pub use validation::ValidationType;

/// Header fields attached to a target or endpoint.
pub type HeaderFields = BTreeMap<String, String>;

/// Everything a provider needs to know to turn a value into a request.
///
/// Implement this on an enum with one variant per API call. The trait is
/// object safe so plugins can receive any target as `&dyn TargetType`.
pub trait TargetType: Debug + Send + Sync {
    /// The API root, e.g. `https://api.github.com`.
    fn base_url(&self) -> String;

    /// Appended to [`TargetType::base_url`] to form the request URL.
    fn path(&self) -> String;

    fn method(&self) -> Method;

    /// The body and parameters carried by the request.
    fn task(&self) -> Task;

    /// Canned data returned when the request is stubbed.
    fn sample_data(&self) -> Bytes {
        Bytes::new()
    }

    fn headers(&self) -> Option<HeaderFields> {
        None
    }

    fn validation_type(&self) -> ValidationType {
        ValidationType::None
    }

    /// Read by [`crate::plugin::AccessTokenPlugin`]; `None` leaves the request untouched.
    fn authorization_type(&self) -> Option<AuthorizationType> {
        None
    }
}

/// Joins the base URL and path of a target.
///
/// An empty path keeps the base URL as is, so no trailing slash is introduced.
#[must_use]
pub fn target_url(target: &dyn TargetType) -> String {
    join_url(&target.base_url(), &target.path())
}

pub(crate) fn join_url(base_url: &str, path: &str) -> String {
    if path.is_empty() {
        return base_url.to_owned();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_uses_single_separator() -> Result<(), String> {
        let cases = [
            ("https://api.github.com", "/zen", "https://api.github.com/zen"),
            ("https://api.github.com/", "/zen", "https://api.github.com/zen"),
            ("https://api.github.com/v3", "users/ash", "https://api.github.com/v3/users/ash"),
            ("https://api.github.com", "users/", "https://api.github.com/users/"),
        ];
        for (base, path, expected) in cases {
            let joined = join_url(base, path);
            if joined != expected {
                return Err(format!("{} + {} => {}", base, path, joined));
            }
        }
        Ok(())
    }

    #[test]
    fn join_url_keeps_base_for_empty_path() -> Result<(), String> {
        let joined = join_url("https://example.com/api", "");
        if joined != "https://example.com/api" {
            return Err(format!("Unexpected url: {}", joined));
        }
        Ok(())
    }
}
