use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// HTTP method used by a target.
#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Trace,
    Connect,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
            Method::Head => "HEAD",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Connect => "CONNECT",
        }
    }

    /// Whether a request with this method can carry a multipart body.
    #[must_use]
    pub const fn supports_multipart(self) -> bool {
        matches!(
            self,
            Method::Post | Method::Put | Method::Patch | Method::Connect
        )
    }

    /// Methods whose parameters go into the query string under method-dependent encoding.
    #[must_use]
    pub const fn encodes_parameters_in_url(self) -> bool {
        matches!(self, Method::Get | Method::Head | Method::Delete)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(value: Method) -> Self {
        match value {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
            Method::Head => reqwest::Method::HEAD,
            Method::Options => reqwest::Method::OPTIONS,
            Method::Trace => reqwest::Method::TRACE,
            Method::Connect => reqwest::Method::CONNECT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipart_support_follows_body_methods() -> Result<(), String> {
        for method in [Method::Post, Method::Put, Method::Patch, Method::Connect] {
            if !method.supports_multipart() {
                return Err(format!("{} should support multipart", method));
            }
        }
        for method in [Method::Get, Method::Delete, Method::Head, Method::Options] {
            if method.supports_multipart() {
                return Err(format!("{} should not support multipart", method));
            }
        }
        Ok(())
    }

    #[test]
    fn converts_to_reqwest_method() -> Result<(), String> {
        let converted: reqwest::Method = Method::Patch.into();
        if converted != reqwest::Method::PATCH {
            return Err(format!("Unexpected method: {}", converted));
        }
        Ok(())
    }
}
