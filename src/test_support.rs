//! Targets shared by unit tests.
use bytes::Bytes;
use serde_json::json;

use crate::target::{AuthorizationType, HeaderFields, Method, TargetType, ValidationType};
use crate::task::{ParameterEncoding, Parameters, Task};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GitHub {
    Zen,
    UserProfile(String),
    Search(String),
    Private,
    Validated(Vec<u16>),
}

impl TargetType for GitHub {
    fn base_url(&self) -> String {
        "https://api.github.com".to_owned()
    }

    fn path(&self) -> String {
        match self {
            GitHub::Zen => "/zen".to_owned(),
            GitHub::UserProfile(name) => format!("/users/{}", name),
            GitHub::Search(_) => "/search".to_owned(),
            GitHub::Private => "/user".to_owned(),
            GitHub::Validated(_) => "/validated".to_owned(),
        }
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn task(&self) -> Task {
        match self {
            GitHub::Search(query) => {
                let mut parameters = Parameters::new();
                parameters.insert("q".to_owned(), json!(query));
                Task::parameters(parameters, ParameterEncoding::default())
            }
            GitHub::Zen | GitHub::UserProfile(_) | GitHub::Private | GitHub::Validated(_) => {
                Task::RequestPlain
            }
        }
    }

    fn sample_data(&self) -> Bytes {
        match self {
            GitHub::Zen => Bytes::from_static(b"Half measures are as bad as nothing at all."),
            GitHub::UserProfile(name) => {
                Bytes::from(format!("{{\"login\": \"{}\", \"id\": 100}}", name))
            }
            GitHub::Search(_) | GitHub::Private | GitHub::Validated(_) => {
                Bytes::from_static(b"{}")
            }
        }
    }

    fn headers(&self) -> Option<HeaderFields> {
        Some(HeaderFields::from([(
            "Accept".to_owned(),
            "application/json".to_owned(),
        )]))
    }

    fn validation_type(&self) -> ValidationType {
        match self {
            GitHub::Validated(codes) => ValidationType::CustomCodes(codes.clone()),
            GitHub::Zen | GitHub::UserProfile(_) | GitHub::Search(_) | GitHub::Private => {
                ValidationType::None
            }
        }
    }

    fn authorization_type(&self) -> Option<AuthorizationType> {
        match self {
            GitHub::Private => Some(AuthorizationType::Bearer),
            GitHub::Zen | GitHub::UserProfile(_) | GitHub::Search(_) | GitHub::Validated(_) => {
                None
            }
        }
    }
}
