use std::collections::BTreeMap;

use bytes::Bytes;

use super::template::{render_template, render_value};
use super::types::{ConfigFile, EncodingConfig, RouteConfig};
use crate::args::parse_header;
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::target::{AuthorizationType, HeaderFields, Method, TargetType, ValidationType};
use crate::task::{Parameters, Task};

/// A route from the config file with its templates rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigTarget {
    pub name: String,
    base_url: String,
    path: String,
    method: Method,
    parameters: Option<Parameters>,
    encoding: EncodingConfig,
    data: Option<Bytes>,
    headers: HeaderFields,
    sample_data: Bytes,
    validation: ValidationType,
    authorization: Option<AuthorizationType>,
}

impl ConfigTarget {
    /// Resolves route `name`, rendering `{{var}}` placeholders and merging
    /// headers: config-wide first, then the route's, then `extra_headers`.
    ///
    /// # Errors
    ///
    /// Returns an error when the route is unknown, no base URL is available,
    /// a header is malformed, or a template variable has no value.
    pub fn from_config(
        config: &ConfigFile,
        name: &str,
        vars: &BTreeMap<String, String>,
        base_url_override: Option<&str>,
        extra_headers: &[(String, String)],
    ) -> AppResult<Self> {
        let route = config.routes.get(name).ok_or_else(|| {
            AppError::validation(ValidationError::UnknownRoute {
                name: name.to_owned(),
                available: route_names(config),
            })
        })?;
        let base_url = base_url_override
            .map(ToOwned::to_owned)
            .or_else(|| config.base_url.clone())
            .ok_or_else(|| AppError::validation(ValidationError::MissingBaseUrl))?;

        let mut headers = parse_headers(&config.headers)?;
        headers.extend(parse_headers(&route.headers)?);
        headers.extend(extra_headers.iter().cloned());

        Ok(Self {
            name: name.to_owned(),
            base_url: render_template(&base_url, vars)?,
            path: render_template(&route.path, vars)?,
            method: route.method,
            parameters: render_parameters(route, vars)?,
            encoding: route.encoding,
            data: route
                .data
                .as_deref()
                .map(|data| render_template(data, vars).map(Bytes::from))
                .transpose()?,
            headers,
            sample_data: route
                .sample_data
                .clone()
                .map(Bytes::from)
                .unwrap_or_default(),
            validation: route
                .validation
                .as_ref()
                .unwrap_or(&config.validation)
                .into(),
            authorization: route.auth.clone().map(|auth| auth.0),
        })
    }
}

/// Comma-separated route names, for error messages and `--list`.
pub(crate) fn route_names(config: &ConfigFile) -> String {
    config.routes.keys().cloned().collect::<Vec<_>>().join(", ")
}

fn parse_headers(raw: &[String]) -> AppResult<HeaderFields> {
    raw.iter()
        .map(|header| {
            parse_header(header)
                .map_err(|source| AppError::config(ConfigError::InvalidHeader { source }))
        })
        .collect()
}

fn render_parameters(
    route: &RouteConfig,
    vars: &BTreeMap<String, String>,
) -> Result<Option<Parameters>, ValidationError> {
    route
        .parameters
        .as_ref()
        .map(|parameters| {
            parameters
                .iter()
                .map(|(key, value)| Ok((key.clone(), render_value(value, vars)?)))
                .collect()
        })
        .transpose()
}

impl TargetType for ConfigTarget {
    fn base_url(&self) -> String {
        self.base_url.clone()
    }

    fn path(&self) -> String {
        self.path.clone()
    }

    fn method(&self) -> Method {
        self.method
    }

    fn task(&self) -> Task {
        match (&self.data, &self.parameters) {
            (Some(data), _) => Task::RequestData(data.clone()),
            (None, Some(parameters)) => Task::parameters(parameters.clone(), self.encoding.into()),
            (None, None) => Task::RequestPlain,
        }
    }

    fn sample_data(&self) -> Bytes {
        self.sample_data.clone()
    }

    fn headers(&self) -> Option<HeaderFields> {
        (!self.headers.is_empty()).then(|| self.headers.clone())
    }

    fn validation_type(&self) -> ValidationType {
        self.validation.clone()
    }

    fn authorization_type(&self) -> Option<AuthorizationType> {
        self.authorization.clone()
    }
}
