use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{AppError, AppResult, ConfigError};
use crate::target::{AuthorizationType, Method, ValidationType};
use crate::task::{ParameterEncoding, Parameters};

/// The API description file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    /// Headers sent with every route, as `Key: Value`.
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub routes: BTreeMap<String, RouteConfig>,
}

impl ConfigFile {
    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.routes.is_empty() {
            return Err(AppError::config(ConfigError::NoRoutes));
        }
        for (name, route) in &self.routes {
            if route.data.is_some() && route.parameters.is_some() {
                return Err(AppError::config(ConfigError::RouteBodyConflict {
                    route: name.clone(),
                }));
            }
        }
        Ok(())
    }
}

/// One named API call.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub path: String,
    pub description: Option<String>,
    #[serde(default)]
    pub headers: Vec<String>,
    pub parameters: Option<Parameters>,
    #[serde(default)]
    pub encoding: EncodingConfig,
    /// Raw request body.
    pub data: Option<String>,
    /// Returned when the route is stubbed.
    pub sample_data: Option<String>,
    pub auth: Option<AuthConfig>,
    pub validation: Option<ValidationConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingConfig {
    /// Query string for GET, HEAD and DELETE; form body otherwise.
    #[default]
    Url,
    Query,
    Form,
    Json,
}

impl From<EncodingConfig> for ParameterEncoding {
    fn from(value: EncodingConfig) -> Self {
        match value {
            EncodingConfig::Url => ParameterEncoding::default(),
            EncodingConfig::Query => ParameterEncoding::query_string(),
            EncodingConfig::Form => ParameterEncoding::http_body(),
            EncodingConfig::Json => ParameterEncoding::json(),
        }
    }
}

/// `"basic"`, `"bearer"`, or any other scheme name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub struct AuthConfig(pub AuthorizationType);

impl From<String> for AuthConfig {
    fn from(value: String) -> Self {
        Self(match value.to_ascii_lowercase().as_str() {
            "basic" => AuthorizationType::Basic,
            "bearer" => AuthorizationType::Bearer,
            _ => AuthorizationType::Custom(value),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPreset {
    #[default]
    None,
    Success,
    SuccessAndRedirect,
}

/// A preset name or an explicit list of accepted status codes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ValidationConfig {
    Preset(ValidationPreset),
    Codes(Vec<u16>),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        ValidationConfig::Preset(ValidationPreset::None)
    }
}

impl From<&ValidationConfig> for ValidationType {
    fn from(value: &ValidationConfig) -> Self {
        match value {
            ValidationConfig::Preset(ValidationPreset::None) => ValidationType::None,
            ValidationConfig::Preset(ValidationPreset::Success) => ValidationType::SuccessCodes,
            ValidationConfig::Preset(ValidationPreset::SuccessAndRedirect) => {
                ValidationType::SuccessAndRedirectCodes
            }
            ValidationConfig::Codes(codes) => ValidationType::CustomCodes(codes.clone()),
        }
    }
}
