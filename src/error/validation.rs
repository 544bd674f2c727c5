use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid header format: '{value}'. Expected 'Key: Value'")]
    InvalidHeaderFormat { value: String },
    #[error("Invalid variable format: '{value}'. Expected 'name=value'")]
    InvalidVariableFormat { value: String },
    #[error("Missing route (pass a route name or use --list).")]
    MissingRoute,
    #[error("Unknown route '{name}'. Available routes: {available}")]
    UnknownRoute { name: String, available: String },
    #[error("Missing base_url (set it in the config file or pass --base-url).")]
    MissingBaseUrl,
    #[error("Template variable '{name}' has no value.")]
    MissingTemplateVariable { name: String },
}
