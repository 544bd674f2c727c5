/// The scheme placed before the token in an `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationType {
    Basic,
    Bearer,
    Custom(String),
}

impl AuthorizationType {
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            AuthorizationType::Basic => "Basic",
            AuthorizationType::Bearer => "Bearer",
            AuthorizationType::Custom(value) => value,
        }
    }
}
