/// Which status codes a target accepts before its response counts as a failure.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ValidationType {
    /// No validation.
    #[default]
    None,
    /// 2xx only.
    SuccessCodes,
    /// 2xx and 3xx.
    SuccessAndRedirectCodes,
    /// Only the given codes.
    CustomCodes(Vec<u16>),
}

impl ValidationType {
    /// The accepted status codes. Empty means every status is accepted.
    #[must_use]
    pub fn status_codes(&self) -> Vec<u16> {
        match self {
            ValidationType::None => Vec::new(),
            ValidationType::SuccessCodes => (200..300).collect(),
            ValidationType::SuccessAndRedirectCodes => (200..400).collect(),
            ValidationType::CustomCodes(codes) => codes.clone(),
        }
    }

    #[must_use]
    pub fn accepts(&self, status: u16) -> bool {
        match self {
            ValidationType::None => true,
            ValidationType::SuccessCodes => (200..300).contains(&status),
            ValidationType::SuccessAndRedirectCodes => (200..400).contains(&status),
            ValidationType::CustomCodes(codes) => codes.is_empty() || codes.contains(&status),
        }
    }
}
