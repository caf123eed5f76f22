/// Outcome of structural validation for a single address.
///
/// `domain` is populated only when `valid` is true.
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxResult {
    pub valid: bool,
    pub message: String,
    pub domain: Option<String>,
}

impl SyntaxResult {
    pub fn success(domain: impl Into<String>) -> Self {
        Self {
            valid: true,
            message: "Syntax is valid".to_string(),
            domain: Some(domain.into()),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            domain: None,
        }
    }
}
