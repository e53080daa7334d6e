//! src/domain/required_field.rs

/// Free text that must contain something other than whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredField(String);

impl RequiredField {
    /// Trims the input and rejects it if nothing is left.
    pub fn parse(s: String) -> Result<RequiredField, String> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Err("The value is empty.".to_string())
        } else if trimmed.len() == s.len() {
            Ok(Self(s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for RequiredField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RequiredField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
