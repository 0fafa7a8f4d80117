use super::types::{Category, FileType};
use crate::error::ConfigError;

/// A user-defined format recognised by a fixed byte signature.
///
/// Custom types are checked before the built-in matchers, so they can also
/// be used to override how a known format is reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomType {
    pub file_type: FileType,
    pub description: Option<String>,
    pub signature: Vec<u8>,
    pub offset: usize,
    pub categories: Vec<Category>,
}

impl CustomType {
    pub fn new(file_type: impl Into<FileType>, signature: impl Into<Vec<u8>>) -> Self {
        Self {
            file_type: file_type.into(),
            description: None,
            signature: signature.into(),
            offset: 0,
            categories: Vec::new(),
        }
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    /// Number of header bytes needed to test the signature.
    pub fn span(&self) -> usize {
        self.offset + self.signature.len()
    }

    pub fn matches(&self, header: &[u8]) -> bool {
        !self.signature.is_empty()
            && header.get(self.offset..self.span()) == Some(self.signature.as_slice())
    }
}

/// Parses a hex signature such as `"41 43 4d 45"` or `"0x41434D45"`.
pub fn parse_hex_signature(extension: &str, text: &str) -> Result<Vec<u8>, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidSignature {
        extension: extension.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = text.trim();
    let trimmed = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    let digits: String = trimmed
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':' && *c != '-')
        .collect();

    if digits.is_empty() {
        return Err(invalid("signature is empty"));
    }

    hex::decode(&digits).map_err(|err| invalid(&err.to_string()))
}
