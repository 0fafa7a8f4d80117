use crate::detector::{Category, FileType};
use crate::error::GateError;
use std::fmt;

/// Validation rule applied to every file of an input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Policy {
    /// Every file must be one of the listed types.
    AllowTypes(Vec<FileType>),
    /// No file may be one of the listed types.
    ForbidTypes(Vec<FileType>),
    /// Every file must belong to the category.
    AllowCategory(Category),
    /// No file may belong to the category.
    ForbidCategory(Category),
}

impl Policy {
    pub fn allow_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        Policy::AllowTypes(types.into_iter().map(Into::into).collect())
    }

    pub fn forbid_types<I, T>(types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FileType>,
    {
        Policy::ForbidTypes(types.into_iter().map(Into::into).collect())
    }

    pub fn allow_documents() -> Self {
        Policy::AllowCategory(Category::Document)
    }

    pub fn allow_images() -> Self {
        Policy::AllowCategory(Category::Image)
    }

    pub fn allow_archives() -> Self {
        Policy::AllowCategory(Category::Archive)
    }

    pub fn forbid_executables() -> Self {
        Policy::ForbidCategory(Category::Executable)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Policy::AllowTypes(_) => "allow-types",
            Policy::ForbidTypes(_) => "forbid-types",
            Policy::AllowCategory(Category::Document) => "allow-documents",
            Policy::AllowCategory(Category::Image) => "allow-images",
            Policy::AllowCategory(Category::Archive) => "allow-archives",
            Policy::AllowCategory(Category::Executable) => "allow-executables",
            Policy::ForbidCategory(Category::Document) => "forbid-documents",
            Policy::ForbidCategory(Category::Image) => "forbid-images",
            Policy::ForbidCategory(Category::Archive) => "forbid-archives",
            Policy::ForbidCategory(Category::Executable) => "forbid-executables",
        }
    }

    /// Rejects list policies with no entries.
    pub fn validate(&self) -> Result<(), GateError> {
        match self {
            Policy::AllowTypes(types) | Policy::ForbidTypes(types) if types.is_empty() => {
                Err(GateError::EmptyTypeList { policy: self.name() })
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::AllowTypes(types) | Policy::ForbidTypes(types) => {
                let names: Vec<&str> = types.iter().map(FileType::as_str).collect();
                write!(f, "{} [{}]", self.name(), names.join(", "))
            }
            _ => f.write_str(self.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_lists_fail_validation() {
        let allow = Policy::allow_types(Vec::<&str>::new());
        let forbid = Policy::forbid_types(Vec::<FileType>::new());

        assert!(matches!(
            allow.validate(),
            Err(GateError::EmptyTypeList { policy: "allow-types" })
        ));
        assert!(matches!(
            forbid.validate(),
            Err(GateError::EmptyTypeList { policy: "forbid-types" })
        ));
    }

    #[test]
    fn test_category_policies_always_valid() {
        for policy in [
            Policy::allow_documents(),
            Policy::allow_images(),
            Policy::allow_archives(),
            Policy::forbid_executables(),
        ] {
            assert!(policy.validate().is_ok(), "{} should be valid", policy);
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Policy::allow_types(["zip", ".7Z"]).to_string(), "allow-types [zip, 7z]");
        assert_eq!(Policy::forbid_executables().to_string(), "forbid-executables");
    }
}
