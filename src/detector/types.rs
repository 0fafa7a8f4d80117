use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Canonical name of a concrete file format, keyed by its usual extension.
///
/// Built from user text through [`FileType::new`], which trims, lowercases,
/// drops a leading dot and folds common aliases, so `".JPEG"` and `"jpg"`
/// compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FileType(String);

impl FileType {
    pub fn new(name: impl AsRef<str>) -> Self {
        FileType(normalize(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn normalize(name: &str) -> String {
    let name = name.trim().trim_start_matches('.').to_ascii_lowercase();

    let canonical = match name.as_str() {
        "jpeg" | "jpe" | "jfif" => "jpg",
        "tiff" => "tif",
        "gzip" | "tgz" => "gz",
        "bzip2" | "bz" => "bz2",
        "7zip" => "7z",
        "zstd" => "zst",
        "heic" => "heif",
        _ => return name,
    };

    canonical.to_string()
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FileType {
    fn from(name: &str) -> Self {
        FileType::new(name)
    }
}

impl From<String> for FileType {
    fn from(name: String) -> Self {
        FileType::new(name)
    }
}

impl From<FileType> for String {
    fn from(file_type: FileType) -> Self {
        file_type.0
    }
}

impl FromStr for FileType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(FileType::new(s))
    }
}

/// Semantic grouping of file types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[serde(alias = "documents")]
    Document,
    #[serde(alias = "images")]
    Image,
    #[serde(alias = "archives")]
    Archive,
    #[serde(alias = "executables")]
    Executable,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Document,
        Category::Image,
        Category::Archive,
        Category::Executable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Document => "document",
            Category::Image => "image",
            Category::Archive => "archive",
            Category::Executable => "executable",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document" | "documents" | "doc" | "docs" => Ok(Category::Document),
            "image" | "images" => Ok(Category::Image),
            "archive" | "archives" => Ok(Category::Archive),
            "executable" | "executables" | "exe" => Ok(Category::Executable),
            other => Err(format!("unknown category: {}", other)),
        }
    }
}
