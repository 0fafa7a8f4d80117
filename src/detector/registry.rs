use super::types::{Category, FileType};
use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashMap};

// Canonical extensions as reported by the detector, grouped by category.
const DOCUMENTS: &[&str] = &[
    "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "odp", "pdf", "rtf", "epub",
];

const IMAGES: &[&str] = &[
    "jpg", "png", "gif", "bmp", "tif", "webp", "ico", "heif", "avif", "psd", "jxl", "cr2", "jxr",
];

const ARCHIVES: &[&str] = &[
    "zip", "7z", "rar", "gz", "bz2", "xz", "tar", "zst", "lz", "lz4", "cab", "z", "cpio", "ar",
    "deb", "rpm", "crx",
];

const EXECUTABLES: &[&str] = &[
    "exe", "dll", "elf", "mach", "dex", "dey", "class", "wasm", "bc", "obj",
    // installer packages
    "msi", "deb", "rpm",
];

static BUILTIN_TYPES: Lazy<HashMap<FileType, BTreeSet<Category>>> = Lazy::new(|| {
    let mut map: HashMap<FileType, BTreeSet<Category>> = HashMap::new();

    let groups = [
        (Category::Document, DOCUMENTS),
        (Category::Image, IMAGES),
        (Category::Archive, ARCHIVES),
        (Category::Executable, EXECUTABLES),
    ];

    for (category, names) in groups {
        for name in names {
            map.entry(FileType::new(name)).or_default().insert(category);
        }
    }

    map
});

/// Maps detected file types to the categories they belong to.
///
/// Starts from the built-in table and accepts additional entries for
/// custom types registered at runtime. Unregistered types belong to no
/// category.
#[derive(Debug, Clone)]
pub struct TypeRegistry {
    entries: HashMap<FileType, BTreeSet<Category>>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self {
            entries: BUILTIN_TYPES.clone(),
        }
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with no entries at all, not even the built-in table.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Adds categories to a type. Existing categories are kept.
    pub fn register<I>(&mut self, file_type: FileType, categories: I)
    where
        I: IntoIterator<Item = Category>,
    {
        self.entries.entry(file_type).or_default().extend(categories);
    }

    pub fn contains(&self, file_type: &FileType) -> bool {
        self.entries.contains_key(file_type)
    }

    pub fn categories(&self, file_type: &FileType) -> Vec<Category> {
        self.entries
            .get(file_type)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn has_category(&self, file_type: &FileType, category: Category) -> bool {
        self.entries
            .get(file_type)
            .map_or(false, |set| set.contains(&category))
    }

    /// All registered types carrying `category`, sorted by name.
    pub fn types_in(&self, category: Category) -> Vec<FileType> {
        let mut types: Vec<FileType> = self
            .entries
            .iter()
            .filter(|(_, set)| set.contains(&category))
            .map(|(file_type, _)| file_type.clone())
            .collect();
        types.sort();
        types
    }

    /// Every registered type with its categories, sorted by name.
    pub fn iter_sorted(&self) -> Vec<(&FileType, Vec<Category>)> {
        let mut all: Vec<_> = self
            .entries
            .iter()
            .map(|(file_type, set)| (file_type, set.iter().copied().collect()))
            .collect();
        all.sort_by(|a, b| a.0.cmp(b.0));
        all
    }
}
