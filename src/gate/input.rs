use std::io::Read;

/// Zero, one or many byte sources to check against a policy.
///
/// An absent input and an empty collection both pass every policy.
#[derive(Debug)]
pub enum FileInput<R> {
    Absent,
    Single(R),
    Many(Vec<R>),
}

impl<R: Read> FileInput<R> {
    pub fn absent() -> Self {
        FileInput::Absent
    }

    pub fn single(source: R) -> Self {
        FileInput::Single(source)
    }

    pub fn many<I: IntoIterator<Item = R>>(sources: I) -> Self {
        FileInput::Many(sources.into_iter().collect())
    }

    /// A collection that may not have been supplied at all.
    pub fn optional(sources: Option<Vec<R>>) -> Self {
        sources.map_or(FileInput::Absent, FileInput::Many)
    }

    pub fn len(&self) -> usize {
        match self {
            FileInput::Absent => 0,
            FileInput::Single(_) => 1,
            FileInput::Many(sources) => sources.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn into_sources(self) -> Vec<R> {
        match self {
            FileInput::Absent => Vec::new(),
            FileInput::Single(source) => vec![source],
            FileInput::Many(sources) => sources,
        }
    }
}

impl<R> Default for FileInput<R> {
    fn default() -> Self {
        FileInput::Absent
    }
}

impl<R: Read> From<Vec<R>> for FileInput<R> {
    fn from(sources: Vec<R>) -> Self {
        FileInput::Many(sources)
    }
}

impl<R: Read> From<Option<R>> for FileInput<R> {
    fn from(source: Option<R>) -> Self {
        source.map_or(FileInput::Absent, FileInput::Single)
    }
}
