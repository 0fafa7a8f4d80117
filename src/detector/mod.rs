pub mod custom;
pub mod registry;
pub mod types;

pub use custom::CustomType;
pub use registry::TypeRegistry;
pub use types::{Category, FileType};

use infer::Infer;
use log::{debug, trace};
use std::io::{self, Read};

/// Header bytes read when no larger custom signature needs more.
pub const DEFAULT_MAX_HEADER_BYTES: usize = 8192;

/// Upper bound on how much of an OLE compound file is read for detection.
pub const MAX_COMPOUND_FILE_BYTES: u64 = 64 * 1024 * 1024;

// Office 97-2003 documents and MSI packages share this container magic. Telling
// them apart needs the directory sectors, which usually sit past the header.
const COMPOUND_FILE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Identifies the concrete format of a byte source.
///
/// Implementations read from the current position of `source`; callers that
/// reuse a stream are responsible for rewinding it first. `Ok(None)` means
/// the format could not be determined.
pub trait TypeDetector {
    fn detect_type(&self, source: &mut dyn Read) -> io::Result<Option<FileType>>;

    /// Short name for log output.
    fn name(&self) -> &str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }
}

impl<D: TypeDetector + ?Sized> TypeDetector for Box<D> {
    fn detect_type(&self, source: &mut dyn Read) -> io::Result<Option<FileType>> {
        (**self).detect_type(source)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Magic-number detector backed by the `infer` crate.
///
/// Registered [`CustomType`] signatures are tried first, in registration
/// order, then the built-in `infer` matchers.
pub struct InferDetector {
    infer: Infer,
    custom: Vec<CustomType>,
    max_header_bytes: usize,
}

impl Default for InferDetector {
    fn default() -> Self {
        Self {
            infer: Infer::new(),
            custom: Vec::new(),
            max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
        }
    }
}

impl InferDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_header_bytes(max_header_bytes: usize) -> Self {
        Self {
            max_header_bytes,
            ..Self::default()
        }
    }

    pub fn max_header_bytes(&self) -> usize {
        self.max_header_bytes
    }

    pub fn add_custom_type(&mut self, custom: CustomType) {
        debug!(
            "Registering custom type '{}' ({} byte signature at offset {})",
            custom.file_type,
            custom.signature.len(),
            custom.offset
        );
        self.custom.push(custom);
    }

    pub fn custom_types(&self) -> &[CustomType] {
        &self.custom
    }

    /// Classifies an in-memory header.
    pub fn detect_bytes(&self, header: &[u8]) -> Option<FileType> {
        if let Some(custom) = self.custom.iter().find(|c| c.matches(header)) {
            return Some(custom.file_type.clone());
        }

        self.infer.get(header).map(|kind| {
            trace!("infer matched {} ({})", kind.extension(), kind.mime_type());
            FileType::new(kind.extension())
        })
    }

    fn header_limit(&self) -> usize {
        self.custom
            .iter()
            .map(CustomType::span)
            .fold(self.max_header_bytes, usize::max)
    }
}

impl TypeDetector for InferDetector {
    fn detect_type(&self, source: &mut dyn Read) -> io::Result<Option<FileType>> {
        let limit = self.header_limit();
        let mut header = Vec::with_capacity(limit.min(DEFAULT_MAX_HEADER_BYTES));
        (&mut *source).take(limit as u64).read_to_end(&mut header)?;

        if header.len() == limit && header.starts_with(&COMPOUND_FILE_MAGIC) {
            let remaining = MAX_COMPOUND_FILE_BYTES.saturating_sub(limit as u64);
            source.take(remaining).read_to_end(&mut header)?;
            trace!("Compound file header, read {} bytes in total", header.len());
        }

        let detected = self.detect_bytes(&header);
        debug!(
            "Read {} header bytes, detected {}",
            header.len(),
            detected.as_ref().map_or("nothing", FileType::as_str)
        );

        Ok(detected)
    }

    fn name(&self) -> &str {
        "InferDetector"
    }
}
