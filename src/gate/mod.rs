pub mod input;
pub mod policy;

pub use input::FileInput;
pub use policy::Policy;

use crate::detector::{Category, CustomType, FileType, InferDetector, TypeDetector, TypeRegistry};
use crate::error::GateError;
use log::{debug, info, warn};
use std::io::Read;

/// Per-file outcome reported by [`TypeGate::verdicts`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileVerdict {
    pub index: usize,
    pub file_type: Option<FileType>,
    pub passed: bool,
}

/// Checks byte sources against a [`Policy`] using a [`TypeDetector`].
///
/// A collection passes only when every file passes. Files whose type cannot
/// be determined never satisfy an allow rule and never trip a forbid rule.
pub struct TypeGate<D = InferDetector> {
    detector: D,
    registry: TypeRegistry,
}

impl Default for TypeGate<InferDetector> {
    fn default() -> Self {
        Self::with_detector(InferDetector::new())
    }
}

impl TypeGate<InferDetector> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Teaches both the detector and the registry about a new format.
    pub fn register_custom_type(&mut self, custom: CustomType) {
        self.registry
            .register(custom.file_type.clone(), custom.categories.iter().copied());
        self.detector.add_custom_type(custom);
    }
}

impl<D: TypeDetector> TypeGate<D> {
    pub fn with_detector(detector: D) -> Self {
        Self::with_registry(detector, TypeRegistry::new())
    }

    pub fn with_registry(detector: D, registry: TypeRegistry) -> Self {
        Self { detector, registry }
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.registry
    }

    pub fn detect<R: Read>(&self, source: &mut R) -> Result<Option<FileType>, GateError> {
        let detected = self.detector.detect_type(source)?;
        if detected.is_none() {
            debug!("{} could not identify the file type", self.detector.name());
        }
        Ok(detected)
    }

    /// Categories of the detected type; empty when detection is inconclusive.
    pub fn categories_of<R: Read>(&self, source: &mut R) -> Result<Vec<Category>, GateError> {
        Ok(self
            .detect(source)?
            .map(|file_type| self.registry.categories(&file_type))
            .unwrap_or_default())
    }

    pub fn is<R: Read>(&self, source: &mut R, file_type: &FileType) -> Result<bool, GateError> {
        Ok(self.detect(source)?.as_ref() == Some(file_type))
    }

    pub fn is_in<R: Read>(&self, source: &mut R, category: Category) -> Result<bool, GateError> {
        Ok(self
            .detect(source)?
            .map_or(false, |file_type| self.registry.has_category(&file_type, category)))
    }

    pub fn is_image<R: Read>(&self, source: &mut R) -> Result<bool, GateError> {
        self.is_in(source, Category::Image)
    }

    pub fn is_archive<R: Read>(&self, source: &mut R) -> Result<bool, GateError> {
        self.is_in(source, Category::Archive)
    }

    pub fn is_executable<R: Read>(&self, source: &mut R) -> Result<bool, GateError> {
        self.is_in(source, Category::Executable)
    }

    pub fn is_document<R: Read>(&self, source: &mut R) -> Result<bool, GateError> {
        self.is_in(source, Category::Document)
    }

    /// Applies `policy` to every file in `input`, stopping at the first failure.
    ///
    /// Returns [`GateError::EmptyTypeList`] for a list policy with no entries,
    /// whatever the input. Absent or empty input passes.
    pub fn evaluate<R, I>(&self, policy: &Policy, input: I) -> Result<bool, GateError>
    where
        R: Read,
        I: Into<FileInput<R>>,
    {
        policy.validate()?;
        let input: FileInput<R> = input.into();

        for (index, mut source) in input.into_sources().into_iter().enumerate() {
            let detected = self.detect(&mut source)?;
            if !self.passes(policy, detected.as_ref()) {
                info!(
                    "File #{} ({}) rejected by {}",
                    index,
                    describe(detected.as_ref()),
                    policy
                );
                return Ok(false);
            }
        }

        debug!("All files allowed by {}", policy);
        Ok(true)
    }

    /// Like [`evaluate`](Self::evaluate) but inspects every file and reports each outcome.
    pub fn verdicts<R, I>(&self, policy: &Policy, input: I) -> Result<Vec<FileVerdict>, GateError>
    where
        R: Read,
        I: Into<FileInput<R>>,
    {
        policy.validate()?;
        let input: FileInput<R> = input.into();

        input
            .into_sources()
            .into_iter()
            .enumerate()
            .map(|(index, mut source)| {
                let file_type = self.detect(&mut source)?;
                let passed = self.passes(policy, file_type.as_ref());
                Ok(FileVerdict {
                    index,
                    file_type,
                    passed,
                })
            })
            .collect()
    }

    fn passes(&self, policy: &Policy, detected: Option<&FileType>) -> bool {
        let Some(file_type) = detected else {
            let allow_rule = matches!(policy, Policy::AllowTypes(_) | Policy::AllowCategory(_));
            if allow_rule {
                warn!("Unidentified file rejected by {}", policy);
            }
            return !allow_rule;
        };

        match policy {
            Policy::AllowTypes(allowed) => allowed.contains(file_type),
            Policy::ForbidTypes(forbidden) => !forbidden.contains(file_type),
            Policy::AllowCategory(category) => self.registry.has_category(file_type, *category),
            Policy::ForbidCategory(category) => !self.registry.has_category(file_type, *category),
        }
    }
}

fn describe(file_type: Option<&FileType>) -> &str {
    file_type.map_or("unknown type", FileType::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor};

    /// Treats the whole content as the name of the type.
    struct NameDetector;

    impl TypeDetector for NameDetector {
        fn detect_type(&self, source: &mut dyn Read) -> io::Result<Option<FileType>> {
            let mut name = String::new();
            source.read_to_string(&mut name)?;
            Ok((!name.is_empty()).then(|| FileType::new(name)))
        }
    }

    fn files(names: &[&'static str]) -> Vec<Cursor<&'static [u8]>> {
        names.iter().copied().map(|name| Cursor::new(name.as_bytes())).collect()
    }

    #[test]
    fn test_unknown_fails_allow_rules() {
        let gate = TypeGate::with_detector(NameDetector);

        assert!(!gate.evaluate(&Policy::allow_types(["zip"]), files(&[""])).unwrap());
        assert!(!gate.evaluate(&Policy::allow_images(), files(&[""])).unwrap());
    }

    #[test]
    fn test_unknown_passes_forbid_rules() {
        let gate = TypeGate::with_detector(NameDetector);

        assert!(gate.evaluate(&Policy::forbid_types(["exe"]), files(&[""])).unwrap());
        assert!(gate.evaluate(&Policy::forbid_executables(), files(&[""])).unwrap());
    }

    #[test]
    fn test_empty_list_errors_even_without_files() {
        let gate = TypeGate::with_detector(NameDetector);
        let err = gate
            .evaluate(
                &Policy::allow_types(Vec::<FileType>::new()),
                FileInput::<Cursor<&[u8]>>::absent(),
            )
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_evaluate_stops_at_first_failure() {
        struct CountingDetector(std::cell::Cell<usize>);

        impl TypeDetector for CountingDetector {
            fn detect_type(&self, source: &mut dyn Read) -> io::Result<Option<FileType>> {
                self.0.set(self.0.get() + 1);
                NameDetector.detect_type(source)
            }
        }

        let gate = TypeGate::with_detector(CountingDetector(Default::default()));
        let allowed = gate
            .evaluate(&Policy::allow_images(), files(&["png", "exe", "jpg", "bmp"]))
            .unwrap();

        assert!(!allowed);
        assert_eq!(gate.detector().0.get(), 2);
    }

    #[test]
    fn test_verdicts_match_evaluate() {
        let gate = TypeGate::with_detector(NameDetector);
        let policy = Policy::allow_images();

        let verdicts = gate.verdicts(&policy, files(&["png", "exe", ""])).unwrap();
        assert_eq!(
            verdicts.iter().map(|v| v.passed).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert_eq!(verdicts[1].file_type, Some(FileType::new("exe")));
        assert_eq!(verdicts[2].file_type, None);

        let aggregate = verdicts.iter().all(|v| v.passed);
        assert_eq!(aggregate, gate.evaluate(&policy, files(&["png", "exe", ""])).unwrap());
    }

    #[test]
    fn test_registry_additions_affect_categories() {
        let mut gate = TypeGate::with_detector(NameDetector);
        assert!(!gate.evaluate(&Policy::allow_archives(), files(&["acme"])).unwrap());

        gate.registry_mut().register("acme".into(), [Category::Archive]);
        assert!(gate.evaluate(&Policy::allow_archives(), files(&["acme"])).unwrap());
    }
}
