//! Capability registry.
//!
//! Maps normalized extension tokens to generators and validators. The
//! registry is built once by [`Registry::builtin`] from the closed
//! [`Format`] table and passed by reference to every driver; nothing in the
//! crate holds global state.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use text2file_spec::{
    extension_token, normalize_extension, CapabilityError, Dependency, Format, FormatFamily,
};
use tracing::debug;

use crate::dispatch::{self, GenerateFn, ValidateFn};

/// A registered (extension, behavior) pair.
///
/// `handler` is `None` when the backing dependency is not compiled in; the
/// entry still exists so resolution can name what is missing.
#[derive(Debug, Clone, Copy)]
pub struct Capability<H> {
    pub format: Format,
    pub requires: Option<Dependency>,
    pub handler: Option<H>,
}

impl<H> Capability<H> {
    pub fn new(format: Format, handler: Option<H>) -> Self {
        Self {
            format,
            requires: format.requires(),
            handler,
        }
    }

    pub fn is_available(&self) -> bool {
        self.handler.is_some()
    }
}

/// A capability resolved to a callable handler.
#[derive(Debug, Clone, Copy)]
pub struct Resolved<H> {
    pub format: Format,
    pub handler: H,
}

/// Extension-keyed generators and validators plus the dependency probes
/// they were built from.
#[derive(Debug, Clone)]
pub struct Registry {
    generators: BTreeMap<String, Capability<GenerateFn>>,
    validators: BTreeMap<String, Capability<ValidateFn>>,
    probes: BTreeMap<Dependency, bool>,
}

/// One extension as shown by the `list` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionListing {
    pub extension: String,
    pub aliases: Vec<&'static str>,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requires: Option<Dependency>,
}

/// Extensions of one family, in registry order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyListing {
    pub family: FormatFamily,
    pub extensions: Vec<ExtensionListing>,
}

impl Registry {
    /// A registry with no capabilities and every dependency probed.
    pub fn empty() -> Self {
        let probes = Dependency::ALL
            .iter()
            .map(|&dependency| {
                let available = dispatch::probe(dependency);
                debug!(%dependency, available, "probed optional dependency");
                (dependency, available)
            })
            .collect();
        Self {
            generators: BTreeMap::new(),
            validators: BTreeMap::new(),
            probes,
        }
    }

    /// Every built-in format, wired to its backend when available.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        for format in Format::ALL {
            let backend = if registry.dependency_available(format.requires()) {
                dispatch::backend_for(format.requires())
            } else {
                None
            };
            registry.register_generator(
                format.extension(),
                Capability::new(format, backend.map(|b| b.generate)),
            );
            registry.register_validator(
                format.extension(),
                Capability::new(format, backend.map(|b| b.validate)),
            );
        }
        debug!(
            formats = registry.generators.len(),
            "built capability registry"
        );
        registry
    }

    fn dependency_available(&self, requires: Option<Dependency>) -> bool {
        requires.map_or(true, |dependency| self.is_available(dependency))
    }

    /// Whether the probe found `dependency` compiled in.
    pub fn is_available(&self, dependency: Dependency) -> bool {
        self.probes.get(&dependency).copied().unwrap_or(false)
    }

    /// Register a generator under a normalized key. Last registration wins;
    /// the replaced capability is returned.
    pub fn register_generator(
        &mut self,
        extension: &str,
        capability: Capability<GenerateFn>,
    ) -> Option<Capability<GenerateFn>> {
        self.generators
            .insert(normalize_extension(extension), capability)
    }

    /// Register a validator under a normalized key. Last registration wins;
    /// the replaced capability is returned.
    pub fn register_validator(
        &mut self,
        extension: &str,
        capability: Capability<ValidateFn>,
    ) -> Option<Capability<ValidateFn>> {
        self.validators
            .insert(normalize_extension(extension), capability)
    }

    pub fn generator_count(&self) -> usize {
        self.generators.len()
    }

    pub fn validator_count(&self) -> usize {
        self.validators.len()
    }

    pub fn resolve_generator(&self, token: &str) -> Result<Resolved<GenerateFn>, CapabilityError> {
        resolve(&self.generators, token)
    }

    pub fn resolve_validator(&self, token: &str) -> Result<Resolved<ValidateFn>, CapabilityError> {
        resolve(&self.validators, token)
    }

    /// Resolve the validator for a file from its extension (`.tar.gz` aware).
    pub fn validator_for_path(
        &self,
        path: &Path,
    ) -> Result<(String, Resolved<ValidateFn>), CapabilityError> {
        let token = extension_token(path).ok_or_else(|| CapabilityError::unsupported(""))?;
        let resolved = self.resolve_validator(&token)?;
        Ok((token, resolved))
    }

    /// Registered generator extensions grouped by family.
    pub fn families(&self) -> Vec<FamilyListing> {
        FormatFamily::ALL
            .iter()
            .map(|&family| FamilyListing {
                family,
                extensions: Format::ALL
                    .iter()
                    .filter(|format| format.family() == family)
                    .filter_map(|format| {
                        let capability = self.generators.get(format.extension())?;
                        Some(ExtensionListing {
                            extension: format.extension().to_string(),
                            aliases: format.aliases().to_vec(),
                            available: capability.is_available(),
                            requires: capability.requires,
                        })
                    })
                    .collect(),
            })
            .filter(|listing| !listing.extensions.is_empty())
            .collect()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn resolve<H: Copy>(
    table: &BTreeMap<String, Capability<H>>,
    token: &str,
) -> Result<Resolved<H>, CapabilityError> {
    let key = normalize_extension(token);
    let capability = table
        .get(&key)
        .or_else(|| {
            let canonical = Format::from_token(&key)?.extension();
            table.get(canonical)
        })
        .ok_or_else(|| CapabilityError::unsupported(key.clone()))?;

    match (capability.handler, capability.requires) {
        (Some(handler), _) => {
            debug!(extension = %key, format = %capability.format, "resolved capability");
            Ok(Resolved {
                format: capability.format,
                handler,
            })
        }
        (None, Some(dependency)) => Err(CapabilityError::MissingDependency {
            extension: key,
            dependency,
        }),
        (None, None) => Err(CapabilityError::unsupported(key)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use text2file_spec::{GenerateError, GenerateOptions, Verdict};

    fn shout(_: Format, content: &str, _: &GenerateOptions) -> Result<Vec<u8>, GenerateError> {
        Ok(content.to_uppercase().into_bytes())
    }

    fn always_valid(_: Format, _: &[u8]) -> Verdict {
        Verdict::valid("ok")
    }

    #[test]
    fn builtin_registers_every_format_once() {
        let registry = Registry::builtin();
        assert_eq!(registry.generator_count(), Format::ALL.len());
        assert_eq!(registry.validator_count(), Format::ALL.len());
    }

    #[test]
    fn tokens_are_normalized_and_aliased() {
        let registry = Registry::builtin();
        for token in ["TXT", ".txt", " txt ", "text", "..Text"] {
            let resolved = registry.resolve_generator(token).unwrap();
            assert_eq!(resolved.format, Format::Txt, "{token:?}");
        }
        assert_eq!(registry.resolve_validator("YML").unwrap().format, Format::Yaml);
    }

    #[test]
    fn unknown_tokens_are_unsupported() {
        let registry = Registry::builtin();
        let err = registry.resolve_generator(".RAR").unwrap_err();
        assert_eq!(err, CapabilityError::unsupported("rar"));
    }

    #[test]
    fn missing_backends_name_their_dependency() {
        let mut registry = Registry::builtin();
        registry.register_generator("pdf", Capability::new(Format::Pdf, None));
        let err = registry.resolve_generator("pdf").unwrap_err();
        assert_eq!(
            err,
            CapabilityError::MissingDependency {
                extension: "pdf".to_string(),
                dependency: Dependency::Pdf,
            }
        );
    }

    #[test]
    fn reregistration_replaces_without_growing() {
        let mut registry = Registry::builtin();
        let before = registry.generator_count();
        let replaced = registry.register_generator("Txt", Capability::new(Format::Txt, Some(shout)));
        assert!(replaced.is_some());
        assert_eq!(registry.generator_count(), before);

        let resolved = registry.resolve_generator("txt").unwrap();
        let bytes = (resolved.handler)(Format::Txt, "hi", &GenerateOptions::default()).unwrap();
        assert_eq!(bytes, b"HI");
    }

    #[test]
    fn custom_extensions_resolve_by_key() {
        let mut registry = Registry::empty();
        assert!(registry
            .register_validator("log", Capability::new(Format::Txt, Some(always_valid)))
            .is_none());
        let (token, resolved) = registry.validator_for_path(Path::new("/tmp/app.LOG")).unwrap();
        assert_eq!(token, "log");
        assert_eq!(resolved.format, Format::Txt);
        assert!(registry.validator_for_path(Path::new("/tmp/noext")).is_err());
    }

    #[test]
    fn compound_extensions_resolve_from_paths() {
        let registry = Registry::builtin();
        let result = registry.validator_for_path(Path::new("bundle.TAR.GZ"));
        if cfg!(feature = "archive") {
            let (token, resolved) = result.unwrap();
            assert_eq!(token, "tar.gz");
            assert_eq!(resolved.format, Format::TarGz);
        } else {
            assert!(matches!(result, Err(CapabilityError::MissingDependency { .. })));
        }
    }

    #[test]
    fn families_list_availability() {
        let registry = Registry::builtin();
        let families = registry.families();
        let text = families
            .iter()
            .find(|listing| listing.family == FormatFamily::Text)
            .unwrap();
        assert!(text.extensions.iter().all(|e| e.available));
        let image = families
            .iter()
            .find(|listing| listing.family == FormatFamily::Image)
            .unwrap();
        assert_eq!(
            image.extensions.iter().all(|e| e.available),
            cfg!(feature = "image")
        );
    }
}
