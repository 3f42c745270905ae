//! Image-set driver: render every entry of a JSON icon document.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use text2file_spec::{
    CapabilityError, Dependency, GenerationResult, RequestError, ResizeMode, Rgb,
};

use crate::registry::Registry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSetOptions {
    /// The `{"icons": [...]}` document.
    pub config: PathBuf,
    /// Entry paths are resolved against this directory.
    pub output_dir: PathBuf,
    /// Base image resized into every entry; placeholders when absent.
    pub base_image: Option<PathBuf>,
    pub background: Rgb,
    pub foreground: Rgb,
    /// Placeholder caption; each entry shows its `WxH` size when absent.
    pub text: Option<String>,
    pub resize: Option<ResizeMode>,
}

impl Default for ImageSetOptions {
    fn default() -> Self {
        Self {
            config: PathBuf::new(),
            output_dir: PathBuf::from("."),
            base_image: None,
            background: Rgb::WHITE,
            foreground: Rgb::BLACK,
            text: None,
            resize: None,
        }
    }
}

/// Render an image set, one result per entry in document order.
///
/// Option conflicts, an unreadable or malformed document, an empty icon
/// list and an undecodable base image fail the whole request. Anything
/// wrong with a single entry fails only that entry.
pub fn generate_set(
    registry: &Registry,
    options: &ImageSetOptions,
) -> Result<Vec<GenerationResult>, RequestError> {
    if !registry.is_available(Dependency::Image) {
        return Err(missing_image_backend());
    }
    render::generate_set(options)
}

fn missing_image_backend() -> RequestError {
    CapabilityError::MissingDependency {
        extension: "png".to_string(),
        dependency: Dependency::Image,
    }
    .into()
}

#[cfg(feature = "image")]
mod render {
    use std::fs;
    use std::path::Path;
    use text2file_backend_image::{check_set_options, load_base_image, render_icon, IconSource};
    use text2file_spec::{
        extension_token, Failure, GenerationResult, IconTarget, ImageSetSpec, RequestError,
    };
    use tracing::{info, warn};

    use super::ImageSetOptions;
    use crate::batch::prepare_output_dir;
    use crate::dispatch::{write_output_bytes, WriteMode};

    pub(super) fn generate_set(
        options: &ImageSetOptions,
    ) -> Result<Vec<GenerationResult>, RequestError> {
        check_set_options(
            options.base_image.is_some(),
            options.text.as_deref(),
            options.resize,
        )?;

        let config = &options.config;
        let json = fs::read_to_string(config).map_err(|source| RequestError::Read {
            path: config.clone(),
            source,
        })?;
        let spec = ImageSetSpec::from_json_str(&json).map_err(|message| RequestError::Config {
            path: config.clone(),
            message,
        })?;
        if spec.is_empty() {
            return Err(RequestError::NoEntries(config.clone()));
        }

        let base = match &options.base_image {
            Some(path) => Some(load_base_image(path).map_err(|message| {
                RequestError::BaseImage {
                    path: path.clone(),
                    message,
                }
            })?),
            None => None,
        };
        let source = match &base {
            Some(image) => IconSource::Base {
                image,
                mode: options.resize.unwrap_or_default(),
                background: options.background,
            },
            None => IconSource::Placeholder {
                background: options.background,
                foreground: options.foreground,
                caption: options.text.as_deref(),
            },
        };

        let output_dir = prepare_output_dir(&options.output_dir)?;
        let results = spec
            .entries
            .into_iter()
            .map(|entry| {
                let path = output_dir.join(&entry.src);
                let extension = extension_token(Path::new(&entry.src)).unwrap_or_default();
                match entry
                    .target
                    .and_then(|target| write_entry(&output_dir, &target, &source))
                {
                    Ok((written, bytes)) => {
                        info!(path = %written.display(), "generated image-set entry");
                        let hash = blake3::hash(&bytes).to_hex().to_string();
                        GenerationResult::success(written, extension, bytes.len() as u64, hash)
                    }
                    Err(failure) => {
                        warn!(entry = entry.index, src = %entry.src, "{}", failure.message);
                        GenerationResult::failure(path, extension, failure)
                    }
                }
            })
            .collect();
        Ok(results)
    }

    fn write_entry(
        output_dir: &Path,
        target: &IconTarget,
        source: &IconSource<'_>,
    ) -> Result<(std::path::PathBuf, Vec<u8>), Failure> {
        let bytes = render_icon(target, source)?;
        let path = output_dir.join(&target.path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| Failure::write(&e))?;
        }
        write_output_bytes(&path, &bytes, WriteMode::Overwrite, false)
            .map_err(|e| Failure::write(&e))?;
        Ok((path, bytes))
    }
}

#[cfg(not(feature = "image"))]
mod render {
    use text2file_spec::{GenerationResult, RequestError};

    use super::{missing_image_backend, ImageSetOptions};

    pub(super) fn generate_set(
        _options: &ImageSetOptions,
    ) -> Result<Vec<GenerationResult>, RequestError> {
        Err(missing_image_backend())
    }
}

#[cfg(all(test, feature = "image"))]
mod tests {
    use super::*;
    use std::fs;
    use text2file_spec::FailureKind;

    fn write_config(dir: &std::path::Path, json: &str) -> PathBuf {
        let path = dir.join("icons.json");
        fs::write(&path, json).unwrap();
        path
    }

    #[test]
    fn bad_entries_do_not_block_good_ones() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"{"icons":[{"src":"a.png","sizes":"16x16"},{"src":"bad.png","sizes":"0x0"}]}"#,
        );
        let options = ImageSetOptions {
            config,
            output_dir: dir.path().join("out"),
            ..Default::default()
        };
        let results = generate_set(&Registry::builtin(), &options).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].succeeded);
        assert!(!results[1].succeeded);
        assert_eq!(
            results[1].error.as_ref().map(|f| f.kind),
            Some(FailureKind::InvalidOption)
        );

        let image = image_size(&results[0].path);
        assert_eq!(image, (16, 16));
        assert!(!dir.path().join("out").join("bad.png").exists());
    }

    #[test]
    fn nested_paths_are_created_and_regenerated() {
        let dir = tempfile::tempdir().unwrap();
        let config = write_config(
            dir.path(),
            r#"{"icons":[{"src":"icons/web/fav.bmp","sizes":"32x24"}]}"#,
        );
        let options = ImageSetOptions {
            config,
            output_dir: dir.path().to_path_buf(),
            text: Some("T".to_string()),
            ..Default::default()
        };
        let first = generate_set(&Registry::builtin(), &options).unwrap();
        assert!(first[0].succeeded, "{:?}", first[0].error);
        let second = generate_set(&Registry::builtin(), &options).unwrap();
        assert!(second[0].succeeded, "existing entries are replaced");
        assert_eq!(image_size(&second[0].path), (32, 24));
    }

    #[test]
    fn request_level_failures() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::builtin();

        let empty = write_config(dir.path(), r#"{"icons":[]}"#);
        let options = ImageSetOptions {
            config: empty,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            generate_set(&registry, &options),
            Err(RequestError::NoEntries(_))
        ));

        let conflicting = ImageSetOptions {
            base_image: Some(dir.path().join("base.png")),
            text: Some("hi".to_string()),
            ..options.clone()
        };
        assert!(matches!(
            generate_set(&registry, &conflicting),
            Err(RequestError::Options(_))
        ));

        let stretch_without_base = ImageSetOptions {
            resize: Some(ResizeMode::Stretch),
            ..options.clone()
        };
        assert!(matches!(
            generate_set(&registry, &stretch_without_base),
            Err(RequestError::Options(_))
        ));

        let config = write_config(dir.path(), r#"{"icons":[{"src":"a.png","sizes":"8x8"}]}"#);
        let bad_base = dir.path().join("base.png");
        fs::write(&bad_base, "not a png").unwrap();
        let options = ImageSetOptions {
            config,
            output_dir: dir.path().to_path_buf(),
            base_image: Some(bad_base),
            ..Default::default()
        };
        assert!(matches!(
            generate_set(&registry, &options),
            Err(RequestError::BaseImage { .. })
        ));
        assert!(!dir.path().join("a.png").exists());

        let missing = ImageSetOptions {
            config: dir.path().join("missing.json"),
            ..Default::default()
        };
        assert!(matches!(
            generate_set(&registry, &missing),
            Err(RequestError::Read { .. })
        ));
    }

    fn image_size(path: &std::path::Path) -> (u32, u32) {
        let bytes = fs::read(path).unwrap();
        let verdict = text2file_backend_image::validate(
            text2file_spec::Format::from_path(path).unwrap().1,
            &bytes,
        );
        assert!(verdict.is_valid(), "{verdict:?}");
        let image = text2file_backend_image::load_base_image(path).unwrap();
        (image.width(), image.height())
    }
}
