//! Image backend dispatch handler

use super::BackendHandlers;

#[cfg(feature = "image")]
pub(super) fn handlers() -> Option<BackendHandlers> {
    Some(BackendHandlers {
        generate: text2file_backend_image::generate,
        validate: text2file_backend_image::validate,
    })
}

#[cfg(not(feature = "image"))]
pub(super) fn handlers() -> Option<BackendHandlers> {
    None
}
