//! Archive backend dispatch handler

use super::BackendHandlers;

#[cfg(feature = "archive")]
pub(super) fn handlers() -> Option<BackendHandlers> {
    Some(BackendHandlers {
        generate: text2file_backend_archive::generate,
        validate: text2file_backend_archive::validate,
    })
}

#[cfg(not(feature = "archive"))]
pub(super) fn handlers() -> Option<BackendHandlers> {
    None
}
