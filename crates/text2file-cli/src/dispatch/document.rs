//! Document backend dispatch handler
//!
//! One backend crate serves two dependencies; each is gated by its own
//! feature so a pdf-only build still reports office formats as missing.

use super::BackendHandlers;
use text2file_spec::Dependency;

pub(super) fn handlers(dependency: Dependency) -> Option<BackendHandlers> {
    let compiled = match dependency {
        Dependency::Pdf => cfg!(feature = "pdf"),
        Dependency::Office => cfg!(feature = "office"),
        _ => false,
    };
    if compiled {
        backend()
    } else {
        None
    }
}

#[cfg(any(feature = "pdf", feature = "office"))]
fn backend() -> Option<BackendHandlers> {
    Some(BackendHandlers {
        generate: text2file_backend_document::generate,
        validate: text2file_backend_document::validate,
    })
}

#[cfg(not(any(feature = "pdf", feature = "office")))]
fn backend() -> Option<BackendHandlers> {
    None
}
