//! Text backend dispatch handler

use super::BackendHandlers;

pub(super) const HANDLERS: BackendHandlers = BackendHandlers {
    generate: text2file_backend_text::generate,
    validate: text2file_backend_text::validate,
};
