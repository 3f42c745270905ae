//! text2file End-to-End Test Infrastructure
//!
//! Integration tests drive the library API of `text2file-cli` against a
//! fresh temporary directory per test:
//!
//! - Generation: content → one artifact per extension
//! - Validation: artifacts and hand-corrupted files
//! - Cleanup: invalid files removed, everything else untouched
//! - Image sets: JSON document → sized icons
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p text2file-tests
//! ```

pub mod harness;

pub use harness::TestHarness;
