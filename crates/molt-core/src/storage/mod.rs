//! Local file persistence
//!
//! Every store is one human-readable JSON document. Files are read in full
//! on load and rewritten in full on every change, through an atomic
//! temp-file-then-rename write.
//!
//! There is no locking: two concurrent invocations writing the same file
//! resolve as last writer wins.

pub mod error;
pub mod json_file;

pub use error::{StorageError, StorageResult};
pub use json_file::{load_json, write_json, LoadOutcome};
