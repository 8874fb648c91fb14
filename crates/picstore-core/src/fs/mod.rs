//! File system abstractions for picstore.
//!
//! This module provides the stored-file type ([`entry::StoredFile`]), storage
//! directory operations ([`ops`]), image metadata ([`image_info`]), preview
//! rendering ([`preview::render_preview`]) and listing size labels
//! ([`size::format_size`]).

pub mod entry;
pub mod image_info;
pub mod ops;
pub mod preview;
pub mod size;

pub use entry::{Resolution, StoredFile};
