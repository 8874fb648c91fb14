//! picstore core library — storage and preview logic without HTTP.
//!
//! `picstore-core` owns everything that touches the two flat directories
//! the service works on: the storage directory of uploaded originals and
//! the preview directory of derived thumbnails. The web front end
//! (`picstore-web`) only maps requests onto these functions.
//!
//! # Modules
//!
//! - [`fs`] — Stored files, directory listing, rename/delete, image metadata, preview rendering.
//! - [`cache`] — Generate-or-reuse preview cache with per-key locking.
//! - [`config`] — Preview settings shared with front ends.
//! - [`error`] — Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).

pub mod cache;
pub mod config;
pub mod error;
pub mod fs;

pub use cache::PreviewCache;
pub use config::settings::{CacheKey, PreviewSettings};
pub use error::{CoreError, CoreResult};
pub use fs::entry::{Resolution, StoredFile};
pub use fs::image_info::{detect_format, format_name, read_resolution};
pub use fs::ops::{
    delete_stored_file, is_valid_filename, list_stored_files, partial_path, rename_keep_extension,
    stored_path,
};
pub use fs::preview::render_preview;
pub use fs::size::format_size;
