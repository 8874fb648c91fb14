//! Storage directory operations.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::StoredFile;

/// Lists the regular files directly inside `dir`.
///
/// Entries come back in directory-iteration order, which is platform
/// dependent; no sorting is applied. Subdirectories and in-flight partial
/// files (see [`partial_path`]) are skipped.
///
/// # Errors
///
/// - [`CoreError::NotFound`] — the directory does not exist.
/// - [`CoreError::PermissionDenied`] — read access is denied.
/// - [`CoreError::Io`] — any other I/O error, including a failure on a
///   single entry (the whole listing fails).
pub fn list_stored_files(dir: &Path) -> CoreResult<Vec<StoredFile>> {
    let read_dir = std::fs::read_dir(dir).map_err(|e| CoreError::from_io(dir, e))?;

    let mut files = Vec::new();
    for dir_entry in read_dir {
        let dir_entry = dir_entry?;
        let metadata = dir_entry.metadata()?;
        if !metadata.is_file() || is_partial_name(&dir_entry.file_name().to_string_lossy()) {
            continue;
        }
        files.push(StoredFile::new(dir_entry.path(), &metadata));
    }

    Ok(files)
}

/// Returns `true` if `name` can be used as a flat file name.
///
/// Rejects empty names, `.` and `..`, and anything containing a path
/// separator or a NUL byte.
pub fn is_valid_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains('\0')
}

/// Resolves `name` inside `dir`, refusing names that would escape it.
///
/// # Errors
///
/// Returns [`CoreError::InvalidName`] if `name` is not a flat file name.
pub fn stored_path(dir: &Path, name: &str) -> CoreResult<PathBuf> {
    if !is_valid_filename(name) {
        return Err(CoreError::InvalidName(name.to_string()));
    }
    Ok(dir.join(name))
}

/// Suffix of files still being written.
const PARTIAL_SUFFIX: &str = ".partial";

/// Hidden sibling of `name` inside `dir` used while its content is written.
///
/// Writers stream into this path and rename it onto the final name once
/// complete, so listings never observe a half-written file.
///
/// # Errors
///
/// Returns [`CoreError::InvalidName`] if `name` is not a flat file name.
pub fn partial_path(dir: &Path, name: &str) -> CoreResult<PathBuf> {
    if !is_valid_filename(name) {
        return Err(CoreError::InvalidName(name.to_string()));
    }
    Ok(dir.join(format!(".{name}{PARTIAL_SUFFIX}")))
}

fn is_partial_name(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

/// Renames `current` inside `dir` to `new_base` plus the current extension.
///
/// The extension of `current` (including the dot) is appended to
/// `new_base` verbatim; any extension-looking suffix already in `new_base`
/// is kept as part of the base. Returns the resulting file name.
///
/// ```no_run
/// use picstore_core::rename_keep_extension;
/// use std::path::Path;
///
/// let new_name = rename_keep_extension(Path::new("uploads"), "photo.png", "vacation").unwrap();
/// assert_eq!(new_name, "vacation.png");
/// ```
///
/// # Errors
///
/// - [`CoreError::InvalidName`] if either name is not a flat file name.
/// - [`CoreError::NotFound`] if `current` does not exist.
/// - [`CoreError::Io`] for any other I/O failure.
pub fn rename_keep_extension(dir: &Path, current: &str, new_base: &str) -> CoreResult<String> {
    let from = stored_path(dir, current)?;

    let new_name = match Path::new(current).extension() {
        Some(ext) => format!("{new_base}.{}", ext.to_string_lossy()),
        None => new_base.to_string(),
    };
    let to = stored_path(dir, &new_name)?;

    std::fs::rename(&from, &to).map_err(|e| CoreError::from_io(&from, e))?;
    tracing::debug!(from = %from.display(), to = %to.display(), "renamed stored file");

    Ok(new_name)
}

/// Deletes the stored file `name` inside `dir`.
///
/// # Errors
///
/// - [`CoreError::InvalidName`] if `name` is not a flat file name.
/// - [`CoreError::NotFound`] if the file does not exist.
/// - [`CoreError::Io`] for any other I/O failure.
pub fn delete_stored_file(dir: &Path, name: &str) -> CoreResult<()> {
    let path = stored_path(dir, name)?;
    std::fs::remove_file(&path).map_err(|e| CoreError::from_io(&path, e))?;
    tracing::debug!(path = %path.display(), "deleted stored file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn list_empty_directory() {
        let tmp = TempDir::new().unwrap();
        let files = list_stored_files(tmp.path()).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn list_returns_files_with_sizes() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.jpg"), "aaaa").unwrap();
        fs::write(tmp.path().join("b.png"), "bb").unwrap();

        let mut files = list_stored_files(tmp.path()).unwrap();
        files.sort_by(|x, y| x.name().cmp(y.name()));

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name(), "a.jpg");
        assert_eq!(files[0].size(), 4);
        assert_eq!(files[1].name(), "b.png");
        assert_eq!(files[1].size(), 2);
    }

    #[test]
    fn list_skips_subdirectories() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("only.gif"), "x").unwrap();

        let files = list_stored_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "only.gif");
    }

    #[test]
    fn list_skips_partial_files() {
        let tmp = TempDir::new().unwrap();
        let partial = partial_path(tmp.path(), "incoming.png").unwrap();
        fs::write(&partial, "half").unwrap();
        fs::write(tmp.path().join("done.png"), "full").unwrap();

        let files = list_stored_files(tmp.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "done.png");
    }

    #[test]
    fn partial_path_is_hidden_sibling() {
        let tmp = TempDir::new().unwrap();
        let partial = partial_path(tmp.path(), "cat.jpg").unwrap();
        assert_eq!(partial, tmp.path().join(".cat.jpg.partial"));
        assert!(matches!(
            partial_path(tmp.path(), "../cat.jpg"),
            Err(CoreError::InvalidName(_))
        ));
    }

    #[test]
    fn list_missing_directory_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = list_stored_files(&tmp.path().join("nope"));
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn valid_filenames() {
        assert!(is_valid_filename("photo.png"));
        assert!(is_valid_filename(".hidden"));
        assert!(is_valid_filename("with space.jpg"));
    }

    #[test]
    fn invalid_filenames() {
        assert!(!is_valid_filename(""));
        assert!(!is_valid_filename("."));
        assert!(!is_valid_filename(".."));
        assert!(!is_valid_filename("../escape.png"));
        assert!(!is_valid_filename("dir/file.png"));
        assert!(!is_valid_filename("dir\\file.png"));
        assert!(!is_valid_filename("nul\0byte"));
    }

    #[test]
    fn stored_path_rejects_traversal() {
        let tmp = TempDir::new().unwrap();
        let result = stored_path(tmp.path(), "../../etc/passwd");
        assert!(matches!(result, Err(CoreError::InvalidName(_))));
    }

    #[test]
    fn rename_keeps_original_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("photo.png"), "data").unwrap();

        let new_name = rename_keep_extension(tmp.path(), "photo.png", "vacation").unwrap();

        assert_eq!(new_name, "vacation.png");
        assert!(!tmp.path().join("photo.png").exists());
        assert_eq!(fs::read(tmp.path().join("vacation.png")).unwrap(), b"data");
    }

    #[test]
    fn rename_treats_new_extension_as_base() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("photo.png"), "data").unwrap();

        let new_name = rename_keep_extension(tmp.path(), "photo.png", "vacation.jpg").unwrap();

        assert_eq!(new_name, "vacation.jpg.png");
        assert!(tmp.path().join("vacation.jpg.png").exists());
    }

    #[test]
    fn rename_without_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("README"), "data").unwrap();

        let new_name = rename_keep_extension(tmp.path(), "README", "NOTES").unwrap();

        assert_eq!(new_name, "NOTES");
        assert!(tmp.path().join("NOTES").exists());
    }

    #[test]
    fn rename_keeps_only_last_extension() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("archive.tar.gz"), "data").unwrap();

        let new_name = rename_keep_extension(tmp.path(), "archive.tar.gz", "backup").unwrap();

        assert_eq!(new_name, "backup.gz");
    }

    #[test]
    fn rename_missing_source_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = rename_keep_extension(tmp.path(), "ghost.png", "anything");
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }

    #[test]
    fn rename_rejects_separator_in_new_base() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("photo.png"), "data").unwrap();

        let result = rename_keep_extension(tmp.path(), "photo.png", "../outside");

        assert!(matches!(result, Err(CoreError::InvalidName(_))));
        assert!(tmp.path().join("photo.png").exists());
    }

    #[test]
    fn delete_removes_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("gone.jpg"), "x").unwrap();

        delete_stored_file(tmp.path(), "gone.jpg").unwrap();

        assert!(!tmp.path().join("gone.jpg").exists());
    }

    #[test]
    fn delete_missing_file_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = delete_stored_file(tmp.path(), "never.jpg");
        assert!(matches!(result, Err(CoreError::NotFound(_))));
    }
}
