use std::path::Path as FsPath;

use axum::body::{Body, Bytes};
use axum::extract::multipart::Field;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use picstore_core::{
    delete_stored_file, format_size, list_stored_files, partial_path, read_resolution,
    rename_keep_extension, stored_path, CoreResult,
};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::dto::{FileRowDto, RenameRequest, ResolutionDto};
use crate::error::AppError;
use crate::state::AppState;

/// Multipart field carrying uploaded files.
const UPLOAD_FIELD: &str = "file";

pub async fn list_files(
    State(state): State<AppState>,
) -> Result<Json<Vec<FileRowDto>>, AppError> {
    let dir = state.uploads_dir().clone();
    let isolate = state.config.listing.isolate_failures;

    let rows = tokio::task::spawn_blocking(move || collect_rows(&dir, isolate))
        .await
        .map_err(|e| AppError::Internal(format!("listing task failed: {e}")))??;

    Ok(Json(rows))
}

fn collect_rows(dir: &FsPath, isolate: bool) -> CoreResult<Vec<FileRowDto>> {
    list_stored_files(dir)?
        .into_iter()
        .map(|file| {
            let resolution = match read_resolution(file.path()) {
                Ok(res) => ResolutionDto::Ok(res),
                Err(e) if isolate => {
                    tracing::warn!(name = file.name(), "skipping resolution: {e}");
                    ResolutionDto::Failed {
                        error: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            Ok(FileRowDto(
                file.name().to_string(),
                format_size(file.size()),
                resolution,
            ))
        })
        .collect()
}

/// Stores every file part named `file` under its client-supplied name,
/// overwriting any existing file of the same name.
///
/// Each part is streamed into a hidden partial file and renamed into place
/// only once complete; a failed part leaves nothing behind.
pub async fn upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<&'static str, AppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let Some(file_name) = field.file_name().map(str::to_owned) else {
            continue;
        };

        let path = stored_path(state.uploads_dir(), &file_name)?;
        let partial = partial_path(state.uploads_dir(), &file_name)?;

        let written = match store_field(&mut field, &partial, &path).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(rm) = tokio::fs::remove_file(&partial).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        tracing::warn!(name = %file_name, "leftover partial upload: {rm}");
                    }
                }
                return Err(e);
            }
        };

        tracing::info!(name = %file_name, bytes = written, "stored upload");
    }

    Ok("success")
}

async fn store_field(
    field: &mut Field<'_>,
    partial: &FsPath,
    path: &FsPath,
) -> Result<u64, AppError> {
    let mut file = tokio::fs::File::create(partial).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    drop(file);

    tokio::fs::rename(partial, path).await?;
    Ok(written)
}

pub async fn download(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, AppError> {
    let path = stored_path(state.uploads_dir(), &filename)?;

    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!(name = %filename, "download failed: {e}");
            return Err(AppError::FileNotFound);
        }
    };
    if !file.metadata().await.map(|m| m.is_file()).unwrap_or(false) {
        return Err(AppError::FileNotFound);
    }

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (header::CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}

/// Builds `attachment; filename="..."; filename*=UTF-8''...` for `name`.
fn attachment_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let mut encoded = String::with_capacity(name.len());
    for byte in name.bytes() {
        if byte.is_ascii_alphanumeric() || b"!#$&+-.^_`|~".contains(&byte) {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }

    format!("attachment; filename=\"{fallback}\"; filename*=UTF-8''{encoded}")
}

/// Renames a stored file, keeping its extension.
///
/// The body is JSON `{"newName": "..."}`; a missing, empty or unparsable
/// body is rejected before the file system is touched.
pub async fn rename(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    body: Bytes,
) -> Result<String, AppError> {
    let request: RenameRequest = serde_json::from_slice(&body).unwrap_or_default();
    let new_name = request
        .new_name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| AppError::BadRequest("New filename is required".to_string()))?;

    let renamed = rename_keep_extension(state.uploads_dir(), &filename, &new_name)?;
    tracing::info!(from = %filename, to = %renamed, "renamed file");

    Ok(format!("file renamed from {filename} to {renamed}"))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<String, AppError> {
    delete_stored_file(state.uploads_dir(), &filename)?;
    tracing::info!(name = %filename, "deleted file");
    Ok(format!("this file deleted: {filename}"))
}
