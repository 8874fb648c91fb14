use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::future::join_all;
use picstore_core::{detect_format, list_stored_files, stored_path, CoreError};
use tokio_util::io::ReaderStream;

use crate::dto::PreviewDto;
use crate::error::AppError;
use crate::state::AppState;

/// Returns a preview for every stored file, generating missing ones.
///
/// Previews are produced concurrently and returned in listing order.
pub async fn list_previews(
    State(state): State<AppState>,
) -> Result<Json<Vec<PreviewDto>>, AppError> {
    let dir = state.uploads_dir().clone();
    let files = tokio::task::spawn_blocking(move || list_stored_files(&dir))
        .await
        .map_err(|e| AppError::Internal(format!("listing task failed: {e}")))??;
    let isolate = state.config.listing.isolate_failures;

    let previews = &state.previews;
    let results = join_all(files.iter().map(|file| async move {
        (file.name(), previews.get_or_create(file.name()).await)
    }))
    .await;

    let mut items = Vec::with_capacity(results.len());
    for (name, result) in results {
        match result {
            Ok(bytes) => items.push(PreviewDto::Ok {
                name: name.to_string(),
                preview_image: STANDARD.encode(bytes),
            }),
            Err(e) if isolate => {
                tracing::warn!(name, "preview failed: {e}");
                items.push(PreviewDto::Failed {
                    name: name.to_string(),
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    }

    Ok(Json(items))
}

/// Streams an original with a content type sniffed from its bytes.
pub async fn raw_image(
    State(state): State<AppState>,
    Path(image_name): Path<String>,
) -> Result<Response, AppError> {
    let path = stored_path(state.uploads_dir(), &image_name)?;

    let format = match detect_format(&path) {
        Ok(format) => format,
        Err(CoreError::UnknownFormat(_)) => {
            return Err(AppError::Internal("Error getting image type".to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let file = tokio::fs::File::open(&path).await?;

    Ok((
        [(header::CONTENT_TYPE, format.to_mime_type())],
        Body::from_stream(ReaderStream::new(file)),
    )
        .into_response())
}
