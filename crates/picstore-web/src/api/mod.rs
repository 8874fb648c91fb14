pub mod files;
pub mod images;

use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application: routes, CORS, body limit and tracing.
///
/// Every route also answers unknown methods with the 404 fallback so that
/// any request not mapped to an operation gets `path not found`.
pub fn router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes();

    Router::new()
        .route(
            "/",
            get(files::list_files).post(files::upload).fallback(fallback),
        )
        .route("/images", get(images::list_previews).fallback(fallback))
        .route("/image/{image_name}", get(images::raw_image).fallback(fallback))
        .route("/download/{filename}", get(files::download).fallback(fallback))
        .route("/rename/{filename}", put(files::rename).fallback(fallback))
        .route("/{filename}", delete(files::delete).fallback(fallback))
        .fallback(fallback)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "path not found")
}
