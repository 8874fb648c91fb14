use std::path::PathBuf;
use std::sync::Arc;

use picstore_core::PreviewCache;

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub previews: Arc<PreviewCache>,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let previews = PreviewCache::new(
            config.storage.uploads_dir.clone(),
            config.storage.previews_dir.clone(),
            config.preview.clone(),
        );
        Self {
            config: Arc::new(config),
            previews: Arc::new(previews),
        }
    }

    pub fn uploads_dir(&self) -> &PathBuf {
        &self.config.storage.uploads_dir
    }
}
