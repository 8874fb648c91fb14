use std::net::SocketAddr;
use std::path::PathBuf;

use picstore_core::PreviewSettings;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: SocketAddr,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub preview: PreviewSettings,
    #[serde(default)]
    pub listing: ListingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
    #[serde(default = "default_previews_dir")]
    pub previews_dir: PathBuf,
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingConfig {
    /// Report failing files per entry instead of failing the whole listing.
    #[serde(default)]
    pub isolate_failures: bool,
}

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 2300))
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("./uploads")
}

fn default_previews_dir() -> PathBuf {
    PathBuf::from("./previews")
}

fn default_max_upload_size_mb() -> usize { 100 }

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_uploads_dir(),
            previews_dir: default_previews_dir(),
            max_upload_size_mb: default_max_upload_size_mb(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            storage: StorageConfig::default(),
            preview: PreviewSettings::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        self.storage.max_upload_size_mb.saturating_mul(1024 * 1024)
    }

    /// Reads `PICSTORE_CONFIG` (TOML) if set, then applies `PICSTORE_*`
    /// environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var("PICSTORE_CONFIG") {
            Ok(path) => {
                let contents = std::fs::read_to_string(&path)?;
                toml::from_str(&contents)?
            }
            Err(_) => ServerConfig::default(),
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.preview = config.preview.normalized();
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> anyhow::Result<()> {
        if let Some(addr) = var("PICSTORE_BIND_ADDR") {
            self.bind_addr = addr.parse()?;
        }

        if let Some(dir) = var("PICSTORE_UPLOADS_DIR") {
            self.storage.uploads_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var("PICSTORE_PREVIEWS_DIR") {
            self.storage.previews_dir = PathBuf::from(dir);
        }

        if let Some(val) = var("PICSTORE_MAX_UPLOAD_SIZE_MB") {
            if let Ok(mb) = val.parse::<usize>() {
                self.storage.max_upload_size_mb = mb;
            } else {
                tracing::warn!("Ignoring invalid PICSTORE_MAX_UPLOAD_SIZE_MB: {val}");
            }
        }

        if let Some(val) = var("PICSTORE_PREVIEW_SIZE") {
            self.preview.size = val.parse()?;
        }
        if let Some(val) = var("PICSTORE_PREVIEW_QUALITY") {
            self.preview.quality = val.parse()?;
        }
        if let Some(val) = var("PICSTORE_PREVIEW_CACHE_KEY") {
            self.preview.cache_key = val.parse()?;
        }

        if let Some(val) = var("PICSTORE_ISOLATE_FAILURES") {
            self.listing.isolate_failures = matches!(val.as_str(), "1" | "true" | "yes");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picstore_core::CacheKey;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_original_layout() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr.port(), 2300);
        assert_eq!(config.storage.uploads_dir, PathBuf::from("./uploads"));
        assert_eq!(config.storage.previews_dir, PathBuf::from("./previews"));
        assert_eq!(config.preview.size, 300);
        assert_eq!(config.preview.quality, 85);
        assert!(!config.listing.isolate_failures);
    }

    #[test]
    fn parses_partial_toml() {
        let config: ServerConfig = toml::from_str(
            r#"
            bind_addr = "127.0.0.1:8080"

            [storage]
            uploads_dir = "/srv/pics"

            [listing]
            isolate_failures = true
            "#,
        )
        .unwrap();

        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.storage.uploads_dir, PathBuf::from("/srv/pics"));
        assert_eq!(config.storage.previews_dir, PathBuf::from("./previews"));
        assert_eq!(config.storage.max_upload_size_mb, 100);
        assert!(config.listing.isolate_failures);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[
                ("PICSTORE_BIND_ADDR", "127.0.0.1:9000"),
                ("PICSTORE_UPLOADS_DIR", "/data/up"),
                ("PICSTORE_PREVIEW_SIZE", "128"),
                ("PICSTORE_PREVIEW_CACHE_KEY", "content-hash"),
                ("PICSTORE_ISOLATE_FAILURES", "true"),
            ]))
            .unwrap();

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.storage.uploads_dir, PathBuf::from("/data/up"));
        assert_eq!(config.preview.size, 128);
        assert_eq!(config.preview.cache_key, CacheKey::ContentHash);
        assert!(config.listing.isolate_failures);
    }

    #[test]
    fn invalid_bind_addr_is_an_error() {
        let mut config = ServerConfig::default();
        assert!(config
            .apply_env(env(&[("PICSTORE_BIND_ADDR", "not-an-addr")]))
            .is_err());
    }

    #[test]
    fn invalid_upload_size_is_ignored() {
        let mut config = ServerConfig::default();
        config
            .apply_env(env(&[("PICSTORE_MAX_UPLOAD_SIZE_MB", "lots")]))
            .unwrap();
        assert_eq!(config.storage.max_upload_size_mb, 100);
        assert_eq!(config.max_upload_bytes(), 100 * 1024 * 1024);
    }
}
