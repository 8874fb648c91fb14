//! Preview cache settings.
//!
//! All fields have defaults so an empty `[preview]` table (or none at all)
//! yields 300×300 JPEG previews at quality 85, keyed by file name.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How cached previews are looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheKey {
    /// `previews/<name>`; never invalidated once written.
    #[default]
    Filename,
    /// `previews/<sha256>.jpg` over the source bytes and render settings.
    ContentHash,
}

impl FromStr for CacheKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "filename" => Ok(CacheKey::Filename),
            "content-hash" => Ok(CacheKey::ContentHash),
            other => Err(CoreError::InvalidConfig(format!("unknown cache key: {other}"))),
        }
    }
}

/// Preview rendering and caching configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewSettings {
    /// Edge length of the square preview box, in pixels.
    #[serde(default = "default_size")]
    pub size: u32,
    /// JPEG quality, 1-100.
    #[serde(default = "default_quality")]
    pub quality: u8,
    #[serde(default)]
    pub cache_key: CacheKey,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            size: default_size(),
            quality: default_quality(),
            cache_key: CacheKey::default(),
        }
    }
}

impl PreviewSettings {
    /// Returns a copy with `size` and `quality` clamped to usable ranges.
    pub fn normalized(self) -> Self {
        Self {
            size: self.size.max(1),
            quality: self.quality.clamp(1, 100),
            ..self
        }
    }
}

fn default_size() -> u32 {
    300
}

fn default_quality() -> u8 {
    85
}
