use picstore_core::Resolution;
use serde::{Deserialize, Serialize};

/// One listing row, serialized as `[name, size, resolution]`.
#[derive(Debug, Serialize)]
pub struct FileRowDto(pub String, pub String, pub ResolutionDto);

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResolutionDto {
    Ok(Resolution),
    Failed { error: String },
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum PreviewDto {
    Ok {
        name: String,
        /// Base64 of the JPEG preview.
        #[serde(rename = "previewImage")]
        preview_image: String,
    },
    Failed {
        name: String,
        error: String,
    },
}

#[derive(Debug, Default, Deserialize)]
pub struct RenameRequest {
    #[serde(rename = "newName", default)]
    pub new_name: Option<String>,
}
