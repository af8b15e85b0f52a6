//! Gallery image record and its presentation helpers.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize};

use crate::defaults::gallery::{OUTPUT_FORMAT, PROMPT_EXCERPT_CHARS};
use crate::error::{ClientError, Result};

/// Backend identifier of a stored image.
pub type ImageId = i64;

/// A previously generated image held in the gallery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub id: ImageId,
    /// Base64-encoded pixel data
    pub image_data: String,
    pub prompt: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub width: Option<u32>,
    #[serde(default, deserialize_with = "lenient_dimension")]
    pub height: Option<u32>,
    #[serde(default = "default_output_format")]
    pub output_format: String,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub style_preset: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
}

fn default_output_format() -> String {
    OUTPUT_FORMAT.to_string()
}

/// Dimensions embedded by the server template may be numbers, numeric
/// strings, empty strings or null.
fn lenient_dimension<'de, D>(deserializer: D) -> std::result::Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => Some(n),
        Some(Raw::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

fn empty_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Data shown in the image detail modal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDetails {
    pub prompt: String,
    pub model: String,
    pub resolution_label: String,
    pub format: String,
    /// `None` hides the style preset row
    pub style_preset: Option<String>,
    pub data_url: String,
}

impl GalleryImage {
    /// Lowercase format, used for MIME types and file extensions.
    pub fn format_extension(&self) -> String {
        let format = if self.output_format.trim().is_empty() {
            OUTPUT_FORMAT
        } else {
            self.output_format.trim()
        };
        format.to_lowercase()
    }

    pub fn data_url(&self) -> String {
        format!(
            "data:image/{};base64,{}",
            self.format_extension(),
            self.image_data
        )
    }

    /// Prompt shortened for gallery cards.
    pub fn prompt_excerpt(&self) -> String {
        let mut chars = self.prompt.chars();
        let head: String = chars.by_ref().take(PROMPT_EXCERPT_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }

    pub fn favorite_glyph(&self) -> &'static str {
        if self.is_favorite { "⭐" } else { "☆" }
    }

    pub fn favorite_title(&self) -> &'static str {
        if self.is_favorite {
            "Remove from favorites"
        } else {
            "Add to favorites"
        }
    }

    pub fn download_filename(&self) -> String {
        format!("image_{}.{}", self.id, self.format_extension())
    }

    /// Raw image bytes for downloads.
    pub fn decode_bytes(&self) -> Result<Vec<u8>> {
        STANDARD.decode(self.image_data.trim()).map_err(|e| {
            ClientError::ParseError(format!("Invalid image data for image {}: {e}", self.id))
        })
    }

    pub fn resolution_label(&self) -> String {
        let dim = |d: Option<u32>| d.map_or_else(|| "Unknown".to_string(), |v| v.to_string());
        format!("{} × {} px", dim(self.width), dim(self.height))
    }

    pub fn details(&self) -> ImageDetails {
        ImageDetails {
            prompt: self.prompt.clone(),
            model: self.model_used.clone(),
            resolution_label: self.resolution_label(),
            format: self.output_format.clone(),
            style_preset: self.style_preset.clone(),
            data_url: self.data_url(),
        }
    }
}
