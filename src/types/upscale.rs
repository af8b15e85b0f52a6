//! Upscale request and response types.

use serde::{Deserialize, Serialize};

use super::gallery::ImageId;
use super::model_config::Resolution;
use crate::error::{ClientError, Result};

/// Scale factors the backend accepts.
pub const SUPPORTED_SCALES: [u8; 2] = [2, 4];

/// Body of an upscale request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpscaleRequest {
    pub image_id: ImageId,
    pub scale: u8,
}

impl UpscaleRequest {
    pub fn new(image_id: ImageId, scale: u8) -> Result<Self> {
        if !SUPPORTED_SCALES.contains(&scale) {
            return Err(ClientError::InvalidParameter(
                "scale must be 2 or 4".to_string(),
            ));
        }
        Ok(Self { image_id, scale })
    }

    /// Default 2x upscale.
    pub fn double(image_id: ImageId) -> Self {
        Self { image_id, scale: 2 }
    }

    /// Question asked before starting the upscale.
    pub fn confirmation_prompt(&self) -> String {
        format!(
            "Upscale this image to {}x resolution? This will take 10-15 seconds.",
            self.scale
        )
    }
}

/// Backend answer to an upscale request (success or failure).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpscaleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub original_id: Option<ImageId>,
    #[serde(default)]
    pub upscaled_id: Option<ImageId>,
    /// `WxH`
    #[serde(default)]
    pub original_resolution: Option<String>,
    /// `WxH`
    #[serde(default)]
    pub new_resolution: Option<String>,
    #[serde(default)]
    pub scale: Option<u8>,
    /// Seconds spent on the backend
    #[serde(default)]
    pub processing_time: Option<f64>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl UpscaleResponse {
    pub fn new_resolution(&self) -> Option<Resolution> {
        self.new_resolution.as_deref().and_then(parse_resolution)
    }
}

/// Parse a `WxH` resolution string.
pub fn parse_resolution(value: &str) -> Option<Resolution> {
    let (w, h) = value.trim().split_once(['x', 'X'])?;
    Some(Resolution::new(w.trim().parse().ok()?, h.trim().parse().ok()?))
}
