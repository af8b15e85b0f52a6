//! Generation form and response types.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::gallery::{GalleryImage, ImageId};
use crate::capabilities::{ProviderCapabilities, ids};
use crate::defaults::gallery::OUTPUT_FORMAT;

/// Values submitted by the generation form.
///
/// Converted to form-encoded fields by [`GenerationForm::form_fields`].
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct GenerationForm {
    #[validate(custom(function = "validate_prompt"))]
    pub prompt: String,
    pub provider: String,
    pub hf_model: Option<String>,
    pub subnp_model: Option<String>,
    pub pollinations_model: Option<String>,
    pub negative_prompt: Option<String>,
    #[validate(range(min = 1, message = "Width must be a positive number of pixels"))]
    pub width: u32,
    #[validate(range(min = 1, message = "Height must be a positive number of pixels"))]
    pub height: u32,
    pub aspect_ratio: Option<String>,
    pub output_format: Option<String>,
    pub seed: Option<u64>,
    pub cfg_scale: Option<f32>,
    pub style_preset: Option<String>,
    /// Value of the form's hidden CSRF field
    pub csrf_token: Option<String>,
}

fn validate_prompt(prompt: &str) -> Result<(), ValidationError> {
    if prompt.trim().chars().count() < 3 {
        return Err(ValidationError::new("prompt_too_short")
            .with_message("Prompt must be at least 3 characters long".into()));
    }
    Ok(())
}

impl GenerationForm {
    pub fn new(provider: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            provider: provider.into(),
            width: 1024,
            height: 1024,
            ..Default::default()
        }
    }

    /// Drop the fields the selected provider/model does not accept.
    pub fn restrict_to(mut self, capabilities: &ProviderCapabilities) -> Self {
        if !capabilities.supports_negative_prompt {
            self.negative_prompt = None;
        }
        if !capabilities.supports_seed {
            self.seed = None;
        }
        if !capabilities.supports_cfg_scale {
            self.cfg_scale = None;
        }
        self
    }

    /// Model chosen in the selector of the submitted provider.
    pub fn selected_model(&self) -> Option<&str> {
        let model = match self.provider.as_str() {
            ids::HUGGINGFACE => &self.hf_model,
            ids::SUBNP => &self.subnp_model,
            ids::POLLINATIONS => &self.pollinations_model,
            _ => return None,
        };
        model.as_deref().filter(|m| !m.is_empty())
    }

    /// Set the model field of the submitted provider; ignored for providers
    /// without a model selector.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        let model = Some(model.into());
        match self.provider.as_str() {
            ids::HUGGINGFACE => self.hf_model = model,
            ids::SUBNP => self.subnp_model = model,
            ids::POLLINATIONS => self.pollinations_model = model,
            _ => {}
        }
        self
    }

    /// Output format, defaulting to PNG.
    pub fn output_format_or_default(&self) -> &str {
        self.output_format
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(OUTPUT_FORMAT)
    }

    /// Form-encoded body fields; unset optional fields are omitted.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("prompt", self.prompt.clone()),
            ("provider", self.provider.clone()),
            ("width", self.width.to_string()),
            ("height", self.height.to_string()),
        ];

        let optional = [
            ("hf_model", self.hf_model.clone()),
            ("subnp_model", self.subnp_model.clone()),
            ("pollinations_model", self.pollinations_model.clone()),
            ("negative_prompt", self.negative_prompt.clone()),
            ("aspect_ratio", self.aspect_ratio.clone()),
            ("output_format", self.output_format.clone()),
            ("seed", self.seed.map(|s| s.to_string())),
            ("cfg_scale", self.cfg_scale.map(|c| c.to_string())),
            ("style_preset", self.style_preset.clone()),
            (
                crate::defaults::csrf::FORM_FIELD,
                self.csrf_token.clone(),
            ),
        ];
        fields.extend(
            optional
                .into_iter()
                .filter_map(|(name, value)| value.filter(|v| !v.is_empty()).map(|v| (name, v))),
        );
        fields
    }
}

/// Successful generation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResponse {
    /// Present only when the backend stored the image
    #[serde(default)]
    pub id: Option<ImageId>,
    pub prompt: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub aspect_ratio: Option<String>,
    #[serde(default)]
    pub output_format: Option<String>,
    pub image_base64: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default)]
    pub created_at: Option<String>,
    /// e.g. "Image generated but not saved to database"
    #[serde(default)]
    pub warning: Option<String>,
}

fn default_content_type() -> String {
    "image/png".to_string()
}

/// Contents of the single-result preview panel.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPreview {
    pub data_url: String,
    pub prompt: String,
    pub model: String,
    pub provider: String,
    pub width: u32,
    pub height: u32,
    pub format: String,
    pub warning: Option<String>,
}

impl GenerationPreview {
    pub fn new(response: &GenerationResponse, form: &GenerationForm) -> Self {
        Self {
            data_url: format!(
                "data:{};base64,{}",
                response.content_type, response.image_base64
            ),
            prompt: response.prompt.clone(),
            model: response.model_used.clone(),
            provider: response.provider.clone(),
            width: form.width,
            height: form.height,
            format: form.output_format_or_default().to_string(),
            warning: response.warning.clone(),
        }
    }
}

impl GalleryImage {
    /// Gallery entry for a stored generation; `None` when the backend did
    /// not return an id.
    pub fn from_generation(response: &GenerationResponse, form: &GenerationForm) -> Option<Self> {
        let id = response.id?;
        Some(Self {
            id,
            image_data: response.image_base64.clone(),
            prompt: response.prompt.clone(),
            model_used: response.model_used.clone(),
            width: Some(form.width),
            height: Some(form.height),
            output_format: form.output_format_or_default().to_string(),
            style_preset: form.style_preset.clone().filter(|s| !s.is_empty()),
            is_favorite: false,
        })
    }
}

/// Body of a favorite toggle request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteToggleRequest {
    pub image_id: ImageId,
}

/// Backend answer to a favorite toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteToggleResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub error: Option<String>,
}
