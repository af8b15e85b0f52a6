//! Generation model configuration served by the backend.
//!
//! The backend publishes one entry per provider. Providers exposing several
//! underlying models nest them under `models`; model order is preserved
//! because the first model is the default when none is selected.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub const fn square(side: u32) -> Self {
        Self::new(side, side)
    }
}

/// Settings of one generation model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Largest width or height accepted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_resolution: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_resolution: Option<Resolution>,
    /// Aspect ratio tokens such as `16:9`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub aspect_ratios: Vec<String>,
    /// Output formats such as `PNG`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub formats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
    pub supports_negative_prompt: bool,
    pub supports_cfg_scale: bool,
    pub supports_seed: bool,
    pub supports_style_preset: bool,
}

/// Configuration entry of one provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderEntry {
    /// Per-model settings for multi-model providers
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub models: IndexMap<String, ModelConfig>,
    /// Provider-level settings (the only settings of single-model providers)
    #[serde(flatten)]
    pub config: ModelConfig,
}

impl ProviderEntry {
    pub fn single(config: ModelConfig) -> Self {
        Self {
            models: IndexMap::new(),
            config,
        }
    }

    pub fn multi(models: impl IntoIterator<Item = (String, ModelConfig)>) -> Self {
        Self {
            models: models.into_iter().collect(),
            config: ModelConfig::default(),
        }
    }

    pub fn is_multi_model(&self) -> bool {
        !self.models.is_empty()
    }

    /// Id of the first model, the default when none is selected.
    pub fn first_model_id(&self) -> Option<&str> {
        self.models.keys().next().map(String::as_str)
    }

    /// Settings for `model_id`.
    ///
    /// Multi-model providers fall back to their first model when `model_id`
    /// is missing or unknown; single-model providers ignore it.
    pub fn resolve_model(&self, model_id: Option<&str>) -> &ModelConfig {
        if !self.is_multi_model() {
            return &self.config;
        }
        model_id
            .and_then(|id| self.models.get(id))
            .or_else(|| self.models.values().next())
            .unwrap_or(&self.config)
    }
}

/// Full configuration table, keyed by provider id in backend order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenerationModelConfig {
    providers: IndexMap<String, ProviderEntry>,
}

impl GenerationModelConfig {
    pub fn new(providers: impl IntoIterator<Item = (String, ProviderEntry)>) -> Self {
        Self {
            providers: providers.into_iter().collect(),
        }
    }

    pub fn provider(&self, provider_id: &str) -> Option<&ProviderEntry> {
        self.providers.get(provider_id)
    }

    pub fn provider_ids(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> GenerationModelConfig {
        serde_json::from_value(json!({
            "pollinations": {
                "name": "Pollinations.ai",
                "max_resolution": 2048,
                "default_resolution": {"width": 1024, "height": 1024},
                "aspect_ratios": ["1:1", "16:9"],
                "formats": ["PNG"],
                "default_format": "PNG",
                "supports_style_preset": true
            },
            "huggingface": {
                "models": {
                    "flux-schnell": {
                        "name": "FLUX.1 Schnell",
                        "max_resolution": 1024,
                        "default_resolution": {"width": 1024, "height": 1024},
                        "aspect_ratios": ["1:1"]
                    },
                    "stable-diffusion-xl": {
                        "name": "Stable Diffusion XL",
                        "max_resolution": 1024,
                        "default_resolution": {"width": 768, "height": 768},
                        "aspect_ratios": ["1:1", "3:4", "4:3"]
                    }
                }
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_single_and_multi_model_entries() {
        let config = sample();
        assert_eq!(
            config.provider_ids().collect::<Vec<_>>(),
            vec!["pollinations", "huggingface"]
        );

        let pollinations = config.provider("pollinations").unwrap();
        assert!(!pollinations.is_multi_model());
        assert_eq!(pollinations.config.max_resolution, Some(2048));
        assert!(pollinations.config.supports_style_preset);
        assert!(!pollinations.config.supports_seed);

        let hf = config.provider("huggingface").unwrap();
        assert!(hf.is_multi_model());
        assert_eq!(hf.first_model_id(), Some("flux-schnell"));
    }

    #[test]
    fn resolve_model_falls_back_to_first_model() {
        let config = sample();
        let hf = config.provider("huggingface").unwrap();
        assert_eq!(
            hf.resolve_model(Some("stable-diffusion-xl")).default_resolution,
            Some(Resolution::square(768))
        );
        assert_eq!(
            hf.resolve_model(Some("unknown")).name.as_deref(),
            Some("FLUX.1 Schnell")
        );
        assert_eq!(hf.resolve_model(None).name.as_deref(), Some("FLUX.1 Schnell"));

        let pollinations = config.provider("pollinations").unwrap();
        assert_eq!(
            pollinations.resolve_model(Some("flux")).name.as_deref(),
            Some("Pollinations.ai")
        );
    }
}
