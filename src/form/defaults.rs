//! Form defaults derived from the backend model configuration.

use crate::capabilities::{DEFAULT_PROVIDER, ids};
use crate::defaults::gallery::OUTPUT_FORMAT;
use crate::form::AspectRatio;
use crate::types::{GenerationModelConfig, ModelConfig, ProviderEntry, Resolution};

const DEFAULT_ASPECT_RATIO: &str = "1:1";

/// One `<option>` of a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub label: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>, selected: bool) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            selected,
        }
    }
}

/// Default values and option lists for the active provider/model.
#[derive(Debug, Clone, PartialEq)]
pub struct FormDefaults {
    pub resolution: Resolution,
    /// Upper bound of both width and height inputs
    pub max_resolution: Option<u32>,
    pub aspect_ratios: Vec<SelectOption>,
    pub formats: Vec<SelectOption>,
}

impl FormDefaults {
    /// Derive defaults for `provider_id` / `model_id`.
    ///
    /// Unknown providers use the default provider's entry. Returns `None`
    /// (and logs) when the entry is missing or has no default resolution.
    pub fn derive(
        config: &GenerationModelConfig,
        provider_id: &str,
        model_id: Option<&str>,
    ) -> Option<Self> {
        let Some(entry) = config
            .provider(provider_id)
            .or_else(|| config.provider(DEFAULT_PROVIDER))
        else {
            tracing::warn!(
                "Invalid config for {} {}",
                provider_id,
                model_id.unwrap_or_default()
            );
            return None;
        };

        let model = entry.resolve_model(model_id);
        let Some(resolution) = model.default_resolution else {
            tracing::warn!(
                "Invalid config for {} {}",
                provider_id,
                model_id.unwrap_or_default()
            );
            return None;
        };

        let aspect_ratios = first_non_empty(model, entry, |c| &c.aspect_ratios)
            .map(|tokens| tokens.to_vec())
            .unwrap_or_else(|| vec![DEFAULT_ASPECT_RATIO.to_string()])
            .into_iter()
            .map(|token| {
                let selected = token == DEFAULT_ASPECT_RATIO;
                SelectOption::new(token.clone(), AspectRatio::label(&token), selected)
            })
            .collect();

        let default_format = model
            .default_format
            .as_deref()
            .or(entry.config.default_format.as_deref());
        let formats = first_non_empty(model, entry, |c| &c.formats)
            .map(|formats| formats.to_vec())
            .unwrap_or_else(|| vec![OUTPUT_FORMAT.to_string()])
            .into_iter()
            .map(|format| {
                let selected = default_format == Some(format.as_str());
                SelectOption::new(format.clone(), format, selected)
            })
            .collect();

        Some(Self {
            resolution,
            max_resolution: model.max_resolution.or(entry.config.max_resolution),
            aspect_ratios,
            formats,
        })
    }

    /// Value of the preselected aspect-ratio option.
    pub fn selected_aspect_ratio(&self) -> Option<&str> {
        selected_value(&self.aspect_ratios)
    }

    pub fn selected_format(&self) -> Option<&str> {
        selected_value(&self.formats)
    }

    /// Base resolution used by aspect-ratio derivation.
    pub fn base_resolution(&self) -> u32 {
        self.resolution.width.max(self.resolution.height)
    }
}

fn first_non_empty<'a>(
    model: &'a ModelConfig,
    entry: &'a ProviderEntry,
    field: impl Fn(&'a ModelConfig) -> &'a Vec<String>,
) -> Option<&'a [String]> {
    [field(model), field(&entry.config)]
        .into_iter()
        .find(|values| !values.is_empty())
        .map(Vec::as_slice)
}

fn selected_value(options: &[SelectOption]) -> Option<&str> {
    options
        .iter()
        .find(|option| option.selected)
        .map(|option| option.value.as_str())
}

/// Model selector options of `provider_id`, labelled by model name.
///
/// The provider's preferred model is preselected when present, otherwise the
/// first model.
pub fn model_options(config: &GenerationModelConfig, provider_id: &str) -> Vec<SelectOption> {
    let Some(entry) = config.provider(provider_id) else {
        return Vec::new();
    };
    let preferred = ids::preferred_model(provider_id)
        .filter(|model| entry.models.contains_key(*model))
        .or(entry.first_model_id());

    entry
        .models
        .iter()
        .map(|(id, model)| {
            let label = model.name.clone().unwrap_or_else(|| id.clone());
            SelectOption::new(id.clone(), label, Some(id.as_str()) == preferred)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config() -> GenerationModelConfig {
        serde_json::from_value(json!({
            "pollinations": {
                "name": "Pollinations.ai",
                "max_resolution": 2048,
                "default_resolution": {"width": 1024, "height": 1024},
                "aspect_ratios": ["1:1", "16:9", "9:16"],
                "formats": ["PNG", "JPEG"],
                "default_format": "JPEG"
            },
            "gemini": {
                "name": "Gemini",
                "default_resolution": {"width": 1024, "height": 1024}
            },
            "huggingface": {
                "aspect_ratios": ["1:1", "4:3"],
                "formats": ["PNG", "WEBP"],
                "models": {
                    "flux-schnell": {
                        "name": "FLUX.1 Schnell",
                        "max_resolution": 1024,
                        "default_resolution": {"width": 1024, "height": 1024},
                        "aspect_ratios": ["1:1", "16:9"]
                    },
                    "sdxl-lightning": {
                        "name": "SDXL Lightning",
                        "default_resolution": {"width": 768, "height": 768}
                    }
                }
            },
            "broken": {"name": "No defaults"}
        }))
        .unwrap()
    }

    #[test]
    fn single_model_provider_defaults() {
        let defaults = FormDefaults::derive(&config(), "pollinations", None).unwrap();
        assert_eq!(defaults.resolution, Resolution::square(1024));
        assert_eq!(defaults.max_resolution, Some(2048));
        assert_eq!(defaults.selected_aspect_ratio(), Some("1:1"));
        assert_eq!(defaults.aspect_ratios[1].label, "16:9 (Landscape)");
        assert_eq!(defaults.selected_format(), Some("JPEG"));
    }

    #[test]
    fn model_lists_fall_back_to_provider_then_builtin() {
        let config = config();
        let flux = FormDefaults::derive(&config, "huggingface", Some("flux-schnell")).unwrap();
        let ratios: Vec<_> = flux.aspect_ratios.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(ratios, vec!["1:1", "16:9"]);

        let lightning =
            FormDefaults::derive(&config, "huggingface", Some("sdxl-lightning")).unwrap();
        let ratios: Vec<_> = lightning.aspect_ratios.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(ratios, vec!["1:1", "4:3"]);
        assert_eq!(lightning.resolution, Resolution::square(768));
        assert_eq!(lightning.max_resolution, None);

        let gemini = FormDefaults::derive(&config, "gemini", None).unwrap();
        assert_eq!(gemini.aspect_ratios, vec![SelectOption::new("1:1", "1:1 (Square)", true)]);
        assert_eq!(gemini.formats, vec![SelectOption::new("PNG", "PNG", false)]);
    }

    #[test]
    fn unknown_model_uses_first_model() {
        let defaults = FormDefaults::derive(&config(), "huggingface", Some("nope")).unwrap();
        assert_eq!(defaults.max_resolution, Some(1024));
    }

    #[test]
    fn unknown_provider_uses_default_provider() {
        let defaults = FormDefaults::derive(&config(), "midjourney", None).unwrap();
        assert_eq!(defaults.max_resolution, Some(2048));
    }

    #[test]
    fn missing_default_resolution_yields_nothing() {
        assert!(FormDefaults::derive(&config(), "broken", None).is_none());
        assert!(FormDefaults::derive(&GenerationModelConfig::default(), "gemini", None).is_none());
    }

    #[test]
    fn model_options_preselect_preferred_model() {
        let options = model_options(&config(), "huggingface");
        assert_eq!(
            options,
            vec![
                SelectOption::new("flux-schnell", "FLUX.1 Schnell", false),
                SelectOption::new("sdxl-lightning", "SDXL Lightning", true),
            ]
        );
        assert!(model_options(&config(), "gemini").is_empty());
        assert!(model_options(&config(), "unknown").is_empty());
    }
}
