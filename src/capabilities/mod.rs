//! Provider capability table and resolver.
//!
//! Capabilities describe which optional generation parameters a provider (or,
//! for multi-model providers, a specific model) accepts. The table is static:
//! it never depends on server or user state.
//!
//! Resolution never fails. Unknown providers resolve to the default provider
//! ([`DEFAULT_PROVIDER`]); unknown or missing models of a multi-model provider
//! resolve to that provider's default model.
//!
//! ```rust,ignore
//! use openimage_client::capabilities::resolve;
//!
//! let caps = resolve("huggingface", Some("stable-diffusion-xl"));
//! assert!(caps.supports_negative_prompt && caps.supports_seed);
//! ```

pub mod ids;

use std::collections::HashMap;

/// Optional parameters accepted by a provider/model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ProviderCapabilities {
    pub supports_negative_prompt: bool,
    pub supports_cfg_scale: bool,
    pub supports_seed: bool,
    pub supports_style_preset: bool,
}

impl ProviderCapabilities {
    /// No optional parameter supported.
    pub const fn new() -> Self {
        Self {
            supports_negative_prompt: false,
            supports_cfg_scale: false,
            supports_seed: false,
            supports_style_preset: false,
        }
    }

    /// Every optional parameter supported.
    pub const fn all() -> Self {
        Self {
            supports_negative_prompt: true,
            supports_cfg_scale: true,
            supports_seed: true,
            supports_style_preset: true,
        }
    }

    pub const fn with_negative_prompt(mut self) -> Self {
        self.supports_negative_prompt = true;
        self
    }
    pub const fn with_cfg_scale(mut self) -> Self {
        self.supports_cfg_scale = true;
        self
    }
    pub const fn with_seed(mut self) -> Self {
        self.supports_seed = true;
        self
    }
    pub const fn with_style_preset(mut self) -> Self {
        self.supports_style_preset = true;
        self
    }
}

/// Capability entry of one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityEntry {
    Single(ProviderCapabilities),
    /// Per-model capabilities; `default_model` must be a key of `models`
    MultiModel {
        default_model: &'static str,
        models: HashMap<&'static str, ProviderCapabilities>,
    },
}

impl CapabilityEntry {
    fn resolve(&self, model_id: Option<&str>) -> ProviderCapabilities {
        match self {
            Self::Single(caps) => *caps,
            Self::MultiModel {
                default_model,
                models,
            } => model_id
                .and_then(|id| models.get(id))
                .or_else(|| models.get(default_model))
                .copied()
                .unwrap_or_default(),
        }
    }
}

/// Provider used when an unknown provider id is resolved.
pub const DEFAULT_PROVIDER: &str = ids::POLLINATIONS;

lazy_static::lazy_static! {
    static ref CAPABILITY_TABLE: HashMap<&'static str, CapabilityEntry> = {
        use CapabilityEntry::{MultiModel, Single};
        use ids::*;

        let mut table = HashMap::new();
        table.insert(POLLINATIONS, Single(ProviderCapabilities::new()));
        table.insert(GEMINI, Single(ProviderCapabilities::new().with_style_preset()));
        table.insert(
            HUGGINGFACE,
            MultiModel {
                default_model: huggingface::FLUX_SCHNELL,
                models: HashMap::from([
                    (
                        huggingface::FLUX_SCHNELL,
                        ProviderCapabilities::new().with_style_preset(),
                    ),
                    (huggingface::STABLE_DIFFUSION_XL, ProviderCapabilities::all()),
                    (huggingface::STABLE_DIFFUSION_3, ProviderCapabilities::all()),
                ]),
            },
        );
        table.insert(
            SUBNP,
            MultiModel {
                default_model: subnp::MAGIC,
                models: HashMap::from([(subnp::MAGIC, ProviderCapabilities::new())]),
            },
        );
        table.insert(
            DEEPAI,
            Single(
                ProviderCapabilities::new()
                    .with_negative_prompt()
                    .with_style_preset(),
            ),
        );
        table.insert(RUNWARE, Single(ProviderCapabilities::all()));
        table.insert(REPLICATE, Single(ProviderCapabilities::all()));
        table.insert(STABILITY, Single(ProviderCapabilities::all()));
        table
    };
}

/// Resolve the capabilities of `provider_id` (and `model_id` for
/// multi-model providers).
pub fn resolve(provider_id: &str, model_id: Option<&str>) -> ProviderCapabilities {
    match CAPABILITY_TABLE.get(provider_id) {
        Some(entry) => entry.resolve(model_id),
        None => {
            tracing::debug!(
                provider = provider_id,
                fallback = DEFAULT_PROVIDER,
                "unknown provider, using default capabilities"
            );
            CAPABILITY_TABLE
                .get(DEFAULT_PROVIDER)
                .map(|entry| entry.resolve(None))
                .unwrap_or_default()
        }
    }
}
