//! Provider and model identifiers used by the form and the backend.

pub const POLLINATIONS: &str = "pollinations";
pub const GEMINI: &str = "gemini";
pub const HUGGINGFACE: &str = "huggingface";
pub const DEEPAI: &str = "deepai";
pub const RUNWARE: &str = "runware";
pub const REPLICATE: &str = "replicate";
pub const STABILITY: &str = "stability";
pub const SUBNP: &str = "subnp";

/// Hugging Face models.
pub mod huggingface {
    pub const FLUX_SCHNELL: &str = "flux-schnell";
    pub const STABLE_DIFFUSION_XL: &str = "stable-diffusion-xl";
    pub const STABLE_DIFFUSION_3: &str = "stable-diffusion-3";
    pub const SDXL_LIGHTNING: &str = "sdxl-lightning";
}

/// Pollinations models.
pub mod pollinations {
    pub const FLUX: &str = "flux";
}

/// SubNP models.
pub mod subnp {
    pub const MAGIC: &str = "magic";
}

/// Providers whose model is picked from a dedicated selector, with the model
/// preselected when the selector is populated.
pub const MODEL_SELECTORS: [(&str, &str); 3] = [
    (POLLINATIONS, pollinations::FLUX),
    (HUGGINGFACE, huggingface::SDXL_LIGHTNING),
    (SUBNP, subnp::MAGIC),
];

/// Preselected model for a provider's selector.
pub fn preferred_model(provider_id: &str) -> Option<&'static str> {
    MODEL_SELECTORS
        .iter()
        .find(|(provider, _)| *provider == provider_id)
        .map(|(_, model)| *model)
}

/// Whether the provider's model selector is shown when it is active.
///
/// Pollinations keeps a single-model UI even though its selector exists.
pub fn shows_model_selector(provider_id: &str) -> bool {
    matches!(provider_id, HUGGINGFACE | SUBNP)
}
