//! Data types shared by the client, the state and the views.

pub mod gallery;
pub mod generation;
pub mod health;
pub mod http;
pub mod model_config;
pub mod upscale;

pub use gallery::{GalleryImage, ImageDetails, ImageId};
pub use generation::{
    FavoriteToggleRequest, FavoriteToggleResponse, GenerationForm, GenerationPreview,
    GenerationResponse,
};
pub use health::{
    FreeApiReport, HealthReport, HealthSummary, ProbeResult, ProbeStatus, ProviderHealth,
    ProviderInfo, Recommendation, RecommendationPriority,
};
pub use http::{HttpConfig, HttpConfigBuilder};
pub use model_config::{GenerationModelConfig, ModelConfig, ProviderEntry, Resolution};
pub use upscale::{UpscaleRequest, UpscaleResponse};
