//! Shared fixtures and fakes for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use openimage_client::client::BackendApi;
use openimage_client::error::{ClientError, Result};
use openimage_client::health::{HealthView, ProviderOption, ProviderStatusCard};
use openimage_client::types::{
    FavoriteToggleResponse, FreeApiReport, GenerationForm, GenerationModelConfig,
    GenerationResponse, HealthReport, HealthSummary, ImageId, Recommendation, UpscaleRequest,
    UpscaleResponse,
};
use serde_json::{Value, json};

/// Model configuration as served by `/api/all-configs/`
pub fn model_config_json() -> Value {
    json!({
        "pollinations": {
            "name": "Pollinations.ai",
            "max_resolution": 2048,
            "default_resolution": {"width": 1024, "height": 1024},
            "aspect_ratios": ["1:1", "16:9", "9:16", "4:3", "3:4", "21:9", "9:21"],
            "formats": ["PNG"],
            "default_format": "PNG",
            "models": {
                "flux": {"name": "Flux", "default_resolution": {"width": 1024, "height": 1024}},
                "turbo": {"name": "Turbo", "default_resolution": {"width": 1024, "height": 1024}}
            }
        },
        "gemini": {
            "name": "Google Gemini",
            "max_resolution": 1024,
            "default_resolution": {"width": 1024, "height": 1024},
            "aspect_ratios": ["1:1", "3:4", "4:3", "9:16", "16:9"],
            "formats": ["PNG"]
        },
        "huggingface": {
            "models": {
                "flux-schnell": {
                    "name": "FLUX.1 Schnell",
                    "max_resolution": 1024,
                    "default_resolution": {"width": 1024, "height": 1024},
                    "aspect_ratios": ["1:1"],
                    "formats": ["PNG"]
                },
                "sdxl-lightning": {
                    "name": "SDXL Lightning",
                    "max_resolution": 1024,
                    "default_resolution": {"width": 768, "height": 768},
                    "aspect_ratios": ["1:1", "3:4", "4:3"],
                    "formats": ["PNG"]
                },
                "stable-diffusion-xl": {
                    "name": "Stable Diffusion XL",
                    "max_resolution": 1024,
                    "default_resolution": {"width": 1024, "height": 1024},
                    "aspect_ratios": ["1:1", "3:4", "4:3"],
                    "formats": ["PNG"]
                }
            }
        },
        "stability": {
            "name": "Stability AI",
            "max_resolution": 1536,
            "default_resolution": {"width": 1024, "height": 1024},
            "aspect_ratios": ["1:1", "16:9", "9:16", "4:3", "3:4", "21:9"],
            "formats": ["PNG", "JPEG", "WEBP"],
            "default_format": "PNG",
            "supports_negative_prompt": true,
            "supports_cfg_scale": true,
            "supports_seed": true,
            "supports_style_preset": true
        }
    })
}

pub fn model_config() -> GenerationModelConfig {
    serde_json::from_value(model_config_json()).expect("valid model config fixture")
}

pub fn health_json() -> Value {
    json!({
        "success": true,
        "providers": {
            "gemini": {
                "is_healthy": false,
                "message": "API key not configured",
                "response_time": 0,
                "last_checked": "2025-01-10T09:30:00+00:00",
                "info": {"name": "Google Gemini", "requires_api_key": true, "has_api_key": false}
            },
            "pollinations": {
                "is_healthy": true,
                "message": "OK",
                "response_time": 0.87,
                "last_checked": "2025-01-10T09:30:00+00:00",
                "info": {"name": "Pollinations.ai", "free": true, "requires_api_key": false}
            }
        },
        "summary": {"total": 2, "working": 1, "broken": 1},
        "recommendations": [
            {
                "priority": "high",
                "provider": "gemini",
                "message": "Gemini needs an API key",
                "action": "Add GEMINI_API_KEY to .env",
                "fix_url": "https://aistudio.google.com/apikey"
            }
        ]
    })
}

pub fn health_report() -> HealthReport {
    serde_json::from_value(health_json()).expect("valid health fixture")
}

/// Generation response; `id` is omitted when `None`.
pub fn generation_json(id: Option<i64>) -> Value {
    let mut value = json!({
        "prompt": "a lighthouse at dusk",
        "model_used": "flux",
        "provider": "pollinations",
        "width": 1024,
        "height": 576,
        "image_base64": "aGVsbG8=",
        "content_type": "image/png"
    });
    if let Some(id) = id {
        value["id"] = json!(id);
    }
    value
}

pub fn generation_response(id: Option<i64>) -> GenerationResponse {
    serde_json::from_value(generation_json(id)).expect("valid generation fixture")
}

pub fn embedded_gallery_json(count: i64) -> String {
    let images: Vec<Value> = (1..=count)
        .map(|id| {
            json!({
                "id": id,
                "image_data": "aGVsbG8=",
                "prompt": format!("image number {id}"),
                "model_used": "flux",
                "width": "1024",
                "height": 1024,
                "output_format": "PNG",
                "style_preset": "",
                "is_favorite": false
            })
        })
        .collect();
    Value::Array(images).to_string()
}

/// In-memory backend with scripted answers.
pub struct FakeBackend {
    pub model_config: Mutex<Result<GenerationModelConfig>>,
    pub generation: Mutex<Result<GenerationResponse>>,
    pub upscale: Mutex<Result<UpscaleResponse>>,
    /// Answers in call order; the last one repeats
    pub health: Mutex<Vec<Result<HealthReport>>>,
    pub free_apis: Mutex<Result<FreeApiReport>>,
    pub favorites: Mutex<HashMap<ImageId, bool>>,
    pub submitted: Mutex<Vec<GenerationForm>>,
    pub upscale_calls: AtomicUsize,
    pub health_calls: AtomicUsize,
    /// When set, `generate` and `upscale` never complete
    pub hang: AtomicBool,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self {
            model_config: Mutex::new(Ok(model_config())),
            generation: Mutex::new(Ok(generation_response(Some(100)))),
            upscale: Mutex::new(Ok(UpscaleResponse {
                success: true,
                original_id: Some(1),
                upscaled_id: Some(101),
                original_resolution: Some("1024x1024".into()),
                new_resolution: Some("2048x2048".into()),
                scale: Some(2),
                processing_time: Some(12.5),
                model: Some("realesrgan".into()),
                error: None,
            })),
            health: Mutex::new(vec![Ok(health_report())]),
            free_apis: Mutex::new(Ok(FreeApiReport::default())),
            favorites: Mutex::new(HashMap::new()),
            submitted: Mutex::new(Vec::new()),
            upscale_calls: AtomicUsize::new(0),
            health_calls: AtomicUsize::new(0),
            hang: AtomicBool::new(false),
        }
    }
}

impl FakeBackend {
    pub fn with_generation(self, result: Result<GenerationResponse>) -> Self {
        *self.generation.lock().unwrap() = result;
        self
    }

    pub fn with_upscale(self, result: Result<UpscaleResponse>) -> Self {
        *self.upscale.lock().unwrap() = result;
        self
    }

    pub fn with_health(self, script: Vec<Result<HealthReport>>) -> Self {
        *self.health.lock().unwrap() = script;
        self
    }

    pub fn with_model_config(self, result: Result<GenerationModelConfig>) -> Self {
        *self.model_config.lock().unwrap() = result;
        self
    }

    pub fn set_hanging(&self, hang: bool) {
        self.hang.store(hang, Ordering::SeqCst);
    }

    async fn maybe_hang(&self) {
        if self.hang.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }

    pub fn last_submitted(&self) -> Option<GenerationForm> {
        self.submitted.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl BackendApi for FakeBackend {
    async fn fetch_model_configs(&self) -> Result<GenerationModelConfig> {
        self.model_config.lock().unwrap().clone()
    }

    async fn generate(&self, form: &GenerationForm) -> Result<GenerationResponse> {
        self.submitted.lock().unwrap().push(form.clone());
        self.maybe_hang().await;
        self.generation.lock().unwrap().clone()
    }

    async fn toggle_favorite(&self, image_id: ImageId) -> Result<FavoriteToggleResponse> {
        let mut favorites = self.favorites.lock().unwrap();
        let flag = favorites.entry(image_id).or_insert(false);
        *flag = !*flag;
        Ok(FavoriteToggleResponse {
            success: true,
            is_favorite: *flag,
            error: None,
        })
    }

    async fn upscale(&self, _request: UpscaleRequest) -> Result<UpscaleResponse> {
        self.upscale_calls.fetch_add(1, Ordering::SeqCst);
        self.maybe_hang().await;
        self.upscale.lock().unwrap().clone()
    }

    async fn health(&self) -> Result<HealthReport> {
        let call = self.health_calls.fetch_add(1, Ordering::SeqCst);
        let script = self.health.lock().unwrap();
        match script.get(call).or_else(|| script.last()) {
            Some(result) => result.clone(),
            None => Err(ClientError::HttpError("no health answer scripted".into())),
        }
    }

    async fn test_free_apis(&self) -> Result<FreeApiReport> {
        self.free_apis.lock().unwrap().clone()
    }
}

/// Health view recording what was rendered.
#[derive(Debug, Default)]
pub struct RecordingHealthView {
    pub summary: Option<(HealthSummary, bool)>,
    pub cards: Vec<ProviderStatusCard>,
    pub recommendations: Vec<Recommendation>,
    pub options: Vec<ProviderOption>,
    pub selected: Option<String>,
    pub renders: usize,
}

impl RecordingHealthView {
    pub fn with_options(options: &[(&str, &str)]) -> Self {
        Self {
            options: options
                .iter()
                .map(|(value, text)| ProviderOption::new(*value, *text))
                .collect(),
            ..Default::default()
        }
    }
}

impl HealthView for RecordingHealthView {
    fn render_summary(&mut self, summary: &HealthSummary, show_broken: bool) {
        self.summary = Some((*summary, show_broken));
        self.renders += 1;
    }

    fn render_cards(&mut self, cards: &[ProviderStatusCard]) {
        self.cards = cards.to_vec();
    }

    fn render_recommendations(&mut self, recommendations: &[Recommendation]) {
        self.recommendations = recommendations.to_vec();
    }

    fn update_provider_options(&mut self, annotate: &dyn Fn(&mut [ProviderOption])) {
        annotate(&mut self.options);
    }

    fn select_provider(&mut self, provider: &str) {
        self.selected = Some(provider.to_string());
    }
}
