//! Page state.
//!
//! Everything the page keeps between user actions lives in [`AppState`]; it
//! is owned by the [`Session`](crate::session::Session) and never persisted.

use std::collections::{HashMap, HashSet};

use crate::capabilities::{self, DEFAULT_PROVIDER, ProviderCapabilities};
use crate::error::{ClientError, Result};
use crate::gallery::Gallery;
use crate::types::{GenerationModelConfig, GenerationPreview, HealthReport, ImageId};

#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Provider selected in the form, if any
    pub active_provider: Option<String>,
    /// Model chosen in each provider's model selector
    pub selected_models: HashMap<String, String>,
    pub model_config: GenerationModelConfig,
    pub gallery: Gallery,
    /// Last successful generation
    pub preview: Option<GenerationPreview>,
    pub last_health: Option<HealthReport>,
    generating: bool,
    upscaling: HashSet<ImageId>,
}

static_assertions::assert_impl_all!(AppState: Send, Sync);

impl AppState {
    pub fn new(gallery: Gallery) -> Self {
        Self {
            gallery,
            ..Default::default()
        }
    }

    /// Active provider, or the default provider when none is selected.
    pub fn provider(&self) -> &str {
        self.active_provider
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PROVIDER)
    }

    pub fn selected_model(&self, provider_id: &str) -> Option<&str> {
        self.selected_models.get(provider_id).map(String::as_str)
    }

    pub fn select_model(&mut self, provider_id: impl Into<String>, model_id: impl Into<String>) {
        self.selected_models
            .insert(provider_id.into(), model_id.into());
    }

    /// Capabilities of the active provider and its selected model.
    pub fn capabilities(&self) -> ProviderCapabilities {
        let provider = self.provider();
        capabilities::resolve(provider, self.selected_model(provider))
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    /// Mark a generation as in flight; fails if one already is.
    pub fn begin_generation(&mut self) -> Result<()> {
        if self.generating {
            return Err(ClientError::Busy(
                "A generation is already in progress".to_string(),
            ));
        }
        self.generating = true;
        Ok(())
    }

    pub fn finish_generation(&mut self) {
        self.generating = false;
    }

    pub fn is_upscaling(&self, image_id: ImageId) -> bool {
        self.upscaling.contains(&image_id)
    }

    /// Mark an upscale of `image_id` as in flight; fails if one already is.
    pub fn begin_upscale(&mut self, image_id: ImageId) -> Result<()> {
        if !self.upscaling.insert(image_id) {
            return Err(ClientError::Busy(format!(
                "Image {image_id} is already being upscaled"
            )));
        }
        Ok(())
    }

    pub fn finish_upscale(&mut self, image_id: ImageId) {
        self.upscaling.remove(&image_id);
    }

    /// Like [`begin_generation`](Self::begin_generation), but the flag is
    /// cleared when the returned guard is dropped.
    pub fn generation_guard(&mut self) -> Result<InFlight<'_>> {
        self.begin_generation()?;
        Ok(InFlight {
            state: self,
            action: Action::Generation,
        })
    }

    /// Like [`begin_upscale`](Self::begin_upscale), but the flag is cleared
    /// when the returned guard is dropped.
    pub fn upscale_guard(&mut self, image_id: ImageId) -> Result<InFlight<'_>> {
        self.begin_upscale(image_id)?;
        Ok(InFlight {
            state: self,
            action: Action::Upscale(image_id),
        })
    }
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Generation,
    Upscale(ImageId),
}

/// An in-flight action; its flag is cleared on drop, including when the
/// future awaiting the backend is cancelled.
#[derive(Debug)]
pub struct InFlight<'a> {
    state: &'a mut AppState,
    action: Action,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        match self.action {
            Action::Generation => self.state.finish_generation(),
            Action::Upscale(image_id) => self.state.finish_upscale(image_id),
        }
    }
}
