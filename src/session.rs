//! User-action handlers.
//!
//! A [`Session`] owns the page state and a backend, and exposes one method
//! per user action. Methods never fail outward: errors are logged and turned
//! into the [`Notice`] the page should show, if any.

use std::sync::Arc;

use validator::Validate;

use crate::capabilities::ids;
use crate::client::BackendApi;
use crate::config::ClientConfig;
use crate::error::{ClientError, Notice, Operation, notice_for};
use crate::form::{
    FormDefaults, FormUpdate, SelectOption, base_resolution, dimensions_from_ratio,
    model_options, model_selector_for,
};
use crate::gallery::{Gallery, GalleryPage};
use crate::health::{self, HealthView, ProbeLine};
use crate::state::AppState;
use crate::types::{
    GalleryImage, GenerationForm, GenerationPreview, HealthReport, ImageId, Resolution,
    UpscaleRequest, UpscaleResponse,
};

pub const UPSCALE_SUCCESS: &str = "Image upscaled successfully!";

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationOutcome {
    Generated {
        preview: GenerationPreview,
        /// Whether the image was stored and prepended to the gallery
        stored: bool,
    },
    Failed(Notice),
}

/// Result of an upscale request.
#[derive(Debug, Clone, PartialEq)]
pub enum UpscaleOutcome {
    /// The user did not confirm
    Declined,
    /// Success; the page should reload the image
    Upscaled {
        response: UpscaleResponse,
        notice: Notice,
    },
    Failed(Notice),
}

impl UpscaleOutcome {
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Declined => None,
            Self::Upscaled { notice, .. } | Self::Failed(notice) => Some(notice),
        }
    }

    pub fn reload_requested(&self) -> bool {
        matches!(self, Self::Upscaled { .. })
    }
}

pub struct Session<B: BackendApi + ?Sized> {
    backend: Arc<B>,
    state: AppState,
    preferred_provider: String,
}

impl<B: BackendApi + ?Sized> std::fmt::Debug for Session<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("preferred_provider", &self.preferred_provider)
            .finish()
    }
}

impl<B: BackendApi + ?Sized> Session<B> {
    pub fn new(backend: Arc<B>, state: AppState) -> Self {
        Self {
            backend,
            state,
            preferred_provider: crate::defaults::health::PREFERRED_PROVIDER.to_string(),
        }
    }

    /// Session for a freshly rendered page: gallery from the embedded JSON
    /// payload and tunables from `config`.
    pub fn from_page(
        backend: Arc<B>,
        config: &ClientConfig,
        embedded_gallery: Option<&str>,
        initial_provider: Option<&str>,
    ) -> Self {
        let gallery = match embedded_gallery {
            Some(raw) => Gallery::from_embedded_json(raw, config.page_size),
            None => Gallery::new(config.page_size),
        };
        let mut state = AppState::new(gallery);
        state.active_provider = initial_provider.map(str::to_string);
        Self::new(backend, state).with_preferred_provider(&config.preferred_provider)
    }

    pub fn with_preferred_provider(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = provider.into();
        self
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Fetch the model configuration and preselect every model selector.
    ///
    /// On failure the previous configuration is kept and the error logged.
    pub async fn load_model_configs(&mut self) -> FormUpdate {
        match self.backend.fetch_model_configs().await {
            Ok(config) => {
                tracing::debug!(providers = config.len(), "model configuration loaded");
                self.state.model_config = config;
                for (provider, _) in ids::MODEL_SELECTORS {
                    if let Some(option) = self
                        .model_options(provider)
                        .into_iter()
                        .find(|option| option.selected)
                    {
                        self.state.select_model(provider, option.value);
                    }
                }
            }
            Err(e) => {
                tracing::error!("Error loading models config: {e}");
            }
        }
        self.form_update()
    }

    /// Options of a provider's model selector.
    pub fn model_options(&self, provider_id: &str) -> Vec<SelectOption> {
        model_options(&self.state.model_config, provider_id)
    }

    /// What the form should show for the current selection.
    pub fn form_update(&self) -> FormUpdate {
        let provider = self.state.provider().to_string();
        let model = self.state.selected_model(&provider).map(str::to_string);
        FormUpdate {
            capabilities: self.state.capabilities(),
            model_selector: model_selector_for(&provider),
            defaults: FormDefaults::derive(&self.state.model_config, &provider, model.as_deref()),
            provider,
            model,
        }
    }

    pub fn select_provider(&mut self, provider_id: &str) -> FormUpdate {
        tracing::debug!(provider = provider_id, "provider selected");
        self.state.active_provider = Some(provider_id.to_string());
        self.form_update()
    }

    /// Select a model of the active provider.
    pub fn select_model(&mut self, model_id: &str) -> FormUpdate {
        let provider = self.state.provider().to_string();
        tracing::debug!(provider = %provider, model = model_id, "model selected");
        self.state.select_model(provider, model_id);
        self.form_update()
    }

    /// Dimensions after picking an aspect ratio, keeping the current long side.
    pub fn change_aspect_ratio(&self, token: &str, current: Resolution) -> Resolution {
        dimensions_from_ratio(token, base_resolution(current))
    }

    /// Validate and submit the generation form.
    pub async fn submit(&mut self, form: GenerationForm) -> GenerationOutcome {
        if let Err(e) = form.validate() {
            let err: ClientError = e.into();
            return GenerationOutcome::Failed(failure_notice(&err, Operation::Generate));
        }
        let backend = Arc::clone(&self.backend);
        let in_flight = match self.state.generation_guard() {
            Ok(guard) => guard,
            Err(err) => {
                return GenerationOutcome::Failed(failure_notice(&err, Operation::Generate));
            }
        };

        let capabilities =
            crate::capabilities::resolve(&form.provider, form.selected_model());
        let form = form.restrict_to(&capabilities);
        let result = backend.generate(&form).await;
        drop(in_flight);

        match result {
            Ok(response) => {
                if let Some(warning) = &response.warning {
                    tracing::warn!("{warning}");
                }
                let preview = GenerationPreview::new(&response, &form);
                self.state.preview = Some(preview.clone());
                let stored = match GalleryImage::from_generation(&response, &form) {
                    Some(image) => {
                        self.state.gallery.prepend(image);
                        true
                    }
                    None => false,
                };
                GenerationOutcome::Generated { preview, stored }
            }
            Err(err) => {
                tracing::error!("Generation failed: {err}");
                GenerationOutcome::Failed(failure_notice(&err, Operation::Generate))
            }
        }
    }

    /// Toggle an image's favorite flag; returns the new flag on success.
    ///
    /// Failures are only logged.
    pub async fn toggle_favorite(&mut self, image_id: ImageId) -> Option<bool> {
        match self.backend.toggle_favorite(image_id).await {
            Ok(response) if response.success => {
                self.state.gallery.set_favorite(image_id, response.is_favorite);
                Some(response.is_favorite)
            }
            Ok(response) => {
                tracing::error!(
                    image_id,
                    "Error toggling favorite: {}",
                    response.error.as_deref().unwrap_or("unknown error")
                );
                None
            }
            Err(e) => {
                tracing::error!(image_id, "Error toggling favorite: {e}");
                None
            }
        }
    }

    /// Upscale an image after `confirm` accepted the confirmation prompt.
    pub async fn upscale<F>(&mut self, image_id: ImageId, scale: u8, confirm: F) -> UpscaleOutcome
    where
        F: FnOnce(&str) -> bool,
    {
        let request = match UpscaleRequest::new(image_id, scale) {
            Ok(request) => request,
            Err(err) => {
                return UpscaleOutcome::Failed(failure_notice(&err, Operation::Upscale));
            }
        };
        if !confirm(&request.confirmation_prompt()) {
            return UpscaleOutcome::Declined;
        }
        let backend = Arc::clone(&self.backend);
        let in_flight = match self.state.upscale_guard(image_id) {
            Ok(guard) => guard,
            Err(err) => {
                return UpscaleOutcome::Failed(failure_notice(&err, Operation::Upscale));
            }
        };

        let result = backend.upscale(request).await;
        drop(in_flight);

        match result {
            Ok(response) => {
                match response.new_resolution() {
                    Some(resolution) => {
                        self.state.gallery.apply_upscale(image_id, resolution);
                    }
                    None => tracing::warn!(
                        image_id,
                        "upscale response without a usable new_resolution"
                    ),
                }
                tracing::info!(
                    image_id,
                    upscaled_id = ?response.upscaled_id,
                    "image upscaled"
                );
                UpscaleOutcome::Upscaled {
                    response,
                    notice: Notice::alert(UPSCALE_SUCCESS),
                }
            }
            Err(err) => {
                tracing::error!(image_id, "Upscale error: {err}");
                UpscaleOutcome::Failed(failure_notice(&err, Operation::Upscale))
            }
        }
    }

    pub fn page(&self) -> GalleryPage<'_> {
        self.state.gallery.page()
    }

    pub fn change_page(&mut self, delta: isize) -> GalleryPage<'_> {
        self.state.gallery.change_page(delta);
        self.state.gallery.page()
    }

    /// Run one health check and render it. Returns whether a report was
    /// applied.
    pub async fn refresh_health<V: HealthView + ?Sized>(&mut self, view: &mut V) -> bool {
        match self.backend.health().await {
            Ok(report) => self.apply_health_report(report, view),
            Err(e) => {
                tracing::error!("Health check failed: {e}");
                false
            }
        }
    }

    /// Render a report (from [`refresh_health`](Self::refresh_health) or a
    /// [`HealthPoller`](crate::health::HealthPoller)). An auto-selected
    /// provider becomes the active provider.
    pub fn apply_health_report<V: HealthView + ?Sized>(
        &mut self,
        report: HealthReport,
        view: &mut V,
    ) -> bool {
        let applied = health::render_report(
            &report,
            self.state.active_provider.as_deref(),
            &self.preferred_provider,
            view,
        );
        if applied {
            if let Some(provider) = health::auto_select_provider(
                self.state.active_provider.as_deref(),
                &report,
                &self.preferred_provider,
            ) {
                self.state.active_provider = Some(provider);
            }
            self.state.last_health = Some(report);
        }
        applied
    }

    /// Run the free-API diagnostic.
    pub async fn probe_free_apis(&self) -> Result<Vec<ProbeLine>, Notice> {
        match self.backend.test_free_apis().await {
            Ok(report) => Ok(health::summarize_free_api_report(&report)),
            Err(err) => {
                tracing::error!("Free API probe failed: {err}");
                Err(failure_notice(&err, Operation::FreeApiProbe))
            }
        }
    }
}

fn failure_notice(err: &ClientError, operation: Operation) -> Notice {
    notice_for(err, operation).unwrap_or_else(|| Notice::inline(err.to_string()))
}
