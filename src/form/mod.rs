//! Form state derivation.
//!
//! Everything here is pure: the functions compute what the generation form
//! should show, and [`FormView`] implementations apply it to the page.

pub mod aspect_ratio;
pub mod defaults;

pub use aspect_ratio::{AspectRatio, base_resolution, dimensions_from_ratio};
pub use defaults::{FormDefaults, SelectOption, model_options};

use crate::capabilities::{ProviderCapabilities, ids};

/// Warning attached to the style-preset field when the provider ignores presets.
pub const STYLE_PRESET_WARNING: &str = "⚠️ Style presets may not work well with this provider";

/// Optional sections of the generation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormSection {
    NegativePrompt,
    Seed,
    CfgScale,
}

/// Visibility derived from a capability record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormVisibility {
    pub negative_prompt: bool,
    pub seed: bool,
    pub cfg_scale: bool,
    pub style_warning: bool,
}

impl FormVisibility {
    pub fn from_capabilities(capabilities: &ProviderCapabilities) -> Self {
        Self {
            negative_prompt: capabilities.supports_negative_prompt,
            seed: capabilities.supports_seed,
            cfg_scale: capabilities.supports_cfg_scale,
            style_warning: !capabilities.supports_style_preset,
        }
    }

    pub fn is_visible(&self, section: FormSection) -> bool {
        match section {
            FormSection::NegativePrompt => self.negative_prompt,
            FormSection::Seed => self.seed,
            FormSection::CfgScale => self.cfg_scale,
        }
    }
}

/// DOM-facing side of the generation form.
///
/// Implementations only change visibility, option lists and default values;
/// the user's typed values are never touched by capability changes.
pub trait FormView {
    fn set_section_visible(&mut self, section: FormSection, visible: bool);

    /// Show (`Some`) or remove (`None`) the style-preset advisory.
    fn set_style_warning(&mut self, warning: Option<&str>);

    /// Show the model selector of `provider` and hide the others; `None`
    /// hides every selector.
    fn show_model_selector(&mut self, provider: Option<&str>);

    fn apply_defaults(&mut self, defaults: &FormDefaults);
}

/// Toggle the optional sections and the style-preset warning.
pub fn apply_capabilities_to_form<V: FormView + ?Sized>(
    capabilities: &ProviderCapabilities,
    view: &mut V,
) {
    let visibility = FormVisibility::from_capabilities(capabilities);
    for section in [
        FormSection::NegativePrompt,
        FormSection::Seed,
        FormSection::CfgScale,
    ] {
        view.set_section_visible(section, visibility.is_visible(section));
    }
    view.set_style_warning(visibility.style_warning.then_some(STYLE_PRESET_WARNING));
}

/// Everything the form needs after a provider or model change.
#[derive(Debug, Clone, PartialEq)]
pub struct FormUpdate {
    pub provider: String,
    pub model: Option<String>,
    pub capabilities: ProviderCapabilities,
    /// Provider whose model selector is visible
    pub model_selector: Option<String>,
    /// `None` while the model configuration is missing or invalid
    pub defaults: Option<FormDefaults>,
}

impl FormUpdate {
    pub fn apply<V: FormView + ?Sized>(&self, view: &mut V) {
        view.show_model_selector(self.model_selector.as_deref());
        apply_capabilities_to_form(&self.capabilities, view);
        if let Some(defaults) = &self.defaults {
            view.apply_defaults(defaults);
        }
    }
}

/// Selector shown for `provider`.
pub fn model_selector_for(provider: &str) -> Option<String> {
    ids::shows_model_selector(provider).then(|| provider.to_string())
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingFormView;
    use super::*;
    use crate::capabilities::resolve;

    #[test]
    fn pollinations_hides_everything_and_warns() {
        let mut view = RecordingFormView::default();
        apply_capabilities_to_form(&resolve(ids::POLLINATIONS, None), &mut view);
        assert_eq!(view.sections[&FormSection::NegativePrompt], false);
        assert_eq!(view.sections[&FormSection::Seed], false);
        assert_eq!(view.sections[&FormSection::CfgScale], false);
        assert_eq!(view.style_warning.as_deref(), Some(STYLE_PRESET_WARNING));
    }

    #[test]
    fn switching_to_full_support_removes_warning() {
        let mut view = RecordingFormView::default();
        apply_capabilities_to_form(&resolve(ids::POLLINATIONS, None), &mut view);
        apply_capabilities_to_form(
            &resolve(ids::HUGGINGFACE, Some(ids::huggingface::STABLE_DIFFUSION_3)),
            &mut view,
        );
        assert!(view.sections.values().all(|visible| *visible));
        assert!(view.style_warning.is_none());
    }

    #[test]
    fn only_huggingface_and_subnp_show_a_model_selector() {
        assert_eq!(model_selector_for(ids::HUGGINGFACE).as_deref(), Some("huggingface"));
        assert_eq!(model_selector_for(ids::SUBNP).as_deref(), Some("subnp"));
        assert_eq!(model_selector_for(ids::POLLINATIONS), None);
        assert_eq!(model_selector_for(ids::STABILITY), None);
    }
}
