//! Provider health presentation.
//!
//! Turns a [`HealthReport`] into status cards, the summary strip, the
//! recommendation list and provider dropdown annotations. Rendering goes
//! through [`HealthView`]; polling lives in [`poller`].

pub mod poller;

pub use poller::HealthPoller;

use regex::Regex;

use crate::types::{
    FreeApiReport, HealthReport, HealthSummary, ProbeStatus, ProviderHealth, Recommendation,
};

pub const FIX_HINT: &str = "💡 Fix: Add API key in .env file";

lazy_static::lazy_static! {
    static ref STATUS_PREFIX: Regex = Regex::new(r"^[✅❌]\s+").expect("valid status prefix regex");
}

/// One provider card of the health panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderStatusCard {
    pub provider: String,
    /// Display name, falls back to the provider id
    pub name: String,
    pub key_badge: &'static str,
    pub healthy: bool,
    pub message: String,
    /// `⚡ 1.23s`, only for measured response times
    pub response_time: Option<String>,
    pub fix_hint: Option<&'static str>,
}

impl ProviderStatusCard {
    pub fn new(provider: &str, health: &ProviderHealth) -> Self {
        let info = &health.info;
        let key_badge = match (info.requires_api_key, info.has_api_key) {
            (false, _) => "🆓",
            (true, true) => "🔑",
            (true, false) => "⚠️",
        };
        let name = if info.name.is_empty() {
            provider.to_string()
        } else {
            info.name.clone()
        };
        Self {
            provider: provider.to_string(),
            name,
            key_badge,
            healthy: health.is_healthy,
            message: health.message.clone(),
            response_time: (health.response_time > 0.0)
                .then(|| format!("⚡ {:.2}s", health.response_time)),
            fix_hint: (!health.is_healthy && info.requires_api_key && !info.has_api_key)
                .then_some(FIX_HINT),
        }
    }

    pub fn status_icon(&self) -> &'static str {
        if self.healthy { "✅" } else { "❌" }
    }

    /// `Working` or `Broken`
    pub fn status_label(&self) -> &'static str {
        if self.healthy { "Working" } else { "Broken" }
    }
}

/// Cards in backend order.
pub fn status_cards(report: &HealthReport) -> Vec<ProviderStatusCard> {
    report
        .providers
        .iter()
        .map(|(id, health)| ProviderStatusCard::new(id, health))
        .collect()
}

/// Whether the summary shows the broken counter.
pub fn shows_broken_count(summary: &HealthSummary) -> bool {
    summary.broken > 0
}

/// Provider `<option>` of the generation form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderOption {
    pub value: String,
    pub text: String,
    pub disabled: bool,
    pub title: Option<String>,
}

impl ProviderOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
            disabled: false,
            title: None,
        }
    }
}

/// Prefix options of reported providers with their status.
///
/// A previous prefix is replaced. Broken providers are disabled with the
/// health message as tooltip; providers that recovered are enabled again.
/// Options of unreported providers are left alone.
pub fn annotate_provider_options(options: &mut [ProviderOption], report: &HealthReport) {
    for option in options.iter_mut() {
        let Some(health) = report.providers.get(&option.value) else {
            continue;
        };
        let icon = if health.is_healthy { "✅" } else { "❌" };
        let text = STATUS_PREFIX.replace(&option.text, "").into_owned();
        option.text = format!("{icon} {text}");
        option.disabled = !health.is_healthy;
        option.title = (!health.is_healthy).then(|| health.message.clone());
    }
}

/// Provider to auto-select after a health check.
///
/// Only when nothing is selected: `preferred` if healthy, else the first
/// healthy provider in report order.
pub fn auto_select_provider(
    current: Option<&str>,
    report: &HealthReport,
    preferred: &str,
) -> Option<String> {
    if current.is_some_and(|c| !c.is_empty()) {
        return None;
    }
    let healthy: Vec<&str> = report.healthy_providers().collect();
    healthy
        .iter()
        .find(|id| **id == preferred)
        .or_else(|| healthy.first())
        .map(|id| id.to_string())
}

/// DOM side of the health panel.
pub trait HealthView {
    fn render_summary(&mut self, summary: &HealthSummary, show_broken: bool);

    fn render_cards(&mut self, cards: &[ProviderStatusCard]);

    /// Empty slice hides the recommendations block.
    fn render_recommendations(&mut self, recommendations: &[Recommendation]);

    fn update_provider_options(&mut self, annotate: &dyn Fn(&mut [ProviderOption]));

    fn select_provider(&mut self, provider: &str);
}

/// Render a report. Reports with `success: false` are ignored; returns
/// whether the report was applied.
pub fn render_report<V: HealthView + ?Sized>(
    report: &HealthReport,
    current_provider: Option<&str>,
    preferred_provider: &str,
    view: &mut V,
) -> bool {
    if !report.success {
        tracing::debug!(error = ?report.error, "ignoring unsuccessful health report");
        return false;
    }
    view.render_summary(&report.summary, shows_broken_count(&report.summary));
    view.render_cards(&status_cards(report));
    view.render_recommendations(&report.recommendations);
    view.update_provider_options(&|options| annotate_provider_options(options, report));
    if let Some(provider) = auto_select_provider(current_provider, report, preferred_provider) {
        view.select_provider(&provider);
    }
    true
}

/// One line of the free-API diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeLine {
    pub ok: bool,
    /// Provider id with its first letter capitalized
    pub name: String,
    pub message: String,
    /// `Models: a, b`, when the probe listed models
    pub models: Option<String>,
}

impl std::fmt::Display for ProbeLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let icon = if self.ok { "✅" } else { "❌" };
        write!(f, "{icon} {}: {}", self.name, self.message)?;
        if let Some(models) = &self.models {
            write!(f, "\n{models}")?;
        }
        Ok(())
    }
}

pub fn summarize_free_api_report(report: &FreeApiReport) -> Vec<ProbeLine> {
    report
        .results
        .iter()
        .map(|(provider, result)| ProbeLine {
            ok: result.status == ProbeStatus::Ok,
            name: capitalize(provider),
            message: result.message.clone(),
            models: (!result.models.is_empty())
                .then(|| format!("Models: {}", result.models.join(", "))),
        })
        .collect()
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> HealthReport {
        serde_json::from_value(json!({
            "success": true,
            "providers": {
                "gemini": {
                    "is_healthy": false,
                    "message": "API key not configured",
                    "response_time": 0,
                    "info": {"name": "Google Gemini", "requires_api_key": true, "has_api_key": false}
                },
                "huggingface": {
                    "is_healthy": true,
                    "message": "OK",
                    "response_time": 0.5,
                    "info": {"name": "Hugging Face", "requires_api_key": true, "has_api_key": true}
                },
                "pollinations": {
                    "is_healthy": true,
                    "message": "OK",
                    "response_time": 1.234,
                    "info": {"name": "Pollinations.ai", "free": true}
                }
            },
            "summary": {"total": 3, "working": 2, "broken": 1},
            "recommendations": []
        }))
        .unwrap()
    }

    #[test]
    fn cards_carry_badges_and_hints() {
        let cards = status_cards(&report());
        assert_eq!(cards.len(), 3);

        let gemini = &cards[0];
        assert_eq!(gemini.key_badge, "⚠️");
        assert_eq!(gemini.status_label(), "Broken");
        assert_eq!(gemini.response_time, None);
        assert_eq!(gemini.fix_hint, Some(FIX_HINT));

        assert_eq!(cards[1].key_badge, "🔑");
        assert_eq!(cards[1].fix_hint, None);

        let pollinations = &cards[2];
        assert_eq!(pollinations.key_badge, "🆓");
        assert_eq!(pollinations.status_label(), "Working");
        assert_eq!(pollinations.response_time.as_deref(), Some("⚡ 1.23s"));
    }

    #[test]
    fn options_are_prefixed_once() {
        let report = report();
        let mut options = vec![
            ProviderOption::new("pollinations", "Pollinations.ai"),
            ProviderOption::new("gemini", "Gemini"),
            ProviderOption::new("stability", "Stability AI"),
        ];
        annotate_provider_options(&mut options, &report);
        annotate_provider_options(&mut options, &report);

        assert_eq!(options[0].text, "✅ Pollinations.ai");
        assert!(!options[0].disabled);
        assert_eq!(options[1].text, "❌ Gemini");
        assert!(options[1].disabled);
        assert_eq!(options[1].title.as_deref(), Some("API key not configured"));
        assert_eq!(options[2], ProviderOption::new("stability", "Stability AI"));
    }

    #[test]
    fn recovered_provider_is_enabled_again() {
        let mut report = report();
        let mut options = vec![ProviderOption::new("gemini", "Gemini")];
        annotate_provider_options(&mut options, &report);
        report.providers["gemini"].is_healthy = true;
        annotate_provider_options(&mut options, &report);
        assert_eq!(options[0].text, "✅ Gemini");
        assert!(!options[0].disabled);
        assert!(options[0].title.is_none());
    }

    #[test]
    fn auto_selection_prefers_configured_provider() {
        let report = report();
        assert_eq!(
            auto_select_provider(None, &report, "pollinations").as_deref(),
            Some("pollinations")
        );
        assert_eq!(
            auto_select_provider(Some(""), &report, "gemini").as_deref(),
            Some("huggingface")
        );
        assert_eq!(auto_select_provider(Some("gemini"), &report, "pollinations"), None);
    }

    #[test]
    fn broken_count_only_when_nonzero() {
        assert!(shows_broken_count(&report().summary));
        assert!(!shows_broken_count(&HealthSummary {
            total: 2,
            working: 2,
            broken: 0
        }));
    }

    #[test]
    fn free_api_summary_lines() {
        let report: FreeApiReport = serde_json::from_value(json!({
            "results": {
                "pollinations": {"status": "ok", "message": "Reachable", "models": ["flux", "turbo"]},
                "subnp": {"status": "error", "message": "Timeout", "models": []}
            }
        }))
        .unwrap();

        let lines = summarize_free_api_report(&report);
        assert_eq!(lines[0].to_string(), "✅ Pollinations: Reachable\nModels: flux, turbo");
        assert_eq!(lines[1].to_string(), "❌ Subnp: Timeout");
    }
}
