//! Health check and free-API probe payloads.

use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Static description of a provider attached to its health entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderInfo {
    pub name: String,
    pub description: String,
    pub free: bool,
    pub requires_api_key: bool,
    pub quality: f64,
    pub speed: String,
    pub has_api_key: bool,
}

/// Health of one provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderHealth {
    pub is_healthy: bool,
    #[serde(default)]
    pub message: String,
    /// Seconds; zero when unmeasured
    #[serde(default)]
    pub response_time: f64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub last_checked: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub info: ProviderInfo,
}

// Naive timestamps (no offset) are dropped rather than failing the report.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok()))
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthSummary {
    pub total: u32,
    pub working: u32,
    pub broken: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationPriority {
    High,
    Medium,
    #[default]
    Low,
}

impl RecommendationPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Setup advice produced by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub priority: RecommendationPriority,
    #[serde(default)]
    pub provider: Option<String>,
    pub message: String,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub steps: Option<Vec<String>>,
    #[serde(default)]
    pub fix_url: Option<String>,
}

/// Response of the health endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub providers: IndexMap<String, ProviderHealth>,
    #[serde(default)]
    pub summary: HealthSummary,
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
    #[serde(default)]
    pub error: Option<String>,
}

impl HealthReport {
    /// Healthy provider ids in backend order.
    pub fn healthy_providers(&self) -> impl Iterator<Item = &str> {
        self.providers
            .iter()
            .filter(|(_, p)| p.is_healthy)
            .map(|(id, _)| id.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Ok,
    Error,
}

/// Result of probing one free API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub status: ProbeStatus,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub models: Vec<String>,
}

/// Response of the free-API diagnostic endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeApiReport {
    #[serde(default)]
    pub results: IndexMap<String, ProbeResult>,
}
