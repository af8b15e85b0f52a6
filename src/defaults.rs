//! Default Configuration Values
//!
//! Centralizes the default values used by the client so they can be adjusted
//! in one place.

use std::time::Duration;

/// HTTP client default configurations
pub mod http {
    use super::*;

    /// Default request timeout.
    ///
    /// Generation and upscaling run synchronously on the backend; an upscale
    /// typically takes 10-15 seconds and a slow provider can take longer.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Default connection timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default User-Agent string for HTTP requests
    pub const USER_AGENT: &str = concat!("openimage-client/", env!("CARGO_PKG_VERSION"));
}

/// Backend endpoint paths
pub mod endpoints {
    pub const BASE_URL: &str = "http://127.0.0.1:8000";
    pub const MODEL_CONFIGS: &str = "/api/all-configs/";
    pub const GENERATE: &str = "/generate/";
    pub const FAVORITE_TOGGLE: &str = "/api/favorites/toggle/";
    pub const UPSCALE: &str = "/api/upscale/";
    pub const HEALTH: &str = "/api/health/";
    pub const TEST_FREE_APIS: &str = "/api/test-free/";
}

/// CSRF handling
pub mod csrf {
    /// Cookie holding the CSRF token
    pub const COOKIE_NAME: &str = "csrftoken";
    /// Header carrying the token on mutating requests
    pub const HEADER_NAME: &str = "X-CSRFToken";
    /// Hidden form field carrying the token in the generation form
    pub const FORM_FIELD: &str = "csrfmiddlewaretoken";
}

/// Gallery defaults
pub mod gallery {
    /// Images shown per gallery page
    pub const PAGE_SIZE: usize = 20;
    /// Characters of the prompt shown on a gallery card
    pub const PROMPT_EXCERPT_CHARS: usize = 60;
    /// Output format assumed when none is recorded
    pub const OUTPUT_FORMAT: &str = "PNG";
}

/// Health monitoring defaults
pub mod health {
    use super::*;

    /// Interval between two health checks
    pub const POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

    /// Shortest interval a poller accepts
    pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

    /// Provider auto-selected when healthy and nothing is selected yet
    pub const PREFERRED_PROVIDER: &str = "pollinations";
}
