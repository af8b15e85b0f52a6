//! User-facing error presentation.
//!
//! Maps `ClientError`s to the notices shown by the page: an inline message
//! under the generation form, or a blocking alert for upscales. Favorite
//! toggles and health checks fail silently (logged only).

use super::types::{ClientError, ErrorCategory};

/// How a notice is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// Message rendered in the form's error area
    Inline,
    /// Blocking alert dialog
    Alert,
}

/// A message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    pub fn inline(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Inline,
            message: message.into(),
        }
    }

    pub fn alert(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Alert,
            message: message.into(),
        }
    }
}

/// User actions that can fail visibly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Generate,
    Upscale,
    FavoriteToggle,
    HealthCheck,
    ConfigFetch,
    FreeApiProbe,
}

pub const GENERIC_GENERATION_ERROR: &str = "An error occurred";
pub const NETWORK_ERROR: &str = "Network error. Please try again.";
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Notice for a failed operation, or `None` when the failure is log-only.
pub fn notice_for(err: &ClientError, operation: Operation) -> Option<Notice> {
    match operation {
        Operation::Generate => Some(Notice::inline(generation_message(err))),
        Operation::Upscale => Some(Notice::alert(format!(
            "Upscaling failed: {}",
            upscale_reason(err)
        ))),
        Operation::FreeApiProbe => Some(Notice::inline(format!("❌ Test failed: {err}"))),
        Operation::FavoriteToggle | Operation::HealthCheck | Operation::ConfigFetch => None,
    }
}

fn generation_message(err: &ClientError) -> String {
    match err {
        ClientError::InvalidInput(msg) | ClientError::InvalidParameter(msg) => msg.clone(),
        ClientError::Busy(_) => "A generation is already in progress".to_string(),
        // an unreadable success body is reported like a failed request
        _ if matches!(err.category(), ErrorCategory::Network | ErrorCategory::Parsing) => {
            NETWORK_ERROR.to_string()
        }
        _ => err
            .backend_message()
            .unwrap_or(GENERIC_GENERATION_ERROR)
            .to_string(),
    }
}

fn upscale_reason(err: &ClientError) -> String {
    match err {
        ClientError::ApiError { .. } => err.backend_message().unwrap_or(UNKNOWN_ERROR).to_string(),
        ClientError::HttpError(msg)
        | ClientError::InvalidParameter(msg)
        | ClientError::InvalidInput(msg)
        | ClientError::Busy(msg) => msg.clone(),
        other => other.to_string(),
    }
}
