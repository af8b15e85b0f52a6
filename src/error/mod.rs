//! Error Handling Module
//!
//! This module provides error handling for the client, including:
//! - Core error types (`ClientError`, `ErrorCategory`)
//! - User-facing notices derived from errors (inline messages and alerts)
//!
//! # Example
//!
//! ```rust,ignore
//! use openimage_client::error::{ClientError, ErrorCategory};
//!
//! let error = ClientError::api_error(400, "Prompt must be at least 3 characters long");
//! assert_eq!(error.category(), ErrorCategory::Client);
//! ```

pub mod helpers;
pub mod types;

pub use helpers::*;
pub use types::*;
