//! # openimage-client
//!
//! Client-side core of the OpenImage multi-provider image generator. It keeps
//! the page state, decides what the generation form shows for the selected
//! provider and model, and talks to the backend API.
//!
#![deny(unsafe_code)]

//! ## Features
//!
//! - **Capability Resolver**: static table of the optional parameters each
//!   provider (or model) accepts.
//! - **Form Derivation**: visibility, defaults and aspect-ratio dimensions,
//!   applied through the [`form::FormView`] trait.
//! - **Gallery**: client-side pagination, favorites and upscale updates.
//! - **Health Monitor**: status cards, dropdown annotations and periodic polling.
//! - **Backend Client**: typed `reqwest` client with CSRF handling behind the
//!   [`client::BackendApi`] trait.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use openimage_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::from_env()?;
//!     let backend = Arc::new(BackendClient::new(config.clone())?);
//!     let mut session = Session::from_page(backend, &config, None, Some("pollinations"));
//!
//!     session.load_model_configs().await;
//!     let form = GenerationForm::new("pollinations", "a lighthouse at dusk");
//!     match session.submit(form).await {
//!         GenerationOutcome::Generated { preview, .. } => println!("{}", preview.model),
//!         GenerationOutcome::Failed(notice) => eprintln!("{}", notice.message),
//!     }
//!     Ok(())
//! }
//! ```

pub mod capabilities;
pub mod client;
pub mod config;
pub mod defaults;
pub mod error;
pub mod form;
pub mod gallery;
pub mod health;
pub mod session;
pub mod state;
#[cfg(feature = "telemetry")]
pub mod telemetry;
pub mod types;

pub use error::{ClientError, ErrorCategory, Result};

pub mod prelude {
    pub use crate::capabilities::{ProviderCapabilities, resolve};
    pub use crate::client::{BackendApi, BackendClient};
    pub use crate::config::{ClientConfig, Endpoints};
    pub use crate::error::{ClientError, ErrorCategory, Notice, NoticeKind};
    pub use crate::form::{
        AspectRatio, FormDefaults, FormSection, FormUpdate, FormView, SelectOption,
        apply_capabilities_to_form,
    };
    pub use crate::gallery::{Gallery, GalleryPage};
    pub use crate::health::{HealthPoller, HealthView, ProviderOption, ProviderStatusCard};
    pub use crate::session::{GenerationOutcome, Session, UpscaleOutcome};
    pub use crate::state::AppState;
    pub use crate::types::{
        GalleryImage, GenerationForm, GenerationModelConfig, GenerationResponse, HealthReport,
        HttpConfig, Resolution, UpscaleRequest, UpscaleResponse,
    };
}
