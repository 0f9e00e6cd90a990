//! # FitTrack Core Library
//!
//! Business logic for the FitTrack fitness client. Front ends (the bundled
//! CLI, or any other shell) stay thin and drive everything through this
//! crate.
//!
//! ## Architecture
//!
//! - **Signup**: a four-step wizard state machine with per-step validation
//!   that creates the account and signs in on completion
//! - **API**: `reqwest` client for the backend's auth and health-data
//!   endpoints, behind the [`AuthApi`] / [`HealthApi`] traits
//! - **Storage**: TOML configuration, durable session tokens (file or OS
//!   keyring) and a SQLite cache of daily activity
//! - **Activity**: chart and progress summary built from health samples
//! - **Presentation**: explicit theme/platform context for text rendering
//!
//! ## Key Components
//!
//! - [`SignupWizard`]: signup state machine
//! - [`ApiClient`]: backend client
//! - [`SessionStore`]: durable token storage
//! - [`ActivitySummary`]: analytics view model
//! - [`Config`]: application configuration management

pub mod activity;
pub mod api;
pub mod error;
pub mod presentation;
pub mod signup;
pub mod storage;

pub use activity::{load_activity, ActivitySummary, HealthSample, TimeFilter};
pub use api::{ApiClient, AuthApi, HealthApi, LoginResponse, RemoteErrorBody};
pub use error::{ApiError, ConfigError, CoreError, StorageError, ValidationError};
pub use presentation::{Platform, RenderContext, Theme};
pub use signup::{SignupError, SignupWizard, Step, SubmitOutcome};
pub use storage::{ActivityDb, Config, SessionStore};
