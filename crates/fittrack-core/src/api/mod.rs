//! Fitness backend access.
//!
//! The wizard and the activity loader only see the [`AuthApi`] and
//! [`HealthApi`] traits; [`ApiClient`] is the `reqwest` implementation.

pub mod client;
pub mod traits;
pub mod types;

pub use client::ApiClient;
pub use traits::{AuthApi, HealthApi};
pub use types::{LoginResponse, RemoteErrorBody};
