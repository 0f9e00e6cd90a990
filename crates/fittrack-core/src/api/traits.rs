use async_trait::async_trait;

use crate::activity::HealthSample;
use crate::error::ApiError;
use crate::signup::{Credentials, RegistrationPayload};

use super::types::LoginResponse;

/// Account endpoints used by the signup wizard.
///
/// [`super::ApiClient`] talks to the real backend; tests substitute fakes.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account. Returns the created-account JSON.
    async fn signup(&self, payload: &RegistrationPayload) -> Result<serde_json::Value, ApiError>;

    /// Exchange credentials for session tokens.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError>;
}

/// Health-data endpoint used by the activity summary.
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// Daily samples for the last `days` days, newest first.
    async fn health_data(&self, days: u32, access_token: &str)
        -> Result<Vec<HealthSample>, ApiError>;
}
