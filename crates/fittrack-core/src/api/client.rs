//! HTTP client for the fitness backend.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

use crate::activity::HealthSample;
use crate::error::ApiError;
use crate::signup::{Credentials, RegistrationPayload};
use crate::storage::config::ApiConfig;

use super::traits::{AuthApi, HealthApi};
use super::types::{LoginResponse, RemoteErrorBody};

const REGISTER_PATH: &str = "auth/register/";
const LOGIN_PATH: &str = "auth/login/";
const HEALTH_DATA_PATH: &str = "health/data/";
const USER_AGENT: &str = concat!("fittrack/", env!("CARGO_PKG_VERSION"));

/// Backend client. Cheap to clone; the connection pool is shared.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base: base_url(&config.base_url)?,
        })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base.join(path)?)
    }
}

/// Parse the configured base, making sure relative joins keep its path.
fn base_url(raw: &str) -> Result<Url, ApiError> {
    let mut base = raw.trim().to_string();
    if !base.ends_with('/') {
        base.push('/');
    }
    Ok(Url::parse(&base)?)
}

/// Turn a non-success response into [`ApiError::Status`].
async fn ensure_success(resp: Response) -> Result<Response, ApiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body: RemoteErrorBody::from_text(&text),
    })
}

async fn json_or_null(resp: Response) -> Result<serde_json::Value, ApiError> {
    let bytes = resp.bytes().await?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn signup(&self, payload: &RegistrationPayload) -> Result<serde_json::Value, ApiError> {
        let url = self.endpoint(REGISTER_PATH)?;
        tracing::debug!(%url, "POST register");
        let resp = self.http.post(url).json(payload).send().await?;
        let resp = ensure_success(resp).await?;
        json_or_null(resp).await
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint(LOGIN_PATH)?;
        tracing::debug!(%url, "POST login");
        let resp = self.http.post(url).json(credentials).send().await?;
        let resp = ensure_success(resp).await?;
        let body = json_or_null(resp).await?;

        let has_access = body
            .get("access")
            .and_then(|v| v.as_str())
            .is_some_and(|s| !s.is_empty());
        if !has_access {
            return Err(ApiError::Decode(
                "login response has no access token".to_string(),
            ));
        }
        serde_json::from_value(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl HealthApi for ApiClient {
    async fn health_data(
        &self,
        days: u32,
        access_token: &str,
    ) -> Result<Vec<HealthSample>, ApiError> {
        let mut url = self.endpoint(HEALTH_DATA_PATH)?;
        url.query_pairs_mut().append_pair("days", &days.to_string());
        tracing::debug!(%url, "GET health data");

        let resp = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await?;
        let resp = ensure_success(resp).await?;

        // Anything other than an array means "no data".
        match json_or_null(resp).await? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item).map_err(|e| ApiError::Decode(e.to_string()))
                })
                .collect(),
            _ => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_trailing_slash() {
        let url = base_url("http://localhost:8000/api").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            url.join(REGISTER_PATH).unwrap().as_str(),
            "http://localhost:8000/api/auth/register/"
        );
    }

    #[test]
    fn bad_base_url_is_reported() {
        let err = base_url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidUrl(_)));
    }
}
