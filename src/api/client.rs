//! HTTP client for the tr8n service API.

use std::time::Duration;

use crate::api::error::ApiError;
use crate::api::types::{
    ApplicationRow,
    AuthorizeResponse,
    RegisterResponse,
    ResultsEnvelope,
    TranslationKeyRow,
};
use crate::ir::{
    Application,
    TranslationKey,
};

/// Total timeout applied to every request.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client identifier sent with every request.
const USER_AGENT: &str = concat!("tr8n-language-server/", env!("CARGO_PKG_VERSION"));

/// Client for the tr8n HTTP API, bound to one service host.
///
/// One instance is built per flow invocation so host changes take effect
/// immediately; no retries are attempted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the service running on `host` (a bare domain,
    /// the service speaks plain HTTP).
    pub fn new(host: &str) -> Result<Self, ApiError> {
        let http =
            reqwest::Client::builder().timeout(REQUEST_TIMEOUT).user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url: format!("http://{host}/tr8n/api/v1") })
    }

    /// Searches translation keys matching `query`.
    pub async fn lookup(&self, query: &str) -> Result<Vec<TranslationKey>, ApiError> {
        let response = self
            .http
            .get(format!("{}/translation_key/lookup", self.base_url))
            .query(&[("query", query)])
            .send()
            .await?;
        let envelope: ResultsEnvelope<TranslationKeyRow> = Self::decode(response).await?;
        if let Some(message) = envelope.error {
            return Err(ApiError::Server(message));
        }
        Ok(envelope.results.into_iter().map(TranslationKey::from).collect())
    }

    /// Registers a new translation key under the selected application.
    pub async fn register(
        &self,
        access_token: &str,
        app_key: &str,
        label: &str,
        description: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .http
            .post(format!("{}/translation_key/register", self.base_url))
            .form(&[
                ("access_token", access_token),
                ("app_key", app_key),
                ("label", label),
                ("description", description),
            ])
            .send()
            .await?;
        let body: RegisterResponse = Self::decode(response).await?;
        match body.error {
            Some(message) => Err(ApiError::Server(message)),
            None => Ok(()),
        }
    }

    /// Lists the applications available to the logged-in translator.
    pub async fn applications(&self, access_token: &str) -> Result<Vec<Application>, ApiError> {
        let response = self
            .http
            .get(format!("{}/translator/applications", self.base_url))
            .query(&[("access_token", access_token)])
            .send()
            .await?;
        let envelope: ResultsEnvelope<ApplicationRow> = Self::decode(response).await?;
        if let Some(message) = envelope.error {
            return Err(ApiError::Server(message));
        }
        Ok(envelope.results.into_iter().map(Application::from).collect())
    }

    /// Exchanges credentials for an access token.
    pub async fn authorize(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response = self
            .http
            .post(format!("{}/translator/authorize", self.base_url))
            .form(&[("email", email), ("password", password)])
            .send()
            .await?;
        let body: AuthorizeResponse = Self::decode(response).await?;
        if let Some(message) = body.error {
            return Err(ApiError::Server(message));
        }
        body.access_token
            .ok_or_else(|| ApiError::Server("authorize response had no access token".to_string()))
    }

    /// Checks the HTTP status and decodes the JSON body.
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }
        Ok(response.json::<T>().await?)
    }
}
