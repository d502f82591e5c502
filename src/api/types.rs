//! Wire types for the tr8n HTTP API.
//!
//! Every endpoint answers either a payload or an object carrying an `error`
//! field; rows decode leniently since the service omits empty fields.

use serde::Deserialize;
use serde_json::Value;

/// Envelope shared by the list endpoints: `results` rows or an `error`.
#[derive(Debug, Deserialize)]
pub struct ResultsEnvelope<T> {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// One `translation_key/lookup` result row.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslationKeyRow {
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Existing translations for the key; only the count is used.
    #[serde(default)]
    pub translations: Vec<Value>,
}

/// One `translator/applications` result row.
#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationRow {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub key: String,
}

/// `translator/authorize` response.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthorizeResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// `translation_key/register` response: an empty object on success.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub error: Option<String>,
}
